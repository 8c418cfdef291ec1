//! 지원 지표 목록 출력.

use chartlens_core::{IndicatorClass, IndicatorKind};

/// 사용 가능한 지표 목록 출력
pub fn print_indicators() {
    println!("\n사용 가능한 지표:");
    println!("{:-<50}", "");
    for kind in IndicatorKind::ALL {
        let panel = match kind.class() {
            IndicatorClass::Overlay => "price",
            IndicatorClass::Oscillator => "oscillator",
        };
        println!(
            "  {:<6} {:<24} window={:<3} panel={}",
            kind.code(),
            kind.label(),
            kind.window(),
            panel
        );
    }
}
