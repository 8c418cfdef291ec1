//! 스냅샷 내보내기 통합 테스트

use chartlens_analytics::ChartComposer;
use chartlens_core::{IndicatorKind, PriceBar, PriceSeries};
use chartlens_render::{ChartRenderer, RenderOptions, SnapshotExporter};
use chrono::NaiveDate;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

fn trending_series(n: usize) -> PriceSeries {
    let start = NaiveDate::from_ymd_opt(2023, 6, 1).unwrap();
    let bars = (0..n)
        .map(|i| {
            let base = dec!(150) + Decimal::from(i as i64) * dec!(0.75);
            let wiggle = Decimal::from((i % 4) as i64) - dec!(1.5);
            PriceBar::new(
                start + chrono::Duration::days(i as i64),
                base,
                base + dec!(3),
                base - dec!(3),
                base + wiggle,
                dec!(1200000),
            )
        })
        .collect();
    PriceSeries::new("NVDA", bars).unwrap()
}

#[test]
fn test_full_chart_export_roundtrip_on_disk() {
    let dir = tempfile::tempdir().unwrap();
    let chart = ChartComposer::new()
        .compose(&trending_series(90), &IndicatorKind::ALL)
        .unwrap();
    let exporter = SnapshotExporter::new(ChartRenderer::new(RenderOptions {
        width: 800,
        ..Default::default()
    }))
    .with_dir(dir.path());

    let snapshot = exporter.export(&chart).unwrap();
    let decoded = image::open(snapshot.path()).unwrap().to_rgb8();
    assert_eq!(decoded.width(), 800);
    assert_eq!(decoded.height(), chart.layout.height);

    let path = snapshot.path().to_path_buf();
    snapshot.close().unwrap();
    assert!(!path.exists());
}

#[test]
fn test_short_history_still_renders() {
    let dir = tempfile::tempdir().unwrap();
    let chart = ChartComposer::new()
        .compose(&trending_series(5), &[IndicatorKind::Sma20, IndicatorKind::Rsi14])
        .unwrap();
    assert!(chart.has_warnings());

    let exporter = SnapshotExporter::default().with_dir(dir.path());
    let len = exporter
        .with_snapshot(&chart, |path| std::fs::metadata(path).map(|m| m.len()).map_err(chartlens_render::RenderError::from))
        .unwrap();

    assert!(len > 0);
    assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 0);
}
