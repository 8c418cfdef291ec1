//! 기술적 지표 계산 및 차트 구성.
//!
//! 이 크레이트는 다음을 제공합니다:
//! - 기술적 지표 (SMA20, EMA20, 볼린저 밴드, RSI14)
//! - 가격 패널 + 오실레이터 패널 2단 차트 구성
//!
//! 모든 계산은 순수 함수이며 입력 `PriceSeries`를 변경하지 않습니다.

pub mod chart;
pub mod indicators;

pub use chart::{
    CandlestickTrace, ChartComposer, ChartLayout, ChartSpec, LineTrace, OscillatorPanel,
    PricePanel,
};
pub use indicators::{
    BollingerBandsParams, BollingerBandsResult, EmaParams, IndicatorEngine, IndicatorError,
    IndicatorResult, MomentumCalculator, RsiParams, SmaParams, TrendIndicators,
    VolatilityIndicators,
};
