//! 기술적 지표 모듈.
//!
//! 종가 시계열에서 차트 오버레이와 오실레이터를 계산합니다.
//!
//! # 지원 지표
//!
//! ## 추세 지표 (Trend Indicators)
//! - **SMA**: 단순 이동평균 (Simple Moving Average)
//! - **EMA**: 지수 이동평균 (Exponential Moving Average)
//!
//! ## 모멘텀 지표 (Momentum Indicators)
//! - **RSI**: 상대강도지수 (Relative Strength Index)
//!
//! ## 변동성 지표 (Volatility Indicators)
//! - **Bollinger Bands**: 볼린저 밴드
//!
//! # 사용 예시
//!
//! ```ignore
//! use chartlens_analytics::indicators::IndicatorEngine;
//! use chartlens_core::IndicatorKind;
//!
//! let engine = IndicatorEngine::new();
//!
//! // 가격 시계열의 날짜 축에 정렬된 SMA20
//! let sma = engine.compute(&series, IndicatorKind::Sma20)?;
//!
//! // 볼린저 밴드는 상단/하단 두 개의 시계열을 반환
//! let bands = engine.compute(&series, IndicatorKind::BollingerBands20)?;
//! ```

pub mod momentum;
pub mod trend;
pub mod volatility;

use chartlens_core::{
    ChartLensError, DerivedSeries, IndicatorKind, InsufficientHistoryWarning, PriceSeries,
};
use rust_decimal::Decimal;
use thiserror::Error;
use tracing::{debug, warn};

pub use momentum::{MomentumCalculator, RsiParams};
pub use trend::{EmaParams, SmaParams, TrendIndicators};
pub use volatility::{BollingerBandsParams, BollingerBandsResult, VolatilityIndicators};

/// 범례에 표시되는 시계열 이름.
pub mod names {
    /// 20일 단순 이동평균
    pub const SMA20: &str = "SMA (20)";
    /// 20일 지수 이동평균
    pub const EMA20: &str = "EMA (20)";
    /// 볼린저 상단 밴드
    pub const BB_UPPER: &str = "BB Upper";
    /// 볼린저 하단 밴드
    pub const BB_LOWER: &str = "BB Lower";
    /// 14일 RSI
    pub const RSI14: &str = "RSI";
}

/// 지표 계산 오류.
#[derive(Debug, Error)]
pub enum IndicatorError {
    /// 잘못된 파라미터
    #[error("잘못된 파라미터: {0}")]
    InvalidParameter(String),

    /// 계산 오류
    #[error("계산 오류: {0}")]
    CalculationError(String),
}

/// 지표 계산 결과 타입.
pub type IndicatorResult<T> = Result<T, IndicatorError>;

/// Decimal 표현 범위를 벗어난 연산.
pub(crate) fn overflow(op: &str) -> IndicatorError {
    IndicatorError::CalculationError(format!("{} 결과가 Decimal 범위를 벗어났습니다", op))
}

/// 범위 초과 시 에러를 반환하는 합계.
pub(crate) fn checked_sum<'a>(values: impl IntoIterator<Item = &'a Decimal>) -> IndicatorResult<Decimal> {
    values.into_iter().try_fold(Decimal::ZERO, |acc, &v| {
        acc.checked_add(v).ok_or_else(|| overflow("합계"))
    })
}

impl From<IndicatorError> for ChartLensError {
    fn from(err: IndicatorError) -> Self {
        ChartLensError::Indicator(err.to_string())
    }
}

/// 통합 지표 엔진.
///
/// 모든 기술적 지표 계산을 위한 통합 인터페이스를 제공합니다.
/// 상태가 없으므로 같은 입력에 대해 항상 같은 결과를 반환합니다.
#[derive(Debug, Default)]
pub struct IndicatorEngine {
    trend: TrendIndicators,
    momentum: MomentumCalculator,
    volatility: VolatilityIndicators,
}

impl IndicatorEngine {
    /// 새로운 지표 엔진 생성.
    pub fn new() -> Self {
        Self::default()
    }

    /// 가격 시계열에서 지정한 지표를 계산합니다.
    ///
    /// 반환되는 모든 시계열은 입력과 같은 날짜 축을 가집니다.
    /// 볼린저 밴드는 상단, 하단 순서로 두 개를 반환하고 나머지는 하나를 반환합니다.
    ///
    /// 이력이 윈도우보다 짧아도 에러가 아니며, 경고 로그를 남기고
    /// 값이 비어 있는 시계열을 반환합니다.
    pub fn compute(
        &self,
        series: &PriceSeries,
        kind: IndicatorKind,
    ) -> IndicatorResult<Vec<DerivedSeries>> {
        if let Some(warning) = InsufficientHistoryWarning::check(kind, series.len()) {
            warn!(
                symbol = %series.symbol(),
                indicator = kind.code(),
                required = warning.required,
                provided = warning.provided,
                "Insufficient history for indicator"
            );
        }

        let dates = series.dates();
        let closes = series.closes();

        let derived = match kind {
            IndicatorKind::Sma20 => {
                let values = self.sma(&closes, SmaParams::default())?;
                vec![DerivedSeries::from_values(names::SMA20, &dates, values)]
            }
            IndicatorKind::Ema20 => {
                let values = self.ema(&closes, EmaParams::default())?;
                vec![DerivedSeries::from_values(names::EMA20, &dates, values)]
            }
            IndicatorKind::BollingerBands20 => {
                let bands = self.bollinger_bands(&closes, BollingerBandsParams::default())?;
                let upper = bands.iter().map(|b| b.upper).collect();
                let lower = bands.iter().map(|b| b.lower).collect();
                vec![
                    DerivedSeries::from_values(names::BB_UPPER, &dates, upper),
                    DerivedSeries::from_values(names::BB_LOWER, &dates, lower),
                ]
            }
            IndicatorKind::Rsi14 => {
                let values = self.rsi(&closes, RsiParams::default())?;
                vec![DerivedSeries::from_values(names::RSI14, &dates, values)]
            }
        };

        debug!(
            symbol = %series.symbol(),
            indicator = kind.code(),
            outputs = derived.len(),
            "Indicator computed"
        );

        Ok(derived)
    }

    // ==================== 추세 지표 ====================

    /// 단순 이동평균 (SMA) 계산.
    ///
    /// # 반환
    /// 계산된 SMA 값들의 벡터 (처음 period-1개는 None)
    pub fn sma(&self, prices: &[Decimal], params: SmaParams) -> IndicatorResult<Vec<Option<Decimal>>> {
        self.trend.sma(prices, params)
    }

    /// 지수 이동평균 (EMA) 계산.
    pub fn ema(&self, prices: &[Decimal], params: EmaParams) -> IndicatorResult<Vec<Option<Decimal>>> {
        self.trend.ema(prices, params)
    }

    // ==================== 모멘텀 지표 ====================

    /// RSI (Relative Strength Index) 계산.
    ///
    /// # 반환
    /// 0-100 사이의 RSI 값들
    pub fn rsi(&self, prices: &[Decimal], params: RsiParams) -> IndicatorResult<Vec<Option<Decimal>>> {
        self.momentum.rsi(prices, params)
    }

    // ==================== 변동성 지표 ====================

    /// 볼린저 밴드 계산.
    pub fn bollinger_bands(
        &self,
        prices: &[Decimal],
        params: BollingerBandsParams,
    ) -> IndicatorResult<Vec<BollingerBandsResult>> {
        self.volatility.bollinger_bands(prices, params)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chartlens_core::PriceBar;
    use chrono::NaiveDate;
    use rust_decimal_macros::dec;

    fn series_from_closes(closes: &[Decimal]) -> PriceSeries {
        let start = NaiveDate::from_ymd_opt(2024, 2, 1).unwrap();
        let bars = closes
            .iter()
            .enumerate()
            .map(|(i, &c)| {
                PriceBar::new(
                    start + chrono::Duration::days(i as i64),
                    c,
                    c + dec!(2),
                    c - dec!(2),
                    c,
                    dec!(500),
                )
            })
            .collect();
        PriceSeries::new("TEST", bars).unwrap()
    }

    #[test]
    fn test_compute_output_names() {
        let engine = IndicatorEngine::new();
        let series = series_from_closes(&[dec!(100); 25]);

        let names_of = |kind| -> Vec<String> {
            engine
                .compute(&series, kind)
                .unwrap()
                .into_iter()
                .map(|s| s.name)
                .collect()
        };

        assert_eq!(names_of(IndicatorKind::Sma20), vec!["SMA (20)"]);
        assert_eq!(names_of(IndicatorKind::Ema20), vec!["EMA (20)"]);
        assert_eq!(names_of(IndicatorKind::BollingerBands20), vec!["BB Upper", "BB Lower"]);
        assert_eq!(names_of(IndicatorKind::Rsi14), vec!["RSI"]);
    }

    #[test]
    fn test_compute_aligns_to_price_dates() {
        let engine = IndicatorEngine::new();
        let closes: Vec<Decimal> = (1..=30).map(Decimal::from).collect();
        let series = series_from_closes(&closes);

        for kind in IndicatorKind::ALL {
            for derived in engine.compute(&series, kind).unwrap() {
                assert_eq!(derived.len(), series.len());
                let dates: Vec<NaiveDate> = derived.points.iter().map(|p| p.date).collect();
                assert_eq!(dates, series.dates());
            }
        }
    }

    #[test]
    fn test_compute_short_history_is_not_an_error() {
        let engine = IndicatorEngine::new();
        let series = series_from_closes(&[dec!(10), dec!(11), dec!(12)]);

        let sma = engine.compute(&series, IndicatorKind::Sma20).unwrap();
        assert_eq!(sma[0].defined_count(), 0);

        let ema = engine.compute(&series, IndicatorKind::Ema20).unwrap();
        assert_eq!(ema[0].defined_count(), 3);
    }

    #[test]
    fn test_compute_out_of_range_closes_return_error() {
        let engine = IndicatorEngine::new();
        let closes: Vec<Decimal> = (0..20)
            .map(|i| if i % 2 == 0 { dec!(1) } else { dec!(1000000000000000) })
            .collect();
        let series = series_from_closes(&closes);

        let result = engine.compute(&series, IndicatorKind::BollingerBands20);
        assert!(matches!(result, Err(IndicatorError::CalculationError(_))));

        // 같은 입력이라도 제곱이 없는 지표는 계산된다
        assert!(engine.compute(&series, IndicatorKind::Sma20).is_ok());
        assert!(engine.compute(&series, IndicatorKind::Rsi14).is_ok());
    }

    #[test]
    fn test_indicator_error_converts() {
        let err: ChartLensError = IndicatorError::InvalidParameter("period".to_string()).into();
        assert!(matches!(err, ChartLensError::Indicator(_)));
    }
}
