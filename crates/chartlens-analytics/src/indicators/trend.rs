//! 추세 지표 (Trend Indicators).
//!
//! 이동평균 기반의 추세 지표들을 제공합니다.
//! - SMA (Simple Moving Average)
//! - EMA (Exponential Moving Average)

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::{overflow, IndicatorError, IndicatorResult};

/// SMA 파라미터.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct SmaParams {
    /// 이동평균 기간.
    pub period: usize,
}

impl Default for SmaParams {
    fn default() -> Self {
        Self { period: 20 }
    }
}

/// EMA 파라미터.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct EmaParams {
    /// span (가중치 k = 2 / (span + 1)).
    pub span: usize,
}

impl Default for EmaParams {
    fn default() -> Self {
        Self { span: 20 }
    }
}

/// 추세 지표 계산기.
#[derive(Debug, Default)]
pub struct TrendIndicators;

impl TrendIndicators {
    /// 새로운 추세 지표 계산기 생성.
    pub fn new() -> Self {
        Self
    }

    /// 단순 이동평균 (SMA) 계산.
    ///
    /// SMA = (P1 + P2 + ... + Pn) / n
    ///
    /// # 인자
    /// * `prices` - 가격 데이터
    /// * `params` - SMA 파라미터
    ///
    /// # 반환
    /// 입력과 같은 길이의 벡터. 처음 period-1개는 None이며,
    /// 데이터가 period보다 짧으면 전부 None입니다.
    pub fn sma(
        &self,
        prices: &[Decimal],
        params: SmaParams,
    ) -> IndicatorResult<Vec<Option<Decimal>>> {
        let period = params.period;

        if period == 0 {
            return Err(IndicatorError::InvalidParameter(
                "기간은 0보다 커야 합니다".to_string(),
            ));
        }

        let period_decimal = Decimal::from(period);
        let mut result = Vec::with_capacity(prices.len());
        let mut window_sum = Decimal::ZERO;

        for (i, &price) in prices.iter().enumerate() {
            window_sum = window_sum.checked_add(price).ok_or_else(|| overflow("SMA 합계"))?;
            if i >= period {
                window_sum = window_sum
                    .checked_sub(prices[i - period])
                    .ok_or_else(|| overflow("SMA 합계"))?;
            }

            if i + 1 < period {
                result.push(None);
            } else {
                let mean = window_sum
                    .checked_div(period_decimal)
                    .ok_or_else(|| overflow("SMA 평균"))?;
                result.push(Some(mean));
            }
        }

        Ok(result)
    }

    /// 지수 이동평균 (EMA) 계산.
    ///
    /// EMA_t = EMA_{t-1} + k × (P_t - EMA_{t-1})
    /// k = 2 / (span + 1), EMA_0 = P_0
    ///
    /// 윈도우가 없는 재귀식이므로 모든 시점에서 값이 정의됩니다.
    pub fn ema(
        &self,
        prices: &[Decimal],
        params: EmaParams,
    ) -> IndicatorResult<Vec<Option<Decimal>>> {
        if params.span == 0 {
            return Err(IndicatorError::InvalidParameter(
                "span은 0보다 커야 합니다".to_string(),
            ));
        }

        let k = Decimal::TWO / Decimal::from(params.span + 1);
        let mut result = Vec::with_capacity(prices.len());
        let mut prev: Option<Decimal> = None;

        for &price in prices {
            // 차이에 가중치를 곱하는 형태라 상수 입력에서 값이 정확히 유지된다.
            let ema = match prev {
                None => price,
                Some(p) => price
                    .checked_sub(p)
                    .and_then(|diff| k.checked_mul(diff))
                    .and_then(|step| p.checked_add(step))
                    .ok_or_else(|| overflow("EMA"))?,
            };
            result.push(Some(ema));
            prev = Some(ema);
        }

        Ok(result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn ramp(n: usize) -> Vec<Decimal> {
        (1..=n).map(Decimal::from).collect()
    }

    #[test]
    fn test_sma_calculation() {
        let trend = TrendIndicators::new();
        let prices = vec![dec!(1), dec!(2), dec!(3), dec!(4), dec!(5)];

        let result = trend.sma(&prices, SmaParams { period: 3 }).unwrap();

        assert_eq!(result.len(), 5);
        assert!(result[0].is_none());
        assert!(result[1].is_none());
        assert_eq!(result[2], Some(dec!(2)));
        assert_eq!(result[3], Some(dec!(3)));
        assert_eq!(result[4], Some(dec!(4)));
    }

    #[test]
    fn test_sma20_warmup() {
        let trend = TrendIndicators::new();
        let result = trend.sma(&ramp(25), SmaParams::default()).unwrap();

        assert!(result[..19].iter().all(Option::is_none));
        assert!(result[19..].iter().all(Option::is_some));
        // 1..=20 평균
        assert_eq!(result[19], Some(dec!(10.5)));
    }

    #[test]
    fn test_sma_short_input_is_all_none() {
        let trend = TrendIndicators::new();
        let result = trend.sma(&ramp(5), SmaParams::default()).unwrap();

        assert_eq!(result.len(), 5);
        assert!(result.iter().all(Option::is_none));
    }

    #[test]
    fn test_sma_zero_period_rejected() {
        let trend = TrendIndicators::new();
        let result = trend.sma(&ramp(5), SmaParams { period: 0 });
        assert!(matches!(result, Err(IndicatorError::InvalidParameter(_))));
    }

    #[test]
    fn test_sma_overflow_is_calculation_error() {
        let trend = TrendIndicators::new();
        let prices = vec![Decimal::MAX, Decimal::MAX, dec!(1)];

        let result = trend.sma(&prices, SmaParams { period: 2 });
        assert!(matches!(result, Err(IndicatorError::CalculationError(_))));
    }

    #[test]
    fn test_ema_overflow_is_calculation_error() {
        let trend = TrendIndicators::new();
        let prices = vec![Decimal::MIN, Decimal::MAX];

        let result = trend.ema(&prices, EmaParams { span: 3 });
        assert!(matches!(result, Err(IndicatorError::CalculationError(_))));
    }

    #[test]
    fn test_ema_seeded_with_first_close() {
        let trend = TrendIndicators::new();
        let prices = vec![dec!(10), dec!(20)];

        let result = trend.ema(&prices, EmaParams { span: 3 }).unwrap();

        // k = 2 / 4 = 0.5
        assert_eq!(result[0], Some(dec!(10)));
        assert_eq!(result[1], Some(dec!(15)));
    }

    #[test]
    fn test_ema_defined_everywhere() {
        let trend = TrendIndicators::new();
        let result = trend.ema(&ramp(30), EmaParams::default()).unwrap();

        assert_eq!(result.len(), 30);
        assert!(result.iter().all(Option::is_some));
    }

    #[test]
    fn test_ema_constant_input() {
        let trend = TrendIndicators::new();
        let prices = vec![dec!(100); 30];

        let result = trend.ema(&prices, EmaParams::default()).unwrap();

        assert!(result.iter().all(|v| *v == Some(dec!(100))));
    }

    #[test]
    fn test_empty_input() {
        let trend = TrendIndicators::new();
        assert!(trend.sma(&[], SmaParams::default()).unwrap().is_empty());
        assert!(trend.ema(&[], EmaParams::default()).unwrap().is_empty());
    }
}
