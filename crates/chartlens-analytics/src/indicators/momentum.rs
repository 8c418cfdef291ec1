//! 모멘텀 지표 (Momentum Indicators).
//!
//! - RSI (Relative Strength Index)

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use super::{checked_sum, overflow, IndicatorError, IndicatorResult};

/// RSI 파라미터.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct RsiParams {
    /// RSI 기간 (기본: 14).
    pub period: usize,
}

impl Default for RsiParams {
    fn default() -> Self {
        Self { period: 14 }
    }
}

/// 모멘텀 지표 계산기.
#[derive(Debug, Default)]
pub struct MomentumCalculator;

impl MomentumCalculator {
    /// 새로운 모멘텀 계산기 생성.
    pub fn new() -> Self {
        Self
    }

    /// RSI (Relative Strength Index) 계산.
    ///
    /// RSI = 100 - (100 / (1 + RS))
    /// RS = 평균 상승폭 / 평균 하락폭
    ///
    /// 평균은 최근 period개 변화량의 단순 평균입니다. 첫 시점의 변화량은 0으로 취급하므로
    /// 처음 period-1개만 None입니다.
    ///
    /// 평균 하락폭이 0이면 RS를 정의할 수 없으므로 RSI를 100으로 고정합니다.
    /// 가격 변화가 전혀 없는 구간도 여기에 해당합니다.
    pub fn rsi(&self, prices: &[Decimal], params: RsiParams) -> IndicatorResult<Vec<Option<Decimal>>> {
        let period = params.period;

        if period == 0 {
            return Err(IndicatorError::InvalidParameter(
                "기간은 0보다 커야 합니다".to_string(),
            ));
        }

        // 가격 변화 계산
        let mut deltas = Vec::with_capacity(prices.len());
        if !prices.is_empty() {
            deltas.push(Decimal::ZERO);
        }
        for w in prices.windows(2) {
            deltas.push(w[1].checked_sub(w[0]).ok_or_else(|| overflow("가격 변화"))?);
        }

        // 상승/하락 분리
        let gains: Vec<Decimal> = deltas
            .iter()
            .map(|&d| if d > Decimal::ZERO { d } else { Decimal::ZERO })
            .collect();
        let losses: Vec<Decimal> = deltas
            .iter()
            .map(|&d| if d < Decimal::ZERO { d.abs() } else { Decimal::ZERO })
            .collect();

        let period_decimal = Decimal::from(period);
        let mut result = Vec::with_capacity(prices.len());

        for i in 0..prices.len() {
            if i + 1 < period {
                result.push(None);
                continue;
            }

            let range = i + 1 - period..=i;
            let avg_gain = checked_sum(&gains[range.clone()])?
                .checked_div(period_decimal)
                .ok_or_else(|| overflow("평균 상승폭"))?;
            let avg_loss = checked_sum(&losses[range])?
                .checked_div(period_decimal)
                .ok_or_else(|| overflow("평균 하락폭"))?;

            result.push(Some(Self::rsi_from_averages(avg_gain, avg_loss)?));
        }

        Ok(result)
    }

    fn rsi_from_averages(avg_gain: Decimal, avg_loss: Decimal) -> IndicatorResult<Decimal> {
        if avg_loss.is_zero() {
            return Ok(dec!(100));
        }
        avg_gain
            .checked_div(avg_loss)
            .and_then(|rs| rs.checked_add(Decimal::ONE))
            .and_then(|denom| dec!(100).checked_div(denom))
            .map(|step| dec!(100) - step)
            .ok_or_else(|| overflow("RS"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rsi_gains_only_is_100() {
        let momentum = MomentumCalculator::new();
        let prices: Vec<Decimal> = (1..=20).map(Decimal::from).collect();

        let result = momentum.rsi(&prices, RsiParams::default()).unwrap();

        assert!(result[..13].iter().all(Option::is_none));
        assert!(result[13..].iter().all(|v| *v == Some(dec!(100))));
    }

    #[test]
    fn test_rsi_flat_series_is_100() {
        let momentum = MomentumCalculator::new();
        let prices = vec![dec!(100); 30];

        let result = momentum.rsi(&prices, RsiParams::default()).unwrap();

        assert_eq!(result.iter().filter(|v| v.is_some()).count(), 17);
        assert!(result[13..].iter().all(|v| *v == Some(dec!(100))));
    }

    #[test]
    fn test_rsi_losses_only_is_zero() {
        let momentum = MomentumCalculator::new();
        let prices: Vec<Decimal> = (1..=30).rev().map(Decimal::from).collect();

        let result = momentum.rsi(&prices, RsiParams::default()).unwrap();

        assert!(result[13..].iter().all(|v| *v == Some(Decimal::ZERO)));
    }

    #[test]
    fn test_rsi_balanced_moves() {
        let momentum = MomentumCalculator::new();
        // +2, -2 교대: 윈도우 4에서 평균 상승 = 평균 하락
        let prices = vec![dec!(10), dec!(12), dec!(10), dec!(12), dec!(10)];

        let result = momentum.rsi(&prices, RsiParams { period: 4 }).unwrap();

        // i=3: deltas [0, +2, -2, +2] → gain 1, loss 0.5 → RS 2
        let expected = dec!(100) - dec!(100) / dec!(3);
        assert_eq!(result[3], Some(expected));
        // i=4: deltas [+2, -2, +2, -2] → RS 1
        assert_eq!(result[4], Some(dec!(50)));
    }

    #[test]
    fn test_rsi_bounded() {
        let momentum = MomentumCalculator::new();
        let prices: Vec<Decimal> = (0..60).map(|i| Decimal::from((i * 13) % 17 + 40)).collect();

        let result = momentum.rsi(&prices, RsiParams::default()).unwrap();

        for value in result.into_iter().flatten() {
            assert!(value >= Decimal::ZERO && value <= dec!(100));
        }
    }

    #[test]
    fn test_rsi_overflow_is_calculation_error() {
        let momentum = MomentumCalculator::new();
        let prices = vec![Decimal::MIN, Decimal::MAX, dec!(0)];

        let result = momentum.rsi(&prices, RsiParams { period: 2 });
        assert!(matches!(result, Err(IndicatorError::CalculationError(_))));
    }

    #[test]
    fn test_rsi_short_input() {
        let momentum = MomentumCalculator::new();
        let result = momentum.rsi(&[dec!(1), dec!(2)], RsiParams::default()).unwrap();
        assert_eq!(result, vec![None, None]);
        assert!(momentum.rsi(&[], RsiParams::default()).unwrap().is_empty());
    }
}
