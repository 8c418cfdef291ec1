//! 변동성 지표 (Volatility Indicators).
//!
//! - Bollinger Bands (볼린저 밴드)

use rust_decimal::{Decimal, MathematicalOps};
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use super::{checked_sum, overflow, IndicatorError, IndicatorResult};

/// 볼린저 밴드 파라미터.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct BollingerBandsParams {
    /// 이동평균 기간 (기본: 20).
    pub period: usize,
    /// 표준편차 배수 (기본: 2).
    pub std_dev_multiplier: Decimal,
}

impl Default for BollingerBandsParams {
    fn default() -> Self {
        Self {
            period: 20,
            std_dev_multiplier: dec!(2),
        }
    }
}

/// 볼린저 밴드 결과.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BollingerBandsResult {
    /// 상단 밴드 (MA + k × σ).
    pub upper: Option<Decimal>,
    /// 중간 밴드 (이동평균).
    pub middle: Option<Decimal>,
    /// 하단 밴드 (MA - k × σ).
    pub lower: Option<Decimal>,
}

impl BollingerBandsResult {
    const EMPTY: Self = Self {
        upper: None,
        middle: None,
        lower: None,
    };
}

/// 변동성 지표 계산기.
#[derive(Debug, Default)]
pub struct VolatilityIndicators;

impl VolatilityIndicators {
    /// 새로운 변동성 지표 계산기 생성.
    pub fn new() -> Self {
        Self
    }

    /// 볼린저 밴드 계산.
    ///
    /// - 중간 밴드 = SMA(period)
    /// - 상단 밴드 = 중간 + k × σ
    /// - 하단 밴드 = 중간 - k × σ
    ///
    /// σ는 표본 표준편차(분모 n-1)입니다. 중간 밴드가 없는 구간은 모두 None입니다.
    pub fn bollinger_bands(
        &self,
        prices: &[Decimal],
        params: BollingerBandsParams,
    ) -> IndicatorResult<Vec<BollingerBandsResult>> {
        let period = params.period;

        if period < 2 {
            return Err(IndicatorError::InvalidParameter(
                "표본 표준편차에는 2 이상의 기간이 필요합니다".to_string(),
            ));
        }

        let period_decimal = Decimal::from(period);
        let dof = Decimal::from(period - 1);
        let mut result = Vec::with_capacity(prices.len());

        for i in 0..prices.len() {
            if i + 1 < period {
                result.push(BollingerBandsResult::EMPTY);
                continue;
            }

            let window = &prices[i + 1 - period..=i];
            let mean = checked_sum(window)?
                .checked_div(period_decimal)
                .ok_or_else(|| overflow("평균"))?;
            let squares = window
                .iter()
                .map(|&p| {
                    p.checked_sub(mean)
                        .and_then(|diff| diff.checked_mul(diff))
                        .ok_or_else(|| overflow("편차 제곱"))
                })
                .collect::<IndicatorResult<Vec<Decimal>>>()?;
            let variance = checked_sum(&squares)?
                .checked_div(dof)
                .ok_or_else(|| overflow("분산"))?;

            let std_dev = variance.sqrt().ok_or_else(|| {
                IndicatorError::CalculationError(format!("분산의 제곱근 계산 실패: {}", variance))
            })?;
            let band = params
                .std_dev_multiplier
                .checked_mul(std_dev)
                .ok_or_else(|| overflow("밴드 폭"))?;

            result.push(BollingerBandsResult {
                upper: Some(mean.checked_add(band).ok_or_else(|| overflow("상단 밴드"))?),
                middle: Some(mean),
                lower: Some(mean.checked_sub(band).ok_or_else(|| overflow("하단 밴드"))?),
            });
        }

        Ok(result)
    }
}
