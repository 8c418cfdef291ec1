//! 일봉 가격 데이터.
//!
//! - `PriceBar` - 하루치 OHLCV 레코드
//! - `PriceSeries` - 날짜 오름차순으로 검증된 불변 시계열

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::error::{ChartLensError, ChartLensResult};

/// 일봉 OHLCV 레코드.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PriceBar {
    /// 거래일
    pub date: NaiveDate,
    /// 시가
    pub open: Decimal,
    /// 고가
    pub high: Decimal,
    /// 저가
    pub low: Decimal,
    /// 종가
    pub close: Decimal,
    /// 거래량
    pub volume: Decimal,
}

impl PriceBar {
    /// 새 일봉을 생성합니다.
    pub fn new(
        date: NaiveDate,
        open: Decimal,
        high: Decimal,
        low: Decimal,
        close: Decimal,
        volume: Decimal,
    ) -> Self {
        Self {
            date,
            open,
            high,
            low,
            close,
            volume,
        }
    }

    /// 캔들 범위(고가 - 저가)를 반환합니다.
    pub fn range(&self) -> Decimal {
        self.high - self.low
    }

    /// 양봉(종가 > 시가)인지 확인합니다.
    pub fn is_bullish(&self) -> bool {
        self.close > self.open
    }

    /// 음봉(종가 < 시가)인지 확인합니다.
    pub fn is_bearish(&self) -> bool {
        self.close < self.open
    }
}

/// 단일 종목의 일봉 시계열.
///
/// 생성 시 날짜가 엄격하게 증가하는지 검증하며, 이후에는 변경할 수 없습니다.
/// 모든 지표 계산은 이 시계열을 빌려 새 `DerivedSeries`를 반환합니다.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PriceSeries {
    symbol: String,
    bars: Vec<PriceBar>,
}

impl PriceSeries {
    /// 날짜 순서를 검증하여 시계열을 생성합니다.
    ///
    /// 중복되거나 역순인 날짜가 있으면 `InvalidSeries` 에러를 반환합니다.
    pub fn new(symbol: impl Into<String>, bars: Vec<PriceBar>) -> ChartLensResult<Self> {
        for pair in bars.windows(2) {
            if pair[1].date <= pair[0].date {
                return Err(ChartLensError::InvalidSeries(format!(
                    "날짜가 엄격하게 증가해야 합니다: {} 다음에 {}",
                    pair[0].date, pair[1].date
                )));
            }
        }

        Ok(Self {
            symbol: symbol.into(),
            bars,
        })
    }

    /// 종목 심볼.
    pub fn symbol(&self) -> &str {
        &self.symbol
    }

    /// 전체 일봉.
    pub fn bars(&self) -> &[PriceBar] {
        &self.bars
    }

    /// 일봉 개수.
    pub fn len(&self) -> usize {
        self.bars.len()
    }

    /// 비어 있는지 확인합니다.
    pub fn is_empty(&self) -> bool {
        self.bars.is_empty()
    }

    /// 날짜 축.
    pub fn dates(&self) -> Vec<NaiveDate> {
        self.bars.iter().map(|b| b.date).collect()
    }

    /// 종가 목록.
    pub fn closes(&self) -> Vec<Decimal> {
        self.bars.iter().map(|b| b.close).collect()
    }

    /// 첫 거래일.
    pub fn first_date(&self) -> Option<NaiveDate> {
        self.bars.first().map(|b| b.date)
    }

    /// 마지막 거래일.
    pub fn last_date(&self) -> Option<NaiveDate> {
        self.bars.last().map(|b| b.date)
    }

    /// 전체 구간의 (최저가, 최고가).
    pub fn price_bounds(&self) -> Option<(Decimal, Decimal)> {
        let low = self.bars.iter().map(|b| b.low).min()?;
        let high = self.bars.iter().map(|b| b.high).max()?;
        Some((low, high))
    }
}
