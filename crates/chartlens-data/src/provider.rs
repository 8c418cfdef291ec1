//! 가격 이력 공급자 인터페이스.

use chartlens_core::PriceSeries;
use chrono::NaiveDate;

use crate::error::{DataError, DataResult};

/// 심볼과 기간으로 일봉 시계열을 조회하는 외부 데이터 소스.
///
/// 기간은 `[start, end)` 반열린 구간이며, 반환되는 시계열은 날짜 오름차순입니다.
pub trait PriceHistoryProvider {
    /// 공급자 이름 (로그용).
    fn name(&self) -> &str;

    /// 일봉 시계열을 조회합니다.
    fn fetch(&self, symbol: &str, start: NaiveDate, end: NaiveDate) -> DataResult<PriceSeries>;
}

/// 조회 기간을 검증합니다. 시작일은 종료일보다 앞서야 합니다.
pub fn validate_range(start: NaiveDate, end: NaiveDate) -> DataResult<()> {
    if start >= end {
        return Err(DataError::InvalidRange { start, end });
    }
    Ok(())
}
