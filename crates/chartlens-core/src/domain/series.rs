//! 지표 파생 시계열.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// 파생 시계열의 한 점.
///
/// 값이 없으면(`None`) 해당 날짜에 지표를 계산할 이력이 부족하다는 뜻입니다.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SeriesPoint {
    /// 거래일
    pub date: NaiveDate,
    /// 지표 값
    pub value: Option<Decimal>,
}

/// 원본 가격 시계열의 날짜 축에 정렬된 지표 시계열.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DerivedSeries {
    /// 범례 이름 (예: "SMA (20)")
    pub name: String,
    /// 날짜별 값
    pub points: Vec<SeriesPoint>,
}

impl DerivedSeries {
    /// 날짜 축과 값 벡터를 짝지어 시계열을 생성합니다.
    ///
    /// 두 길이가 다르면 짧은 쪽에 맞춰 뒤쪽이 잘립니다.
    pub fn from_values(
        name: impl Into<String>,
        dates: &[NaiveDate],
        values: Vec<Option<Decimal>>,
    ) -> Self {
        let points = dates
            .iter()
            .zip(values)
            .map(|(&date, value)| SeriesPoint { date, value })
            .collect();

        Self {
            name: name.into(),
            points,
        }
    }

    /// 값만 순서대로 반환합니다.
    pub fn values(&self) -> Vec<Option<Decimal>> {
        self.points.iter().map(|p| p.value).collect()
    }

    /// 점 개수.
    pub fn len(&self) -> usize {
        self.points.len()
    }

    /// 비어 있는지 확인합니다.
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// 값이 정의된 점의 개수.
    pub fn defined_count(&self) -> usize {
        self.points.iter().filter(|p| p.value.is_some()).count()
    }

    /// 처음으로 값이 정의된 인덱스.
    pub fn first_defined_index(&self) -> Option<usize> {
        self.points.iter().position(|p| p.value.is_some())
    }

    /// 마지막으로 정의된 값.
    pub fn last_value(&self) -> Option<Decimal> {
        self.points.iter().rev().find_map(|p| p.value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_from_values_aligns_dates() {
        let dates: Vec<NaiveDate> = (1..=3)
            .map(|d| NaiveDate::from_ymd_opt(2024, 3, d).unwrap())
            .collect();
        let series = DerivedSeries::from_values("SMA (2)", &dates, vec![None, Some(dec!(1.5)), Some(dec!(2.5))]);

        assert_eq!(series.len(), 3);
        assert_eq!(series.points[1].date, dates[1]);
        assert_eq!(series.defined_count(), 2);
        assert_eq!(series.first_defined_index(), Some(1));
        assert_eq!(series.last_value(), Some(dec!(2.5)));
    }
}
