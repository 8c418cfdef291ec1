//! 데이터 조회 에러 타입.

use chartlens_core::ChartLensError;
use chrono::NaiveDate;
use thiserror::Error;

/// 데이터 공급자 에러.
#[derive(Debug, Error)]
pub enum DataError {
    /// 네트워크 에러
    #[error("네트워크 에러: {0}")]
    Network(#[from] reqwest::Error),

    /// API가 실패 상태를 반환함
    #[error("API 에러 ({status}): {message}")]
    Api { status: u16, message: String },

    /// 응답 파싱 실패
    #[error("파싱 에러: {0}")]
    Parse(String),

    /// 요청한 기간에 데이터가 없음
    #[error("데이터 없음: {0}")]
    NoData(String),

    /// 잘못된 조회 기간
    #[error("잘못된 기간: {start} ~ {end}")]
    InvalidRange { start: NaiveDate, end: NaiveDate },

    /// 파일 I/O 에러
    #[error("I/O 에러: {0}")]
    Io(#[from] std::io::Error),

    /// CSV 에러
    #[error("CSV 에러: {0}")]
    Csv(#[from] csv::Error),

    /// 시계열 불변식 위반
    #[error(transparent)]
    Series(#[from] ChartLensError),
}

/// 데이터 조회 결과 타입.
pub type DataResult<T> = Result<T, DataError>;

impl From<DataError> for ChartLensError {
    fn from(err: DataError) -> Self {
        match err {
            DataError::Network(e) => ChartLensError::Network(e.to_string()),
            DataError::Series(e) => e,
            other => ChartLensError::Data(other.to_string()),
        }
    }
}
