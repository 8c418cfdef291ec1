//! ChartLens 공통 에러 타입.
//!
//! 각 크레이트는 자체 에러 enum을 정의하고, 경계에서 이 타입으로 변환합니다.

use thiserror::Error;

/// 파이프라인 공통 에러.
#[derive(Debug, Error)]
pub enum ChartLensError {
    /// 설정 에러
    #[error("설정 에러: {0}")]
    Config(String),

    /// 가격 시계열 불변식 위반 (정렬, 중복 날짜 등)
    #[error("잘못된 가격 시계열: {0}")]
    InvalidSeries(String),

    /// 시장 데이터 조회 에러
    #[error("데이터 에러: {0}")]
    Data(String),

    /// 지표 계산 에러
    #[error("지표 에러: {0}")]
    Indicator(String),

    /// 차트 이미지 렌더링 에러
    #[error("렌더링 에러: {0}")]
    Render(String),

    /// 스냅샷 인코딩 에러
    #[error("인코딩 에러: {0}")]
    Encoding(String),

    /// 외부 모델 접근 불가
    #[error("모델 사용 불가: {0}")]
    ModelUnavailable(String),

    /// 모델 응답 형식 오류
    #[error("잘못된 모델 응답: {0}")]
    MalformedResponse(String),

    /// 네트워크 에러
    #[error("네트워크 에러: {0}")]
    Network(String),

    /// 직렬화 에러
    #[error("직렬화 에러: {0}")]
    Serialization(String),

    /// 잘못된 입력
    #[error("잘못된 입력: {0}")]
    InvalidInput(String),
}

/// ChartLens 작업을 위한 Result 타입.
pub type ChartLensResult<T> = Result<T, ChartLensError>;

impl ChartLensError {
    /// 호출자가 수동으로 다시 시도해 볼 만한 에러인지 확인합니다.
    ///
    /// 코어는 어떤 에러도 자동으로 재시도하지 않습니다.
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            ChartLensError::Network(_) | ChartLensError::ModelUnavailable(_)
        )
    }
}

impl From<serde_json::Error> for ChartLensError {
    fn from(err: serde_json::Error) -> Self {
        ChartLensError::Serialization(err.to_string())
    }
}

impl From<config::ConfigError> for ChartLensError {
    fn from(err: config::ConfigError) -> Self {
        ChartLensError::Config(err.to_string())
    }
}
