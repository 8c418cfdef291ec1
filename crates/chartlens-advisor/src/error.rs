//! 분석 에러 타입.

use chartlens_core::ChartLensError;
use chartlens_render::RenderError;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// 분석 시도 중 발생하는 에러.
///
/// 모두 현재 시도에만 치명적이며, 자동으로 재시도하지 않습니다.
#[derive(Debug, Error)]
pub enum AnalysisError {
    /// 스냅샷 이미지를 읽거나 인코딩할 수 없음
    #[error("이미지 인코딩 실패: {0}")]
    Encoding(String),

    /// 모델 서버에 연결할 수 없거나 프로토콜 수준 에러를 반환함
    #[error("모델 사용 불가: {0}")]
    ModelUnavailable(String),

    /// 응답에 기대한 텍스트 필드가 없음
    #[error("잘못된 모델 응답: {0}")]
    MalformedResponse(String),

    /// 차트 스냅샷 렌더링 실패
    #[error("스냅샷 렌더링 실패: {0}")]
    Render(#[from] RenderError),
}

/// 에러 종류 (실패 상태에 보관).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AnalysisErrorKind {
    /// 이미지 읽기/인코딩 실패
    Encoding,
    /// 모델 서버 연결 불가 또는 오류 응답
    ModelUnavailable,
    /// 응답 형식 오류
    MalformedResponse,
    /// 스냅샷 렌더링 실패
    Render,
}

impl AnalysisError {
    /// 에러 종류.
    pub fn kind(&self) -> AnalysisErrorKind {
        match self {
            Self::Encoding(_) => AnalysisErrorKind::Encoding,
            Self::ModelUnavailable(_) => AnalysisErrorKind::ModelUnavailable,
            Self::MalformedResponse(_) => AnalysisErrorKind::MalformedResponse,
            Self::Render(_) => AnalysisErrorKind::Render,
        }
    }

    /// 사용자가 다시 시도해 볼 만한 에러인지 확인합니다.
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::ModelUnavailable(_))
    }
}

/// 분석 결과 타입.
pub type AdvisorResult<T> = Result<T, AnalysisError>;

impl From<AnalysisError> for ChartLensError {
    fn from(err: AnalysisError) -> Self {
        match err {
            AnalysisError::Encoding(msg) => ChartLensError::Encoding(msg),
            AnalysisError::ModelUnavailable(msg) => ChartLensError::ModelUnavailable(msg),
            AnalysisError::MalformedResponse(msg) => ChartLensError::MalformedResponse(msg),
            AnalysisError::Render(e) => ChartLensError::Render(e.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_mapping() {
        assert_eq!(
            AnalysisError::Encoding("x".into()).kind(),
            AnalysisErrorKind::Encoding
        );
        assert_eq!(
            AnalysisError::Render(RenderError::EmptyChart("X".into())).kind(),
            AnalysisErrorKind::Render
        );
    }

    #[test]
    fn test_kind_serialized_names() {
        let names: Vec<String> = [
            AnalysisErrorKind::Encoding,
            AnalysisErrorKind::ModelUnavailable,
            AnalysisErrorKind::MalformedResponse,
            AnalysisErrorKind::Render,
        ]
        .iter()
        .map(|k| serde_json::to_string(k).unwrap())
        .collect();

        assert_eq!(
            names,
            vec![
                "\"encoding\"",
                "\"model_unavailable\"",
                "\"malformed_response\"",
                "\"render\""
            ]
        );
    }

    #[test]
    fn test_conversion_preserves_category() {
        let err: ChartLensError = AnalysisError::MalformedResponse("no content".into()).into();
        assert!(matches!(err, ChartLensError::MalformedResponse(_)));

        let err: ChartLensError = AnalysisError::ModelUnavailable("refused".into()).into();
        assert!(err.is_retryable());
    }
}
