//! 렌더링 에러 타입.

use chartlens_core::ChartLensError;
use thiserror::Error;

/// 차트 렌더링/내보내기 에러.
#[derive(Debug, Error)]
pub enum RenderError {
    /// 이미지 크기가 유효하지 않음
    #[error("잘못된 이미지 크기: {width}x{height}")]
    InvalidDimensions { width: u32, height: u32 },

    /// 그릴 일봉이 없음
    #[error("렌더링할 데이터가 없습니다: {0}")]
    EmptyChart(String),

    /// PNG 인코딩 실패
    #[error("PNG 인코딩 실패: {0}")]
    Encode(#[from] image::ImageError),

    /// 임시 파일 I/O 실패
    #[error("스냅샷 파일 I/O 실패: {0}")]
    Io(#[from] std::io::Error),
}

/// 렌더링 결과 타입.
pub type RenderResult<T> = Result<T, RenderError>;

impl From<RenderError> for ChartLensError {
    fn from(err: RenderError) -> Self {
        ChartLensError::Render(err.to_string())
    }
}
