//! 차트 스냅샷 분석.
//!
//! 렌더링된 차트 이미지를 base64로 인코딩해 비전 모델에 고정 프롬프트와 함께 보내고,
//! 모델의 매수/매도 의견 텍스트를 그대로 돌려줍니다.
//!
//! - [`VisionModel`]: 외부 모델 호출 인터페이스 (동기)
//! - [`OllamaClient`]: Ollama `/api/chat` 구현
//! - [`ChartAnalyst`]: 스냅샷 → 요청 → 응답 오케스트레이션
//! - [`AnalysisRun`]: 한 번의 분석 시도에 대한 상태 머신

pub mod analyst;
pub mod error;
pub mod ollama;
pub mod state;
pub mod types;

pub use analyst::{ChartAnalyst, TRADER_PROMPT};
pub use error::{AdvisorResult, AnalysisError, AnalysisErrorKind};
pub use ollama::{OllamaClient, OllamaConfig};
pub use state::{AnalysisPhase, AnalysisRun, AnalysisState};
pub use types::{AnalysisResult, VisionModel, VisionRequest};
