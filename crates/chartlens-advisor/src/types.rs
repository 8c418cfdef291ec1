//! 비전 모델 인터페이스와 요청/결과 타입.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::AdvisorResult;

/// 비전 모델에 보내는 단일 턴 요청.
#[derive(Clone, Serialize, Deserialize)]
pub struct VisionRequest {
    /// 지시 프롬프트
    pub prompt: String,
    /// base64로 인코딩된 이미지
    pub image_base64: String,
}

impl VisionRequest {
    /// 새 요청을 생성합니다.
    pub fn new(prompt: impl Into<String>, image_base64: String) -> Self {
        Self {
            prompt: prompt.into(),
            image_base64,
        }
    }
}

// 이미지 페이로드는 로그에 남기지 않는다.
impl std::fmt::Debug for VisionRequest {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("VisionRequest")
            .field("prompt", &self.prompt)
            .field("image_base64_len", &self.image_base64.len())
            .finish()
    }
}

/// 한 차트 스냅샷에 대한 모델 응답.
///
/// 표시용으로만 쓰이며 저장하지 않습니다.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisResult {
    /// 요청 ID
    pub id: Uuid,
    /// 응답한 모델 이름
    pub model: String,
    /// 모델 응답 원문
    pub text: String,
    /// 응답 수신 시각
    pub created_at: DateTime<Utc>,
}

impl AnalysisResult {
    /// 새 결과를 생성합니다.
    pub fn new(model: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            model: model.into(),
            text: text.into(),
            created_at: Utc::now(),
        }
    }
}

/// 이미지와 프롬프트를 받아 텍스트를 돌려주는 외부 모델.
///
/// 호출은 응답이 올 때까지 블로킹됩니다. 스레드나 비동기 런타임에서 호출할지는
/// 호출자가 결정합니다.
pub trait VisionModel: Send + Sync {
    /// 모델 이름.
    fn name(&self) -> &str;

    /// 요청을 보내고 응답 텍스트를 반환합니다.
    fn complete(&self, request: &VisionRequest) -> AdvisorResult<String>;
}

impl<M: VisionModel + ?Sized> VisionModel for Box<M> {
    fn name(&self) -> &str {
        (**self).name()
    }

    fn complete(&self, request: &VisionRequest) -> AdvisorResult<String> {
        (**self).complete(request)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_debug_hides_payload() {
        let request = VisionRequest::new("prompt", "QUJDRA==".repeat(100));
        let debug = format!("{:?}", request);
        assert!(!debug.contains("QUJDRA=="));
        assert!(debug.contains("800"));
    }

    #[test]
    fn test_result_ids_unique() {
        let a = AnalysisResult::new("m", "Buy");
        let b = AnalysisResult::new("m", "Buy");
        assert_ne!(a.id, b.id);
        assert_eq!(a.text, "Buy");
    }
}
