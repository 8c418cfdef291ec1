//! Ollama 비전 모델 클라이언트.
//!
//! `POST {base_url}/api/chat`에 단일 사용자 메시지(프롬프트 + 이미지)를
//! 스트리밍 없이 보내고 `message.content`를 응답 텍스트로 사용합니다.

use std::time::Duration;

use chartlens_core::{ModelConfig, DEFAULT_MODEL_BASE_URL, DEFAULT_VISION_MODEL};
use serde::{Deserialize, Serialize};
use tracing::{debug, error, info};

use crate::error::{AdvisorResult, AnalysisError};
use crate::types::{VisionModel, VisionRequest};

/// Ollama 클라이언트 설정.
#[derive(Debug, Clone)]
pub struct OllamaConfig {
    /// 서버 기본 URL
    pub base_url: String,
    /// 모델 이름
    pub model: String,
    /// 요청 타임아웃. None이면 응답이 올 때까지 대기
    pub timeout: Option<Duration>,
}

impl Default for OllamaConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_MODEL_BASE_URL.to_string(),
            model: DEFAULT_VISION_MODEL.to_string(),
            timeout: None,
        }
    }
}

impl OllamaConfig {
    /// 새 설정을 생성합니다.
    pub fn new(base_url: impl Into<String>, model: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            model: model.into(),
            timeout: None,
        }
    }

    /// 타임아웃을 설정합니다.
    pub fn with_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.timeout = timeout;
        self
    }

    fn chat_url(&self) -> String {
        format!("{}/api/chat", self.base_url.trim_end_matches('/'))
    }
}

impl From<&ModelConfig> for OllamaConfig {
    fn from(config: &ModelConfig) -> Self {
        Self {
            base_url: config.base_url.clone(),
            model: config.model.clone(),
            timeout: config.timeout(),
        }
    }
}

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: [ChatRequestMessage<'a>; 1],
    stream: bool,
}

#[derive(Debug, Serialize)]
struct ChatRequestMessage<'a> {
    role: &'static str,
    content: &'a str,
    images: [&'a str; 1],
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    message: Option<ChatResponseMessage>,
    error: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ChatResponseMessage {
    content: Option<String>,
}

/// Ollama `/api/chat` 클라이언트.
pub struct OllamaClient {
    config: OllamaConfig,
    client: reqwest::blocking::Client,
}

impl OllamaClient {
    /// 새 클라이언트를 생성합니다.
    pub fn new(config: OllamaConfig) -> AdvisorResult<Self> {
        let client = reqwest::blocking::Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| AnalysisError::ModelUnavailable(format!("HTTP 클라이언트 생성 실패: {}", e)))?;

        Ok(Self { config, client })
    }

    /// 설정 파일의 모델 섹션으로 클라이언트를 생성합니다.
    pub fn from_model_config(config: &ModelConfig) -> AdvisorResult<Self> {
        Self::new(OllamaConfig::from(config))
    }

    /// 현재 설정.
    pub fn config(&self) -> &OllamaConfig {
        &self.config
    }

    fn parse_response(body: &str) -> AdvisorResult<String> {
        let response: ChatResponse = serde_json::from_str(body)
            .map_err(|e| AnalysisError::MalformedResponse(format!("JSON 파싱 실패: {}", e)))?;

        if let Some(message) = response.error {
            return Err(AnalysisError::ModelUnavailable(message));
        }

        response
            .message
            .and_then(|m| m.content)
            .ok_or_else(|| AnalysisError::MalformedResponse("message.content 필드가 없습니다".to_string()))
    }
}

impl VisionModel for OllamaClient {
    fn name(&self) -> &str {
        &self.config.model
    }

    fn complete(&self, request: &VisionRequest) -> AdvisorResult<String> {
        let url = self.config.chat_url();
        let body = ChatRequest {
            model: &self.config.model,
            messages: [ChatRequestMessage {
                role: "user",
                content: request.prompt.as_str(),
                images: [request.image_base64.as_str()],
            }],
            stream: false,
        };

        info!(
            model = %self.config.model,
            image_bytes = request.image_base64.len(),
            "Sending chart to vision model"
        );

        let response = self.client.post(&url).json(&body).send().map_err(|e| {
            error!(url = %url, error = %e, "Vision model request failed");
            let reason = if e.is_timeout() { "타임아웃" } else { "연결 실패" };
            AnalysisError::ModelUnavailable(format!("{}: {}", reason, e))
        })?;

        let status = response.status();
        let text = response
            .text()
            .map_err(|e| AnalysisError::ModelUnavailable(format!("응답 읽기 실패: {}", e)))?;

        if !status.is_success() {
            error!(status = %status, "Vision model returned error status");
            let detail = serde_json::from_str::<ChatResponse>(&text)
                .ok()
                .and_then(|r| r.error)
                .unwrap_or(text);
            return Err(AnalysisError::ModelUnavailable(format!(
                "HTTP {}: {}",
                status, detail
            )));
        }

        let content = Self::parse_response(&text)?;
        debug!(chars = content.len(), "Vision model responded");
        Ok(content)
    }
}
