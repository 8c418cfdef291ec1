//! 설정 관리.
//!
//! 기본값 → TOML 파일 → `CHARTLENS__섹션__키` 환경 변수 순으로 병합합니다.

use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

use crate::error::ChartLensResult;

/// Ollama 기본 엔드포인트.
pub const DEFAULT_MODEL_BASE_URL: &str = "http://localhost:11434";

/// 기본 비전 모델.
pub const DEFAULT_VISION_MODEL: &str = "llama3.2-vision";

/// 애플리케이션 설정.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct AppConfig {
    /// 로깅 설정
    pub logging: LoggingConfig,
    /// 외부 비전 모델 설정
    pub model: ModelConfig,
    /// 차트 스냅샷 설정
    pub chart: ChartConfig,
    /// 시장 데이터 설정
    pub data: DataConfig,
}

/// 로깅 설정.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// 로그 레벨
    pub level: String,
    /// 로그 형식 (pretty, json, compact)
    pub format: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: "pretty".to_string(),
        }
    }
}

/// 외부 비전 모델 설정.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ModelConfig {
    /// 모델 서버 기본 URL
    pub base_url: String,
    /// 모델 이름
    pub model: String,
    /// 요청 타임아웃 (초). 지정하지 않으면 무제한 대기
    pub timeout_secs: Option<u64>,
    /// 고정 프롬프트 대체 문구
    pub prompt: Option<String>,
}

impl Default for ModelConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_MODEL_BASE_URL.to_string(),
            model: DEFAULT_VISION_MODEL.to_string(),
            timeout_secs: None,
            prompt: None,
        }
    }
}

impl ModelConfig {
    /// 설정된 타임아웃을 `Duration`으로 반환합니다.
    pub fn timeout(&self) -> Option<Duration> {
        self.timeout_secs.map(Duration::from_secs)
    }
}

/// 차트 스냅샷 설정.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ChartConfig {
    /// 이미지 너비 (픽셀)
    pub width: u32,
    /// 이미지 높이 (픽셀)
    pub height: u32,
}

impl Default for ChartConfig {
    fn default() -> Self {
        Self {
            width: 1200,
            height: 800,
        }
    }
}

/// 시장 데이터 설정.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct DataConfig {
    /// Yahoo Finance API 기본 URL
    pub yahoo_base_url: String,
    /// HTTP User-Agent
    pub user_agent: String,
}

impl Default for DataConfig {
    fn default() -> Self {
        Self {
            yahoo_base_url: "https://query1.finance.yahoo.com".to_string(),
            user_agent: "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36".to_string(),
        }
    }
}

impl AppConfig {
    /// 파일과 환경 변수에서 설정을 로드합니다.
    ///
    /// 파일이 없으면 기본값과 환경 변수만 사용합니다.
    pub fn load<P: AsRef<Path>>(path: P) -> ChartLensResult<Self> {
        let builder = config::Config::builder()
            .add_source(config::File::from(path.as_ref()).required(false))
            .add_source(
                config::Environment::with_prefix("CHARTLENS")
                    .separator("__")
                    .try_parsing(true),
            );

        let config = builder.build()?;
        Ok(config.try_deserialize()?)
    }

    /// 기본 경로에서 설정을 로드합니다.
    pub fn load_default() -> ChartLensResult<Self> {
        Self::load("config/default.toml")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_defaults() {
        let config = AppConfig::default();
        assert_eq!(config.model.base_url, DEFAULT_MODEL_BASE_URL);
        assert_eq!(config.model.model, DEFAULT_VISION_MODEL);
        assert!(config.model.timeout().is_none());
        assert_eq!(config.chart.width, 1200);
        assert_eq!(config.chart.height, 800);
    }

    #[test]
    fn test_missing_file_yields_defaults() {
        let config = AppConfig::load("does/not/exist.toml").unwrap();
        assert_eq!(config.logging.level, "info");
        assert_eq!(config.chart.height, 800);
    }

    #[test]
    fn test_partial_file_merges_with_defaults() {
        let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
        writeln!(file, "[model]\nmodel = \"llava\"\ntimeout_secs = 90\n\n[chart]\nwidth = 640").unwrap();

        let config = AppConfig::load(file.path()).unwrap();

        assert_eq!(config.model.model, "llava");
        assert_eq!(config.model.timeout(), Some(Duration::from_secs(90)));
        assert_eq!(config.model.base_url, DEFAULT_MODEL_BASE_URL);
        assert_eq!(config.chart.width, 640);
        assert_eq!(config.chart.height, 800);
    }
}
