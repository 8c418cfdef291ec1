//! 차트 분석 명령.

use std::time::Duration;

use anyhow::{Context, Result};
use chartlens_advisor::{AnalysisResult, ChartAnalyst, OllamaClient, OllamaConfig, VisionModel};
use chartlens_core::ModelConfig;
use chartlens_render::SnapshotExporter;
use tracing::{error, info};

use super::spinner;
use crate::session::ChartSession;

/// 모델 설정에 CLI 인자를 덮어씁니다.
pub fn model_config(base: &ModelConfig, model: Option<String>, timeout_secs: Option<u64>) -> OllamaConfig {
    let mut config = OllamaConfig::from(base);
    if let Some(model) = model {
        config.model = model;
    }
    if let Some(secs) = timeout_secs {
        config.timeout = Some(Duration::from_secs(secs));
    }
    config
}

/// Ollama 분석기를 생성합니다. 설정에 프롬프트가 있으면 고정 프롬프트를 대체합니다.
pub fn build_analyst(config: OllamaConfig, prompt: Option<&str>) -> Result<ChartAnalyst<OllamaClient>> {
    let client = OllamaClient::new(config).context("Failed to create vision model client")?;
    let analyst = ChartAnalyst::new(client);
    Ok(match prompt {
        Some(prompt) => analyst.with_prompt(prompt),
        None => analyst,
    })
}

/// 세션 차트를 분석하고 결과를 반환합니다.
pub fn run_analysis<M: VisionModel>(
    session: &mut ChartSession,
    exporter: &SnapshotExporter,
    analyst: &ChartAnalyst<M>,
) -> Result<AnalysisResult> {
    let pb = spinner(format!(
        "Waiting for {} to analyze {}...",
        analyst.model().name(),
        session.symbol()
    ));
    let run = session.analyze(exporter, analyst);
    pb.finish_and_clear();

    let run = run?;
    let run_id = run.id();
    match run.into_result() {
        Ok(result) => {
            info!(%run_id, model = %result.model, "Analysis finished");
            Ok(result)
        }
        Err(e) => {
            error!(%run_id, kind = ?e.kind(), "Analysis failed: {}", e);
            Err(e).context("Chart analysis failed")
        }
    }
}

/// 분석 결과 출력
pub fn print_analysis(result: &AnalysisResult) {
    println!("\nAnalysis Results:");
    println!("{:-<50}", "");
    println!("{}", result.text);
}
