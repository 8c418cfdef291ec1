//! 차트 구성 명령.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use chartlens_analytics::ChartSpec;
use chartlens_render::SnapshotExporter;
use tracing::{info, warn};

use crate::session::ChartSession;

/// 차트 출력 대상
#[derive(Debug, Clone, Default)]
pub struct ChartOutputs {
    /// ChartSpec JSON 저장 경로
    pub json_path: Option<PathBuf>,
    /// PNG 저장 경로
    pub png_path: Option<PathBuf>,
}

/// 세션의 차트를 구성하고 요청한 형식으로 저장합니다.
pub fn write_chart(
    session: &mut ChartSession,
    exporter: &SnapshotExporter,
    outputs: &ChartOutputs,
) -> Result<ChartSpec> {
    let chart = session.chart()?.clone();

    for warning in &chart.warnings {
        warn!(%warning, "Indicator has insufficient history");
    }

    if let Some(path) = &outputs.json_path {
        write_json(&chart, path)?;
    }

    if let Some(path) = &outputs.png_path {
        create_parent(path)?;
        exporter
            .save(&chart, path)
            .with_context(|| format!("Failed to write chart image: {}", path.display()))?;
        info!(path = %path.display(), "Chart image saved");
    }

    Ok(chart)
}

fn write_json(chart: &ChartSpec, path: &Path) -> Result<()> {
    create_parent(path)?;
    let json = serde_json::to_string_pretty(chart)?;
    std::fs::write(path, json)
        .with_context(|| format!("Failed to write chart JSON: {}", path.display()))?;
    info!(path = %path.display(), "Chart JSON saved");
    Ok(())
}

fn create_parent(path: &Path) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)?;
    }
    Ok(())
}

/// 차트 요약 출력
pub fn print_chart_summary(chart: &ChartSpec) {
    println!("\n{} 차트: {} 일봉", chart.symbol, chart.len());
    println!("{:-<50}", "");
    for name in chart.trace_names() {
        println!("  {}", name);
    }
    for warning in &chart.warnings {
        println!("  ! {}", warning);
    }
}
