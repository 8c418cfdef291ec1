//! CLI 명령어 구현 모듈.

pub mod analyze;
pub mod chart;
pub mod fetch;
pub mod list;

use std::time::Duration;

use anyhow::{Context, Result};
use chartlens_core::IndicatorKind;
use chrono::NaiveDate;
use indicatif::{ProgressBar, ProgressStyle};

/// 날짜 문자열 파싱 (YYYY-MM-DD)
pub fn parse_date(s: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .with_context(|| format!("Invalid date format: {}. Expected YYYY-MM-DD", s))
}

/// 쉼표로 구분된 지표 목록 파싱 (예: `sma20,rsi14`)
pub fn parse_indicators(s: &str) -> Result<Vec<IndicatorKind>> {
    s.split(',')
        .map(str::trim)
        .filter(|part| !part.is_empty())
        .map(|part| part.parse::<IndicatorKind>().map_err(anyhow::Error::msg))
        .collect()
}

/// 진행 표시 스피너.
pub(crate) fn spinner(message: impl Into<String>) -> ProgressBar {
    let pb = ProgressBar::new_spinner();
    pb.set_style(
        ProgressStyle::default_spinner()
            .template("{spinner:.green} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner()),
    );
    pb.set_message(message.into());
    pb.enable_steady_tick(Duration::from_millis(100));
    pb
}
