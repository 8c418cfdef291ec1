//! 일봉 데이터 다운로드 명령.

use std::path::PathBuf;

use anyhow::Result;
use chartlens_data::{write_csv, PriceHistoryProvider};
use chrono::NaiveDate;
use tracing::info;

use super::spinner;
use crate::session::ChartSession;

/// 다운로드 설정
#[derive(Debug, Clone)]
pub struct FetchConfig {
    pub symbol: String,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub output_path: Option<PathBuf>,
}

impl FetchConfig {
    /// 출력 경로. 지정하지 않으면 `data/{SYMBOL}_{from}_to_{to}.csv`
    pub fn output_path(&self) -> PathBuf {
        self.output_path.clone().unwrap_or_else(|| {
            PathBuf::from(format!(
                "data/{}_{}_to_{}.csv",
                self.symbol.to_uppercase(),
                self.start_date.format("%Y%m%d"),
                self.end_date.format("%Y%m%d")
            ))
        })
    }
}

/// 데이터를 받아 CSV로 저장하고 기록한 일봉 수를 반환합니다.
pub fn fetch_to_csv(provider: &dyn PriceHistoryProvider, config: &FetchConfig) -> Result<usize> {
    let mut session = ChartSession::new(&config.symbol, config.start_date, config.end_date)?;
    let output_path = config.output_path();

    let pb = spinner(format!("Fetching {} from {}...", session.symbol(), provider.name()));
    let fetched = session.fetch(provider);
    pb.finish_and_clear();

    let count = write_csv(fetched?, &output_path)?;
    info!(count, path = %output_path.display(), "Successfully downloaded candles");

    Ok(count)
}
