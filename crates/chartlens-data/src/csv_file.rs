//! 로컬 CSV 일봉 파일.
//!
//! 형식: `date,open,high,low,close,volume` 헤더 + 하루 한 행 (`YYYY-MM-DD`).

use std::fs::File;
use std::io::BufWriter;
use std::path::{Path, PathBuf};

use chartlens_core::{PriceBar, PriceSeries};
use chrono::NaiveDate;
use tracing::{debug, info};

use crate::error::{DataError, DataResult};
use crate::provider::{validate_range, PriceHistoryProvider};

/// CSV 파일을 읽어 시계열을 만듭니다. 행 순서는 날짜순으로 정렬됩니다.
pub fn read_csv(path: impl AsRef<Path>, symbol: &str) -> DataResult<PriceSeries> {
    let path = path.as_ref();
    let mut reader = csv::Reader::from_path(path)?;

    let mut bars = reader
        .deserialize::<PriceBar>()
        .collect::<Result<Vec<_>, _>>()?;
    bars.sort_by_key(|b| b.date);

    debug!(path = %path.display(), rows = bars.len(), "Loaded CSV candles");
    Ok(PriceSeries::new(symbol, bars)?)
}

/// 시계열을 CSV 파일로 저장하고 기록한 행 수를 반환합니다.
///
/// 상위 디렉토리가 없으면 생성합니다.
pub fn write_csv(series: &PriceSeries, path: impl AsRef<Path>) -> DataResult<usize> {
    let path = path.as_ref();
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)?;
    }

    let mut writer = csv::Writer::from_writer(BufWriter::new(File::create(path)?));
    for bar in series.bars() {
        writer.serialize(bar)?;
    }
    writer.flush()?;

    info!(symbol = series.symbol(), path = %path.display(), rows = series.len(), "Saved candles to CSV");
    Ok(series.len())
}

#[derive(Debug, Clone)]
enum CsvSource {
    Dir(PathBuf),
    File(PathBuf),
}

/// 로컬 CSV 공급자.
///
/// 디렉토리 모드는 `{dir}/{SYMBOL}.csv`를, 파일 모드는 심볼과 무관하게 지정한 파일을 읽습니다.
#[derive(Debug, Clone)]
pub struct CsvFileProvider {
    source: CsvSource,
}

impl CsvFileProvider {
    /// 데이터 디렉토리로 공급자를 생성합니다.
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self {
            source: CsvSource::Dir(dir.into()),
        }
    }

    /// 단일 파일 공급자를 생성합니다.
    pub fn file(path: impl Into<PathBuf>) -> Self {
        Self {
            source: CsvSource::File(path.into()),
        }
    }

    /// 심볼에 해당하는 파일 경로.
    pub fn path_for(&self, symbol: &str) -> PathBuf {
        match &self.source {
            CsvSource::Dir(dir) => dir.join(format!("{}.csv", symbol.to_uppercase())),
            CsvSource::File(path) => path.clone(),
        }
    }
}

impl PriceHistoryProvider for CsvFileProvider {
    fn name(&self) -> &str {
        "csv"
    }

    fn fetch(&self, symbol: &str, start: NaiveDate, end: NaiveDate) -> DataResult<PriceSeries> {
        validate_range(start, end)?;

        let full = read_csv(self.path_for(symbol), &symbol.to_uppercase())?;
        let bars: Vec<PriceBar> = full
            .bars()
            .iter()
            .filter(|b| b.date >= start && b.date < end)
            .cloned()
            .collect();

        if bars.is_empty() {
            return Err(DataError::NoData(format!("{} ({} ~ {})", symbol, start, end)));
        }

        Ok(PriceSeries::new(full.symbol(), bars)?)
    }
}
