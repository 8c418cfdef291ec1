//! 일봉 OHLCV 데이터 공급자.
//!
//! - [`PriceHistoryProvider`]: 심볼과 기간으로 `PriceSeries`를 조회하는 인터페이스
//! - [`YahooChartProvider`]: Yahoo Finance v8 chart API
//! - [`CsvFileProvider`]: `date,open,high,low,close,volume` 형식의 로컬 CSV

pub mod csv_file;
pub mod error;
pub mod provider;
pub mod yahoo;

pub use csv_file::{read_csv, write_csv, CsvFileProvider};
pub use error::{DataError, DataResult};
pub use provider::{validate_range, PriceHistoryProvider};
pub use yahoo::YahooChartProvider;
