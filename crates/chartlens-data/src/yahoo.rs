//! Yahoo Finance v8 chart API 공급자.
//!
//! `GET {base}/v8/finance/chart/{symbol}?period1=..&period2=..&interval=1d&events=history`
//!
//! 조정 종가가 있으면 시가/고가/저가/종가 모두에 같은 조정 비율을 적용합니다.
//! 필드가 하나라도 비어 있는 행은 버립니다.

use chartlens_core::{DataConfig, PriceBar, PriceSeries};
use chrono::{DateTime, NaiveDate};
use rust_decimal::prelude::FromPrimitive;
use rust_decimal::Decimal;
use serde::Deserialize;
use tracing::{debug, info, warn};

use crate::error::{DataError, DataResult};
use crate::provider::{validate_range, PriceHistoryProvider};

/// 가격 소수점 자릿수.
const PRICE_SCALE: u32 = 4;

/// Yahoo Finance API v8 응답 구조
#[derive(Debug, Deserialize)]
struct YahooChartResponse {
    chart: YahooChart,
}

#[derive(Debug, Deserialize)]
struct YahooChart {
    result: Option<Vec<YahooResult>>,
    error: Option<YahooError>,
}

#[derive(Debug, Deserialize)]
struct YahooError {
    code: String,
    description: String,
}

#[derive(Debug, Deserialize)]
struct YahooResult {
    meta: Option<YahooMeta>,
    timestamp: Option<Vec<i64>>,
    indicators: YahooIndicators,
}

#[derive(Debug, Deserialize)]
struct YahooMeta {
    gmtoffset: Option<i64>,
}

#[derive(Debug, Deserialize)]
struct YahooIndicators {
    quote: Vec<YahooQuote>,
    #[serde(rename = "adjclose")]
    adj_close: Option<Vec<YahooAdjClose>>,
}

#[derive(Debug, Deserialize)]
struct YahooQuote {
    open: Option<Vec<Option<f64>>>,
    high: Option<Vec<Option<f64>>>,
    low: Option<Vec<Option<f64>>>,
    close: Option<Vec<Option<f64>>>,
    volume: Option<Vec<Option<i64>>>,
}

#[derive(Debug, Deserialize)]
struct YahooAdjClose {
    #[serde(rename = "adjclose")]
    adj_close: Option<Vec<Option<f64>>>,
}

/// Yahoo Finance 일봉 공급자.
pub struct YahooChartProvider {
    base_url: String,
    client: reqwest::blocking::Client,
}

impl YahooChartProvider {
    /// 설정으로 공급자를 생성합니다.
    pub fn new(config: &DataConfig) -> DataResult<Self> {
        let client = reqwest::blocking::Client::builder()
            .user_agent(config.user_agent.as_str())
            .build()?;

        Ok(Self {
            base_url: config.yahoo_base_url.trim_end_matches('/').to_string(),
            client,
        })
    }

    fn chart_url(&self, symbol: &str, start: NaiveDate, end: NaiveDate) -> String {
        // 반열린 구간이므로 종료일 자정(UTC)까지 조회한다.
        let start_ts = start.and_time(chrono::NaiveTime::MIN).and_utc().timestamp();
        let end_ts = end.and_time(chrono::NaiveTime::MIN).and_utc().timestamp();

        format!(
            "{}/v8/finance/chart/{}?period1={}&period2={}&interval=1d&events=history",
            self.base_url,
            symbol.to_uppercase(),
            start_ts,
            end_ts
        )
    }

    fn parse_body(symbol: &str, body: &str) -> DataResult<Vec<PriceBar>> {
        let response: YahooChartResponse = serde_json::from_str(body)
            .map_err(|e| DataError::Parse(format!("Yahoo Finance 응답 파싱 실패: {}", e)))?;

        if let Some(error) = response.chart.error {
            return Err(DataError::Api {
                status: 200,
                message: format!("{} - {}", error.code, error.description),
            });
        }

        let result = response
            .chart
            .result
            .and_then(|r| r.into_iter().next())
            .ok_or_else(|| DataError::NoData(symbol.to_string()))?;

        let offset = result.meta.and_then(|m| m.gmtoffset).unwrap_or(0);
        let timestamps = result.timestamp.unwrap_or_default();
        let quote = result
            .indicators
            .quote
            .into_iter()
            .next()
            .ok_or_else(|| DataError::Parse("quote 데이터가 없습니다".to_string()))?;

        let opens = quote.open.unwrap_or_default();
        let highs = quote.high.unwrap_or_default();
        let lows = quote.low.unwrap_or_default();
        let closes = quote.close.unwrap_or_default();
        let volumes = quote.volume.unwrap_or_default();
        let adj_closes = result
            .indicators
            .adj_close
            .and_then(|ac| ac.into_iter().next())
            .and_then(|ac| ac.adj_close)
            .unwrap_or_default();

        let at = |values: &[Option<f64>], i: usize| values.get(i).copied().flatten();
        let mut bars: Vec<PriceBar> = Vec::with_capacity(timestamps.len());
        let mut skipped = 0usize;

        for (i, &ts) in timestamps.iter().enumerate() {
            let row = (
                at(&opens, i),
                at(&highs, i),
                at(&lows, i),
                at(&closes, i),
                volumes.get(i).copied().flatten(),
            );
            let (Some(open), Some(high), Some(low), Some(close), Some(volume)) = row else {
                skipped += 1;
                continue;
            };

            let factor = match at(&adj_closes, i) {
                Some(adj) if close != 0.0 => adj / close,
                _ => 1.0,
            };

            let Some(date) = DateTime::from_timestamp(ts + offset, 0).map(|dt| dt.date_naive()) else {
                skipped += 1;
                continue;
            };

            let price = |v: f64| Decimal::from_f64(v * factor).map(|d| d.round_dp(PRICE_SCALE));
            let (Some(open), Some(high), Some(low), Some(close)) =
                (price(open), price(high), price(low), price(close))
            else {
                skipped += 1;
                continue;
            };

            bars.push(PriceBar::new(date, open, high, low, close, Decimal::from(volume)));
        }

        if skipped > 0 {
            debug!(symbol, skipped, "Dropped incomplete Yahoo rows");
        }

        // 날짜순 정렬 후 같은 날짜는 마지막 행만 유지
        bars.sort_by_key(|b| b.date);
        bars.reverse();
        bars.dedup_by_key(|b| b.date);
        bars.reverse();

        Ok(bars)
    }
}

impl PriceHistoryProvider for YahooChartProvider {
    fn name(&self) -> &str {
        "yahoo"
    }

    fn fetch(&self, symbol: &str, start: NaiveDate, end: NaiveDate) -> DataResult<PriceSeries> {
        validate_range(start, end)?;

        let url = self.chart_url(symbol, start, end);
        debug!(url = %url, "Fetching from Yahoo Finance");

        let response = self.client.get(&url).send()?;
        let status = response.status();
        let body = response.text()?;

        if !status.is_success() {
            warn!(symbol, status = %status, "Yahoo Finance API error");
            return Err(DataError::Api {
                status: status.as_u16(),
                message: body,
            });
        }

        let bars = Self::parse_body(symbol, &body)?;
        if bars.is_empty() {
            return Err(DataError::NoData(format!("{} ({} ~ {})", symbol, start, end)));
        }

        info!(symbol, bars = bars.len(), "Downloaded candles from Yahoo Finance");
        Ok(PriceSeries::new(symbol.to_uppercase(), bars)?)
    }
}
