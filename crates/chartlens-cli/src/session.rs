//! 사용자 세션 상태.
//!
//! 한 종목, 한 기간에 대한 가격 데이터와 지표 선택을 보관합니다.
//! 차트는 데이터나 지표 선택이 바뀔 때마다 다시 구성됩니다.

use anyhow::{bail, Context, Result};
use chartlens_advisor::{AnalysisRun, ChartAnalyst, VisionModel};
use chartlens_analytics::{ChartComposer, ChartSpec};
use chartlens_core::{chart_span, IndicatorKind, PriceSeries};
use chartlens_data::{validate_range, PriceHistoryProvider};
use chartlens_render::SnapshotExporter;
use chrono::NaiveDate;
use tracing::info;

/// 차트 세션.
pub struct ChartSession {
    symbol: String,
    start: NaiveDate,
    end: NaiveDate,
    indicators: Vec<IndicatorKind>,
    composer: ChartComposer,
    series: Option<PriceSeries>,
    chart: Option<ChartSpec>,
}

impl ChartSession {
    /// 새 세션을 생성합니다. 기간은 `[start, end)`입니다.
    pub fn new(symbol: impl Into<String>, start: NaiveDate, end: NaiveDate) -> Result<Self> {
        validate_range(start, end)?;

        Ok(Self {
            symbol: symbol.into().to_uppercase(),
            start,
            end,
            indicators: Vec::new(),
            composer: ChartComposer::new(),
            series: None,
            chart: None,
        })
    }

    /// 지표 선택을 지정합니다.
    pub fn with_indicators(mut self, indicators: Vec<IndicatorKind>) -> Self {
        self.set_indicators(indicators);
        self
    }

    /// 차트 구성기를 교체합니다.
    pub fn with_composer(mut self, composer: ChartComposer) -> Self {
        self.composer = composer;
        self.chart = None;
        self
    }

    pub fn symbol(&self) -> &str {
        &self.symbol
    }

    pub fn range(&self) -> (NaiveDate, NaiveDate) {
        (self.start, self.end)
    }

    pub fn indicators(&self) -> &[IndicatorKind] {
        &self.indicators
    }

    /// 조회된 가격 데이터.
    pub fn series(&self) -> Option<&PriceSeries> {
        self.series.as_ref()
    }

    /// 지표 선택을 바꿉니다.
    pub fn set_indicators(&mut self, indicators: Vec<IndicatorKind>) {
        self.indicators = indicators;
        self.chart = None;
    }

    /// 공급자에서 가격 데이터를 조회해 세션에 보관합니다.
    pub fn fetch(&mut self, provider: &dyn PriceHistoryProvider) -> Result<&PriceSeries> {
        let series = provider
            .fetch(&self.symbol, self.start, self.end)
            .with_context(|| {
                format!(
                    "Failed to fetch {} from {} ({} ~ {})",
                    self.symbol,
                    provider.name(),
                    self.start,
                    self.end
                )
            })?;

        info!(symbol = %self.symbol, provider = provider.name(), bars = series.len(), "Price history loaded");
        self.chart = None;
        Ok(self.series.insert(series))
    }

    /// 현재 데이터와 지표 선택으로 차트를 구성합니다.
    pub fn chart(&mut self) -> Result<&ChartSpec> {
        if self.chart.is_none() {
            let Some(series) = self.series.as_ref() else {
                bail!("No price data loaded for {}", self.symbol);
            };

            let span = chart_span!("session_chart", self.symbol, self.indicators);
            let _guard = span.enter();
            let chart = self.composer.compose(series, &self.indicators)?;
            self.chart = Some(chart);
        }

        self.chart
            .as_ref()
            .context("chart cache unexpectedly empty")
    }

    /// 현재 차트를 스냅샷으로 내보내 분석합니다.
    ///
    /// 분석 실패는 반환된 `AnalysisRun`의 상태로 표현됩니다.
    pub fn analyze<M: VisionModel>(
        &mut self,
        exporter: &SnapshotExporter,
        analyst: &ChartAnalyst<M>,
    ) -> Result<AnalysisRun> {
        let chart = self.chart()?;
        Ok(analyst.analyze_chart(exporter, chart))
    }
}
