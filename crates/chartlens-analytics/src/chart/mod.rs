//! 차트 구성.
//!
//! 가격 시계열과 선택한 지표 목록을 2단 차트 명세(`ChartSpec`)로 조립합니다.
//!
//! # 패널 배치 규칙
//!
//! - 캔들스틱은 항상 가격 패널의 첫 번째 trace
//! - 오버레이 지표(SMA, EMA, 볼린저)는 가격 패널
//! - 오실레이터 지표(RSI)는 오실레이터 패널
//! - 지표 trace는 요청 순서를 유지 (중복 요청은 첫 번째만 사용)

pub mod layout;

use chartlens_core::{
    DerivedSeries, IndicatorKind, InsufficientHistoryWarning, Panel, PriceBar, PriceSeries,
};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::Serialize;
use tracing::{debug, info_span};

use crate::indicators::{IndicatorEngine, IndicatorResult};

pub use layout::{ChartLayout, PanelBounds};

/// 캔들스틱 trace 이름.
pub const CANDLESTICK_TRACE: &str = "Candlestick";

/// RSI 과매도 기준선.
pub const RSI_OVERSOLD: Decimal = dec!(30);
/// RSI 과매수 기준선.
pub const RSI_OVERBOUGHT: Decimal = dec!(70);

/// 캔들스틱 trace.
#[derive(Debug, Clone, Serialize)]
pub struct CandlestickTrace {
    /// 범례 이름
    pub name: String,
    /// 전체 일봉
    pub bars: Vec<PriceBar>,
}

/// 지표 선 trace.
#[derive(Debug, Clone, Serialize)]
pub struct LineTrace {
    /// 원본 지표
    pub indicator: IndicatorKind,
    /// 날짜 축에 정렬된 값
    pub series: DerivedSeries,
}

impl LineTrace {
    /// 범례 이름.
    pub fn name(&self) -> &str {
        &self.series.name
    }
}

/// 상단 가격 패널.
#[derive(Debug, Clone, Serialize)]
pub struct PricePanel {
    /// 캔들스틱 (항상 존재)
    pub candlesticks: CandlestickTrace,
    /// 가격 축을 공유하는 오버레이
    pub overlays: Vec<LineTrace>,
}

/// 하단 오실레이터 패널.
#[derive(Debug, Clone, Serialize)]
pub struct OscillatorPanel {
    /// 오실레이터 trace
    pub traces: Vec<LineTrace>,
    /// y축 범위
    pub y_range: (Decimal, Decimal),
    /// 수평 기준선 (과매도, 과매수)
    pub guides: Vec<Decimal>,
}

impl Default for OscillatorPanel {
    fn default() -> Self {
        Self {
            traces: Vec::new(),
            y_range: (Decimal::ZERO, Decimal::ONE_HUNDRED),
            guides: vec![RSI_OVERSOLD, RSI_OVERBOUGHT],
        }
    }
}

impl OscillatorPanel {
    /// trace가 없는지 확인합니다.
    pub fn is_empty(&self) -> bool {
        self.traces.is_empty()
    }
}

/// 렌더링 가능한 2단 차트 명세.
///
/// 선택한 지표나 가격 시계열이 바뀌면 새로 생성합니다.
#[derive(Debug, Clone, Serialize)]
pub struct ChartSpec {
    /// 종목 심볼
    pub symbol: String,
    /// 가격 패널
    pub price_panel: PricePanel,
    /// 오실레이터 패널
    pub oscillator_panel: OscillatorPanel,
    /// 레이아웃
    pub layout: ChartLayout,
    /// 중복을 제거한 요청 지표 (요청 순서)
    pub indicators: Vec<IndicatorKind>,
    /// 이력 부족 경고
    pub warnings: Vec<InsufficientHistoryWarning>,
}

impl ChartSpec {
    /// 지표 trace를 요청 순서대로 반환합니다. 패널 구분 없이 한 줄로 이어집니다.
    pub fn indicator_traces(&self) -> Vec<&LineTrace> {
        self.indicators
            .iter()
            .flat_map(|kind| {
                let traces = match kind.panel() {
                    Panel::Price => &self.price_panel.overlays,
                    Panel::Oscillator => &self.oscillator_panel.traces,
                };
                traces.iter().filter(move |t| t.indicator == *kind)
            })
            .collect()
    }

    /// 모든 trace 이름을 추가 순서대로 반환합니다.
    ///
    /// 캔들스틱이 먼저 오고, 이후 지표가 요청 순서대로 이어집니다.
    pub fn trace_names(&self) -> Vec<&str> {
        let mut names = vec![self.price_panel.candlesticks.name.as_str()];
        names.extend(self.indicator_traces().into_iter().map(LineTrace::name));
        names
    }

    /// 날짜 축의 일봉 개수.
    pub fn len(&self) -> usize {
        self.price_panel.candlesticks.bars.len()
    }

    /// 일봉이 없는지 확인합니다.
    pub fn is_empty(&self) -> bool {
        self.price_panel.candlesticks.bars.is_empty()
    }

    /// 경고가 있는지 확인합니다.
    pub fn has_warnings(&self) -> bool {
        !self.warnings.is_empty()
    }
}

/// 차트 구성기.
#[derive(Debug, Default)]
pub struct ChartComposer {
    engine: IndicatorEngine,
    layout: ChartLayout,
}

impl ChartComposer {
    /// 기본 레이아웃으로 구성기를 생성합니다.
    pub fn new() -> Self {
        Self::default()
    }

    /// 차트 높이를 지정합니다. 비율과 간격은 바뀌지 않습니다.
    pub fn with_height(mut self, height: u32) -> Self {
        self.layout.height = height;
        self
    }

    /// 가격 시계열과 지표 목록으로 차트를 구성합니다.
    ///
    /// 각 지표는 분류에 따라 가격 패널 또는 오실레이터 패널에 배치되며,
    /// 패널 내부 순서는 요청 순서를 따릅니다.
    pub fn compose(
        &self,
        series: &PriceSeries,
        overlays: &[IndicatorKind],
    ) -> IndicatorResult<ChartSpec> {
        let span = info_span!("compose_chart", symbol = %series.symbol(), bars = series.len());
        let _guard = span.enter();

        let mut indicators: Vec<IndicatorKind> = Vec::with_capacity(overlays.len());
        for &kind in overlays {
            if !indicators.contains(&kind) {
                indicators.push(kind);
            }
        }

        let mut price_panel = PricePanel {
            candlesticks: CandlestickTrace {
                name: CANDLESTICK_TRACE.to_string(),
                bars: series.bars().to_vec(),
            },
            overlays: Vec::new(),
        };
        let mut oscillator_panel = OscillatorPanel::default();
        let mut warnings = Vec::new();

        for &kind in &indicators {
            if let Some(warning) = InsufficientHistoryWarning::check(kind, series.len()) {
                warnings.push(warning);
            }

            let traces = self
                .engine
                .compute(series, kind)?
                .into_iter()
                .map(|derived| LineTrace {
                    indicator: kind,
                    series: derived,
                });

            match kind.panel() {
                Panel::Price => price_panel.overlays.extend(traces),
                Panel::Oscillator => oscillator_panel.traces.extend(traces),
            }
        }

        debug!(
            overlays = price_panel.overlays.len(),
            oscillators = oscillator_panel.traces.len(),
            warnings = warnings.len(),
            "Chart composed"
        );

        Ok(ChartSpec {
            symbol: series.symbol().to_string(),
            price_panel,
            oscillator_panel,
            layout: self.layout.clone(),
            indicators,
            warnings,
        })
    }
}
