//! `ChartSpec` → RGB 래스터 변환.
//!
//! 레이아웃의 패널 비율과 간격을 그대로 사용하며, 두 패널은 같은 x 좌표계를 공유합니다.
//! 값이 없는 지점에서는 선을 끊어 그립니다.
//! 패널 제목은 각 패널 위 여백에, 범례는 가격 패널 오른쪽 위에 그립니다.

use chartlens_analytics::{ChartSpec, LineTrace};
use chartlens_core::IndicatorKind;
use image::{Rgb, RgbImage};
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use tracing::debug;

use crate::canvas::{text_width, Canvas, GLYPH_SIZE};
use crate::error::{RenderError, RenderResult};

const BACKGROUND: Rgb<u8> = Rgb([255, 255, 255]);
const FRAME: Rgb<u8> = Rgb([180, 180, 180]);
const GRID: Rgb<u8> = Rgb([235, 235, 235]);
const GUIDE: Rgb<u8> = Rgb([150, 150, 150]);
const BULLISH: Rgb<u8> = Rgb([38, 166, 91]);
const BEARISH: Rgb<u8> = Rgb([234, 57, 67]);
const LABEL: Rgb<u8> = Rgb([50, 50, 50]);

const TEXT_SCALE: i64 = 2;
/// 패널 위쪽 경계에서 제목 윗변까지의 거리
const TITLE_OFFSET: i64 = 20;
const LEGEND_PADDING: i64 = 8;
const LEGEND_SWATCH: i64 = 20;

/// 렌더링 옵션.
#[derive(Debug, Clone, Copy)]
pub struct RenderOptions {
    /// 이미지 너비 (픽셀). 높이는 차트 레이아웃을 따릅니다.
    pub width: u32,
    /// 바깥 여백 (픽셀)
    pub margin: u32,
    /// 지표 선 두께 (픽셀)
    pub line_thickness: u32,
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            width: 1200,
            margin: 40,
            line_thickness: 2,
        }
    }
}

/// 값 → 픽셀 y 좌표 변환.
#[derive(Debug, Clone, Copy)]
struct Scale {
    min: f64,
    max: f64,
    top: f64,
    bottom: f64,
}

impl Scale {
    fn new(min: f64, max: f64, top: u32, bottom: u32) -> Self {
        let (min, max) = if (max - min).abs() < f64::EPSILON {
            (min - 1.0, max + 1.0)
        } else {
            (min, max)
        };
        Self {
            min,
            max,
            top: f64::from(top),
            bottom: f64::from(bottom),
        }
    }

    /// 위아래로 비율만큼 여유를 둡니다.
    fn padded(min: f64, max: f64, ratio: f64, top: u32, bottom: u32) -> Self {
        let pad = (max - min) * ratio;
        Self::new(min - pad, max + pad, top, bottom)
    }

    fn y(&self, value: f64) -> i64 {
        let t = (value - self.min) / (self.max - self.min);
        (self.bottom - t * (self.bottom - self.top)).round() as i64
    }
}

/// 공유 x 좌표계.
#[derive(Debug, Clone, Copy)]
struct XAxis {
    left: f64,
    slot: f64,
}

impl XAxis {
    fn new(left: u32, right: u32, count: usize) -> Self {
        let width = f64::from(right.saturating_sub(left));
        Self {
            left: f64::from(left),
            slot: width / count.max(1) as f64,
        }
    }

    fn center(&self, index: usize) -> i64 {
        (self.left + (index as f64 + 0.5) * self.slot).round() as i64
    }

    fn body_half_width(&self) -> i64 {
        ((self.slot * 0.3).floor() as i64).max(0)
    }
}

fn to_f64(value: Decimal) -> Option<f64> {
    value.to_f64().filter(|v| v.is_finite())
}

fn trace_color(kind: IndicatorKind) -> Rgb<u8> {
    match kind {
        IndicatorKind::Sma20 => Rgb([255, 127, 14]),
        IndicatorKind::Ema20 => Rgb([31, 119, 180]),
        IndicatorKind::BollingerBands20 => Rgb([148, 103, 189]),
        IndicatorKind::Rsi14 => Rgb([128, 0, 128]),
    }
}

/// 패널 위 가운데에 제목을 그립니다. 빈 제목은 건너뜁니다.
fn draw_title(canvas: &mut Canvas, title: &str, left: u32, right: u32, panel_top: u32) {
    if title.is_empty() {
        return;
    }
    let x = (i64::from(left) + i64::from(right) - text_width(title, TEXT_SCALE)) / 2;
    canvas.text(x, i64::from(panel_top) - TITLE_OFFSET, title, TEXT_SCALE, LABEL);
}

/// trace 이름마다 색 견본 한 줄. 순서는 `ChartSpec::trace_names`와 같습니다.
fn draw_legend(canvas: &mut Canvas, chart: &ChartSpec, right: u32, panel_top: u32) {
    let mut entries = vec![(chart.price_panel.candlesticks.name.as_str(), BULLISH)];
    entries.extend(
        chart
            .indicator_traces()
            .into_iter()
            .map(|t| (t.name(), trace_color(t.indicator))),
    );

    let row_height = GLYPH_SIZE * TEXT_SCALE + 4;
    let text_max = entries
        .iter()
        .map(|(name, _)| text_width(name, TEXT_SCALE))
        .max()
        .unwrap_or(0);
    let box_width = LEGEND_PADDING * 3 + LEGEND_SWATCH + text_max;
    let box_height = LEGEND_PADDING * 2 + row_height * entries.len() as i64 - 4;

    let x0 = i64::from(right) - LEGEND_PADDING - box_width;
    let y0 = i64::from(panel_top) + LEGEND_PADDING;
    canvas.fill_rect(x0, y0, x0 + box_width, y0 + box_height, BACKGROUND);
    canvas.stroke_rect(x0, y0, x0 + box_width, y0 + box_height, FRAME);

    for (row, (name, color)) in entries.iter().enumerate() {
        let y = y0 + LEGEND_PADDING + row as i64 * row_height;
        let swatch_x = x0 + LEGEND_PADDING;
        let swatch_y = y + GLYPH_SIZE * TEXT_SCALE / 2;
        canvas.fill_rect(swatch_x, swatch_y - 2, swatch_x + LEGEND_SWATCH - 1, swatch_y + 1, *color);
        canvas.text(swatch_x + LEGEND_SWATCH + LEGEND_PADDING, y, name, TEXT_SCALE, LABEL);
    }
}

/// 차트 렌더러.
#[derive(Debug, Clone, Default)]
pub struct ChartRenderer {
    options: RenderOptions,
}

impl ChartRenderer {
    /// 새 렌더러를 생성합니다.
    pub fn new(options: RenderOptions) -> Self {
        Self { options }
    }

    /// 렌더링 옵션.
    pub fn options(&self) -> &RenderOptions {
        &self.options
    }

    /// 차트를 RGB 이미지로 그립니다.
    ///
    /// # Errors
    ///
    /// - 이미지 크기가 여백보다 작으면 `InvalidDimensions`
    /// - 일봉이 없으면 `EmptyChart`
    pub fn render(&self, chart: &ChartSpec) -> RenderResult<RgbImage> {
        let width = self.options.width;
        let height = chart.layout.height;
        let margin = self.options.margin;

        if width <= margin * 2 || height <= margin * 2 {
            return Err(RenderError::InvalidDimensions { width, height });
        }
        if chart.is_empty() {
            return Err(RenderError::EmptyChart(chart.symbol.clone()));
        }

        let (price_bounds, oscillator_bounds) = chart.layout.split(margin, height - margin * 2);
        let left = margin;
        let right = width - margin;
        let x_axis = XAxis::new(left, right, chart.len());

        let mut canvas = Canvas::new(width, height, BACKGROUND);

        let (low, high) = self.price_range(chart);
        let price_scale = Scale::padded(low, high, 0.05, price_bounds.top, price_bounds.bottom());

        self.draw_grid(&mut canvas, chart.len(), &x_axis, left, right, &price_scale, price_bounds.top, oscillator_bounds.bottom());
        self.draw_candles(&mut canvas, chart, &x_axis, &price_scale);
        for trace in &chart.price_panel.overlays {
            self.draw_trace(&mut canvas, trace, &x_axis, &price_scale);
        }

        let (osc_min, osc_max) = chart.oscillator_panel.y_range;
        let oscillator_scale = Scale::new(
            to_f64(osc_min).unwrap_or(0.0),
            to_f64(osc_max).unwrap_or(100.0),
            oscillator_bounds.top,
            oscillator_bounds.bottom(),
        );
        for guide in chart.oscillator_panel.guides.iter().filter_map(|g| to_f64(*g)) {
            let y = oscillator_scale.y(guide);
            canvas.dashed_hline(i64::from(left), i64::from(right), y, 6, GUIDE);
        }
        for trace in &chart.oscillator_panel.traces {
            self.draw_trace(&mut canvas, trace, &x_axis, &oscillator_scale);
        }

        canvas.stroke_rect(
            i64::from(left),
            i64::from(price_bounds.top),
            i64::from(right),
            i64::from(price_bounds.bottom()),
            FRAME,
        );
        canvas.stroke_rect(
            i64::from(left),
            i64::from(oscillator_bounds.top),
            i64::from(right),
            i64::from(oscillator_bounds.bottom()),
            FRAME,
        );

        let [price_title, oscillator_title] = &chart.layout.subplot_titles;
        draw_title(&mut canvas, price_title, left, right, price_bounds.top);
        draw_title(&mut canvas, oscillator_title, left, right, oscillator_bounds.top);
        if chart.layout.show_legend {
            draw_legend(&mut canvas, chart, right, price_bounds.top);
        }

        debug!(
            symbol = %chart.symbol,
            width,
            height,
            bars = chart.len(),
            "Chart rendered"
        );

        Ok(canvas.into_image())
    }

    /// 캔들과 오버레이를 모두 포함하는 가격 범위.
    fn price_range(&self, chart: &ChartSpec) -> (f64, f64) {
        let candle_values = chart
            .price_panel
            .candlesticks
            .bars
            .iter()
            .flat_map(|b| [b.low, b.high]);
        let overlay_values = chart
            .price_panel
            .overlays
            .iter()
            .flat_map(|t| t.series.points.iter().filter_map(|p| p.value));

        candle_values
            .chain(overlay_values)
            .filter_map(to_f64)
            .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), v| {
                (lo.min(v), hi.max(v))
            })
    }

    #[allow(clippy::too_many_arguments)]
    fn draw_grid(
        &self,
        canvas: &mut Canvas,
        count: usize,
        x_axis: &XAxis,
        left: u32,
        right: u32,
        price_scale: &Scale,
        top: u32,
        bottom: u32,
    ) {
        // 가격 패널 수평선 4개
        for step in 1..5 {
            let value = price_scale.min + (price_scale.max - price_scale.min) * f64::from(step) / 5.0;
            let y = price_scale.y(value);
            canvas.line(i64::from(left), y, i64::from(right), y, GRID);
        }

        // 공유 날짜 축: 두 패널을 관통하는 수직선
        let ticks = 6usize;
        let stride = (count / ticks).max(1);
        for index in (0..count).step_by(stride) {
            let x = x_axis.center(index);
            canvas.line(x, i64::from(top), x, i64::from(bottom), GRID);
        }
    }

    fn draw_candles(&self, canvas: &mut Canvas, chart: &ChartSpec, x_axis: &XAxis, scale: &Scale) {
        let half = x_axis.body_half_width();

        for (index, bar) in chart.price_panel.candlesticks.bars.iter().enumerate() {
            let (Some(open), Some(high), Some(low), Some(close)) =
                (to_f64(bar.open), to_f64(bar.high), to_f64(bar.low), to_f64(bar.close))
            else {
                continue;
            };

            let color = if bar.is_bearish() { BEARISH } else { BULLISH };
            let x = x_axis.center(index);

            canvas.line(x, scale.y(high), x, scale.y(low), color);
            canvas.fill_rect(x - half, scale.y(open), x + half, scale.y(close), color);
        }
    }

    fn draw_trace(&self, canvas: &mut Canvas, trace: &LineTrace, x_axis: &XAxis, scale: &Scale) {
        let color = trace_color(trace.indicator);
        let thickness = i64::from(self.options.line_thickness.max(1));
        let mut previous: Option<(i64, i64)> = None;

        for (index, point) in trace.series.points.iter().enumerate() {
            match point.value.and_then(to_f64) {
                Some(value) => {
                    let current = (x_axis.center(index), scale.y(value));
                    if let Some((px, py)) = previous {
                        canvas.thick_line(px, py, current.0, current.1, thickness, color);
                    } else {
                        canvas.fill_rect(current.0, current.1, current.0, current.1, color);
                    }
                    previous = Some(current);
                }
                None => previous = None,
            }
        }
    }
}
