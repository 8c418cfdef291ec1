//! 2단 차트 레이아웃.
//!
//! 가격 패널과 오실레이터 패널이 날짜 축을 공유하며 위아래로 쌓입니다.
//! 비율과 간격은 고정값이며 실행마다 달라지지 않습니다.

use serde::{Deserialize, Serialize};

/// 가격 패널 높이 비율.
pub const PRICE_ROW_HEIGHT: f64 = 0.7;
/// 오실레이터 패널 높이 비율.
pub const OSCILLATOR_ROW_HEIGHT: f64 = 0.3;
/// 패널 사이 간격 (전체 높이 대비).
pub const VERTICAL_SPACING: f64 = 0.05;
/// 기본 차트 높이 (픽셀).
pub const DEFAULT_HEIGHT: u32 = 800;

/// 가격 패널 제목.
pub const PRICE_PANEL_TITLE: &str = "Candlestick Chart";
/// 오실레이터 패널 제목.
pub const OSCILLATOR_PANEL_TITLE: &str = "Relative Strength Index (RSI)";

/// 차트 전체 레이아웃.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChartLayout {
    /// [가격, 오실레이터] 높이 비율
    pub row_heights: [f64; 2],
    /// 패널 간 간격
    pub vertical_spacing: f64,
    /// 날짜 축 공유 여부
    pub shared_x_axis: bool,
    /// [가격, 오실레이터] 패널 제목
    pub subplot_titles: [String; 2],
    /// 차트 높이 (픽셀)
    pub height: u32,
    /// 범례 표시 여부
    pub show_legend: bool,
    /// 날짜 범위 슬라이더 표시 여부
    pub show_range_slider: bool,
}

impl Default for ChartLayout {
    fn default() -> Self {
        Self {
            row_heights: [PRICE_ROW_HEIGHT, OSCILLATOR_ROW_HEIGHT],
            vertical_spacing: VERTICAL_SPACING,
            shared_x_axis: true,
            subplot_titles: [
                PRICE_PANEL_TITLE.to_string(),
                OSCILLATOR_PANEL_TITLE.to_string(),
            ],
            height: DEFAULT_HEIGHT,
            show_legend: true,
            show_range_slider: false,
        }
    }
}

/// 픽셀 단위 패널 영역 (세로 방향).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PanelBounds {
    /// 상단 y 좌표
    pub top: u32,
    /// 높이
    pub height: u32,
}

impl PanelBounds {
    /// 하단 y 좌표 (제외).
    pub fn bottom(&self) -> u32 {
        self.top + self.height
    }
}

impl ChartLayout {
    /// 주어진 plot 영역 높이를 두 패널로 나눕니다.
    ///
    /// 간격을 뺀 나머지를 row_heights 비율로 분배합니다.
    pub fn split(&self, plot_top: u32, plot_height: u32) -> (PanelBounds, PanelBounds) {
        let total = f64::from(plot_height);
        let gap = (total * self.vertical_spacing).round();
        let usable = (total - gap).max(0.0);
        let ratio_sum = self.row_heights[0] + self.row_heights[1];

        let price_height = if ratio_sum > 0.0 {
            (usable * self.row_heights[0] / ratio_sum).round()
        } else {
            0.0
        };
        let oscillator_height = (usable - price_height).max(0.0);

        let price = PanelBounds {
            top: plot_top,
            height: price_height as u32,
        };
        let oscillator = PanelBounds {
            top: plot_top + price_height as u32 + gap as u32,
            height: oscillator_height as u32,
        };
        (price, oscillator)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_layout() {
        let layout = ChartLayout::default();
        assert_eq!(layout.row_heights, [0.7, 0.3]);
        assert_eq!(layout.vertical_spacing, 0.05);
        assert!(layout.shared_x_axis);
        assert_eq!(layout.height, 800);
        assert!(layout.show_legend);
        assert!(!layout.show_range_slider);
        assert_eq!(layout.subplot_titles[1], "Relative Strength Index (RSI)");
    }

    #[test]
    fn test_split_keeps_ratio() {
        let layout = ChartLayout::default();
        let (price, oscillator) = layout.split(0, 1000);

        // 간격 50, 남은 950을 7:3 으로 분배
        assert_eq!(price.top, 0);
        assert_eq!(price.height, 665);
        assert_eq!(oscillator.top, 715);
        assert_eq!(oscillator.height, 285);
        assert_eq!(oscillator.bottom(), 1000);
    }

    #[test]
    fn test_split_with_offset() {
        let layout = ChartLayout::default();
        let (price, oscillator) = layout.split(40, 500);
        assert_eq!(price.top, 40);
        assert!(oscillator.top > price.bottom());
        assert!(oscillator.bottom() <= 540);
    }
}
