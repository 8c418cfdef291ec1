//! 지표 종류와 차트 패널 분류.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// 지원하는 지표 종류 (고정 목록).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IndicatorKind {
    /// 20일 단순 이동평균
    Sma20,
    /// 20일 지수 이동평균
    Ema20,
    /// 20일 볼린저 밴드 (k = 2)
    BollingerBands20,
    /// 14일 상대강도지수
    Rsi14,
}

/// 지표가 그려지는 축의 성격.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IndicatorClass {
    /// 가격 축을 공유하는 오버레이
    Overlay,
    /// 별도의 0-100 축을 쓰는 오실레이터
    Oscillator,
}

/// 차트 패널.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Panel {
    /// 상단 가격 패널 (캔들스틱 + 오버레이)
    Price,
    /// 하단 오실레이터 패널
    Oscillator,
}

impl IndicatorKind {
    /// 전체 지표 목록 (UI 표시 순서).
    pub const ALL: [IndicatorKind; 4] = [
        IndicatorKind::Sma20,
        IndicatorKind::Ema20,
        IndicatorKind::Rsi14,
        IndicatorKind::BollingerBands20,
    ];

    /// 지표 분류.
    pub fn class(&self) -> IndicatorClass {
        match self {
            Self::Sma20 | Self::Ema20 | Self::BollingerBands20 => IndicatorClass::Overlay,
            Self::Rsi14 => IndicatorClass::Oscillator,
        }
    }

    /// 지표가 배치될 패널.
    pub fn panel(&self) -> Panel {
        match self.class() {
            IndicatorClass::Overlay => Panel::Price,
            IndicatorClass::Oscillator => Panel::Oscillator,
        }
    }

    /// 윈도우(또는 span) 길이.
    pub fn window(&self) -> usize {
        match self {
            Self::Sma20 | Self::Ema20 | Self::BollingerBands20 => 20,
            Self::Rsi14 => 14,
        }
    }

    /// 첫 값을 얻기 위해 필요한 최소 일봉 수.
    ///
    /// EMA는 첫 종가로 시작하므로 한 개면 충분합니다.
    pub fn required_history(&self) -> usize {
        match self {
            Self::Ema20 => 1,
            _ => self.window(),
        }
    }

    /// 사용자에게 보여줄 이름.
    pub fn label(&self) -> &'static str {
        match self {
            Self::Sma20 => "20-Day SMA",
            Self::Ema20 => "20-Day EMA",
            Self::BollingerBands20 => "20-Day Bollinger Bands",
            Self::Rsi14 => "RSI",
        }
    }

    /// CLI 등에서 쓰는 짧은 코드.
    pub fn code(&self) -> &'static str {
        match self {
            Self::Sma20 => "sma20",
            Self::Ema20 => "ema20",
            Self::BollingerBands20 => "bb20",
            Self::Rsi14 => "rsi14",
        }
    }
}

impl fmt::Display for IndicatorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for IndicatorKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_lowercase();
        match normalized.as_str() {
            "sma20" | "sma" | "20-day sma" => Ok(Self::Sma20),
            "ema20" | "ema" | "20-day ema" => Ok(Self::Ema20),
            "bb20" | "bb" | "bollinger" | "20-day bollinger bands" => Ok(Self::BollingerBands20),
            "rsi14" | "rsi" => Ok(Self::Rsi14),
            _ => Err(format!(
                "Unknown indicator: {}. Supported: sma20, ema20, bb20, rsi14",
                s
            )),
        }
    }
}

/// 지표 윈도우보다 일봉이 적을 때의 경고.
///
/// 치명적이지 않으며, 해당 지표는 값이 일부 또는 전부 비어 있는 시계열로 계산됩니다.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct InsufficientHistoryWarning {
    /// 대상 지표
    pub indicator: IndicatorKind,
    /// 필요한 일봉 수
    pub required: usize,
    /// 제공된 일봉 수
    pub provided: usize,
}

impl InsufficientHistoryWarning {
    /// 주어진 길이의 시계열에 대해 경고가 필요한지 확인합니다.
    pub fn check(indicator: IndicatorKind, provided: usize) -> Option<Self> {
        let required = indicator.required_history();
        (provided < required).then_some(Self {
            indicator,
            required,
            provided,
        })
    }
}

impl fmt::Display for InsufficientHistoryWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}: 데이터가 부족합니다 (필요 {}개, 제공 {}개)",
            self.indicator, self.required, self.provided
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_panel_routing() {
        assert_eq!(IndicatorKind::Sma20.panel(), Panel::Price);
        assert_eq!(IndicatorKind::Ema20.panel(), Panel::Price);
        assert_eq!(IndicatorKind::BollingerBands20.panel(), Panel::Price);
        assert_eq!(IndicatorKind::Rsi14.panel(), Panel::Oscillator);
    }

    #[test]
    fn test_parse_codes_and_labels() {
        assert_eq!("sma20".parse::<IndicatorKind>().unwrap(), IndicatorKind::Sma20);
        assert_eq!("20-Day EMA".parse::<IndicatorKind>().unwrap(), IndicatorKind::Ema20);
        assert_eq!(" BB20 ".parse::<IndicatorKind>().unwrap(), IndicatorKind::BollingerBands20);
        assert_eq!("RSI".parse::<IndicatorKind>().unwrap(), IndicatorKind::Rsi14);
        assert!("macd".parse::<IndicatorKind>().is_err());
    }

    #[test]
    fn test_insufficient_history_check() {
        let warning = InsufficientHistoryWarning::check(IndicatorKind::Sma20, 5).unwrap();
        assert_eq!(warning.required, 20);
        assert_eq!(warning.provided, 5);

        assert!(InsufficientHistoryWarning::check(IndicatorKind::Sma20, 20).is_none());
        assert!(InsufficientHistoryWarning::check(IndicatorKind::Ema20, 1).is_none());
        assert!(InsufficientHistoryWarning::check(IndicatorKind::Rsi14, 13).is_some());
    }

    #[test]
    fn test_serde_names() {
        let json = serde_json::to_string(&IndicatorKind::BollingerBands20).unwrap();
        assert_eq!(json, "\"bollinger_bands20\"");
    }
}
