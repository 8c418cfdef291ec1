//! # ChartLens Core
//!
//! 차트 분석 파이프라인 전반에서 공유하는 핵심 도메인 모델을 제공합니다:
//! - 일봉 OHLCV 데이터 (`PriceBar`, `PriceSeries`)
//! - 지표 파생 시계열 (`DerivedSeries`)
//! - 지표 종류 및 패널 분류 (`IndicatorKind`, `Panel`)
//! - 설정 관리
//! - 로깅 인프라

pub mod config;
pub mod domain;
pub mod error;
pub mod logging;

pub use config::*;
pub use domain::*;
pub use error::*;
pub use logging::*;
