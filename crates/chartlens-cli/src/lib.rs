//! ChartLens CLI.
//!
//! - 가격 데이터 다운로드 (Yahoo Finance → CSV)
//! - 지표 차트 구성 및 JSON/PNG 저장
//! - 비전 모델 차트 분석

pub mod commands;
pub mod session;

pub use session::ChartSession;
