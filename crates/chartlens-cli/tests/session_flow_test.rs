//! CSV → 차트 → 분석 흐름 통합 테스트

use chartlens_advisor::OllamaConfig;
use chartlens_cli::commands::analyze::{build_analyst, run_analysis};
use chartlens_cli::commands::chart::{write_chart, ChartOutputs};
use chartlens_cli::ChartSession;
use chartlens_core::{IndicatorKind, PriceBar, PriceSeries};
use chartlens_data::{write_csv, CsvFileProvider};
use chartlens_render::{ChartRenderer, SnapshotExporter};
use chrono::NaiveDate;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

fn seed_csv(dir: &std::path::Path) -> std::path::PathBuf {
    let bars = (0..60)
        .map(|i| {
            let c = dec!(400) + Decimal::from((i * 7) % 11) - dec!(5);
            PriceBar::new(date(2024, 1, 1) + chrono::Duration::days(i), c - dec!(1), c + dec!(3), c - dec!(3), c, dec!(1500000))
        })
        .collect();
    let path = dir.join("MSFT.csv");
    write_csv(&PriceSeries::new("MSFT", bars).unwrap(), &path).unwrap();
    path
}

fn session_for(path: &std::path::Path, indicators: Vec<IndicatorKind>) -> ChartSession {
    let mut session = ChartSession::new("msft", date(2024, 1, 10), date(2024, 2, 20))
        .unwrap()
        .with_indicators(indicators);
    session.fetch(&CsvFileProvider::file(path)).unwrap();
    session
}

#[test]
fn test_chart_writes_json_and_png() {
    let dir = tempfile::tempdir().unwrap();
    let csv = seed_csv(dir.path());
    let mut session = session_for(
        &csv,
        vec![IndicatorKind::Sma20, IndicatorKind::Rsi14, IndicatorKind::Sma20],
    );
    assert_eq!(session.series().unwrap().len(), 41);

    let outputs = ChartOutputs {
        json_path: Some(dir.path().join("out/chart.json")),
        png_path: Some(dir.path().join("out/chart.png")),
    };
    let exporter = SnapshotExporter::new(ChartRenderer::default());
    let chart = write_chart(&mut session, &exporter, &outputs).unwrap();

    assert_eq!(chart.trace_names(), vec!["Candlestick", "SMA (20)", "RSI"]);

    let json: serde_json::Value =
        serde_json::from_str(&std::fs::read_to_string(dir.path().join("out/chart.json")).unwrap()).unwrap();
    assert_eq!(json["symbol"], "MSFT");
    assert_eq!(json["layout"]["height"], 800);

    let png = std::fs::read(dir.path().join("out/chart.png")).unwrap();
    assert_eq!(&png[..4], &[0x89, b'P', b'N', b'G']);
}

#[test]
fn test_analyze_prints_model_verdict_and_cleans_up() {
    let mut server = mockito::Server::new();
    let _mock = server
        .mock("POST", "/api/chat")
        .with_status(200)
        .with_body(r#"{"message":{"role":"assistant","content":"BUY: price above SMA, RSI 58"}}"#)
        .create();

    let dir = tempfile::tempdir().unwrap();
    let csv = seed_csv(dir.path());
    let snapshots = tempfile::tempdir().unwrap();
    let mut session = session_for(&csv, vec![IndicatorKind::BollingerBands20, IndicatorKind::Rsi14]);

    let exporter = SnapshotExporter::new(ChartRenderer::default()).with_dir(snapshots.path());
    let analyst = build_analyst(OllamaConfig::new(server.url(), "llava"), None).unwrap();

    let result = run_analysis(&mut session, &exporter, &analyst).unwrap();

    assert_eq!(result.text, "BUY: price above SMA, RSI 58");
    assert_eq!(result.model, "llava");
    assert_eq!(std::fs::read_dir(snapshots.path()).unwrap().count(), 0);
}

#[test]
fn test_analyze_failure_surfaces_error() {
    let mut server = mockito::Server::new();
    let _mock = server
        .mock("POST", "/api/chat")
        .with_status(503)
        .with_body("loading model")
        .create();

    let dir = tempfile::tempdir().unwrap();
    let csv = seed_csv(dir.path());
    let snapshots = tempfile::tempdir().unwrap();
    let mut session = session_for(&csv, vec![IndicatorKind::Ema20]);

    let exporter = SnapshotExporter::new(ChartRenderer::default()).with_dir(snapshots.path());
    let analyst = build_analyst(OllamaConfig::new(server.url(), "llava"), None).unwrap();

    let err = run_analysis(&mut session, &exporter, &analyst).unwrap_err();

    assert!(format!("{:#}", err).contains("503"));
    assert_eq!(std::fs::read_dir(snapshots.path()).unwrap().count(), 0);
}
