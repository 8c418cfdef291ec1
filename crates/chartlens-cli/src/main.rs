//! ChartLens CLI.
//!
//! # 사용 예시
//!
//! ```bash
//! # 애플 일봉 다운로드
//! chartlens fetch -s AAPL -f 2024-01-01 -t 2024-12-31
//!
//! # SMA/RSI 차트를 PNG와 JSON으로 저장
//! chartlens chart -s AAPL -f 2024-01-01 -t 2024-12-31 -i sma20,rsi14 --png out/aapl.png --json out/aapl.json
//!
//! # 비전 모델로 매수/매도 의견 받기
//! chartlens analyze -s AAPL -f 2024-01-01 -t 2024-12-31 -i sma20,bb20,rsi14 --model llava
//!
//! # 지원 지표 목록
//! chartlens indicators
//! ```

use std::path::PathBuf;

use anyhow::{Context, Result};
use chartlens_analytics::ChartComposer;
use chartlens_cli::commands::analyze::{build_analyst, model_config, print_analysis, run_analysis};
use chartlens_cli::commands::chart::{print_chart_summary, write_chart, ChartOutputs};
use chartlens_cli::commands::fetch::{fetch_to_csv, FetchConfig};
use chartlens_cli::commands::list::print_indicators;
use chartlens_cli::commands::{parse_date, parse_indicators};
use chartlens_cli::ChartSession;
use chartlens_core::{init_logging, AppConfig, LogConfig};
use chartlens_data::{CsvFileProvider, PriceHistoryProvider, YahooChartProvider};
use chartlens_render::{ChartRenderer, RenderOptions, SnapshotExporter};
use clap::{Args, Parser, Subcommand};
use tracing::{error, info};

#[derive(Parser)]
#[command(name = "chartlens")]
#[command(about = "ChartLens - 기술적 지표 차트와 비전 모델 분석", long_about = None)]
#[command(version)]
struct Cli {
    /// 설정 파일
    #[arg(short, long, global = true, default_value = "config/default.toml")]
    config: PathBuf,

    #[command(subcommand)]
    command: Commands,
}

/// 종목, 기간, 지표 선택
#[derive(Args)]
struct ChartArgs {
    /// 종목 심볼 (예: AAPL, SPY)
    #[arg(short, long)]
    symbol: String,

    /// 시작 날짜 (YYYY-MM-DD)
    #[arg(short = 'f', long)]
    from: String,

    /// 종료 날짜 (YYYY-MM-DD, 미포함)
    #[arg(short, long)]
    to: String,

    /// 지표 목록 (쉼표 구분: sma20, ema20, bb20, rsi14)
    #[arg(short, long, default_value = "")]
    indicators: String,

    /// Yahoo Finance 대신 읽을 CSV 파일
    #[arg(long)]
    csv: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Commands {
    /// 일봉 OHLCV 데이터를 CSV로 다운로드 (Yahoo Finance)
    Fetch {
        /// 종목 심볼 (예: AAPL, SPY)
        #[arg(short, long)]
        symbol: String,

        /// 시작 날짜 (YYYY-MM-DD)
        #[arg(short = 'f', long)]
        from: String,

        /// 종료 날짜 (YYYY-MM-DD, 미포함)
        #[arg(short, long)]
        to: String,

        /// 출력 파일 경로 (자동 생성됨)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// 지표 차트 구성
    Chart {
        #[command(flatten)]
        args: ChartArgs,

        /// ChartSpec JSON 저장 경로
        #[arg(long)]
        json: Option<PathBuf>,

        /// PNG 저장 경로
        #[arg(long)]
        png: Option<PathBuf>,
    },

    /// 차트 스냅샷을 비전 모델로 분석
    Analyze {
        #[command(flatten)]
        args: ChartArgs,

        /// 모델 이름 (기본: 설정 파일)
        #[arg(long)]
        model: Option<String>,

        /// 요청 타임아웃 (초, 기본: 무제한)
        #[arg(long)]
        timeout: Option<u64>,
    },

    /// 지원 지표 목록 보기
    Indicators,
}

fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    let cli = Cli::parse();
    let config = AppConfig::load(&cli.config)
        .with_context(|| format!("Failed to load config: {}", cli.config.display()))?;
    init_logging(LogConfig::from(&config.logging))?;

    match cli.command {
        Commands::Fetch {
            symbol,
            from,
            to,
            output,
        } => {
            let fetch_config = FetchConfig {
                symbol,
                start_date: parse_date(&from)?,
                end_date: parse_date(&to)?,
                output_path: output,
            };
            let output_path = fetch_config.output_path();
            let provider = YahooChartProvider::new(&config.data)?;

            match fetch_to_csv(&provider, &fetch_config) {
                Ok(count) => {
                    println!("\n데이터 다운로드 완료: {} 캔들", count);
                    println!("저장 위치: {}", output_path.display());
                }
                Err(e) => {
                    error!("Download failed: {:#}", e);
                    return Err(e);
                }
            }
        }

        Commands::Chart { args, json, png } => {
            let mut session = open_session(&config, &args)?;
            let exporter = snapshot_exporter(&config);
            let outputs = ChartOutputs {
                json_path: json,
                png_path: png,
            };

            let chart = write_chart(&mut session, &exporter, &outputs)?;
            print_chart_summary(&chart);
        }

        Commands::Analyze {
            args,
            model,
            timeout,
        } => {
            let mut session = open_session(&config, &args)?;
            let exporter = snapshot_exporter(&config);
            let analyst = build_analyst(
                model_config(&config.model, model, timeout),
                config.model.prompt.as_deref(),
            )?;

            let result = run_analysis(&mut session, &exporter, &analyst)?;
            print_analysis(&result);
        }

        Commands::Indicators => print_indicators(),
    }

    Ok(())
}

/// 인자로 세션을 만들고 가격 데이터를 불러옵니다.
fn open_session(config: &AppConfig, args: &ChartArgs) -> Result<ChartSession> {
    let start = parse_date(&args.from)?;
    let end = parse_date(&args.to)?;
    let composer = ChartComposer::new().with_height(config.chart.height);

    let mut session = ChartSession::new(&args.symbol, start, end)?
        .with_indicators(parse_indicators(&args.indicators)?)
        .with_composer(composer);

    let provider: Box<dyn PriceHistoryProvider> = match &args.csv {
        Some(path) => Box::new(CsvFileProvider::file(path)),
        None => Box::new(YahooChartProvider::new(&config.data)?),
    };

    let bars = session.fetch(provider.as_ref())?.len();
    info!(symbol = %session.symbol(), bars, "Session ready");
    Ok(session)
}

fn snapshot_exporter(config: &AppConfig) -> SnapshotExporter {
    SnapshotExporter::new(ChartRenderer::new(RenderOptions {
        width: config.chart.width,
        ..Default::default()
    }))
}
