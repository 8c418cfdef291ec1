//! 차트 분석 오케스트레이션.

use std::path::Path;

use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;
use chartlens_analytics::ChartSpec;
use chartlens_render::SnapshotExporter;
use tracing::{info, info_span, warn};

use crate::error::{AdvisorResult, AnalysisError};
use crate::state::AnalysisRun;
use crate::types::{AnalysisResult, VisionModel, VisionRequest};

/// 모델에 보내는 고정 지시 프롬프트.
pub const TRADER_PROMPT: &str =
    "You are a technical stock trader at a hedgefund. Use the indicators to give a buy/sell decision";

/// 차트 이미지를 비전 모델로 분석합니다.
pub struct ChartAnalyst<M: VisionModel> {
    model: M,
    prompt: String,
}

impl<M: VisionModel> ChartAnalyst<M> {
    /// 기본 프롬프트로 분석기를 생성합니다.
    pub fn new(model: M) -> Self {
        Self {
            model,
            prompt: TRADER_PROMPT.to_string(),
        }
    }

    /// 프롬프트를 교체합니다.
    pub fn with_prompt(mut self, prompt: impl Into<String>) -> Self {
        self.prompt = prompt.into();
        self
    }

    /// 현재 프롬프트.
    pub fn prompt(&self) -> &str {
        &self.prompt
    }

    /// 사용 중인 모델.
    pub fn model(&self) -> &M {
        &self.model
    }

    /// 이미지 파일을 읽어 인코딩하고 모델 응답을 그대로 반환합니다.
    ///
    /// # Errors
    ///
    /// - 파일을 읽을 수 없거나 비어 있으면 `Encoding`
    /// - 모델 호출 실패는 모델 구현이 반환한 에러 그대로
    pub fn analyze(&self, image_path: &Path) -> AdvisorResult<AnalysisResult> {
        let bytes = std::fs::read(image_path).map_err(|e| {
            AnalysisError::Encoding(format!("{} 읽기 실패: {}", image_path.display(), e))
        })?;
        if bytes.is_empty() {
            return Err(AnalysisError::Encoding(format!(
                "{} 파일이 비어 있습니다",
                image_path.display()
            )));
        }

        let request = VisionRequest::new(self.prompt.clone(), STANDARD.encode(&bytes));
        let text = self.model.complete(&request)?;

        Ok(AnalysisResult::new(self.model.name(), text))
    }

    /// 차트를 임시 스냅샷으로 내보내고 분석한 뒤 스냅샷을 삭제합니다.
    ///
    /// 에러는 반환된 `AnalysisRun`의 Failed 상태로 표현됩니다.
    /// 스냅샷 파일은 어떤 경로로 끝나든 삭제됩니다.
    pub fn analyze_chart(&self, exporter: &SnapshotExporter, chart: &ChartSpec) -> AnalysisRun {
        let mut run = AnalysisRun::new();
        let span = info_span!("analyze_chart", run_id = %run.id(), symbol = %chart.symbol, model = %self.model.name());
        let _guard = span.enter();

        run.await_snapshot();
        let outcome = exporter.with_snapshot(chart, |path| {
            run.request_sent();
            self.analyze(path)
        });

        match outcome {
            Ok(result) => {
                info!(chars = result.text.len(), "Analysis completed");
                run.complete(result);
            }
            Err(e) => {
                warn!(error = %e, kind = ?e.kind(), "Analysis failed");
                run.fail(e);
            }
        }

        run
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::AnalysisErrorKind;
    use crate::state::{AnalysisPhase, AnalysisState};
    use chartlens_analytics::ChartComposer;
    use chartlens_core::{IndicatorKind, PriceBar, PriceSeries};
    use chartlens_render::ChartRenderer;
    use chrono::NaiveDate;
    use rust_decimal::Decimal;
    use rust_decimal_macros::dec;
    use std::io::Write;
    use std::sync::Mutex;

    /// 요청을 기록하고 미리 정한 응답을 돌려주는 모델.
    struct ScriptedModel {
        reply: Result<String, AnalysisErrorKind>,
        seen: Mutex<Vec<VisionRequest>>,
    }

    impl ScriptedModel {
        fn ok(text: &str) -> Self {
            Self {
                reply: Ok(text.to_string()),
                seen: Mutex::new(Vec::new()),
            }
        }

        fn failing(kind: AnalysisErrorKind) -> Self {
            Self {
                reply: Err(kind),
                seen: Mutex::new(Vec::new()),
            }
        }
    }

    impl VisionModel for ScriptedModel {
        fn name(&self) -> &str {
            "scripted"
        }

        fn complete(&self, request: &VisionRequest) -> AdvisorResult<String> {
            self.seen.lock().unwrap().push(request.clone());
            match &self.reply {
                Ok(text) => Ok(text.clone()),
                Err(AnalysisErrorKind::MalformedResponse) => {
                    Err(AnalysisError::MalformedResponse("missing".into()))
                }
                Err(_) => Err(AnalysisError::ModelUnavailable("down".into())),
            }
        }
    }

    fn chart(n: usize) -> ChartSpec {
        let start = NaiveDate::from_ymd_opt(2024, 3, 1).unwrap();
        let bars = (0..n)
            .map(|i| {
                let c = Decimal::from(20 + (i % 4) as i64);
                PriceBar::new(
                    start + chrono::Duration::days(i as i64),
                    c,
                    c + dec!(1),
                    c - dec!(1),
                    c,
                    dec!(100),
                )
            })
            .collect();
        let series = PriceSeries::new("UNIT", bars).unwrap();
        ChartComposer::new()
            .compose(&series, &[IndicatorKind::Sma20, IndicatorKind::Rsi14])
            .unwrap()
    }

    #[test]
    fn test_analyze_encodes_image_with_fixed_prompt() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(b"hello").unwrap();

        let analyst = ChartAnalyst::new(ScriptedModel::ok("Buy"));
        let result = analyst.analyze(file.path()).unwrap();

        assert_eq!(result.text, "Buy");
        assert_eq!(result.model, "scripted");
        let seen = analyst.model().seen.lock().unwrap();
        assert_eq!(seen[0].image_base64, "aGVsbG8=");
        assert_eq!(seen[0].prompt, TRADER_PROMPT);
    }

    #[test]
    fn test_analyze_missing_file_is_encoding_error() {
        let analyst = ChartAnalyst::new(ScriptedModel::ok("Buy"));
        let err = analyst.analyze(Path::new("/nonexistent/chart.png")).unwrap_err();
        assert_eq!(err.kind(), AnalysisErrorKind::Encoding);
        assert!(analyst.model().seen.lock().unwrap().is_empty());
    }

    #[test]
    fn test_analyze_empty_file_is_encoding_error() {
        let file = tempfile::NamedTempFile::new().unwrap();
        let analyst = ChartAnalyst::new(ScriptedModel::ok("Buy"));
        let err = analyst.analyze(file.path()).unwrap_err();
        assert_eq!(err.kind(), AnalysisErrorKind::Encoding);
    }

    #[test]
    fn test_analyze_chart_success_cleans_up() {
        let dir = tempfile::tempdir().unwrap();
        let exporter = SnapshotExporter::new(ChartRenderer::default()).with_dir(dir.path());
        let analyst = ChartAnalyst::new(ScriptedModel::ok("Sell"));

        let run = analyst.analyze_chart(&exporter, &chart(30));

        assert_eq!(run.state().phase(), AnalysisPhase::Completed);
        assert_eq!(run.result().unwrap().text, "Sell");
        assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 0);
    }

    #[test]
    fn test_analyze_chart_sends_rendered_png() {
        let dir = tempfile::tempdir().unwrap();
        let exporter = SnapshotExporter::new(ChartRenderer::default()).with_dir(dir.path());
        let analyst = ChartAnalyst::new(ScriptedModel::ok("Hold"));

        let run = analyst.analyze_chart(&exporter, &chart(30));

        assert_eq!(
            run.history(),
            &[
                AnalysisPhase::Idle,
                AnalysisPhase::AwaitingSnapshot,
                AnalysisPhase::RequestSent,
                AnalysisPhase::Completed
            ]
        );
        let seen = analyst.model().seen.lock().unwrap();
        assert_eq!(seen.len(), 1);
        let bytes = STANDARD.decode(&seen[0].image_base64).unwrap();
        assert_eq!(&bytes[..4], &[0x89, b'P', b'N', b'G']);
        assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 0);
    }

    #[test]
    fn test_analyze_chart_model_failure_cleans_up() {
        let dir = tempfile::tempdir().unwrap();
        let exporter = SnapshotExporter::new(ChartRenderer::default()).with_dir(dir.path());
        let analyst = ChartAnalyst::new(ScriptedModel::failing(AnalysisErrorKind::ModelUnavailable));

        let run = analyst.analyze_chart(&exporter, &chart(30));

        assert_eq!(
            run.state(),
            &AnalysisState::Failed {
                kind: AnalysisErrorKind::ModelUnavailable
            }
        );
        assert_eq!(
            run.history(),
            &[
                AnalysisPhase::Idle,
                AnalysisPhase::AwaitingSnapshot,
                AnalysisPhase::RequestSent,
                AnalysisPhase::Failed
            ]
        );
        assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 0);
    }

    #[test]
    fn test_analyze_chart_render_failure_skips_request() {
        let dir = tempfile::tempdir().unwrap();
        let exporter = SnapshotExporter::new(ChartRenderer::default()).with_dir(dir.path());
        let analyst = ChartAnalyst::new(ScriptedModel::ok("Buy"));

        let run = analyst.analyze_chart(&exporter, &chart(0));

        assert_eq!(
            run.state(),
            &AnalysisState::Failed {
                kind: AnalysisErrorKind::Render
            }
        );
        assert!(!run.history().contains(&AnalysisPhase::RequestSent));
        assert!(analyst.model().seen.lock().unwrap().is_empty());
        assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 0);
    }
}
