//! 분석 시도 상태 머신.
//!
//! `Idle → AwaitingSnapshot → RequestSent → {Completed | Failed}`
//!
//! 종료 상태에서 Idle로 돌아가지 않으며, 새 분석은 새 `AnalysisRun`으로 시작합니다.
//! 스냅샷 단계에서 실패하면 RequestSent를 거치지 않고 바로 Failed가 됩니다.

use serde::Serialize;
use tracing::debug;
use uuid::Uuid;

use crate::error::{AdvisorResult, AnalysisError, AnalysisErrorKind};
use crate::types::AnalysisResult;

/// 분석 상태.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum AnalysisState {
    /// 시작 전
    Idle,
    /// 스냅샷 생성 중
    AwaitingSnapshot,
    /// 모델 응답 대기 중
    RequestSent,
    /// 완료 (응답 보관)
    Completed { result: AnalysisResult },
    /// 실패 (에러 종류 보관)
    Failed { kind: AnalysisErrorKind },
}

/// 상태 이름 (페이로드 제외).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum AnalysisPhase {
    /// 시작 전
    Idle,
    /// 스냅샷 생성 중
    AwaitingSnapshot,
    /// 모델 응답 대기 중
    RequestSent,
    /// 완료
    Completed,
    /// 실패
    Failed,
}

impl AnalysisState {
    /// 상태 이름.
    pub fn phase(&self) -> AnalysisPhase {
        match self {
            Self::Idle => AnalysisPhase::Idle,
            Self::AwaitingSnapshot => AnalysisPhase::AwaitingSnapshot,
            Self::RequestSent => AnalysisPhase::RequestSent,
            Self::Completed { .. } => AnalysisPhase::Completed,
            Self::Failed { .. } => AnalysisPhase::Failed,
        }
    }

    /// 종료 상태인지 확인합니다.
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Completed { .. } | Self::Failed { .. })
    }
}

impl AnalysisPhase {
    fn can_advance_to(self, next: AnalysisPhase) -> bool {
        use AnalysisPhase::*;
        matches!(
            (self, next),
            (Idle, AwaitingSnapshot)
                | (AwaitingSnapshot, RequestSent)
                | (AwaitingSnapshot, Failed)
                | (RequestSent, Completed)
                | (RequestSent, Failed)
        )
    }
}

/// 한 번의 분석 시도.
#[derive(Debug)]
pub struct AnalysisRun {
    id: Uuid,
    state: AnalysisState,
    history: Vec<AnalysisPhase>,
    error: Option<AnalysisError>,
}

impl Default for AnalysisRun {
    fn default() -> Self {
        Self::new()
    }
}

impl AnalysisRun {
    /// Idle 상태의 새 시도를 생성합니다.
    pub fn new() -> Self {
        Self {
            id: Uuid::new_v4(),
            state: AnalysisState::Idle,
            history: vec![AnalysisPhase::Idle],
            error: None,
        }
    }

    /// 시도 ID.
    pub fn id(&self) -> Uuid {
        self.id
    }

    /// 현재 상태.
    pub fn state(&self) -> &AnalysisState {
        &self.state
    }

    /// 지나온 상태 목록 (현재 상태 포함).
    pub fn history(&self) -> &[AnalysisPhase] {
        &self.history
    }

    /// 실패했다면 그 에러.
    pub fn error(&self) -> Option<&AnalysisError> {
        self.error.as_ref()
    }

    /// 완료되었다면 응답.
    pub fn result(&self) -> Option<&AnalysisResult> {
        match &self.state {
            AnalysisState::Completed { result } => Some(result),
            _ => None,
        }
    }

    fn advance(&mut self, next: AnalysisState) {
        let from = self.state.phase();
        let to = next.phase();
        debug_assert!(
            from.can_advance_to(to),
            "invalid analysis transition {:?} -> {:?}",
            from,
            to
        );
        debug!(run_id = %self.id, ?from, ?to, "Analysis state changed");
        self.history.push(to);
        self.state = next;
    }

    pub(crate) fn await_snapshot(&mut self) {
        self.advance(AnalysisState::AwaitingSnapshot);
    }

    pub(crate) fn request_sent(&mut self) {
        self.advance(AnalysisState::RequestSent);
    }

    pub(crate) fn complete(&mut self, result: AnalysisResult) {
        self.advance(AnalysisState::Completed { result });
    }

    pub(crate) fn fail(&mut self, error: AnalysisError) {
        self.advance(AnalysisState::Failed { kind: error.kind() });
        self.error = Some(error);
    }

    /// 종료 상태를 `Result`로 변환합니다.
    ///
    /// 종료 전이라면 `ModelUnavailable` 에러를 반환합니다.
    pub fn into_result(self) -> AdvisorResult<AnalysisResult> {
        match (self.state, self.error) {
            (AnalysisState::Completed { result }, _) => Ok(result),
            (AnalysisState::Failed { .. }, Some(error)) => Err(error),
            (state, _) => Err(AnalysisError::ModelUnavailable(format!(
                "분석이 끝나지 않았습니다: {:?}",
                state.phase()
            ))),
        }
    }
}
