//! Per-run workflow bookkeeping.

use serde::Serialize;

use crate::core::phase::{Phase, PlannerAction};

/// Step outcome labels recorded in the audit trail, one per completed step.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum StatusLabel {
    Preprocessed,
    CodeGenerated,
    ExecutionFailed,
    ValidationFailed,
    EvaluationPassed,
    ExecutionRepaired,
    LogicRepaired,
    TestsGenerated,
    RetriesExhausted,
}

impl StatusLabel {
    pub fn as_str(self) -> &'static str {
        match self {
            StatusLabel::Preprocessed => "preprocessed",
            StatusLabel::CodeGenerated => "code_generated",
            StatusLabel::ExecutionFailed => "execution_failed",
            StatusLabel::ValidationFailed => "validation_failed",
            StatusLabel::EvaluationPassed => "evaluation_passed",
            StatusLabel::ExecutionRepaired => "execution_repaired",
            StatusLabel::LogicRepaired => "logic_repaired",
            StatusLabel::TestsGenerated => "tests_generated",
            StatusLabel::RetriesExhausted => "retries_exhausted",
        }
    }
}

/// Mutable run state, owned by the controller and threaded by reference
/// through every step. Created with zero tries, dropped at run end; nothing
/// is persisted across runs.
#[derive(Debug, Clone, Default, Serialize)]
pub struct WorkflowState {
    /// Phases entered, in order. Append-only audit trail.
    pub visited: Vec<Phase>,
    /// One label per completed step. Append-only.
    pub status_history: Vec<StatusLabel>,
    /// Planner decisions made so far.
    pub tries: u32,
    /// Payload handed between steps: extracted document text, then generated
    /// code, then generated tests.
    pub pending_text: Option<String>,
    /// The most recent planner decision.
    pub next_action: Option<PlannerAction>,
}

impl WorkflowState {
    pub fn visit(&mut self, phase: Phase) {
        self.visited.push(phase);
    }

    pub fn record_status(&mut self, status: StatusLabel) {
        self.status_history.push(status);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn trails_are_append_only_in_order() {
        let mut state = WorkflowState::default();
        state.visit(Phase::Preprocessing);
        state.visit(Phase::Planning);
        state.record_status(StatusLabel::Preprocessed);

        assert_eq!(state.visited, vec![Phase::Preprocessing, Phase::Planning]);
        assert_eq!(state.status_history, vec![StatusLabel::Preprocessed]);
        assert_eq!(state.tries, 0);
    }
}
