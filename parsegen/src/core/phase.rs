//! Workflow phases and the planner's decision vocabulary.
//!
//! The transition structure is an explicit table: phases with a single
//! successor declare it in [`Phase::fixed_successor`], and the branching
//! decision at `Planning` is the exhaustive [`PlannerAction`] mapping.
//! There are no string-keyed edges anywhere.

use serde::{Deserialize, Serialize};

/// A node in the workflow state machine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Phase {
    Preprocessing,
    Planning,
    GeneratingCode,
    Evaluating,
    RepairingExecution,
    RepairingLogic,
    GeneratingTests,
    Terminated,
}

impl Phase {
    /// Every phase, in declaration order. Used by the diagram renderer.
    pub const ALL: [Phase; 8] = [
        Phase::Preprocessing,
        Phase::Planning,
        Phase::GeneratingCode,
        Phase::Evaluating,
        Phase::RepairingExecution,
        Phase::RepairingLogic,
        Phase::GeneratingTests,
        Phase::Terminated,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Phase::Preprocessing => "preprocessing",
            Phase::Planning => "planning",
            Phase::GeneratingCode => "generating_code",
            Phase::Evaluating => "evaluating",
            Phase::RepairingExecution => "repairing_execution",
            Phase::RepairingLogic => "repairing_logic",
            Phase::GeneratingTests => "generating_tests",
            Phase::Terminated => "terminated",
        }
    }

    /// The single successor for phases that do not branch.
    ///
    /// Fresh and repaired sources always flow into `Evaluating` so nothing
    /// reaches `GeneratingTests` without a passing evaluation. `Planning`
    /// and `Evaluating` branch at runtime and return `None` here.
    pub fn fixed_successor(self) -> Option<Phase> {
        match self {
            Phase::Preprocessing => Some(Phase::Planning),
            Phase::GeneratingCode | Phase::RepairingExecution | Phase::RepairingLogic => {
                Some(Phase::Evaluating)
            }
            Phase::GeneratingTests => Some(Phase::Terminated),
            Phase::Planning | Phase::Evaluating | Phase::Terminated => None,
        }
    }
}

/// Decision produced by the planner at `Planning`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PlannerAction {
    GenerateCode,
    Evaluate,
    RepairExecution,
    RepairLogic,
    GenerateTests,
    Terminate,
}

impl PlannerAction {
    /// Every action, in declaration order. Used by the diagram renderer.
    pub const ALL: [PlannerAction; 6] = [
        PlannerAction::GenerateCode,
        PlannerAction::Evaluate,
        PlannerAction::RepairExecution,
        PlannerAction::RepairLogic,
        PlannerAction::GenerateTests,
        PlannerAction::Terminate,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            PlannerAction::GenerateCode => "generate_code",
            PlannerAction::Evaluate => "evaluate",
            PlannerAction::RepairExecution => "repair_execution",
            PlannerAction::RepairLogic => "repair_logic",
            PlannerAction::GenerateTests => "generate_tests",
            PlannerAction::Terminate => "terminate",
        }
    }

    /// The phase this decision hands control to.
    pub fn target_phase(self) -> Phase {
        match self {
            PlannerAction::GenerateCode => Phase::GeneratingCode,
            PlannerAction::Evaluate => Phase::Evaluating,
            PlannerAction::RepairExecution => Phase::RepairingExecution,
            PlannerAction::RepairLogic => Phase::RepairingLogic,
            PlannerAction::GenerateTests => Phase::GeneratingTests,
            PlannerAction::Terminate => Phase::Terminated,
        }
    }
}
