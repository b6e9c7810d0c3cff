//! Pure planning decision for the repair loop.

use crate::core::artifact::GenerationArtifact;
use crate::core::phase::PlannerAction;

/// Decide the next action from the artifact and the retry budget.
///
/// Priority order is fixed:
/// 1. budget exhausted — terminate;
/// 2. no source ever materialized — generate;
/// 3. execution error pending — repair execution;
/// 4. validation error pending — repair logic;
/// 5. both clear — the last cycle fully passed, generate tests.
///
/// The retry budget is the sole circuit breaker: nothing here detects a
/// repair that made the artifact worse, so the loop may oscillate until the
/// cap is reached. The caller increments `tries` for every decision other
/// than `Terminate`.
pub fn decide(artifact: &GenerationArtifact, tries: u32, max_tries: u32) -> PlannerAction {
    if tries >= max_tries {
        return PlannerAction::Terminate;
    }
    if artifact.source_location.is_none() {
        return PlannerAction::GenerateCode;
    }
    if artifact.execution_error.is_some() {
        return PlannerAction::RepairExecution;
    }
    if artifact.validation_error.is_some() {
        return PlannerAction::RepairLogic;
    }
    PlannerAction::GenerateTests
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::report::ValidationFailure;
    use std::path::PathBuf;

    fn materialized_artifact() -> GenerationArtifact {
        let mut artifact = GenerationArtifact::default();
        artifact.record_source("print('hi')".to_string());
        artifact.record_location(PathBuf::from("gen/parser.py"));
        artifact
    }

    #[test]
    fn first_decision_with_no_prior_artifact_is_generate() {
        let artifact = GenerationArtifact::default();
        assert_eq!(decide(&artifact, 0, 3), PlannerAction::GenerateCode);
    }

    #[test]
    fn execution_failure_routes_to_execution_repair_never_regeneration() {
        let mut artifact = materialized_artifact();
        artifact.record_execution_failure("Traceback".to_string());
        assert_eq!(decide(&artifact, 1, 3), PlannerAction::RepairExecution);
    }

    #[test]
    fn validation_failure_routes_to_logic_repair() {
        let mut artifact = materialized_artifact();
        artifact.record_validation_failure(ValidationFailure::MissingArtifact {
            path: PathBuf::from("output.csv"),
        });
        assert_eq!(decide(&artifact, 1, 3), PlannerAction::RepairLogic);
    }

    #[test]
    fn clean_evaluated_artifact_moves_on_to_tests() {
        let artifact = materialized_artifact();
        assert_eq!(decide(&artifact, 2, 3), PlannerAction::GenerateTests);
    }

    #[test]
    fn budget_exhaustion_terminates_before_anything_else() {
        let mut artifact = materialized_artifact();
        artifact.record_execution_failure("still broken".to_string());
        assert_eq!(decide(&artifact, 3, 3), PlannerAction::Terminate);
    }

    #[test]
    fn zero_budget_terminates_immediately() {
        let artifact = GenerationArtifact::default();
        assert_eq!(decide(&artifact, 0, 0), PlannerAction::Terminate);
    }
}
