//! Mermaid rendering of the workflow state machine.
//!
//! Edges are derived from the same transition table the controller runs on
//! ([`Phase::fixed_successor`] and [`PlannerAction::target_phase`]), so the
//! diagram cannot drift from the implementation.

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};

use crate::core::phase::{Phase, PlannerAction};

/// Render the transition table as a Mermaid flowchart.
pub fn render_mermaid() -> String {
    let mut lines = vec!["flowchart TD".to_string()];
    for phase in Phase::ALL {
        if let Some(next) = phase.fixed_successor() {
            lines.push(format!("    {} --> {}", phase.as_str(), next.as_str()));
        }
    }
    for action in PlannerAction::ALL {
        lines.push(format!(
            "    {} -->|{}| {}",
            Phase::Planning.as_str(),
            action.as_str(),
            action.target_phase().as_str()
        ));
    }
    // Evaluation always reports back to planning.
    lines.push(format!(
        "    {} --> {}",
        Phase::Evaluating.as_str(),
        Phase::Planning.as_str()
    ));
    let mut out = lines.join("\n");
    out.push('\n');
    out
}

/// Write the workflow diagram to `path`.
pub fn write_diagram(path: &Path) -> Result<()> {
    fs::write(path, render_mermaid())
        .with_context(|| format!("write workflow diagram {}", path.display()))
}
