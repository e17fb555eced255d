//! CLI output formatting

use crate::{
    core::{RunStatus, UnitSpec},
    execution::ExecutionEvent,
    store::DebateRecord,
};
use console::Emoji;

// Re-export style
pub use console::style;

// Emojis for output
pub static CHECK: Emoji<'_, '_> = Emoji("✅ ", "✓ ");
pub static CROSS: Emoji<'_, '_> = Emoji("❌ ", "✗ ");
pub static SPINNER: Emoji<'_, '_> = Emoji("⏳ ", "~ ");
pub static INFO: Emoji<'_, '_> = Emoji("ℹ️  ", "i ");
pub static WARN: Emoji<'_, '_> = Emoji("⚠️  ", "! ");
pub static ROCKET: Emoji<'_, '_> = Emoji("🚀 ", "> ");

/// Format a run status for display
pub fn format_status(status: RunStatus) -> String {
    match status {
        RunStatus::Running => style("RUNNING").yellow().to_string(),
        RunStatus::Completed => style("COMPLETED").green().to_string(),
        RunStatus::Failed => style("FAILED").red().to_string(),
    }
}

/// Format an execution event for display
pub fn format_execution_event(event: &ExecutionEvent) -> String {
    match event {
        ExecutionEvent::RunStarted { run_id, workflow } => format!(
            "{} Starting workflow {} ({})",
            ROCKET,
            style(workflow).bold(),
            style(&run_id.to_string()[..8]).dim()
        ),
        ExecutionEvent::UnitStarted { unit } => {
            format!("{} {}", SPINNER, style(unit).cyan())
        }
        ExecutionEvent::UnitSucceeded { unit, output_key } => match output_key {
            Some(key) => format!(
                "{} {} → {}",
                CHECK,
                style(unit).cyan(),
                style(key).dim()
            ),
            None => format!("{} {}", CHECK, style(unit).cyan()),
        },
        ExecutionEvent::UnitFailed { unit, stage, error } => format!(
            "{} {} failed while {}: {}",
            CROSS,
            style(unit).cyan(),
            stage,
            style(error).red()
        ),
        ExecutionEvent::RunCompleted { run_id, status } => format!(
            "{} Run {} {}",
            INFO,
            style(&run_id.to_string()[..8]).dim(),
            format_status(*status)
        ),
    }
}

/// Format one unit spec row for `validate` output
pub fn format_unit_spec(spec: &UnitSpec) -> String {
    let access = match spec.store_access {
        Some(mode) => mode.to_string(),
        None => "none".to_string(),
    };
    let output = spec.output_key.as_deref().unwrap_or("-");
    let inputs = if spec.template.required_keys().is_empty() {
        "-".to_string()
    } else {
        spec.template.required_keys().join(", ")
    };
    format!(
        "  {} store: {:13} writes: {:17} reads: {}",
        style(format!("{:14}", spec.name)).bold(),
        access,
        output,
        style(inputs).dim()
    )
}

/// Format one logged debate for `history` output
pub fn format_debate(debate: &DebateRecord) -> String {
    let status = debate
        .ceo_decision
        .get("status")
        .and_then(|v| v.as_str())
        .unwrap_or("?");
    let status_styled = match status {
        "APPROVED" => style(status).green(),
        "REJECTED" => style(status).red(),
        _ => style(status).yellow(),
    };
    format!(
        "{} {} - {} - {}",
        INFO,
        style(debate.decided_at.format("%Y-%m-%d %H:%M UTC")).dim(),
        status_styled,
        debate.cmo_proposal
    )
}
