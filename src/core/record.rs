//! Execution record - the per-run observability log

use crate::core::unit::{UnitSpec, UnitStage};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Overall status of one pipeline run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RunStatus {
    /// Run is in progress
    Running,
    /// Every unit succeeded
    Completed,
    /// A unit failed and the run halted
    Failed,
}

/// Outcome of a single unit invocation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum UnitOutcome {
    Succeeded,
    Failed { stage: UnitStage, error: String },
}

/// One entry per invoked unit, in invocation order
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UnitRecord {
    /// Unit name
    pub unit: String,

    /// State keys the unit's instruction consumed
    pub inputs: Vec<String>,

    /// State key the unit's payload was written under, if any
    pub output_key: Option<String>,

    /// How the invocation ended
    pub outcome: UnitOutcome,
}

/// Ordered log of one pipeline run
///
/// Created at run start, appended to by the executor per unit, and handed
/// back to the caller at run end. Units never touch it directly.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExecutionRecord {
    /// Unique run ID
    pub run_id: Uuid,

    /// Workflow name
    pub workflow: String,

    /// Current run status
    pub status: RunStatus,

    /// When the run started
    pub started_at: DateTime<Utc>,

    /// When the run completed or failed
    pub completed_at: Option<DateTime<Utc>>,

    /// Per-unit entries in invocation order
    pub units: Vec<UnitRecord>,
}

impl ExecutionRecord {
    /// Create a record for a run that is starting now
    pub fn new(workflow: impl Into<String>) -> Self {
        Self {
            run_id: Uuid::new_v4(),
            workflow: workflow.into(),
            status: RunStatus::Running,
            started_at: Utc::now(),
            completed_at: None,
            units: Vec::new(),
        }
    }

    /// Append a successful unit invocation
    pub fn push_success(&mut self, spec: &UnitSpec) {
        self.units.push(UnitRecord {
            unit: spec.name.clone(),
            inputs: spec.template.required_keys().to_vec(),
            output_key: spec.output_key.clone(),
            outcome: UnitOutcome::Succeeded,
        });
    }

    /// Append a failed unit invocation
    pub fn push_failure(&mut self, spec: &UnitSpec, stage: UnitStage, error: impl Into<String>) {
        self.units.push(UnitRecord {
            unit: spec.name.clone(),
            inputs: spec.template.required_keys().to_vec(),
            output_key: spec.output_key.clone(),
            outcome: UnitOutcome::Failed {
                stage,
                error: error.into(),
            },
        });
    }

    /// Mark the run as completed
    pub fn complete(&mut self) {
        self.status = RunStatus::Completed;
        self.completed_at = Some(Utc::now());
    }

    /// Mark the run as failed
    pub fn fail(&mut self) {
        self.status = RunStatus::Failed;
        self.completed_at = Some(Utc::now());
    }

    /// Names of the units invoked, in order
    pub fn invoked_units(&self) -> Vec<&str> {
        self.units.iter().map(|u| u.unit.as_str()).collect()
    }

    /// Look up the record entry for a unit
    pub fn unit(&self, name: &str) -> Option<&UnitRecord> {
        self.units.iter().find(|u| u.unit == name)
    }
}
