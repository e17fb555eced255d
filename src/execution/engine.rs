//! Sequential engine - orchestrates one full council run

use crate::{
    core::{ExecutionRecord, PipelineState, RunStatus, UnitSpec, UnitStage},
    execution::{UnitExecutor, UnitFailure},
    reasoning::{ReasoningUnit, UnitPayload},
    store::ToolAccessPolicy,
};
use tracing::{info, warn};
use uuid::Uuid;

/// Events emitted during a run
#[derive(Debug, Clone)]
pub enum ExecutionEvent {
    RunStarted {
        run_id: Uuid,
        workflow: String,
    },
    UnitStarted {
        unit: String,
    },
    UnitSucceeded {
        unit: String,
        output_key: Option<String>,
    },
    UnitFailed {
        unit: String,
        stage: UnitStage,
        error: String,
    },
    RunCompleted {
        run_id: Uuid,
        status: RunStatus,
    },
}

/// Type for event handlers
pub type EventHandler = Box<dyn Fn(&ExecutionEvent) + Send + Sync>;

/// Everything a run hands back to its caller
///
/// On failure the already-written state is preserved for diagnostics and
/// `terminal_output` is `None`; there is no rollback.
#[derive(Debug)]
pub struct PipelineRun {
    /// The shared state as the run left it
    pub final_state: PipelineState,

    /// Payload of the terminal unit, present only when every unit succeeded
    pub terminal_output: Option<UnitPayload>,

    /// Ordered per-unit log of the run
    pub record: ExecutionRecord,

    /// The failure that halted the run, if any
    pub failure: Option<UnitFailure>,
}

impl PipelineRun {
    pub fn is_success(&self) -> bool {
        self.failure.is_none()
    }
}

/// The sequential council engine
///
/// Holds the immutable unit sequence and executes it one unit at a time
/// against one shared state, halting on the first failure. The sequence and
/// policy are safely shared across concurrent runs; each run owns its own
/// state and record.
pub struct Council<R> {
    workflow: String,
    units: Vec<UnitSpec>,
    executor: UnitExecutor<R>,
    handlers: Vec<EventHandler>,
}

impl<R: ReasoningUnit> Council<R> {
    pub fn new(
        workflow: impl Into<String>,
        units: Vec<UnitSpec>,
        reasoner: R,
        policy: ToolAccessPolicy,
        timeout_secs: u64,
    ) -> Self {
        Self {
            workflow: workflow.into(),
            units,
            executor: UnitExecutor::new(reasoner, policy, timeout_secs),
            handlers: Vec::new(),
        }
    }

    /// Register an event handler
    pub fn add_event_handler<F>(&mut self, handler: F)
    where
        F: Fn(&ExecutionEvent) + Send + Sync + 'static,
    {
        self.handlers.push(Box::new(handler));
    }

    fn emit(&self, event: ExecutionEvent) {
        for handler in &self.handlers {
            handler(&event);
        }
    }

    /// The configured unit sequence
    pub fn units(&self) -> &[UnitSpec] {
        &self.units
    }

    /// Execute the full sequence against an initial state
    pub async fn execute(&self, initial_state: PipelineState) -> PipelineRun {
        let mut state = initial_state;
        let mut record = ExecutionRecord::new(&self.workflow);
        let run_id = record.run_id;

        info!("Starting council run: {} ({})", self.workflow, run_id);
        self.emit(ExecutionEvent::RunStarted {
            run_id,
            workflow: self.workflow.clone(),
        });

        let mut last_output: Option<UnitPayload> = None;

        for spec in &self.units {
            self.emit(ExecutionEvent::UnitStarted {
                unit: spec.name.clone(),
            });

            match self.executor.run(spec, &state).await {
                Ok(payload) => {
                    if let Some(key) = &spec.output_key {
                        state.set(key.clone(), payload.to_value());
                    }
                    record.push_success(spec);
                    self.emit(ExecutionEvent::UnitSucceeded {
                        unit: spec.name.clone(),
                        output_key: spec.output_key.clone(),
                    });
                    last_output = Some(payload);
                }
                Err(failure) => {
                    warn!("Halting run {}: {}", run_id, failure);
                    record.push_failure(spec, failure.stage, failure.source.to_string());
                    record.fail();
                    self.emit(ExecutionEvent::UnitFailed {
                        unit: failure.unit.clone(),
                        stage: failure.stage,
                        error: failure.source.to_string(),
                    });
                    self.emit(ExecutionEvent::RunCompleted {
                        run_id,
                        status: RunStatus::Failed,
                    });
                    return PipelineRun {
                        final_state: state,
                        terminal_output: None,
                        record,
                        failure: Some(failure),
                    };
                }
            }
        }

        record.complete();
        info!("Council run finished: {} ({})", self.workflow, run_id);
        self.emit(ExecutionEvent::RunCompleted {
            run_id,
            status: RunStatus::Completed,
        });

        PipelineRun {
            final_state: state,
            terminal_output: last_output,
            record,
            failure: None,
        }
    }
}
