//! Unit executor - runs a single reasoning unit against the current state

use crate::{
    core::{PipelineState, TemplateError, UnitSpec, UnitStage},
    reasoning::{ReasoningError, ReasoningUnit, UnitPayload},
    store::ToolAccessPolicy,
};
use thiserror::Error;
use tokio::time::{timeout, Duration};
use tracing::{debug, error, info};

/// What went wrong inside one unit
#[derive(Debug, Error)]
pub enum UnitError {
    #[error(transparent)]
    Template(#[from] TemplateError),

    #[error(transparent)]
    Reasoning(#[from] ReasoningError),
}

/// A unit failure with enough context to diagnose: which unit, at which
/// stage, and the underlying cause
#[derive(Debug, Error)]
#[error("unit '{unit}' failed while {stage}: {source}")]
pub struct UnitFailure {
    pub unit: String,
    pub stage: UnitStage,
    #[source]
    pub source: UnitError,
}

/// Executes a single unit: render, bind capability, invoke
///
/// The executor reads prior state but never writes it; the engine merges
/// the returned payload, which keeps the state transition testable on its
/// own.
pub struct UnitExecutor<R> {
    reasoner: R,
    policy: ToolAccessPolicy,
    timeout_secs: u64,
}

impl<R: ReasoningUnit> UnitExecutor<R> {
    pub fn new(reasoner: R, policy: ToolAccessPolicy, timeout_secs: u64) -> Self {
        Self {
            reasoner,
            policy,
            timeout_secs,
        }
    }

    /// Run one unit and return its payload
    pub async fn run(
        &self,
        spec: &UnitSpec,
        state: &PipelineState,
    ) -> Result<UnitPayload, UnitFailure> {
        info!("Executing unit: {}", spec.name);

        let instruction = spec.template.render(state).map_err(|e| UnitFailure {
            unit: spec.name.clone(),
            stage: UnitStage::Rendering,
            source: e.into(),
        })?;
        debug!("Rendered instruction for {}: {}", spec.name, instruction);

        let capability = spec.store_access.map(|mode| self.policy.bind(mode));

        let reply = match timeout(
            Duration::from_secs(self.timeout_secs),
            self.reasoner.invoke(&instruction, capability.as_ref()),
        )
        .await
        {
            Ok(Ok(reply)) => reply,
            Ok(Err(e)) => {
                error!("Unit {} failed while invoking: {}", spec.name, e);
                return Err(UnitFailure {
                    unit: spec.name.clone(),
                    stage: UnitStage::Invoking,
                    source: e.into(),
                });
            }
            Err(_) => {
                error!("Unit {} timed out after {}s", spec.name, self.timeout_secs);
                return Err(UnitFailure {
                    unit: spec.name.clone(),
                    stage: UnitStage::Invoking,
                    source: ReasoningError::Timeout(self.timeout_secs).into(),
                });
            }
        };

        Ok(reply.payload)
    }
}
