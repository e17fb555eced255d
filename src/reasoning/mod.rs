//! Reasoning units - the opaque decision-making calls
//!
//! A reasoning unit takes a rendered instruction and (optionally) a bound
//! store capability, and produces a payload. The production implementation
//! calls the Gemini API; tests substitute a deterministic scripted stub
//! implementing the same contract.

pub mod client;
pub mod response;

use async_trait::async_trait;
pub use client::{GeminiClient, ReasoningClientConfig};
pub use response::{ReasoningError, UnitPayload, UnitReply};

use crate::store::StoreCapability;

/// Trait for reasoning invocation - allows different implementations
///
/// The orchestrator treats this as a pure external function call; the same
/// instruction may yield different outputs, so nothing in the pipeline
/// assumes repeatability.
#[async_trait]
pub trait ReasoningUnit: Send + Sync {
    /// Invoke reasoning with a rendered instruction
    ///
    /// `store` is the capability the unit's spec binds it to, or `None` for
    /// units without store access.
    async fn invoke(
        &self,
        instruction: &str,
        store: Option<&StoreCapability>,
    ) -> Result<UnitReply, ReasoningError>;
}

#[async_trait]
impl<T: ReasoningUnit + ?Sized> ReasoningUnit for std::sync::Arc<T> {
    async fn invoke(
        &self,
        instruction: &str,
        store: Option<&StoreCapability>,
    ) -> Result<UnitReply, ReasoningError> {
        (**self).invoke(instruction, store).await
    }
}
