//! council - an LLM-backed executive decision workflow
//!
//! A fixed sequence of reasoning units (data finder, CMO, CFO, Ops, CEO,
//! debate logger, reporter) collaborates on one pricing decision by reading
//! and writing a shared key-value state, gated against the retail store by
//! mode-bound capabilities.

pub mod cli;
pub mod core;
pub mod execution;
pub mod reasoning;
pub mod store;
pub mod workflow;

// Re-export commonly used types
pub use core::{
    CouncilConfig, ExecutionRecord, InstructionTemplate, PipelineState, RunStatus, TemplateError,
    UnitOutcome, UnitSpec, UnitStage,
};
pub use execution::{Council, ExecutionEvent, PipelineRun, UnitError, UnitFailure};
pub use reasoning::{
    GeminiClient, ReasoningClientConfig, ReasoningError, ReasoningUnit, UnitPayload, UnitReply,
};
pub use store::{
    AccessMode, DebateRecord, MemoryRetailStore, RetailStore, StoreCapability, StoreError,
    ToolAccessPolicy,
};
