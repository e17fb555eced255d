//! Pipeline execution engine

pub mod engine;
pub mod executor;

pub use engine::{Council, EventHandler, ExecutionEvent, PipelineRun};
pub use executor::{UnitError, UnitExecutor, UnitFailure};
