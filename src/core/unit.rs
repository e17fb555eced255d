//! Unit specs - the static description of each reasoning unit

use crate::core::template::InstructionTemplate;
use crate::store::AccessMode;
use serde::{Deserialize, Serialize};

/// Static specification of a reasoning unit
///
/// Specs are built once at process start and shared read-only across runs.
/// The store access mode is part of the contract: a unit with no
/// `store_access` never receives a capability at all, and a read-only unit
/// can never be handed a write-enabled one.
#[derive(Debug, Clone)]
pub struct UnitSpec {
    /// Unique unit name within the workflow
    pub name: String,

    /// The instruction template rendered against prior state
    pub template: InstructionTemplate,

    /// Store capability mode this unit is bound to, if any
    pub store_access: Option<AccessMode>,

    /// State key the unit's payload is written under
    ///
    /// `None` marks a side-effect-only unit; downstream templates must not
    /// reference it.
    pub output_key: Option<String>,
}

impl UnitSpec {
    pub fn new(name: impl Into<String>, template: InstructionTemplate) -> Self {
        Self {
            name: name.into(),
            template,
            store_access: None,
            output_key: None,
        }
    }

    pub fn with_store_access(mut self, mode: AccessMode) -> Self {
        self.store_access = Some(mode);
        self
    }

    pub fn with_output_key(mut self, key: impl Into<String>) -> Self {
        self.output_key = Some(key.into());
        self
    }
}

/// Stage of a unit's lifecycle, used to locate failures
///
/// A unit moves `pending -> rendering -> invoking -> (succeeded | failed)`.
/// Rendering fails on a missing state key; invoking fails on a tool
/// permission or external-call error.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UnitStage {
    Rendering,
    Invoking,
}

impl std::fmt::Display for UnitStage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            UnitStage::Rendering => write!(f, "rendering"),
            UnitStage::Invoking => write!(f, "invoking"),
        }
    }
}
