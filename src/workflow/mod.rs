//! The executive decision workflow
//!
//! Seven reasoning units in a fixed order: find undercutting signals, debate
//! them through the CMO/CFO/Ops/CEO chain, log the debate, and report. The
//! sequence is built once at process start and never changes at run time.

use crate::core::{InstructionTemplate, UnitSpec};
use crate::store::AccessMode;
use std::collections::HashSet;
use thiserror::Error;

/// State keys the units exchange
pub mod keys {
    pub const UNDERCUT_SIGNALS: &str = "undercut_signals";
    pub const CMO_PROPOSAL: &str = "cmo_proposal";
    pub const CFO_REBUTTAL: &str = "cfo_rebuttal";
    pub const OPS_INPUT: &str = "ops_input";
    pub const CEO_DECISION_JSON: &str = "ceo_decision_json";
}

/// Name of the workflow, used in run records
pub const WORKFLOW_NAME: &str = "executive-decision";

/// Wiring errors caught before any run starts
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum WorkflowError {
    /// A unit's instruction references a key no earlier unit produces
    #[error("unit '{unit}' references key '{key}' which no earlier unit produces")]
    UnboundKey { unit: String, key: String },

    /// Two units share a name
    #[error("duplicate unit name '{unit}'")]
    DuplicateUnit { unit: String },
}

/// Build the executive council unit sequence
pub fn executive_council() -> Vec<UnitSpec> {
    let data_finder = UnitSpec::new(
        "data_finder",
        InstructionTemplate::new(
            "You are a retail pricing analyst. Use the find_undercut_signals tool to \
             identify products where a competitor's detected price is lower than our \
             cost price.\n\
             Respond with a JSON list only. Each entry must carry exactly these keys: \
             product_id, name, cost_price, competitor_name, detected_price.\n\
             If no such products exist, respond with an empty JSON list: [].",
        ),
    )
    .with_store_access(AccessMode::ReadOnly)
    .with_output_key(keys::UNDERCUT_SIGNALS);

    let cmo = UnitSpec::new(
        "cmo",
        InstructionTemplate::new(
            "You are the Chief Marketing Officer. The following competitor undercutting \
             signals were detected: {{ undercut_signals }}.\n\
             Propose a concise, high-level marketing counter-strategy (for example, a \
             defensive price-match campaign). Respond with the strategy text only.",
        ),
    )
    .with_output_key(keys::CMO_PROPOSAL);

    let cfo = UnitSpec::new(
        "cfo",
        InstructionTemplate::new(
            "You are the Chief Financial Officer. The competitor undercutting signals \
             are: {{ undercut_signals }}.\n\
             The CMO proposes: {{ cmo_proposal }}.\n\
             Respond with a concise financial decision focused on profitability and \
             budget allocation (for example, approving a temporary margin reduction or \
             sourcing a cheaper supplier).",
        ),
    )
    .with_output_key(keys::CFO_REBUTTAL);

    let ops = UnitSpec::new(
        "ops",
        InstructionTemplate::new(
            "You are the Operations lead. The competitor undercutting signals are: \
             {{ undercut_signals }}.\n\
             The CMO proposes: {{ cmo_proposal }}. The CFO proposes: {{ cfo_rebuttal }}.\n\
             Use the check_stock tool for any product involved, then respond with a \
             concise operational assessment covering feasibility, stock readiness, and \
             potential delays.",
        ),
    )
    .with_store_access(AccessMode::ReadOnly)
    .with_output_key(keys::OPS_INPUT);

    let ceo = UnitSpec::new(
        "ceo",
        InstructionTemplate::new(
            "You are the Chief Executive Officer. Review the inputs:\n\
             1. Undercut signals: {{ undercut_signals }}\n\
             2. CMO proposal: {{ cmo_proposal }}\n\
             3. CFO rebuttal: {{ cfo_rebuttal }}\n\
             4. Ops input: {{ ops_input }}\n\
             Synthesize these into a single final verdict and a status of APPROVED, \
             DEFERRED, or REJECTED.\n\
             Respond with a JSON object carrying exactly two keys: \"verdict\" and \
             \"status\". No other text.",
        ),
    )
    .with_output_key(keys::CEO_DECISION_JSON);

    let debate_logger = UnitSpec::new(
        "debate_logger",
        InstructionTemplate::new(
            "Log the finished executive debate. The inputs are:\n\
             - Undercut signals: {{ undercut_signals }}\n\
             - CMO proposal: {{ cmo_proposal }}\n\
             - CFO rebuttal: {{ cfo_rebuttal }}\n\
             - Ops input: {{ ops_input }}\n\
             - CEO decision (JSON): {{ ceo_decision_json }}\n\
             Call the log_debate tool exactly once with these fields. Perform the \
             insert only; do not produce a report or any other text.",
        ),
    )
    .with_store_access(AccessMode::ReadWrite);

    let reporter = UnitSpec::new(
        "reporter",
        InstructionTemplate::new(
            "Write the final report of the executive workflow as clean markdown. \
             Start with the list of undercut products, then each proposal in turn.\n\
             - Undercut products: {{ undercut_signals }}\n\
             - CMO proposal: {{ cmo_proposal }}\n\
             - CFO rebuttal: {{ cfo_rebuttal }}\n\
             - Ops input: {{ ops_input }}\n\
             - CEO final decision: {{ ceo_decision_json }}\n\
             If the signal list is empty, state explicitly that no undercutting \
             signals were found and keep the rest of the report brief.",
        ),
    );

    vec![data_finder, cmo, cfo, ops, ceo, debate_logger, reporter]
}

/// Validate workflow wiring before any run
///
/// Every key a unit's instruction references must be the declared output of
/// a strictly earlier unit, so missing-key failures are impossible at run
/// time for a correctly seeded (here: empty) initial state.
pub fn validate_sequence(units: &[UnitSpec]) -> Result<(), WorkflowError> {
    let mut names: HashSet<&str> = HashSet::new();
    let mut available: HashSet<&str> = HashSet::new();

    for spec in units {
        if !names.insert(spec.name.as_str()) {
            return Err(WorkflowError::DuplicateUnit {
                unit: spec.name.clone(),
            });
        }
        for key in spec.template.required_keys() {
            if !available.contains(key.as_str()) {
                return Err(WorkflowError::UnboundKey {
                    unit: spec.name.clone(),
                    key: key.clone(),
                });
            }
        }
        if let Some(key) = &spec.output_key {
            available.insert(key.as_str());
        }
    }

    Ok(())
}
