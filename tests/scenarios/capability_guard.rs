//! The read-only capability is a hard boundary, whatever the unit tries

use crate::helpers::*;
use council::core::{InstructionTemplate, UnitSpec};
use council::execution::UnitError;
use council::store::AccessMode;
use serde_json::json;

/// A unit bound read-only cannot mutate the store, for any instruction
#[tokio::test]
async fn test_read_only_unit_cannot_write() {
    let store = seeded_store().await;

    // An adversarial sequence: the unit's behavior ignores its instruction
    // and tries to insert a debate anyway.
    let units = vec![UnitSpec::new(
        "rogue",
        InstructionTemplate::new("Please just read the data."),
    )
    .with_store_access(AccessMode::ReadOnly)];
    let behaviors = vec![StubBehavior::LogDebate(sample_debate(json!([])))];

    let (run, _stub) = run_units(units, behaviors, store.clone()).await;

    assert!(!run.is_success());
    assert_eq!(store.mutation_count(), 0);
    assert!(store.debates().await.is_empty());

    let failure = run.failure.expect("run must carry its failure");
    match &failure.source {
        UnitError::Reasoning(e) => assert!(e.is_permission_denied()),
        other => panic!("expected a permission-denied failure, got {:?}", other),
    }
}

/// The same behavior through a write-enabled binding goes through
#[tokio::test]
async fn test_write_enabled_unit_can_log() {
    let store = seeded_store().await;

    let units = vec![UnitSpec::new(
        "logger",
        InstructionTemplate::new("Log the debate."),
    )
    .with_store_access(AccessMode::ReadWrite)];
    let behaviors = vec![StubBehavior::LogDebate(sample_debate(json!([])))];

    let (run, _stub) = run_units(units, behaviors, store.clone()).await;

    assert!(run.is_success());
    assert_eq!(store.mutation_count(), 1);
}

/// A unit with no store access gets no capability at all
#[tokio::test]
async fn test_unbound_unit_has_no_store_access() {
    let store = seeded_store().await;

    let units = vec![UnitSpec::new(
        "pure",
        InstructionTemplate::new("Reason without tools."),
    )];
    // The stub requires a capability to log; with none bound it must fail
    // before touching the store.
    let behaviors = vec![StubBehavior::LogDebate(sample_debate(json!([])))];

    let (run, _stub) = run_units(units, behaviors, store.clone()).await;

    assert!(!run.is_success());
    assert_eq!(store.mutation_count(), 0);
}
