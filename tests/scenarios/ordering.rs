//! Invocation order and the fail-stop prefix property

use crate::helpers::*;
use council::core::{RunStatus, UnitStage};
use council::reasoning::UnitPayload;
use council::workflow::keys;

/// On success, every configured unit runs exactly once, in order
#[tokio::test]
async fn test_full_sequence_runs_in_order() {
    let store = seeded_store().await;
    let behaviors = executive_behaviors(widget_signal(), "## Executive Report\n\nAll good.");

    let (run, stub) = run_council(behaviors, store.clone()).await;

    assert!(run.is_success());
    assert_eq!(run.record.status, RunStatus::Completed);
    assert_eq!(run.record.invoked_units(), full_roster());
    assert_eq!(stub.invocations(), 7);

    // The logger's side effect landed exactly once
    assert_eq!(store.debates().await.len(), 1);

    // Terminal output is the reporter's payload
    assert_eq!(
        run.terminal_output,
        Some(UnitPayload::Text(
            "## Executive Report\n\nAll good.".to_string()
        ))
    );
}

/// The set of invoked units is exactly the prefix up to the first failure
#[tokio::test]
async fn test_failure_invokes_exact_prefix() {
    let store = seeded_store().await;
    let behaviors = vec![
        StubBehavior::Json(widget_signal()),
        StubBehavior::Text("Launch a defensive price-match campaign".to_string()),
        StubBehavior::Fail("reasoning service unreachable".to_string()),
    ];

    let (run, stub) = run_council(behaviors, store.clone()).await;

    assert!(!run.is_success());
    assert_eq!(run.record.status, RunStatus::Failed);
    assert_eq!(run.record.invoked_units(), vec!["data_finder", "cmo", "cfo"]);
    assert_eq!(stub.invocations(), 3);

    // Nothing downstream ran: no log write, no report
    assert_eq!(store.debates().await.len(), 0);
    assert!(run.terminal_output.is_none());

    // Prior writes survive for diagnostics; the failed unit wrote nothing
    assert!(run.final_state.contains(keys::UNDERCUT_SIGNALS));
    assert!(run.final_state.contains(keys::CMO_PROPOSAL));
    assert!(!run.final_state.contains(keys::CFO_REBUTTAL));

    let failure = run.failure.expect("run must carry its failure");
    assert_eq!(failure.unit, "cfo");
    assert_eq!(failure.stage, UnitStage::Invoking);
}

/// Each declared output key holds exactly the payload its unit produced
#[tokio::test]
async fn test_output_keys_hold_unit_payloads() {
    let store = seeded_store().await;
    let behaviors = executive_behaviors(widget_signal(), "report");

    let (run, _stub) = run_council(behaviors, store).await;

    assert!(run.is_success());
    assert_eq!(
        run.final_state.get(keys::UNDERCUT_SIGNALS),
        Some(&widget_signal())
    );
    assert_eq!(
        run.final_state.get(keys::CMO_PROPOSAL),
        Some(&serde_json::json!("Launch a defensive price-match campaign"))
    );
    assert_eq!(
        run.final_state.get(keys::CEO_DECISION_JSON),
        Some(&serde_json::json!({
            "verdict": "Proceed with the price-match",
            "status": "APPROVED"
        }))
    );
    // Five output keys, no more: logger and reporter write nothing
    assert_eq!(run.final_state.len(), 5);
}
