//! A failing log write halts the run before the reporter

use crate::helpers::*;
use council::core::{UnitOutcome, UnitStage};
use council::workflow::keys;
use serde_json::json;

#[tokio::test]
async fn test_logger_write_failure_halts_before_reporter() {
    let store = seeded_store().await;
    store.fail_writes(true);

    let behaviors = executive_behaviors(json!([widget_signal()]), "never rendered");
    let (run, stub) = run_council(behaviors, store.clone()).await;

    assert!(!run.is_success());

    // The reporter never ran
    assert_eq!(stub.invocations(), 6);
    assert_eq!(
        run.record.invoked_units(),
        vec!["data_finder", "cmo", "cfo", "ops", "ceo", "debate_logger"]
    );
    assert!(run.terminal_output.is_none());

    // The record shows the logger as the failed unit
    let logger = run.record.unit("debate_logger").expect("logger was invoked");
    assert!(matches!(
        logger.outcome,
        UnitOutcome::Failed {
            stage: UnitStage::Invoking,
            ..
        }
    ));

    // Nothing was written, and the executive outputs survive for diagnostics
    assert_eq!(store.mutation_count(), 0);
    assert!(run.final_state.contains(keys::CEO_DECISION_JSON));

    let failure = run.failure.expect("run must carry its failure");
    assert_eq!(failure.unit, "debate_logger");
}

/// A unit with no output key is still subject to the fail-stop contract
#[tokio::test]
async fn test_side_effect_unit_failure_is_not_exempt() {
    let store = seeded_store().await;
    let mut behaviors = executive_behaviors(json!([widget_signal()]), "never rendered");
    behaviors[5] = StubBehavior::Fail("insert rejected".to_string());

    let (run, _stub) = run_council(behaviors, store).await;

    assert!(!run.is_success());
    assert_eq!(run.failure.expect("failure").unit, "debate_logger");
}
