//! Structural determinism: a fixed stub yields identical state and record shape

use crate::helpers::*;
use serde_json::json;

#[tokio::test]
async fn test_identical_runs_have_identical_shape() {
    let signals = json!([widget_signal()]);

    let store_a = seeded_store().await;
    let (run_a, _) = run_council(executive_behaviors(signals.clone(), "report"), store_a).await;

    let store_b = seeded_store().await;
    let (run_b, _) = run_council(executive_behaviors(signals, "report"), store_b).await;

    assert!(run_a.is_success());
    assert!(run_b.is_success());

    // Same final state, same terminal output
    assert_eq!(run_a.final_state, run_b.final_state);
    assert_eq!(run_a.terminal_output, run_b.terminal_output);

    // Same record shape: unit entries match exactly; only identity differs
    assert_eq!(run_a.record.units, run_b.record.units);
    assert_eq!(run_a.record.status, run_b.record.status);
    assert_ne!(run_a.record.run_id, run_b.record.run_id);
}
