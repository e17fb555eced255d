//! Empty result flow: no qualifying signals is a valid input, not an error

use crate::helpers::*;
use council::workflow::keys;
use serde_json::json;

#[tokio::test]
async fn test_empty_signal_list_flows_to_every_unit() {
    let store = seeded_store().await;
    let report = "## Executive Report\n\nNo undercutting signals were found. No action required.";
    let behaviors = executive_behaviors(json!([]), report);

    let (run, stub) = run_council(behaviors, store).await;

    assert!(run.is_success(), "empty input must not fail: {:?}", run.failure);
    assert_eq!(run.final_state.get(keys::UNDERCUT_SIGNALS), Some(&json!([])));

    // Every downstream executive received the empty list, not a missing key
    let seen = stub.seen_instructions();
    assert_eq!(seen.len(), 7);
    for instruction in &seen[1..6] {
        assert!(
            instruction.contains("[]"),
            "expected the empty list rendered into: {}",
            instruction
        );
    }

    // The terminal report says so explicitly
    let rendered = run.terminal_output.expect("run succeeded").render();
    assert!(rendered.contains("No undercutting signals"));
}
