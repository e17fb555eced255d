//! Verbatim propagation of a found signal and of the CEO verdict

use crate::helpers::*;
use council::core::PipelineState;
use council::workflow::keys;
use serde_json::json;

#[tokio::test]
async fn test_single_signal_reaches_every_executive_verbatim() {
    let store = seeded_store().await;
    let signals = json!([widget_signal()]);
    let behaviors = executive_behaviors(signals.clone(), "report");

    let (run, stub) = run_council(behaviors, store).await;
    assert!(run.is_success());

    // The record renders identically everywhere the key is referenced
    let rendered_signals = PipelineState::render_value(&signals);
    let seen = stub.seen_instructions();

    // cmo, cfo, ops, ceo, debate_logger, reporter all reference the signals
    for (unit, instruction) in full_roster().iter().zip(&seen).skip(1) {
        assert!(
            instruction.contains(&rendered_signals),
            "unit '{}' did not receive the signal record verbatim:\n{}",
            unit,
            instruction
        );
    }
}

#[tokio::test]
async fn test_ceo_verdict_propagates_unchanged_into_the_report() {
    let store = seeded_store().await;
    let behaviors = executive_behaviors(json!([widget_signal()]), "final report");

    let (run, stub) = run_council(behaviors, store).await;
    assert!(run.is_success());

    let verdict = json!({
        "verdict": "Proceed with the price-match",
        "status": "APPROVED"
    });
    assert_eq!(run.final_state.get(keys::CEO_DECISION_JSON), Some(&verdict));

    // The logger and the reporter both saw the verdict exactly as produced
    let rendered_verdict = PipelineState::render_value(&verdict);
    let seen = stub.seen_instructions();
    assert!(seen[5].contains(&rendered_verdict));
    assert!(seen[6].contains(&rendered_verdict));
}
