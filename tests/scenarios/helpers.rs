//! Test utilities: deterministic reasoning stub, seeded stores, run helpers

use async_trait::async_trait;
use chrono::Utc;
use council::core::{PipelineState, UnitSpec};
use council::execution::PipelineRun;
use council::reasoning::{ReasoningError, ReasoningUnit, UnitReply};
use council::store::{
    DebateRecord, MarketSignal, MemoryRetailStore, Product, StoreCapability, ToolAccessPolicy,
};
use council::workflow::{self, WORKFLOW_NAME};
use council::Council;
use serde_json::{json, Value};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

/// One scripted behavior per expected invocation, consumed in order
pub enum StubBehavior {
    /// Reply with a text payload
    Text(String),
    /// Reply with a structured payload
    Json(Value),
    /// Fail the invocation with an API error
    Fail(String),
    /// Write the given debate through the bound capability, then reply empty
    LogDebate(DebateRecord),
}

/// Deterministic reasoning stub implementing the production contract
///
/// Records every rendered instruction it receives so tests can assert on
/// what each unit actually saw.
pub struct ScriptedUnit {
    behaviors: Vec<StubBehavior>,
    index: AtomicUsize,
    instructions: Mutex<Vec<String>>,
}

impl ScriptedUnit {
    pub fn new(behaviors: Vec<StubBehavior>) -> Self {
        Self {
            behaviors,
            index: AtomicUsize::new(0),
            instructions: Mutex::new(Vec::new()),
        }
    }

    /// Instructions seen so far, in invocation order
    pub fn seen_instructions(&self) -> Vec<String> {
        self.instructions.lock().unwrap().clone()
    }

    /// How many invocations happened
    pub fn invocations(&self) -> usize {
        self.index.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl ReasoningUnit for ScriptedUnit {
    async fn invoke(
        &self,
        instruction: &str,
        store: Option<&StoreCapability>,
    ) -> Result<UnitReply, ReasoningError> {
        self.instructions
            .lock()
            .unwrap()
            .push(instruction.to_string());

        let idx = self.index.fetch_add(1, Ordering::SeqCst);
        match self.behaviors.get(idx) {
            None => Err(ReasoningError::Api(format!(
                "ScriptedUnit: no behavior for invocation {}",
                idx + 1
            ))),
            Some(StubBehavior::Text(s)) => Ok(UnitReply::text(s.clone())),
            Some(StubBehavior::Json(v)) => Ok(UnitReply::json(v.clone())),
            Some(StubBehavior::Fail(msg)) => Err(ReasoningError::Api(msg.clone())),
            Some(StubBehavior::LogDebate(record)) => {
                let cap = store.ok_or_else(|| {
                    ReasoningError::Malformed("stub asked to log without a capability".to_string())
                })?;
                cap.log_debate(record).await?;
                Ok(UnitReply::text(""))
            }
        }
    }
}

/// The single undercut record used across scenarios
pub fn widget_signal() -> Value {
    json!({
        "product_id": "P1",
        "name": "Widget",
        "cost_price": 10.0,
        "competitor_name": "Acme",
        "detected_price": 8.0
    })
}

/// A store seeded with the widget and the Acme signal beating it
pub async fn seeded_store() -> Arc<MemoryRetailStore> {
    let store = Arc::new(MemoryRetailStore::new());
    store
        .seed_products(vec![Product {
            product_id: "P1".to_string(),
            name: "Widget".to_string(),
            cost_price: 10.0,
            current_stock: 120,
        }])
        .await;
    store
        .seed_signals(vec![MarketSignal {
            product_id: "P1".to_string(),
            competitor_name: "Acme".to_string(),
            detected_price: 8.0,
        }])
        .await;
    store
}

/// A debate matching the scripted executive replies
pub fn sample_debate(signals: Value) -> DebateRecord {
    DebateRecord {
        undercut_signals: signals,
        cmo_proposal: "Launch a defensive price-match campaign".to_string(),
        cfo_rebuttal: "Approve a temporary 10% margin reduction budget".to_string(),
        ops_input: "Stock is sufficient for a four-week campaign".to_string(),
        ceo_decision: json!({"verdict": "Proceed with the price-match", "status": "APPROVED"}),
        decided_at: Utc::now(),
    }
}

/// Scripted replies for a full seven-unit run
pub fn executive_behaviors(signals: Value, report: &str) -> Vec<StubBehavior> {
    vec![
        StubBehavior::Json(signals.clone()),
        StubBehavior::Text("Launch a defensive price-match campaign".to_string()),
        StubBehavior::Text("Approve a temporary 10% margin reduction budget".to_string()),
        StubBehavior::Text("Stock is sufficient for a four-week campaign".to_string()),
        StubBehavior::Json(json!({
            "verdict": "Proceed with the price-match",
            "status": "APPROVED"
        })),
        StubBehavior::LogDebate(sample_debate(signals)),
        StubBehavior::Text(report.to_string()),
    ]
}

/// Run an arbitrary unit sequence with a scripted stub
pub async fn run_units(
    units: Vec<UnitSpec>,
    behaviors: Vec<StubBehavior>,
    store: Arc<MemoryRetailStore>,
) -> (PipelineRun, Arc<ScriptedUnit>) {
    let stub = Arc::new(ScriptedUnit::new(behaviors));
    let policy = ToolAccessPolicy::new(store);
    let council = Council::new(WORKFLOW_NAME, units, stub.clone(), policy, 30);
    let run = council.execute(PipelineState::new()).await;
    (run, stub)
}

/// Run the full executive council with a scripted stub
pub async fn run_council(
    behaviors: Vec<StubBehavior>,
    store: Arc<MemoryRetailStore>,
) -> (PipelineRun, Arc<ScriptedUnit>) {
    run_units(workflow::executive_council(), behaviors, store).await
}

/// All seven unit names in configured order
pub fn full_roster() -> Vec<&'static str> {
    vec![
        "data_finder",
        "cmo",
        "cfo",
        "ops",
        "ceo",
        "debate_logger",
        "reporter",
    ]
}
