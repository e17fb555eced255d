//! Retail store access - the two-mode capability boundary
//!
//! Units never hold the store directly. They are handed a [`StoreCapability`]
//! bound to a mode; mutation through a read-only binding fails inside the
//! capability itself, not by caller convention. That gate is the only safety
//! boundary between an LLM-driven unit and an unintended write.

#[cfg(feature = "sqlite")]
pub mod sqlite;

#[cfg(feature = "sqlite")]
pub use sqlite::SqliteRetailStore;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;
use thiserror::Error;
use tracing::warn;

/// Error types for store operations
#[derive(Debug, Clone, Error)]
pub enum StoreError {
    /// A mutation was attempted through a read-only capability
    #[error("mutation '{operation}' denied: capability is read-only")]
    PermissionDenied { operation: String },

    /// The underlying store is unreachable or rejected the operation
    #[error("store error: {0}")]
    Unavailable(String),
}

/// Access mode a capability is bound to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum AccessMode {
    /// Query operations only
    ReadOnly,
    /// Query and mutation operations
    ReadWrite,
}

impl AccessMode {
    pub fn allows_write(&self) -> bool {
        matches!(self, AccessMode::ReadWrite)
    }
}

impl std::fmt::Display for AccessMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AccessMode::ReadOnly => write!(f, "read-only"),
            AccessMode::ReadWrite => write!(f, "write-enabled"),
        }
    }
}

/// A product we sell
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Product {
    pub product_id: String,
    pub name: String,
    pub cost_price: f64,
    pub current_stock: i64,
}

/// A competitor price observation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MarketSignal {
    pub product_id: String,
    pub competitor_name: String,
    pub detected_price: f64,
}

/// A product being undercut: the join of a product with the signal beating it
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UndercutSignal {
    pub product_id: String,
    pub name: String,
    pub cost_price: f64,
    pub competitor_name: String,
    pub detected_price: f64,
}

/// One logged executive debate, as written to `council_debates`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DebateRecord {
    pub undercut_signals: Value,
    pub cmo_proposal: String,
    pub cfo_rebuttal: String,
    pub ops_input: String,
    pub ceo_decision: Value,
    pub decided_at: DateTime<Utc>,
}

/// The tabular retail store, as the pipeline sees it
///
/// Query operations and the one mutation are separate methods so the
/// capability layer can gate them; no query language crosses this boundary.
#[async_trait::async_trait]
pub trait RetailStore: Send + Sync {
    /// Products whose cost price is undercut by a competitor's detected price
    async fn undercut_signals(&self) -> Result<Vec<UndercutSignal>, StoreError>;

    /// Current stock for a product, if known
    async fn stock_level(&self, product_id: &str) -> Result<Option<i64>, StoreError>;

    /// Most recent logged debates, newest first
    async fn recent_debates(&self, limit: usize) -> Result<Vec<DebateRecord>, StoreError>;

    /// Append a debate to the log (mutation)
    async fn log_debate(&self, record: &DebateRecord) -> Result<(), StoreError>;
}

/// Factory for mode-bound store capabilities
///
/// Bindings are cheap handle clones; independent capabilities over the same
/// store coexist without interference.
#[derive(Clone)]
pub struct ToolAccessPolicy {
    store: Arc<dyn RetailStore>,
}

impl ToolAccessPolicy {
    pub fn new(store: Arc<dyn RetailStore>) -> Self {
        Self { store }
    }

    /// Bind a capability at the given mode
    pub fn bind(&self, mode: AccessMode) -> StoreCapability {
        StoreCapability {
            store: Arc::clone(&self.store),
            mode,
        }
    }
}

/// A mode-gated handle to the retail store
#[derive(Clone)]
pub struct StoreCapability {
    store: Arc<dyn RetailStore>,
    mode: AccessMode,
}

impl StoreCapability {
    pub fn mode(&self) -> AccessMode {
        self.mode
    }

    pub async fn undercut_signals(&self) -> Result<Vec<UndercutSignal>, StoreError> {
        self.store.undercut_signals().await
    }

    pub async fn stock_level(&self, product_id: &str) -> Result<Option<i64>, StoreError> {
        self.store.stock_level(product_id).await
    }

    pub async fn recent_debates(&self, limit: usize) -> Result<Vec<DebateRecord>, StoreError> {
        self.store.recent_debates(limit).await
    }

    /// Append a debate to the log
    ///
    /// Denied before reaching the store when the binding is read-only,
    /// whatever the caller's instruction said.
    pub async fn log_debate(&self, record: &DebateRecord) -> Result<(), StoreError> {
        if !self.mode.allows_write() {
            warn!("denied log_debate through read-only capability");
            return Err(StoreError::PermissionDenied {
                operation: "log_debate".to_string(),
            });
        }
        self.store.log_debate(record).await
    }
}

/// In-memory retail store for tests and offline demo runs
pub struct MemoryRetailStore {
    products: tokio::sync::RwLock<Vec<Product>>,
    signals: tokio::sync::RwLock<Vec<MarketSignal>>,
    debates: tokio::sync::RwLock<Vec<DebateRecord>>,
    mutations: AtomicUsize,
    fail_writes: AtomicBool,
}

impl MemoryRetailStore {
    pub fn new() -> Self {
        Self {
            products: tokio::sync::RwLock::new(Vec::new()),
            signals: tokio::sync::RwLock::new(Vec::new()),
            debates: tokio::sync::RwLock::new(Vec::new()),
            mutations: AtomicUsize::new(0),
            fail_writes: AtomicBool::new(false),
        }
    }

    /// Seed the products table
    pub async fn seed_products(&self, products: Vec<Product>) {
        self.products.write().await.extend(products);
    }

    /// Seed the market signals table
    pub async fn seed_signals(&self, signals: Vec<MarketSignal>) {
        self.signals.write().await.extend(signals);
    }

    /// Snapshot of logged debates, oldest first
    pub async fn debates(&self) -> Vec<DebateRecord> {
        self.debates.read().await.clone()
    }

    /// How many mutations reached the store
    pub fn mutation_count(&self) -> usize {
        self.mutations.load(Ordering::SeqCst)
    }

    /// Make every subsequent write fail, simulating a store outage
    pub fn fail_writes(&self, fail: bool) {
        self.fail_writes.store(fail, Ordering::SeqCst);
    }
}

impl Default for MemoryRetailStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait::async_trait]
impl RetailStore for MemoryRetailStore {
    async fn undercut_signals(&self) -> Result<Vec<UndercutSignal>, StoreError> {
        let products = self.products.read().await;
        let signals = self.signals.read().await;

        let mut found = Vec::new();
        for signal in signals.iter() {
            if let Some(product) = products.iter().find(|p| p.product_id == signal.product_id) {
                if signal.detected_price < product.cost_price {
                    found.push(UndercutSignal {
                        product_id: product.product_id.clone(),
                        name: product.name.clone(),
                        cost_price: product.cost_price,
                        competitor_name: signal.competitor_name.clone(),
                        detected_price: signal.detected_price,
                    });
                }
            }
        }
        Ok(found)
    }

    async fn stock_level(&self, product_id: &str) -> Result<Option<i64>, StoreError> {
        let products = self.products.read().await;
        Ok(products
            .iter()
            .find(|p| p.product_id == product_id)
            .map(|p| p.current_stock))
    }

    async fn recent_debates(&self, limit: usize) -> Result<Vec<DebateRecord>, StoreError> {
        let debates = self.debates.read().await;
        Ok(debates.iter().rev().take(limit).cloned().collect())
    }

    async fn log_debate(&self, record: &DebateRecord) -> Result<(), StoreError> {
        if self.fail_writes.load(Ordering::SeqCst) {
            return Err(StoreError::Unavailable(
                "simulated write outage".to_string(),
            ));
        }
        self.debates.write().await.push(record.clone());
        self.mutations.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}
