//! Counter store abstraction.
//!
//! Handlers never talk to Redis directly: they go through `CounterStore`,
//! which exposes the few atomic integer primitives the reports need. Each
//! primitive must be atomic on its own; no application lock is taken.

pub mod memory;
pub mod redis;

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;

use reporting_core::error::Result;

use crate::config::{StoreBackend, StoreSection};

pub use memory::MemoryStore;
pub use self::redis::RedisStore;

/// Result of an atomic `transfer`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Transfer {
    /// Source counter after the decrement.
    pub source: i64,
    /// Target counter after the increment.
    pub target: i64,
    /// True when the source was already at zero and was left there.
    pub floored: bool,
}

#[async_trait]
pub trait CounterStore: Send + Sync {
    /// Backend name for logs and metrics labels.
    fn backend(&self) -> &'static str;

    async fn ping(&self) -> Result<()>;

    /// Create `key` with `value` unless it already exists. Returns true when created.
    async fn set_if_absent(&self, key: &str, value: i64) -> Result<bool>;

    /// Read several counters in one round-trip. Missing keys are `None`.
    async fn get_many(&self, keys: &[&str]) -> Result<Vec<Option<i64>>>;

    /// Add `delta` to `key` (missing counts as 0) and return the new value.
    async fn incr_by(&self, key: &str, delta: i64) -> Result<i64>;

    /// Atomically decrement `from` (never below zero) and increment `to`.
    async fn transfer(&self, from: &str, to: &str) -> Result<Transfer>;
}

/// Open the configured backend and check it answers.
///
/// The caller decides what an error means; the service keeps running
/// without a store.
pub async fn connect(cfg: &StoreSection) -> Result<Arc<dyn CounterStore>> {
    let store: Arc<dyn CounterStore> = match cfg.backend {
        StoreBackend::Memory => Arc::new(MemoryStore::new()),
        StoreBackend::Redis => Arc::new(
            RedisStore::connect(
                &cfg.redis_url(),
                Duration::from_millis(cfg.connect_timeout_ms),
                Duration::from_millis(cfg.op_timeout_ms),
            )
            .await?,
        ),
    };
    store.ping().await?;
    Ok(store)
}
