use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::Mutex;

use reporting_core::error::Result;

use super::{CounterStore, Transfer};

/// In-process counter store for tests and local runs.
///
/// One mutex guards the whole map, so every primitive (including the
/// two-key `transfer`) is atomic with respect to the others.
#[derive(Debug, Default)]
pub struct MemoryStore {
    counters: Mutex<HashMap<String, i64>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Overwrite a counter.
    pub async fn set(&self, key: impl Into<String>, value: i64) {
        self.counters.lock().await.insert(key.into(), value);
    }

    pub async fn value(&self, key: &str) -> Option<i64> {
        self.counters.lock().await.get(key).copied()
    }
}

#[async_trait]
impl CounterStore for MemoryStore {
    fn backend(&self) -> &'static str {
        "memory"
    }

    async fn ping(&self) -> Result<()> {
        Ok(())
    }

    async fn set_if_absent(&self, key: &str, value: i64) -> Result<bool> {
        let mut counters = self.counters.lock().await;
        if counters.contains_key(key) {
            return Ok(false);
        }
        counters.insert(key.to_string(), value);
        Ok(true)
    }

    async fn get_many(&self, keys: &[&str]) -> Result<Vec<Option<i64>>> {
        let counters = self.counters.lock().await;
        Ok(keys.iter().map(|k| counters.get(*k).copied()).collect())
    }

    async fn incr_by(&self, key: &str, delta: i64) -> Result<i64> {
        let mut counters = self.counters.lock().await;
        let v = counters.entry(key.to_string()).or_insert(0);
        *v += delta;
        Ok(*v)
    }

    async fn transfer(&self, from: &str, to: &str) -> Result<Transfer> {
        let mut counters = self.counters.lock().await;

        let source = counters.entry(from.to_string()).or_insert(0);
        let floored = *source <= 0;
        if !floored {
            *source -= 1;
        }
        let source = *source;

        let target = counters.entry(to.to_string()).or_insert(0);
        *target += 1;

        Ok(Transfer {
            source,
            target: *target,
            floored,
        })
    }
}
