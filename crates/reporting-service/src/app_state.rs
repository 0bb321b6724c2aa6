//! Shared application state for the reporting service.
//!
//! The store is optional: when the connection failed at boot the service
//! still serves HTTP, and report handlers answer 503.

use std::sync::Arc;

use reporting_core::error::{Result, ReportError};

use crate::config::ServiceConfig;
use crate::obs::ReportMetrics;
use crate::reports::Reports;
use crate::store::{self, CounterStore};

#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    cfg: ServiceConfig,
    reports: Option<Reports>,
    metrics: Arc<ReportMetrics>,
}

impl AppState {
    /// Build state around an already-connected store (or none).
    pub fn new(cfg: ServiceConfig, store: Option<Arc<dyn CounterStore>>) -> Self {
        let metrics = Arc::new(ReportMetrics::default());
        metrics.set_store_available(store.is_some());
        let reports = store.map(|s| Reports::new(s, Arc::clone(&metrics)));

        Self {
            inner: Arc::new(AppStateInner { cfg, reports, metrics }),
        }
    }

    /// Connect the configured store and initialize counters.
    ///
    /// Never fails: a store that cannot be reached or initialized is logged
    /// and the state is built without one.
    pub async fn bootstrap(cfg: ServiceConfig) -> Self {
        let store = match store::connect(&cfg.store).await {
            Ok(s) => {
                tracing::info!(
                    backend = s.backend(),
                    host = %cfg.store.host,
                    port = cfg.store.port,
                    "connected to counter store"
                );
                Some(s)
            }
            Err(e) => {
                tracing::error!(
                    host = %cfg.store.host,
                    port = cfg.store.port,
                    error = %e,
                    "could not connect to counter store; serving 503 for reports"
                );
                None
            }
        };

        let state = Self::new(cfg, store);

        if let Some(reports) = state.inner.reports.as_ref() {
            if let Err(e) = reports.init_counters().await {
                tracing::error!(error = %e, "counter initialization failed");
            }
        }

        state
    }

    pub fn cfg(&self) -> &ServiceConfig {
        &self.inner.cfg
    }

    pub fn metrics(&self) -> &Arc<ReportMetrics> {
        &self.inner.metrics
    }

    pub fn is_store_available(&self) -> bool {
        self.inner.reports.is_some()
    }

    /// Report logic, or `StoreUnavailable` when booted without a store.
    pub fn reports(&self) -> Result<&Reports> {
        self.inner
            .reports
            .as_ref()
            .ok_or_else(|| ReportError::StoreUnavailable("no store connection".into()))
    }
}
