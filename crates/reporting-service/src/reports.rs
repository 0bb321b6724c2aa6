//! Ticket report logic on top of a `CounterStore`.
//!
//! Maps events to counter mutations and counter reads to the summary body.
//! Holds no counter state of its own: every call round-trips to the store.

use std::future::Future;
use std::sync::Arc;
use std::time::Instant;

use reporting_core::error::Result;
use reporting_core::protocol::{
    TicketEvent, TicketSummary, UpdateOutcome, CLOSED_TICKETS_KEY, OPEN_TICKETS_KEY,
};

use crate::obs::ReportMetrics;
use crate::store::CounterStore;

#[derive(Clone)]
pub struct Reports {
    store: Arc<dyn CounterStore>,
    metrics: Arc<ReportMetrics>,
}

impl Reports {
    pub fn new(store: Arc<dyn CounterStore>, metrics: Arc<ReportMetrics>) -> Self {
        Self { store, metrics }
    }

    pub fn backend(&self) -> &'static str {
        self.store.backend()
    }

    /// Create both counters at zero if they do not exist yet.
    /// Existing values are never touched, so this runs on every boot.
    pub async fn init_counters(&self) -> Result<()> {
        for key in [OPEN_TICKETS_KEY, CLOSED_TICKETS_KEY] {
            let created = self.timed("setnx", self.store.set_if_absent(key, 0)).await?;
            tracing::info!(%key, created, "counter ready");
        }
        Ok(())
    }

    pub async fn summary(&self) -> Result<TicketSummary> {
        let counts = self
            .timed("mget", self.store.get_many(&[OPEN_TICKETS_KEY, CLOSED_TICKETS_KEY]))
            .await?;
        let open = counts.first().copied().flatten();
        let closed = counts.get(1).copied().flatten();
        Ok(TicketSummary::from_counts(open, closed))
    }

    pub async fn apply(&self, event: TicketEvent) -> Result<UpdateOutcome> {
        let outcome = match event {
            TicketEvent::Created => {
                let open = self.timed("incrby", self.store.incr_by(OPEN_TICKETS_KEY, 1)).await?;
                UpdateOutcome::opened(open)
            }
            TicketEvent::Closed => {
                let t = self
                    .timed("transfer", self.store.transfer(OPEN_TICKETS_KEY, CLOSED_TICKETS_KEY))
                    .await?;
                if t.floored {
                    self.metrics.open_floor_hits.inc(&[]);
                    tracing::warn!(
                        open = t.source,
                        closed = t.target,
                        "ticket_closed with no open tickets; open count not decremented"
                    );
                }
                UpdateOutcome::closed(t.target)
            }
        };
        self.metrics.events.inc(&[("event", event.as_str())]);
        Ok(outcome)
    }

    async fn timed<T, F>(&self, op: &'static str, fut: F) -> Result<T>
    where
        F: Future<Output = Result<T>>,
    {
        let started = Instant::now();
        let res = fut.await;
        self.metrics
            .store_op_duration
            .observe(&[("op", op), ("backend", self.backend())], started.elapsed());
        if let Err(e) = &res {
            self.metrics.store_errors.inc(&[("op", op)]);
            tracing::warn!(op, backend = self.backend(), error = %e, "store call failed");
        }
        res
    }
}
