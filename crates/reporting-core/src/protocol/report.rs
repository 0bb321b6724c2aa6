//! Counter keys and response bodies.

use serde::Serialize;

/// Store key holding the open-ticket count.
pub const OPEN_TICKETS_KEY: &str = "tickets:open";
/// Store key holding the closed-ticket count.
pub const CLOSED_TICKETS_KEY: &str = "tickets:closed";

/// `GET /reports/summary` body.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct TicketSummary {
    pub open_tickets: i64,
    pub closed_tickets: i64,
    pub total_tickets: i64,
}

impl TicketSummary {
    /// Build a summary from raw counter reads. Missing counters count as zero.
    pub fn from_counts(open: Option<i64>, closed: Option<i64>) -> Self {
        let open_tickets = open.unwrap_or(0);
        let closed_tickets = closed.unwrap_or(0);
        Self {
            open_tickets,
            closed_tickets,
            total_tickets: open_tickets.saturating_add(closed_tickets),
        }
    }
}

/// `POST /reports/update` success body.
///
/// Serializes as `{"status":"success","open_tickets":n}` for created events
/// and `{"status":"success","closed_tickets":n}` for closed events.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum UpdateOutcome {
    Opened {
        status: &'static str,
        open_tickets: i64,
    },
    Closed {
        status: &'static str,
        closed_tickets: i64,
    },
}

impl UpdateOutcome {
    pub fn opened(open_tickets: i64) -> Self {
        UpdateOutcome::Opened {
            status: "success",
            open_tickets,
        }
    }

    pub fn closed(closed_tickets: i64) -> Self {
        UpdateOutcome::Closed {
            status: "success",
            closed_tickets,
        }
    }
}

/// Error body: `{"error": "..."}`.
#[derive(Debug, Clone, Serialize)]
pub struct ErrorBody {
    pub error: &'static str,
}
