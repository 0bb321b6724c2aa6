//! Ticket lifecycle events accepted by the update endpoint.
//!
//! Body shape: `{"event": "ticket_created" | "ticket_closed"}`. Extra fields
//! are ignored; only `event` is looked at.

use std::fmt;
use std::str::FromStr;

use serde_json::Value;

use crate::error::{Result, ReportError};

/// Event name sent by the ticket service.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TicketEvent {
    /// A ticket was opened: open count +1.
    Created,
    /// A ticket was closed: open count -1, closed count +1.
    Closed,
}

impl TicketEvent {
    pub fn as_str(self) -> &'static str {
        match self {
            TicketEvent::Created => "ticket_created",
            TicketEvent::Closed => "ticket_closed",
        }
    }
}

impl fmt::Display for TicketEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TicketEvent {
    type Err = ReportError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "ticket_created" => Ok(TicketEvent::Created),
            "ticket_closed" => Ok(TicketEvent::Closed),
            _ => Err(ReportError::InvalidEvent),
        }
    }
}

/// Parse a raw update body.
///
/// Not JSON, or JSON that is not an object, is `MalformedBody`.
/// A missing, null, non-string or unknown `event` is `InvalidEvent`.
pub fn parse_update_body(raw: &[u8]) -> Result<TicketEvent> {
    let v: Value = serde_json::from_slice(raw)
        .map_err(|e| ReportError::MalformedBody(format!("invalid json: {e}")))?;

    let obj = v
        .as_object()
        .ok_or_else(|| ReportError::MalformedBody("body must be a json object".into()))?;

    obj.get("event")
        .and_then(Value::as_str)
        .ok_or(ReportError::InvalidEvent)?
        .parse()
}
