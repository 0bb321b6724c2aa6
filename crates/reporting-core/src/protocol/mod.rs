//! Report protocol modules.
//!
//! - `event`: the `POST /reports/update` request body and its event names.
//! - `report`: counter key names and the JSON bodies returned to clients.
//!
//! Parsing is panic-free: any malformed input is reported as `ReportError`.

pub mod event;
pub mod report;

pub use event::{parse_update_body, TicketEvent};
pub use report::{ErrorBody, TicketSummary, UpdateOutcome, CLOSED_TICKETS_KEY, OPEN_TICKETS_KEY};
