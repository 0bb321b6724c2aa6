//! Ticket reporting service library entry.
//!
//! Wires the config loader, counter store backends, report logic and HTTP
//! handlers into one axum app. Consumed by the binary (`main.rs`) and by
//! integration tests, which drive the router against `MemoryStore`.

pub mod app_state;
pub mod config;
pub mod error;
pub mod handlers;
pub mod obs;
pub mod ops;
pub mod reports;
pub mod router;
pub mod store;
