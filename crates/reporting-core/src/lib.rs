//! Reporting core: transport-agnostic event protocol, response bodies, and error types.
//!
//! This crate defines the request/response contracts and error surface shared
//! by the reporting service and its tests. It carries no transport or runtime
//! dependencies so it can be reused by other services that emit ticket events.
//!
//! # Defensive guarantees
//! Panics, `unwrap`, and `expect` are compile-denied here
//! (`#![deny(clippy::panic, clippy::unwrap_used, clippy::expect_used)]`).
//! All fallible paths must surface as `ReportError`/`Result` so a bad request
//! body never takes the process down.

#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]
#![deny(clippy::panic)]

pub mod error;
pub mod protocol;

/// Shared result type.
pub use error::{ClientCode, ReportError, Result};
