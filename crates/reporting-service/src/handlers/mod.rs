//! HTTP handlers for the report API.

pub mod reports;
