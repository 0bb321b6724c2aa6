//! Top-level facade crate for the ticket reporting service.
//!
//! Re-exports the core contracts and the service library so users can depend on a single crate.

pub mod core {
    pub use reporting_core::*;
}

pub mod service {
    pub use reporting_service::*;
}
