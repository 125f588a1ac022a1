//! Outbound adapters implementing domain ports.
//!
//! - **memory**: in-process repository, transport catalogue and
//!   notification sinks
//! - **frappe**: ERP workflow vocabulary translation
//! - **seed**: JSON demo fixture that populates the memory adapters
//!
//! Adapters are thin translators between domain types and their
//! infrastructure representation. They contain no business logic.

pub mod frappe;
pub mod memory;
pub mod seed;
