//! Asset relocation workflow library modules.

pub mod config;
pub mod domain;
pub mod outbound;

pub use config::WorkflowSettings;
