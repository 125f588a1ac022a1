//! In-process adapters backed by plain collections.
//!
//! They back the CLI and the behaviour tests. The repository honours the
//! same revision compare-and-swap contract a database adapter would.

mod notification_sink;
mod relocation_repository;
mod transport_catalogue;

pub use notification_sink::{RecordingNotificationSink, TracingNotificationSink};
pub use relocation_repository::InMemoryRelocationRepository;
pub use transport_catalogue::InMemoryTransportCatalogue;
