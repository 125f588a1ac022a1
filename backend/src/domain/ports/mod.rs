//! Domain ports and supporting types for the hexagonal boundary.

mod macros;
pub(crate) use macros::define_port_error;

mod notification_sink;
mod relocation_command;
mod relocation_query;
mod relocation_request_repository;
mod transport_catalogue;

#[cfg(test)]
pub use notification_sink::MockNotificationSink;
pub use notification_sink::{FixtureNotificationSink, NotificationSink, NotificationSinkError};
#[cfg(test)]
pub use relocation_command::MockRelocationCommand;
pub use relocation_command::{
    ApplyActionRequest, FixtureRelocationCommand, RelocationCommand, TransitionOutcome,
    WorkflowCommand,
};
#[cfg(test)]
pub use relocation_query::MockRelocationQuery;
pub use relocation_query::{FixtureRelocationQuery, RelocationQuery};
#[cfg(test)]
pub use relocation_request_repository::MockRelocationRequestRepository;
pub use relocation_request_repository::{
    FixtureRelocationRequestRepository, RelocationRequestRepository,
    RelocationRequestRepositoryError, RequestListFilter,
};
#[cfg(test)]
pub use transport_catalogue::MockTransportCatalogue;
pub use transport_catalogue::{
    FixtureTransportCatalogue, TransportCatalogue, TransportCatalogueError,
};
