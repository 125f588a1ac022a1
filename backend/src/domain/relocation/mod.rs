//! Relocation request model.
//!
//! A request moves one tagged asset between two locations. It records the
//! asset and locations as they were at submission, the approvers fixed at
//! submission, and everything each workflow step adds on the way to
//! `Completed` or `Denied`.

mod identity;
mod request;
mod status;
mod transport;

pub use identity::{RequestId, RequestNumber, RequestNumberError};
pub use request::{
    AdminProcessing, ApprovalRound, ApprovalStatus, Assignee, Denial, RelocationRequest,
    RelocationRequestDraft, RequestInvariantError, StageApproval, StatusChange,
};
pub use status::{ParseRequestStatusError, ParseTransportTypeError, RequestStatus, TransportType};
pub use transport::{
    DispatchDetails, DispatchStatus, ExternalTransport, ExternalTransportInput,
    InternalAssignment, InternalTransportInput, TransportAssignment, TransportDetails,
};
