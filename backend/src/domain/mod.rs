//! Domain primitives and aggregates.
//!
//! Purpose: model the asset relocation lifecycle independently of storage
//! and presentation. Pure rules live in [`workflow`], [`permissions`] and
//! [`dashboard`]; [`relocation_service`] wires them to the [`ports`].
//!
//! Public surface:
//! - Error (alias to `error::Error`) — error payload with a stable code.
//! - RelocationRequest (alias to `relocation::RelocationRequest`) — the
//!   request aggregate.
//! - User (alias to `user::User`) — acting user with role and scope.
//! - RelocationWorkflowService — driving port implementation.

pub mod catalogue;
pub mod dashboard;
pub mod error;
pub mod notification;
pub mod permissions;
pub mod ports;
pub mod relocation;
pub mod relocation_service;
pub mod user;
pub mod workflow;

#[cfg(test)]
pub(crate) mod test_fixtures;

pub use self::catalogue::{
    AssetCategory, AssetId, AssetSnapshot, CategoryId, InternalVehicle, Location, LocationId,
    Transporter, TransporterId, VehicleFeature, VehicleFeatureId, VehicleId, VehicleType,
    VehicleTypeId,
};
pub use self::dashboard::{
    DashboardConfig, DashboardQuery, DashboardRow, DashboardSummary, StatusFilter,
};
pub use self::error::{Error, ErrorCode, ErrorValidationError};
pub use self::notification::{NotificationKind, WorkflowNotification};
pub use self::relocation::{
    AdminProcessing, ApprovalRound, ApprovalStatus, Assignee, Denial, DispatchDetails, DispatchStatus,
    ExternalTransport, ExternalTransportInput, InternalAssignment, InternalTransportInput,
    RelocationRequest, RelocationRequestDraft, RequestId, RequestInvariantError, RequestNumber,
    RequestNumberError, RequestStatus, StageApproval, StatusChange, TransportAssignment,
    TransportDetails, TransportType,
};
pub use self::relocation_service::{RelocationWorkflowService, WorkflowRules};
pub use self::user::{Permission, Role, User, UserId, UserValidationError};
pub use self::workflow::{TransitionContext, WorkflowAction, WorkflowActionKind};

/// Convenient result alias for driving port calls.
///
/// # Examples
/// ```
/// use moveitright::domain::{DomainResult, Error};
///
/// fn handler() -> DomainResult<()> {
///     Err(Error::forbidden("nope"))
/// }
/// assert!(handler().is_err());
/// ```
pub type DomainResult<T> = Result<T, Error>;
