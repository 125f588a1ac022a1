//! Driving port for relocation request mutations.
//!
//! Callers submit drafts and workflow commands; every accepted call returns
//! the stored request and the notification that describes it.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::domain::{
    DispatchDetails, Error, ExternalTransportInput, InternalTransportInput, RelocationRequest,
    RelocationRequestDraft, RequestId, User, WorkflowActionKind, WorkflowNotification,
};

/// A workflow action as the caller sends it.
///
/// Transport inputs carry catalogue identifiers; the service resolves them
/// before the transition runs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum WorkflowCommand {
    /// HOD approval with optional comments.
    ApproveAsHod {
        /// Approval comments.
        #[serde(default)]
        comments: Option<String>,
    },
    /// HOD denial.
    DenyAsHod {
        /// Required reason.
        reason: String,
    },
    /// Asset manager final approval.
    ApproveAsManager {
        /// Approval comments.
        #[serde(default)]
        comments: Option<String>,
    },
    /// Asset manager denial.
    DenyAsManager {
        /// Required reason.
        reason: String,
    },
    /// Allocate a fleet vehicle.
    AssignInternalTransport(InternalTransportInput),
    /// No fleet vehicle is available.
    MarkTransportUnavailable {
        /// Required reason.
        reason: String,
    },
    /// Record a third-party transporter.
    RecordExternalTransport(ExternalTransportInput),
    /// Send a request back to the HOD.
    Resubmit,
    /// Release the asset to transport.
    Dispatch(DispatchDetails),
    /// Confirm arrival.
    Complete,
}

impl WorkflowCommand {
    /// The payload-free kind of this command.
    pub fn kind(&self) -> WorkflowActionKind {
        match self {
            Self::ApproveAsHod { .. } => WorkflowActionKind::ApproveAsHod,
            Self::DenyAsHod { .. } => WorkflowActionKind::DenyAsHod,
            Self::ApproveAsManager { .. } => WorkflowActionKind::ApproveAsManager,
            Self::DenyAsManager { .. } => WorkflowActionKind::DenyAsManager,
            Self::AssignInternalTransport(_) => WorkflowActionKind::AssignInternalTransport,
            Self::MarkTransportUnavailable { .. } => WorkflowActionKind::MarkTransportUnavailable,
            Self::RecordExternalTransport(_) => WorkflowActionKind::RecordExternalTransport,
            Self::Resubmit => WorkflowActionKind::Resubmit,
            Self::Dispatch(_) => WorkflowActionKind::Dispatch,
            Self::Complete => WorkflowActionKind::Complete,
        }
    }
}

/// Request to apply one workflow command.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApplyActionRequest {
    /// Target request.
    pub request_id: RequestId,
    /// What to do.
    pub command: WorkflowCommand,
    /// Revision the caller last saw; a stale value fails with `conflict`
    /// before any transition is attempted.
    #[serde(default)]
    pub expected_revision: Option<u32>,
}

/// Result of an accepted submission or transition.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransitionOutcome {
    /// The stored request.
    pub request: RelocationRequest,
    /// What the presentation layer should show.
    pub notification: WorkflowNotification,
}

/// Driving port for relocation request write operations.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait RelocationCommand: Send + Sync {
    /// Submit a new request on behalf of `requester`.
    ///
    /// # Errors
    /// `forbidden` when the requester may not create requests,
    /// `invalid_request` when the draft fails validation, and
    /// `service_unavailable` or `internal_error` for storage failures.
    async fn create_request(
        &self,
        requester: &User,
        draft: RelocationRequestDraft,
    ) -> Result<TransitionOutcome, Error>;

    /// Apply a workflow command on behalf of `actor`.
    ///
    /// # Errors
    /// `not_found`, `forbidden`, `invalid_transition`, `invalid_request`,
    /// `conflict` for a stale revision, and storage failures as above.
    async fn apply(
        &self,
        actor: &User,
        request: ApplyActionRequest,
    ) -> Result<TransitionOutcome, Error>;
}

/// Fixture command with no storage behind it.
#[derive(Debug, Default, Clone, Copy)]
pub struct FixtureRelocationCommand;

#[async_trait]
impl RelocationCommand for FixtureRelocationCommand {
    async fn create_request(
        &self,
        _requester: &User,
        _draft: RelocationRequestDraft,
    ) -> Result<TransitionOutcome, Error> {
        Err(Error::service_unavailable("relocation storage is not configured"))
    }

    async fn apply(
        &self,
        _actor: &User,
        request: ApplyActionRequest,
    ) -> Result<TransitionOutcome, Error> {
        Err(Error::not_found(format!(
            "relocation request {} not found",
            request.request_id
        )))
    }
}

#[cfg(test)]
mod tests {
    //! Regression coverage for this module.
    use super::*;
    use crate::domain::{ErrorCode, VehicleId};
    use rstest::rstest;
    use serde_json::json;

    #[rstest]
    fn commands_are_tagged_by_action() {
        let command: WorkflowCommand = serde_json::from_value(json!({
            "action": "assign_internal_transport",
            "vehicleId": 3,
            "driver": "Peter Mokoena"
        }))
        .expect("decode command");
        let WorkflowCommand::AssignInternalTransport(input) = &command else {
            panic!("expected an assignment, got {command:?}");
        };
        assert_eq!(input.vehicle_id, VehicleId::new(3));
        assert_eq!(input.driver.as_deref(), Some("Peter Mokoena"));
        assert_eq!(command.kind(), WorkflowActionKind::AssignInternalTransport);
    }

    #[rstest]
    fn approval_comments_default_to_none() {
        let command: WorkflowCommand =
            serde_json::from_value(json!({ "action": "approve_as_hod" })).expect("decode");
        assert_eq!(command, WorkflowCommand::ApproveAsHod { comments: None });
    }

    #[rstest]
    #[tokio::test]
    async fn fixture_apply_reports_not_found() {
        let actor = crate::domain::test_fixtures::hod();
        let err = FixtureRelocationCommand
            .apply(
                &actor,
                ApplyActionRequest {
                    request_id: RequestId::random(),
                    command: WorkflowCommand::Resubmit,
                    expected_revision: None,
                },
            )
            .await
            .expect_err("fixture rejects");
        assert_eq!(err.code(), ErrorCode::NotFound);
    }
}
