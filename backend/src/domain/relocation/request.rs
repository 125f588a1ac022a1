//! The relocation request aggregate and its creation draft.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use super::identity::{RequestId, RequestNumber};
use super::status::{RequestStatus, TransportType};
use super::transport::{
    DispatchStatus, ExternalTransport, ExternalTransportInput, TransportAssignment,
    TransportDetails,
};
use crate::domain::Error;
use crate::domain::catalogue::{AssetSnapshot, Location, VehicleTypeId};
use crate::domain::user::{User, UserId};
use crate::domain::workflow::WorkflowActionKind;

/// A user fixed onto a request as an approver.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Assignee {
    /// Approver identifier.
    pub id: UserId,
    /// Approver display name.
    pub name: String,
}

impl Assignee {
    /// Build an assignee from a user record.
    pub fn from_user(user: &User) -> Self {
        Self {
            id: user.id.clone(),
            name: user.name.clone(),
        }
    }
}

/// Recorded approval of one stage.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StageApproval {
    /// Approver display name.
    pub approved_by: String,
    /// Approver identifier.
    pub approved_by_user_id: UserId,
    /// Approval time.
    pub approved_at: DateTime<Utc>,
    /// Approval comments.
    pub comments: String,
}

/// Recorded denial.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Denial {
    /// Who denied the request.
    pub denied_by: String,
    /// Identifier of who denied the request.
    pub denied_by_user_id: UserId,
    /// Denial time.
    pub denied_date: DateTime<Utc>,
    /// Reason given.
    pub denial_reason: String,
    /// Status the request was in when it was denied.
    pub denied_from: RequestStatus,
}

/// Approvals accumulated by a request in its current round.
///
/// A denial is recorded alongside the stage records and never clears an
/// earlier approval. Resubmission starts a new round; the stage records of
/// the finished one move to [`RelocationRequest::earlier_rounds`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApprovalStatus {
    /// Every required stage has approved.
    pub is_approved: bool,
    /// First-line approval.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hod: Option<StageApproval>,
    /// Final approval.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub manager: Option<StageApproval>,
    /// Denial, when the request was denied.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub denial: Option<Denial>,
}

/// The transport administrator's decision on an internal request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AdminProcessing {
    /// Administrator display name.
    pub admin_processed_by: String,
    /// Administrator identifier.
    pub admin_processed_by_user_id: UserId,
    /// Decision time.
    pub admin_processed_date: DateTime<Utc>,
    /// Why no internal vehicle was available.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub unavailability_reason: Option<String>,
}

/// Approvals and transport decision of a round that ended in resubmission.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApprovalRound {
    /// First-line approval of the round.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hod: Option<StageApproval>,
    /// Final approval of the round.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub manager: Option<StageApproval>,
    /// Transport administrator decision that sent the request back.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub admin_processing: Option<AdminProcessing>,
    /// When the requester resubmitted.
    pub resubmitted_at: DateTime<Utc>,
}

/// One entry of the append-only audit trail.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StatusChange {
    /// Status before the action; absent for submission.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub from: Option<RequestStatus>,
    /// Status after the action.
    pub to: RequestStatus,
    /// What happened.
    pub action: WorkflowActionKind,
    /// Who did it.
    pub actor_id: UserId,
    /// Display name of who did it.
    pub actor_name: String,
    /// When it happened.
    pub at: DateTime<Utc>,
    /// Comment or reason given with the action.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
}

/// Invariant violations detected on a stored request.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RequestInvariantError {
    /// `transportDetails.isInternal` disagrees with `transportType`.
    #[error("request {number}: transport details disagree with transport type {transport_type}")]
    TransportTypeMismatch {
        /// Request number.
        number: String,
        /// Stored transport type.
        transport_type: TransportType,
    },
    /// `isApproved` is set without both stage approvals.
    #[error("request {number}: marked approved without both stage approvals")]
    ApprovedWithoutStages {
        /// Request number.
        number: String,
    },
    /// Source and destination are the same location.
    #[error("request {number}: source and destination are the same location")]
    SameLocation {
        /// Request number.
        number: String,
    },
    /// Revisions start at 1.
    #[error("request {number}: revision must be at least 1")]
    ZeroRevision {
        /// Request number.
        number: String,
    },
}

/// The central relocation request aggregate.
///
/// Fields are only mutated by the workflow transitions in this crate, so
/// the status, approval record and transport details stay consistent.
/// Readers use the accessor methods.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RelocationRequest {
    pub(crate) id: RequestId,
    #[serde(rename = "requestId")]
    pub(crate) request_number: RequestNumber,
    #[serde(flatten)]
    pub(crate) asset: AssetSnapshot,
    pub(crate) from_location: Location,
    pub(crate) to_location: Location,
    pub(crate) transport_type: TransportType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub(crate) transport_vehicle_type: Option<VehicleTypeId>,
    pub(crate) requested_by: String,
    pub(crate) requested_by_user_id: UserId,
    pub(crate) request_date: DateTime<Utc>,
    pub(crate) requested_date: NaiveDate,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub(crate) comments: Option<String>,
    #[serde(rename = "assignedHOD")]
    pub(crate) assigned_hod: Assignee,
    pub(crate) assigned_manager: Assignee,
    pub(crate) status: RequestStatus,
    #[serde(default)]
    pub(crate) approval_status: ApprovalStatus,
    pub(crate) transport_details: TransportDetails,
    #[serde(default)]
    pub(crate) dispatch_status: DispatchStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub(crate) admin_processing: Option<AdminProcessing>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub(crate) earlier_rounds: Vec<ApprovalRound>,
    #[serde(default)]
    pub(crate) history: Vec<StatusChange>,
    pub(crate) revision: u32,
}

impl RelocationRequest {
    /// Build a freshly submitted request at `Pending HOD Approval`,
    /// revision 1.
    pub(crate) fn submit(
        id: RequestId,
        request_number: RequestNumber,
        draft: RelocationRequestDraft,
        external: Option<ExternalTransport>,
        requester: &User,
        now: DateTime<Utc>,
    ) -> Self {
        let RelocationRequestDraft {
            asset,
            from_location,
            to_location,
            transport_type,
            transport_vehicle_type,
            requested_date,
            comments,
            assigned_hod,
            assigned_manager,
            external_transport: _,
        } = draft;
        let mut transport_details =
            TransportDetails::unassigned(transport_type.is_internal(), transport_vehicle_type);
        transport_details.assignment = external.map(TransportAssignment::External);
        let status = RequestStatus::PendingHodApproval;
        Self {
            id,
            request_number,
            asset,
            from_location,
            to_location,
            transport_type,
            transport_vehicle_type,
            requested_by: requester.name.clone(),
            requested_by_user_id: requester.id.clone(),
            request_date: now,
            requested_date,
            comments,
            assigned_hod,
            assigned_manager,
            status,
            approval_status: ApprovalStatus::default(),
            transport_details,
            dispatch_status: DispatchStatus::default(),
            admin_processing: None,
            earlier_rounds: Vec::new(),
            history: vec![StatusChange {
                from: None,
                to: status,
                action: WorkflowActionKind::Submit,
                actor_id: requester.id.clone(),
                actor_name: requester.name.clone(),
                at: now,
                note: None,
            }],
            revision: 1,
        }
    }

    /// Opaque identifier.
    pub fn id(&self) -> &RequestId {
        &self.id
    }

    /// Human-readable number, e.g. `REQ-2024-001`.
    pub fn request_number(&self) -> &RequestNumber {
        &self.request_number
    }

    /// Asset values copied at submission.
    pub fn asset(&self) -> &AssetSnapshot {
        &self.asset
    }

    /// Source location snapshot.
    pub fn from_location(&self) -> &Location {
        &self.from_location
    }

    /// Destination location snapshot.
    pub fn to_location(&self) -> &Location {
        &self.to_location
    }

    /// Who moves the asset.
    pub fn transport_type(&self) -> TransportType {
        self.transport_type
    }

    /// Requested capacity class.
    pub fn transport_vehicle_type(&self) -> Option<VehicleTypeId> {
        self.transport_vehicle_type
    }

    /// Requester display name.
    pub fn requested_by(&self) -> &str {
        &self.requested_by
    }

    /// Requester identifier.
    pub fn requested_by_user_id(&self) -> &UserId {
        &self.requested_by_user_id
    }

    /// Submission time.
    pub fn request_date(&self) -> DateTime<Utc> {
        self.request_date
    }

    /// Desired move date.
    pub fn requested_date(&self) -> NaiveDate {
        self.requested_date
    }

    /// Requester comments.
    pub fn comments(&self) -> Option<&str> {
        self.comments.as_deref()
    }

    /// First-line approver fixed at submission.
    pub fn assigned_hod(&self) -> &Assignee {
        &self.assigned_hod
    }

    /// Final approver fixed at submission.
    pub fn assigned_manager(&self) -> &Assignee {
        &self.assigned_manager
    }

    /// Current lifecycle status.
    pub fn status(&self) -> RequestStatus {
        self.status
    }

    /// Accumulated approvals and denial.
    pub fn approval_status(&self) -> &ApprovalStatus {
        &self.approval_status
    }

    /// Transport arrangements.
    pub fn transport_details(&self) -> &TransportDetails {
        &self.transport_details
    }

    /// Dispatch progress.
    pub fn dispatch_status(&self) -> &DispatchStatus {
        &self.dispatch_status
    }

    /// Transport administrator decision, once made.
    pub fn admin_processing(&self) -> Option<&AdminProcessing> {
        self.admin_processing.as_ref()
    }

    /// Rounds closed by resubmission, oldest first.
    pub fn earlier_rounds(&self) -> &[ApprovalRound] {
        &self.earlier_rounds
    }

    /// Audit trail, oldest first.
    pub fn history(&self) -> &[StatusChange] {
        &self.history
    }

    /// Optimistic concurrency revision.
    pub fn revision(&self) -> u32 {
        self.revision
    }

    /// Whether the status accepts no further transitions.
    pub fn is_terminal(&self) -> bool {
        self.status.is_terminal()
    }

    /// Check the invariants a stored record must satisfy.
    pub fn check_invariants(&self) -> Result<(), RequestInvariantError> {
        let number = || self.request_number.to_string();
        if self.transport_details.is_internal != self.transport_type.is_internal() {
            return Err(RequestInvariantError::TransportTypeMismatch {
                number: number(),
                transport_type: self.transport_type,
            });
        }
        if self.approval_status.is_approved
            && (self.approval_status.hod.is_none() || self.approval_status.manager.is_none())
        {
            return Err(RequestInvariantError::ApprovedWithoutStages { number: number() });
        }
        if self.from_location.id == self.to_location.id {
            return Err(RequestInvariantError::SameLocation { number: number() });
        }
        if self.revision == 0 {
            return Err(RequestInvariantError::ZeroRevision { number: number() });
        }
        Ok(())
    }
}

/// Input for raising a new request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RelocationRequestDraft {
    /// Asset values to copy onto the request.
    #[serde(flatten)]
    pub asset: AssetSnapshot,
    /// Source location.
    pub from_location: Location,
    /// Destination location.
    pub to_location: Location,
    /// Who moves the asset.
    pub transport_type: TransportType,
    /// Requested capacity class.
    #[serde(default)]
    pub transport_vehicle_type: Option<VehicleTypeId>,
    /// Desired move date.
    pub requested_date: NaiveDate,
    /// Requester comments.
    #[serde(default)]
    pub comments: Option<String>,
    /// First-line approver.
    #[serde(rename = "assignedHOD")]
    pub assigned_hod: Assignee,
    /// Final approver.
    pub assigned_manager: Assignee,
    /// External transport arranged up front.
    #[serde(default)]
    pub external_transport: Option<ExternalTransportInput>,
}

impl RelocationRequestDraft {
    /// Check the draft against the requester's scope.
    ///
    /// # Errors
    /// Returns `invalid_request` for identical endpoints, out-of-scope
    /// locations or categories, over-long comments, or external details on
    /// an internal request.
    pub fn validate(&self, requester: &User, max_comment_length: usize) -> Result<(), Error> {
        if self.from_location.id == self.to_location.id {
            return Err(Error::invalid_request(
                "source and destination locations must differ",
            ));
        }
        if !requester.covers_location(self.from_location.id) {
            return Err(Error::invalid_request(format!(
                "location {} is not assigned to you",
                self.from_location.name
            ))
            .with_details(serde_json::json!({ "field": "fromLocation" })));
        }
        if !requester.covers_category(self.asset.asset_category.id) {
            return Err(Error::invalid_request(format!(
                "asset category {} is not assigned to you",
                self.asset.asset_category.name
            ))
            .with_details(serde_json::json!({ "field": "assetCategory" })));
        }
        if let Some(comments) = &self.comments
            && comments.chars().count() > max_comment_length
        {
            return Err(Error::invalid_request(format!(
                "comments must be at most {max_comment_length} characters"
            )));
        }
        if self.transport_type.is_internal() && self.external_transport.is_some() {
            return Err(Error::invalid_request(
                "external transport details require an External request",
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
#[path = "request_tests.rs"]
mod tests;
