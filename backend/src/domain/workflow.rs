//! Request lifecycle state machine.
//!
//! [`next_status`] is the only transition table in the crate. Everything
//! status-dependent (applying an action, listing the actions a user may
//! take) asks it rather than comparing labels.
//!
//! A transition is computed on a clone of the request: on any error the
//! caller's record is untouched and nothing is returned to persist.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::json;

use super::Error;
use super::permissions;
use super::relocation::{
    AdminProcessing, ApprovalRound, Denial, DispatchDetails, ExternalTransport,
    InternalAssignment, RelocationRequest, RequestStatus, StageApproval, StatusChange,
    TransportAssignment, TransportType,
};
use super::user::User;

/// Comment recorded when a HOD approves without one.
pub const DEFAULT_HOD_COMMENT: &str = "Approved by HOD";
/// Comment recorded when an asset manager approves without one.
pub const DEFAULT_MANAGER_COMMENT: &str = "Final approved by Asset Manager";

/// What happened to a request, without the payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WorkflowActionKind {
    /// Request raised.
    Submit,
    /// First-line approval.
    ApproveAsHod,
    /// First-line denial.
    DenyAsHod,
    /// Final approval.
    ApproveAsManager,
    /// Denial by the assigned asset manager, from any open status.
    DenyAsManager,
    /// Internal vehicle and driver allocated.
    AssignInternalTransport,
    /// No internal vehicle available.
    MarkTransportUnavailable,
    /// Requester records external transport.
    RecordExternalTransport,
    /// Requester sends the request back to the HOD.
    Resubmit,
    /// Asset released to transport.
    Dispatch,
    /// Delivery confirmed.
    Complete,
}

impl WorkflowActionKind {
    /// Every action that moves an existing request.
    pub const TRANSITIONS: [Self; 10] = [
        Self::ApproveAsHod,
        Self::DenyAsHod,
        Self::ApproveAsManager,
        Self::DenyAsManager,
        Self::AssignInternalTransport,
        Self::MarkTransportUnavailable,
        Self::RecordExternalTransport,
        Self::Resubmit,
        Self::Dispatch,
        Self::Complete,
    ];

    /// Returns the stored label.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Submit => "submit",
            Self::ApproveAsHod => "approve_as_hod",
            Self::DenyAsHod => "deny_as_hod",
            Self::ApproveAsManager => "approve_as_manager",
            Self::DenyAsManager => "deny_as_manager",
            Self::AssignInternalTransport => "assign_internal_transport",
            Self::MarkTransportUnavailable => "mark_transport_unavailable",
            Self::RecordExternalTransport => "record_external_transport",
            Self::Resubmit => "resubmit",
            Self::Dispatch => "dispatch",
            Self::Complete => "complete",
        }
    }

    fn verb(self) -> &'static str {
        match self {
            Self::Submit => "submit",
            Self::ApproveAsHod | Self::ApproveAsManager => "approve",
            Self::DenyAsHod | Self::DenyAsManager => "deny",
            Self::AssignInternalTransport => "assign internal transport to",
            Self::MarkTransportUnavailable => "mark transport unavailable for",
            Self::RecordExternalTransport => "record external transport for",
            Self::Resubmit => "resubmit",
            Self::Dispatch => "dispatch",
            Self::Complete => "complete",
        }
    }
}

impl std::fmt::Display for WorkflowActionKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A transition with its resolved payload.
///
/// Transport payloads arrive already resolved against the catalogue, so
/// applying an action never needs I/O.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WorkflowAction {
    /// First-line approval; blank comments fall back to
    /// [`DEFAULT_HOD_COMMENT`].
    ApproveAsHod {
        /// Approval comments.
        comments: Option<String>,
    },
    /// First-line denial.
    DenyAsHod {
        /// Required reason.
        reason: String,
    },
    /// Final approval; blank comments fall back to
    /// [`DEFAULT_MANAGER_COMMENT`].
    ApproveAsManager {
        /// Approval comments.
        comments: Option<String>,
    },
    /// Denial by the assigned asset manager.
    DenyAsManager {
        /// Required reason.
        reason: String,
    },
    /// Allocate an internal vehicle.
    AssignInternalTransport(InternalAssignment),
    /// Declare internal transport unavailable.
    MarkTransportUnavailable {
        /// Required reason.
        reason: String,
    },
    /// Record external transport.
    RecordExternalTransport(ExternalTransport),
    /// Return the request to the HOD.
    Resubmit,
    /// Release the asset.
    Dispatch(DispatchDetails),
    /// Confirm delivery.
    Complete,
}

impl WorkflowAction {
    /// The payload-free kind of this action.
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

/// The transition table.
///
/// Returns the status `kind` leads to from `from`, or `None` when the action
/// is not legal there. `HOD Approved` and `Manager Approved` only arrive
/// from the ERP vocabulary; the only action they accept is manager denial.
///
/// # Examples
/// ```
/// use moveitright::domain::workflow::{WorkflowActionKind, next_status};
/// use moveitright::domain::{RequestStatus, TransportType};
///
/// assert_eq!(
///     next_status(
///         RequestStatus::PendingManagerApproval,
///         WorkflowActionKind::ApproveAsManager,
///         TransportType::Internal,
///     ),
///     Some(RequestStatus::PendingAdminTransport),
/// );
/// assert_eq!(
///     next_status(RequestStatus::Denied, WorkflowActionKind::Resubmit, TransportType::Internal),
///     None,
/// );
/// ```
pub fn next_status(
    from: RequestStatus,
    kind: WorkflowActionKind,
    transport_type: TransportType,
) -> Option<RequestStatus> {
    use RequestStatus as S;
    use WorkflowActionKind as K;

    match (kind, from) {
        (K::ApproveAsHod, S::PendingHodApproval) => Some(S::PendingManagerApproval),
        (K::DenyAsHod, S::PendingHodApproval) => Some(S::Denied),
        (K::ApproveAsManager, S::PendingManagerApproval) => Some(match transport_type {
            TransportType::Internal => S::PendingAdminTransport,
            TransportType::External => S::Approved,
        }),
        (K::DenyAsManager, status) if !status.is_terminal() => Some(S::Denied),
        (K::AssignInternalTransport | K::MarkTransportUnavailable, S::PendingAdminTransport)
            if transport_type.is_internal() =>
        {
            Some(match kind {
                K::AssignInternalTransport => S::TransportArranged,
                _ => S::ExternalTransportRequired,
            })
        }
        (K::RecordExternalTransport, S::ExternalTransportRequired) => Some(from),
        (
            K::RecordExternalTransport,
            S::PendingHodApproval | S::PendingManagerApproval | S::Approved,
        ) if !transport_type.is_internal() => Some(from),
        (K::Resubmit, S::ExternalTransportRequired) => Some(S::PendingHodApproval),
        (K::Dispatch, S::TransportArranged | S::Approved) => Some(S::InProgress),
        (K::Complete, S::InProgress) => Some(S::Completed),
        _ => None,
    }
}

/// Clock and limits a transition runs under.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TransitionContext {
    /// Time recorded on approvals, denials and history.
    pub now: DateTime<Utc>,
    /// Upper bound on comments and reasons, in characters.
    pub max_comment_length: usize,
}

/// Check that `actor` may perform `kind` on `request` in its current status.
///
/// Returns the status the action leads to. Authorization is checked before
/// the transition table, so an outsider learns nothing about the request's
/// state.
///
/// # Errors
/// `forbidden` or `invalid_transition`.
pub fn ensure_allowed(
    request: &RelocationRequest,
    kind: WorkflowActionKind,
    actor: &User,
) -> Result<RequestStatus, Error> {
    permissions::authorize(kind, request, actor)?;
    let from = request.status();
    next_status(from, kind, request.transport_type()).ok_or_else(|| {
        Error::invalid_transition(format!("cannot {} a request that is {from}", kind.verb()))
            .with_details(json!({
                "action": kind.as_str(),
                "status": from.as_str(),
                "requestId": request.request_number().as_str(),
            }))
    })
}

/// Apply `action` to `request` on behalf of `actor`.
///
/// Checks, in order: the actor's role and assignment, the transition table,
/// then the payload. The returned request carries the new status, the
/// accumulated fields and one more history entry, which also keeps any
/// comment or reason given; its revision is left for the persistence layer
/// to bump. Resubmission closes the current approval round: its stage
/// records and the transport decision move to the request's earlier rounds
/// and `isApproved` drops back to false.
///
/// # Errors
/// `forbidden`, `invalid_transition` or `invalid_request`; `request` is
/// never modified.
pub fn apply_action(
    request: &RelocationRequest,
    action: WorkflowAction,
    actor: &User,
    context: &TransitionContext,
) -> Result<RelocationRequest, Error> {
    let kind = action.kind();
    let to = ensure_allowed(request, kind, actor)?;
    let from = request.status();

    let mut next = request.clone();
    let now = context.now;
    let mut note = None;
    match action {
        WorkflowAction::ApproveAsHod { comments } => {
            let comments = approval_comments(comments, DEFAULT_HOD_COMMENT, context)?;
            note = Some(comments.clone());
            next.approval_status.hod = Some(stage_approval(actor, now, comments));
        }
        WorkflowAction::ApproveAsManager { comments } => {
            let comments = approval_comments(comments, DEFAULT_MANAGER_COMMENT, context)?;
            note = Some(comments.clone());
            next.approval_status.manager = Some(stage_approval(actor, now, comments));
            next.approval_status.is_approved = next.approval_status.hod.is_some();
        }
        WorkflowAction::DenyAsHod { reason } | WorkflowAction::DenyAsManager { reason } => {
            let reason = required_text("denial reason", reason, context)?;
            note = Some(reason.clone());
            next.approval_status.denial = Some(Denial {
                denied_by: actor.name.clone(),
                denied_by_user_id: actor.id.clone(),
                denied_date: now,
                denial_reason: reason,
                denied_from: from,
            });
        }
        WorkflowAction::AssignInternalTransport(assignment) => {
            next.transport_details.vehicle_type = Some(assignment.vehicle_type);
            next.transport_details.assignment = Some(TransportAssignment::Internal(assignment));
            next.admin_processing = Some(admin_processing(actor, now, None));
        }
        WorkflowAction::MarkTransportUnavailable { reason } => {
            let reason = required_text("unavailability reason", reason, context)?;
            note = Some(reason.clone());
            next.admin_processing = Some(admin_processing(actor, now, Some(reason)));
        }
        WorkflowAction::RecordExternalTransport(transport) => {
            next.transport_type = TransportType::External;
            next.transport_details.is_internal = false;
            next.transport_details.assignment = Some(TransportAssignment::External(transport));
        }
        WorkflowAction::Resubmit => {
            next.earlier_rounds.push(ApprovalRound {
                hod: next.approval_status.hod.take(),
                manager: next.approval_status.manager.take(),
                admin_processing: next.admin_processing.take(),
                resubmitted_at: now,
            });
            next.approval_status.is_approved = false;
        }
        WorkflowAction::Dispatch(details) => {
            if !next.transport_details.is_assigned() {
                return Err(Error::invalid_request(
                    "transport must be arranged before dispatch",
                ));
            }
            next.dispatch_status.is_dispatched = true;
            next.dispatch_status.dispatched_by = Some(actor.name.clone());
            next.dispatch_status.dispatched_by_user_id = Some(actor.id.clone());
            next.dispatch_status.dispatch_date = Some(now);
            next.dispatch_status.estimated_arrival = details.estimated_arrival;
            next.dispatch_status.current_custodian_notified = details.current_custodian_notified;
            next.dispatch_status.new_custodian_notified = details.new_custodian_notified;
            next.transport_details.is_dispatched = true;
        }
        WorkflowAction::Complete => {
            next.dispatch_status.completed_date = Some(now);
            next.dispatch_status.completed_by = Some(actor.name.clone());
        }
    }

    next.status = to;
    next.history.push(StatusChange {
        from: Some(from),
        to,
        action: kind,
        actor_id: actor.id.clone(),
        actor_name: actor.name.clone(),
        at: now,
        note,
    });
    Ok(next)
}

/// The actions `user` may take on `request` right now.
pub fn available_actions(request: &RelocationRequest, user: &User) -> Vec<WorkflowActionKind> {
    WorkflowActionKind::TRANSITIONS
        .into_iter()
        .filter(|kind| {
            next_status(request.status(), *kind, request.transport_type()).is_some()
                && permissions::can_perform(*kind, request, user)
        })
        .collect()
}

fn stage_approval(actor: &User, now: DateTime<Utc>, comments: String) -> StageApproval {
    StageApproval {
        approved_by: actor.name.clone(),
        approved_by_user_id: actor.id.clone(),
        approved_at: now,
        comments,
    }
}

fn admin_processing(actor: &User, now: DateTime<Utc>, reason: Option<String>) -> AdminProcessing {
    AdminProcessing {
        admin_processed_by: actor.name.clone(),
        admin_processed_by_user_id: actor.id.clone(),
        admin_processed_date: now,
        unavailability_reason: reason,
    }
}

fn check_length(field: &str, text: &str, context: &TransitionContext) -> Result<(), Error> {
    if text.chars().count() > context.max_comment_length {
        return Err(Error::invalid_request(format!(
            "{field} must be at most {} characters",
            context.max_comment_length
        ))
        .with_details(json!({ "field": field, "max": context.max_comment_length })));
    }
    Ok(())
}

fn approval_comments(
    comments: Option<String>,
    default: &str,
    context: &TransitionContext,
) -> Result<String, Error> {
    let text = comments
        .map(|raw| raw.trim().to_owned())
        .filter(|text| !text.is_empty())
        .unwrap_or_else(|| default.to_owned());
    check_length("comments", &text, context)?;
    Ok(text)
}

fn required_text(field: &str, raw: String, context: &TransitionContext) -> Result<String, Error> {
    let text = raw.trim().to_owned();
    if text.is_empty() {
        return Err(Error::invalid_request(format!("{field} is required"))
            .with_details(json!({ "field": field })));
    }
    check_length(field, &text, context)?;
    Ok(text)
}

#[cfg(test)]
#[path = "workflow_tests.rs"]
mod tests;
