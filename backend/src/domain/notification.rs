//! Structured outcome events handed to the presentation collaborator.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::error::{Error, ErrorCode};
use super::relocation::{RelocationRequest, RequestNumber, TransportType};
use super::workflow::WorkflowActionKind;

/// Tone of a notification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NotificationKind {
    /// Something completed normally.
    Success,
    /// An approval was recorded.
    Approved,
    /// A denial was recorded.
    Denied,
    /// The request needs attention from the requester.
    Warning,
    /// The action failed.
    Error,
}

/// `{type, title, message, timestamp}` outcome of a workflow call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkflowNotification {
    /// Tone.
    #[serde(rename = "type")]
    pub kind: NotificationKind,
    /// Short heading.
    pub title: String,
    /// Body text.
    pub message: String,
    /// When the outcome happened.
    pub timestamp: DateTime<Utc>,
    /// Request the outcome concerns.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub request_id: Option<RequestNumber>,
}

impl WorkflowNotification {
    /// Describe an accepted action on `request` (the updated record).
    pub fn for_action(
        action: WorkflowActionKind,
        request: &RelocationRequest,
        timestamp: DateTime<Utc>,
    ) -> Self {
        let (kind, title, message) = match action {
            WorkflowActionKind::Submit => (
                NotificationKind::Success,
                "Request Submitted",
                "Asset relocation request submitted successfully.",
            ),
            WorkflowActionKind::ApproveAsHod => (
                NotificationKind::Approved,
                "Request Approved by HOD",
                "The request has been approved and forwarded to Asset Manager for final approval.",
            ),
            WorkflowActionKind::ApproveAsManager => (
                NotificationKind::Approved,
                "Request Final Approved",
                match request.transport_type() {
                    TransportType::Internal => {
                        "The request has been approved and sent to Transport Admin for vehicle assignment."
                    }
                    TransportType::External => {
                        "The request has been fully approved and is ready for execution."
                    }
                },
            ),
            WorkflowActionKind::DenyAsHod | WorkflowActionKind::DenyAsManager => (
                NotificationKind::Denied,
                "Request Denied",
                "The asset relocation request has been denied.",
            ),
            WorkflowActionKind::AssignInternalTransport => (
                NotificationKind::Success,
                "Transport Assigned",
                "Internal transport has been assigned to the request.",
            ),
            WorkflowActionKind::MarkTransportUnavailable => (
                NotificationKind::Warning,
                "External Transport Required",
                "Request returned to requester for external transport arrangement.",
            ),
            WorkflowActionKind::RecordExternalTransport => (
                NotificationKind::Success,
                "Transport Details Saved",
                "External transport details have been recorded for the request.",
            ),
            WorkflowActionKind::Resubmit => (
                NotificationKind::Success,
                "Request Submitted for Approval",
                "The request has been submitted to HOD for approval.",
            ),
            WorkflowActionKind::Dispatch => (
                NotificationKind::Success,
                "Asset Dispatched",
                "The asset has been released to transport.",
            ),
            WorkflowActionKind::Complete => (
                NotificationKind::Success,
                "Relocation Completed",
                "The asset has arrived at its new location.",
            ),
        };
        Self {
            kind,
            title: title.to_owned(),
            message: message.to_owned(),
            timestamp,
            request_id: Some(request.request_number().clone()),
        }
    }

    /// Describe a rejected call so the caller can show the reason.
    ///
    /// # Examples
    /// ```
    /// use chrono::Utc;
    /// use moveitright::domain::{Error, NotificationKind, WorkflowNotification};
    ///
    /// let note = WorkflowNotification::from_error(
    ///     &Error::forbidden("Only the assigned HOD can act on this request."),
    ///     Utc::now(),
    /// );
    /// assert_eq!(note.kind, NotificationKind::Error);
    /// assert_eq!(note.title, "Access Denied");
    /// ```
    pub fn from_error(error: &Error, timestamp: DateTime<Utc>) -> Self {
        let title = match error.code() {
            ErrorCode::Forbidden => "Access Denied",
            ErrorCode::InvalidTransition => "Action Not Available",
            ErrorCode::InvalidRequest => "Missing Information",
            ErrorCode::Conflict => "Request Changed",
            ErrorCode::NotFound => "Request Not Found",
            _ => "Something Went Wrong",
        };
        Self {
            kind: NotificationKind::Error,
            title: title.to_owned(),
            message: error.message().to_owned(),
            timestamp,
            request_id: None,
        }
    }
}
