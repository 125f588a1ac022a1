//! ERP workflow vocabulary.
//!
//! The ERP names its Asset Movement workflow states differently from the
//! local lifecycle and also carries a coarse document status. Both map onto
//! [`RequestStatus`] here. Unknown labels are an error, never a default.

use crate::domain::{RelocationRequest, RequestStatus};

/// A label the ERP sent that has no local meaning.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ErpVocabularyError {
    /// Unrecognised `workflow_state`.
    #[error("unknown ERP workflow state: {label}")]
    UnknownWorkflowState {
        /// Label as received.
        label: String,
    },
    /// Unrecognised document status.
    #[error("unknown ERP document status: {label}")]
    UnknownDocumentStatus {
        /// Label as received.
        label: String,
    },
}

fn erp_only_state(label: &str) -> Option<RequestStatus> {
    use RequestStatus as S;
    Some(match label {
        "Draft" | "HOD Approval Pending" => S::PendingHodApproval,
        "HOD Approved" => S::PendingManagerApproval,
        "Awaiting Transport Allocation" => S::PendingAdminTransport,
        "Request Approved" => S::Approved,
        "Transport Assigned" | "Collected" | "In Transit" | "Delivered" => S::InProgress,
        "Closed" => S::Completed,
        "HOD Rejected" | "Asset Manager Rejected" | "Rejected" | "Cancelled" => S::Denied,
        _ => return None,
    })
}

/// Translate an ERP `workflow_state` label.
///
/// ERP-specific labels win; any other label must be one of the local
/// status labels.
///
/// # Errors
/// [`ErpVocabularyError::UnknownWorkflowState`] for anything else.
///
/// # Examples
/// ```
/// use moveitright::domain::RequestStatus;
/// use moveitright::outbound::frappe::status_from_workflow_state;
///
/// assert_eq!(
///     status_from_workflow_state("Awaiting Transport Allocation"),
///     Ok(RequestStatus::PendingAdminTransport),
/// );
/// assert!(status_from_workflow_state("Teleported").is_err());
/// ```
pub fn status_from_workflow_state(label: &str) -> Result<RequestStatus, ErpVocabularyError> {
    let label = label.trim();
    erp_only_state(label)
        .or_else(|| label.parse().ok())
        .ok_or_else(|| ErpVocabularyError::UnknownWorkflowState {
            label: label.to_owned(),
        })
}

/// Translate an ERP document status, used when no workflow state is set.
///
/// # Errors
/// [`ErpVocabularyError::UnknownDocumentStatus`] for unknown labels.
pub fn status_from_document_status(label: &str) -> Result<RequestStatus, ErpVocabularyError> {
    use RequestStatus as S;
    Ok(match label.trim() {
        "Draft" => S::PendingHodApproval,
        "Submitted" => S::PendingManagerApproval,
        "Approved" => S::PendingAdminTransport,
        "In Transit" => S::InProgress,
        "Completed" => S::Completed,
        "Cancelled" => S::Denied,
        other => {
            return Err(ErpVocabularyError::UnknownDocumentStatus {
                label: other.to_owned(),
            });
        }
    })
}

/// Resolve an ERP record's status, preferring its workflow state.
///
/// # Errors
/// Propagates the error of whichever label is consulted.
pub fn status_from_erp(
    document_status: &str,
    workflow_state: Option<&str>,
) -> Result<RequestStatus, ErpVocabularyError> {
    match workflow_state.map(str::trim).filter(|state| !state.is_empty()) {
        Some(state) => status_from_workflow_state(state),
        None => status_from_document_status(document_status),
    }
}

/// The ERP `workflow_state` to write for `request`.
///
/// Denials keep the stage they came from. `HOD Approved` and
/// `Manager Approved` have no distinct ERP state and collapse onto their
/// successors.
pub fn workflow_state_for(request: &RelocationRequest) -> &'static str {
    use RequestStatus as S;
    match request.status() {
        S::PendingHodApproval => "HOD Approval Pending",
        S::PendingManagerApproval | S::HodApproved => "HOD Approved",
        S::PendingAdminTransport => "Awaiting Transport Allocation",
        S::Approved | S::ManagerApproved => "Request Approved",
        S::TransportArranged => "Transport Arranged",
        S::ExternalTransportRequired => "External Transport Required",
        S::InProgress => "Collected",
        S::Completed => "Closed",
        S::Denied => match request.approval_status().denial.as_ref() {
            Some(denial) if denial.denied_from == S::PendingHodApproval => "HOD Rejected",
            _ => "Asset Manager Rejected",
        },
    }
}
