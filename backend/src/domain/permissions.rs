//! Permission resolver.
//!
//! Every role and assignment check in the crate goes through this module.
//! The workflow consults [`authorize`] before applying a transition, and the
//! dashboard consults [`filtered_requests`]; button visibility in a UI is a
//! consequence of [`crate::domain::workflow::available_actions`], which is
//! built on the same predicates.
//!
//! Visibility and action rights differ for transport administrators. They
//! only see the transport queue (`Pending Admin Transport`, `Transport
//! Arranged`, `External Transport Required`), yet dispatch from `Approved`
//! and completion from `In Progress` are also theirs. Transport tooling
//! addresses those requests by id; [`authorize`] never consults
//! [`can_view_request`].

use serde_json::json;

use super::Error;
use super::ports::RequestListFilter;
use super::relocation::{RelocationRequest, RequestStatus};
use super::user::{Permission, Role, User};
use super::workflow::WorkflowActionKind;

/// Custodians, or anyone holding the `create_request` grant.
///
/// # Examples
/// ```
/// use moveitright::domain::permissions::can_create_request;
/// use moveitright::domain::{Permission, Role, User, UserId};
///
/// let hod = User::new(UserId::new("5").expect("id"), "Michael Brown", Role::Hod);
/// assert!(!can_create_request(&hod));
/// assert!(can_create_request(&hod.with_permission(Permission::CreateRequest)));
/// ```
pub fn can_create_request(user: &User) -> bool {
    user.role == Role::Custodian || user.has_permission(Permission::CreateRequest)
}

/// First-line approvers.
pub fn can_approve_requests(user: &User) -> bool {
    user.role == Role::Hod
}

/// Final approvers.
pub fn can_final_approve_requests(user: &User) -> bool {
    user.role == Role::AssetManager
}

/// Transport administrators.
pub fn can_assign_transport(user: &User) -> bool {
    user.role == Role::TransportAdmin
}

/// System administrators.
pub fn can_manage_system(user: &User) -> bool {
    user.role == Role::SystemAdmin
}

fn is_requester(request: &RelocationRequest, user: &User) -> bool {
    request.requested_by_user_id() == &user.id
}

fn is_assigned_hod(request: &RelocationRequest, user: &User) -> bool {
    can_approve_requests(user) && request.assigned_hod().id == user.id
}

fn is_assigned_manager(request: &RelocationRequest, user: &User) -> bool {
    can_final_approve_requests(user) && request.assigned_manager().id == user.id
}

/// Whether `user` may see `request` at all.
///
/// Narrower than [`can_perform`] for transport administrators; see the
/// module docs.
pub fn can_view_request(request: &RelocationRequest, user: &User) -> bool {
    can_manage_system(user)
        || is_requester(request, user)
        || (can_assign_transport(user) && request.status().in_transport_queue())
        || is_assigned_hod(request, user)
        || is_assigned_manager(request, user)
}

/// The coarse storage-level filter for a user's dashboard.
///
/// Asset manager scope (locations and categories) is applied afterwards by
/// [`filtered_requests`].
pub fn list_filter_for(user: &User) -> RequestListFilter {
    match user.role {
        Role::SystemAdmin => RequestListFilter::all(),
        Role::Custodian => RequestListFilter::all().requested_by(user.id.clone()),
        Role::TransportAdmin => {
            RequestListFilter::all().with_statuses(RequestStatus::TRANSPORT_QUEUE)
        }
        Role::Hod => RequestListFilter::all()
            .assigned_hod(user.id.clone())
            .with_statuses([RequestStatus::PendingHodApproval, RequestStatus::HodApproved]),
        Role::AssetManager => RequestListFilter::all().with_statuses([
            RequestStatus::PendingManagerApproval,
            RequestStatus::ManagerApproved,
        ]),
    }
}

fn within_manager_scope(request: &RelocationRequest, user: &User) -> bool {
    let location_ok = user.covers_location(request.from_location().id)
        || user.covers_location(request.to_location().id);
    location_ok && user.covers_category(request.asset().asset_category.id)
}

/// Whether `request` belongs to the role projection of `user`.
pub fn in_role_projection(request: &RelocationRequest, user: &User) -> bool {
    if !list_filter_for(user).matches(request) {
        return false;
    }
    match user.role {
        Role::AssetManager => within_manager_scope(request, user),
        Role::SystemAdmin | Role::Custodian | Role::TransportAdmin | Role::Hod => true,
    }
}

/// The role-specific subset of `requests` that `user` works with.
pub fn filtered_requests<'a, I>(requests: I, user: &User) -> Vec<&'a RelocationRequest>
where
    I: IntoIterator<Item = &'a RelocationRequest>,
{
    requests
        .into_iter()
        .filter(|request| in_role_projection(request, user))
        .collect()
}

/// Whether `user` holds the role and assignment `kind` requires on
/// `request`. Says nothing about whether the status allows it.
pub fn can_perform(kind: WorkflowActionKind, request: &RelocationRequest, user: &User) -> bool {
    match kind {
        WorkflowActionKind::Submit => false,
        WorkflowActionKind::ApproveAsHod | WorkflowActionKind::DenyAsHod => {
            is_assigned_hod(request, user)
        }
        WorkflowActionKind::ApproveAsManager | WorkflowActionKind::DenyAsManager => {
            is_assigned_manager(request, user)
        }
        WorkflowActionKind::AssignInternalTransport
        | WorkflowActionKind::MarkTransportUnavailable
        | WorkflowActionKind::Dispatch => can_assign_transport(user),
        WorkflowActionKind::RecordExternalTransport => is_requester(request, user),
        WorkflowActionKind::Resubmit => {
            user.role == Role::Custodian && is_requester(request, user)
        }
        WorkflowActionKind::Complete => {
            can_assign_transport(user) || is_requester(request, user)
        }
    }
}

fn denial_message(kind: WorkflowActionKind) -> &'static str {
    match kind {
        WorkflowActionKind::Submit => "You do not have permission to create requests.",
        WorkflowActionKind::ApproveAsHod | WorkflowActionKind::DenyAsHod => {
            "Only the assigned HOD can act on this request."
        }
        WorkflowActionKind::ApproveAsManager | WorkflowActionKind::DenyAsManager => {
            "Only the assigned Asset Manager can act on this request."
        }
        WorkflowActionKind::AssignInternalTransport
        | WorkflowActionKind::MarkTransportUnavailable
        | WorkflowActionKind::Dispatch => "Only a Transport Admin can arrange transport.",
        WorkflowActionKind::RecordExternalTransport | WorkflowActionKind::Resubmit => {
            "Only the original requester can do this."
        }
        WorkflowActionKind::Complete => {
            "Only a Transport Admin or the original requester can complete this request."
        }
    }
}

/// Reject `user` unless [`can_perform`] allows `kind` on `request`.
///
/// # Errors
/// Returns a `forbidden` error naming the action and request.
pub fn authorize(
    kind: WorkflowActionKind,
    request: &RelocationRequest,
    user: &User,
) -> Result<(), Error> {
    if can_perform(kind, request, user) {
        return Ok(());
    }
    Err(Error::forbidden(denial_message(kind)).with_details(json!({
        "action": kind.as_str(),
        "requestId": request.request_number().as_str(),
        "role": user.role.as_str(),
    })))
}

/// Reject `user` unless they may raise requests.
///
/// # Errors
/// Returns a `forbidden` error.
pub fn authorize_create(user: &User) -> Result<(), Error> {
    if can_create_request(user) {
        return Ok(());
    }
    Err(
        Error::forbidden(denial_message(WorkflowActionKind::Submit)).with_details(json!({
            "action": WorkflowActionKind::Submit.as_str(),
            "role": user.role.as_str(),
        })),
    )
}

/// Reject `user` unless [`can_view_request`] allows it.
///
/// # Errors
/// Returns a `forbidden` error.
pub fn authorize_view(request: &RelocationRequest, user: &User) -> Result<(), Error> {
    if can_view_request(request, user) {
        return Ok(());
    }
    Err(Error::forbidden("You do not have permission to view this request.")
        .with_details(json!({ "requestId": request.request_number().as_str() })))
}

#[cfg(test)]
#[path = "permissions_tests.rs"]
mod tests;
