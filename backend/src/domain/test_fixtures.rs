//! Builders shared by the domain unit tests.

use chrono::{DateTime, NaiveDate, TimeZone, Utc};

use super::catalogue::{
    AssetCategory, AssetId, AssetSnapshot, CategoryId, Location, LocationId, VehicleTypeId,
};
use super::relocation::{
    Assignee, RelocationRequest, RelocationRequestDraft, RequestId, RequestNumber, RequestStatus,
    StageApproval, TransportType,
};
use super::user::{Role, User, UserId};
use super::workflow::TransitionContext;

pub(crate) fn user(id: &str, name: &str, role: Role) -> User {
    User::new(UserId::new(id).expect("valid user id"), name, role)
}

pub(crate) fn custodian() -> User {
    user("2", "John Smith", Role::Custodian)
        .with_locations([LocationId::new(1), LocationId::new(2)])
        .with_categories([CategoryId::new(1), CategoryId::new(2), CategoryId::new(3)])
}

pub(crate) fn hod() -> User {
    user("5", "Michael Brown", Role::Hod)
}

pub(crate) fn other_hod() -> User {
    user("7", "Robert Johnson", Role::Hod)
}

pub(crate) fn manager() -> User {
    user("6", "Sarah Wilson", Role::AssetManager)
        .with_locations([LocationId::new(1), LocationId::new(2), LocationId::new(3)])
        .with_categories([CategoryId::new(1), CategoryId::new(3)])
}

pub(crate) fn transport_admin() -> User {
    user("4", "Transport Administrator", Role::TransportAdmin)
}

pub(crate) fn system_admin() -> User {
    user("1", "System Administrator", Role::SystemAdmin)
}

pub(crate) fn now() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 3, 15, 9, 30, 0)
        .single()
        .expect("valid timestamp")
}

pub(crate) fn context() -> TransitionContext {
    TransitionContext {
        now: now(),
        max_comment_length: 500,
    }
}

pub(crate) fn location(id: u32, name: &str, code: &str) -> Location {
    Location {
        id: LocationId::new(id),
        name: name.to_owned(),
        code: code.to_owned(),
    }
}

pub(crate) fn draft(transport_type: TransportType) -> RelocationRequestDraft {
    RelocationRequestDraft {
        asset: AssetSnapshot {
            asset_id: AssetId::new(1),
            asset_name: "Executive Office Desk".to_owned(),
            asset_code: "FUR-001".to_owned(),
            asset_category: AssetCategory {
                id: CategoryId::new(1),
                name: "Furniture".to_owned(),
            },
        },
        from_location: location(1, "Main Office - Floor 1", "MO-F1"),
        to_location: location(2, "Main Office - Floor 2", "MO-F2"),
        transport_type,
        transport_vehicle_type: Some(VehicleTypeId::new(1)),
        requested_date: NaiveDate::from_ymd_opt(2024, 3, 20).expect("valid date"),
        comments: Some("Moving to new office".to_owned()),
        assigned_hod: Assignee::from_user(&hod()),
        assigned_manager: Assignee::from_user(&manager()),
        external_transport: None,
    }
}

/// A freshly submitted request by [`custodian`].
pub(crate) fn request(transport_type: TransportType) -> RelocationRequest {
    RelocationRequest::submit(
        RequestId::random(),
        RequestNumber::compose("REQ", 2024, 1).expect("valid prefix"),
        draft(transport_type),
        None,
        &custodian(),
        now(),
    )
}

/// A request placed directly at `status`, with the approvals a request in
/// that status would carry.
pub(crate) fn request_at(status: RequestStatus, transport_type: TransportType) -> RelocationRequest {
    let mut request = request(transport_type);
    let past_hod = !matches!(status, RequestStatus::PendingHodApproval);
    let past_manager = matches!(
        status,
        RequestStatus::Approved
            | RequestStatus::PendingAdminTransport
            | RequestStatus::TransportArranged
            | RequestStatus::ExternalTransportRequired
            | RequestStatus::InProgress
            | RequestStatus::Completed
    );
    if past_hod {
        request.approval_status.hod = Some(StageApproval {
            approved_by: hod().name,
            approved_by_user_id: hod().id,
            approved_at: now(),
            comments: "ok".to_owned(),
        });
    }
    if past_manager {
        request.approval_status.manager = Some(StageApproval {
            approved_by: manager().name,
            approved_by_user_id: manager().id,
            approved_at: now(),
            comments: "ok".to_owned(),
        });
        request.approval_status.is_approved = true;
    }
    request.status = status;
    request
}
