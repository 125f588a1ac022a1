//! Tests for the request lifecycle state machine.

use super::*;
use crate::domain::ErrorCode;
use crate::domain::catalogue::{
    InternalVehicle, Transporter, TransporterId, VehicleId, VehicleTypeId,
};
use crate::domain::relocation::{ExternalTransportInput, InternalTransportInput};
use crate::domain::test_fixtures::{
    context, custodian, hod, manager, now, other_hod, request, request_at, system_admin,
    transport_admin, user,
};
use crate::domain::user::Role;
use rstest::{fixture, rstest};

#[fixture]
fn assignment() -> InternalAssignment {
    let vehicle = InternalVehicle {
        id: VehicleId::new(2),
        vehicle_type: VehicleTypeId::new(2),
        registration: "DEF456GP".to_owned(),
        capacity: "2000kg".to_owned(),
        driver: "Mike Johnson".to_owned(),
    };
    InternalTransportInput::for_vehicle(vehicle.id)
        .resolve(&vehicle, chrono::NaiveDate::from_ymd_opt(2024, 3, 20).expect("date"))
        .expect("resolves")
}

#[fixture]
fn external() -> ExternalTransport {
    let transporter = Transporter {
        id: TransporterId::new(3),
        name: "CranePro Movers".to_owned(),
        contact_person: "James Wilson".to_owned(),
        phone: "011-555-0125".to_owned(),
        email: "dispatch@cranepro.com".to_owned(),
        specializations: Vec::new(),
    };
    ExternalTransportInput {
        transporter_id: transporter.id,
        registration: "CP-001-GP".to_owned(),
        driver: "Peter Nkosi".to_owned(),
        driver_id_number: None,
        driver_mobile: None,
        features: Vec::new(),
        estimated_cost_cents: None,
    }
    .resolve(&transporter)
    .expect("resolves")
}

fn approve(comments: &str) -> WorkflowAction {
    WorkflowAction::ApproveAsHod {
        comments: Some(comments.to_owned()),
    }
}

#[rstest]
fn assigned_hod_approval_moves_to_manager() {
    let request = request(TransportType::Internal);
    let next = apply_action(&request, approve("ok"), &hod(), &context()).expect("approved");

    assert_eq!(next.status(), RequestStatus::PendingManagerApproval);
    let stage = next.approval_status().hod.as_ref().expect("hod stage recorded");
    assert_eq!(stage.approved_by, "Michael Brown");
    assert_eq!(stage.comments, "ok");
    assert_eq!(stage.approved_at, now());
    assert!(!next.approval_status().is_approved);
}

#[rstest]
fn different_hod_is_forbidden_and_nothing_changes() {
    let request = request(TransportType::Internal);
    let snapshot = request.clone();
    let err = apply_action(&request, approve("ok"), &other_hod(), &context())
        .expect_err("not assigned");
    assert_eq!(err.code(), ErrorCode::Forbidden);
    assert_eq!(request, snapshot);
}

#[rstest]
fn blank_hod_comment_uses_default() {
    let request = request(TransportType::Internal);
    let next = apply_action(&request, approve("   "), &hod(), &context()).expect("approved");
    assert_eq!(
        next.approval_status().hod.as_ref().map(|s| s.comments.as_str()),
        Some(DEFAULT_HOD_COMMENT)
    );
}

#[rstest]
#[case(TransportType::Internal, RequestStatus::PendingAdminTransport)]
#[case(TransportType::External, RequestStatus::Approved)]
fn manager_approval_routes_on_transport_type(
    #[case] transport_type: TransportType,
    #[case] expected: RequestStatus,
) {
    let request = request_at(RequestStatus::PendingManagerApproval, transport_type);
    let next = apply_action(
        &request,
        WorkflowAction::ApproveAsManager { comments: None },
        &manager(),
        &context(),
    )
    .expect("approved");
    assert_eq!(next.status(), expected);
    assert!(next.approval_status().is_approved);
    assert_eq!(
        next.approval_status().manager.as_ref().map(|s| s.comments.as_str()),
        Some(DEFAULT_MANAGER_COMMENT)
    );
    assert!(next.check_invariants().is_ok());
}

#[rstest]
fn transport_admin_marks_unavailable() {
    let request = request_at(RequestStatus::PendingAdminTransport, TransportType::Internal);
    let next = apply_action(
        &request,
        WorkflowAction::MarkTransportUnavailable {
            reason: "fleet busy".to_owned(),
        },
        &transport_admin(),
        &context(),
    )
    .expect("marked");
    assert_eq!(next.status(), RequestStatus::ExternalTransportRequired);
    let processing = next.admin_processing().expect("processing recorded");
    assert_eq!(processing.unavailability_reason.as_deref(), Some("fleet busy"));
    assert_eq!(processing.admin_processed_by, "Transport Administrator");
}

#[rstest]
fn transport_admin_assigns_vehicle(assignment: InternalAssignment) {
    let request = request_at(RequestStatus::PendingAdminTransport, TransportType::Internal);
    let next = apply_action(
        &request,
        WorkflowAction::AssignInternalTransport(assignment.clone()),
        &transport_admin(),
        &context(),
    )
    .expect("assigned");
    assert_eq!(next.status(), RequestStatus::TransportArranged);
    assert_eq!(
        next.transport_details().assignment,
        Some(TransportAssignment::Internal(assignment))
    );
    assert_eq!(next.transport_details().vehicle_type, Some(VehicleTypeId::new(2)));
    assert!(next.admin_processing().is_some());
}

#[rstest]
fn requester_resubmits_after_unavailability() {
    let request = request_at(RequestStatus::ExternalTransportRequired, TransportType::Internal);
    let next = apply_action(&request, WorkflowAction::Resubmit, &custodian(), &context())
        .expect("resubmitted");
    assert_eq!(next.status(), RequestStatus::PendingHodApproval);
    assert!(!next.approval_status().is_approved);
    assert!(next.approval_status().hod.is_none());
    assert!(next.approval_status().manager.is_none());
    let round = next.earlier_rounds().first().expect("round archived");
    assert_eq!(round.hod, request.approval_status().hod);
    assert_eq!(round.manager, request.approval_status().manager);
    assert_eq!(round.resubmitted_at, now());
    assert!(next.check_invariants().is_ok());
}

#[rstest]
fn approvals_survive_a_resubmission_cycle(assignment: InternalAssignment) {
    let ctx = context();
    let step = |request: &RelocationRequest, action: WorkflowAction, actor: &User| {
        apply_action(request, action, actor, &ctx).expect("step accepted")
    };
    let first = request(TransportType::Internal);
    let first = step(&first, approve("first hod"), &hod());
    let first = step(
        &first,
        WorkflowAction::ApproveAsManager {
            comments: Some("first manager".to_owned()),
        },
        &manager(),
    );
    let unavailable = step(
        &first,
        WorkflowAction::MarkTransportUnavailable {
            reason: "fleet busy".to_owned(),
        },
        &transport_admin(),
    );
    let resubmitted = step(&unavailable, WorkflowAction::Resubmit, &custodian());
    assert_eq!(resubmitted.status(), RequestStatus::PendingHodApproval);
    assert!(!resubmitted.approval_status().is_approved);

    let second = step(&resubmitted, approve("second hod"), &hod());
    assert!(!second.approval_status().is_approved);
    let second = step(
        &second,
        WorkflowAction::ApproveAsManager {
            comments: Some("second manager".to_owned()),
        },
        &manager(),
    );
    assert!(second.approval_status().is_approved);
    let arranged = step(
        &second,
        WorkflowAction::AssignInternalTransport(assignment),
        &transport_admin(),
    );
    assert_eq!(arranged.status(), RequestStatus::TransportArranged);
    assert!(arranged.check_invariants().is_ok());

    let [round] = arranged.earlier_rounds() else {
        panic!("expected one earlier round");
    };
    let comment = |stage: &Option<StageApproval>| stage.as_ref().map(|s| s.comments.clone());
    assert_eq!(comment(&round.hod).as_deref(), Some("first hod"));
    assert_eq!(comment(&round.manager).as_deref(), Some("first manager"));
    assert_eq!(
        round
            .admin_processing
            .as_ref()
            .and_then(|processing| processing.unavailability_reason.as_deref()),
        Some("fleet busy")
    );
    assert_eq!(
        comment(&arranged.approval_status().hod).as_deref(),
        Some("second hod")
    );
    assert_eq!(
        arranged
            .admin_processing()
            .and_then(|processing| processing.unavailability_reason.as_deref()),
        None
    );

    let notes: Vec<Option<&str>> = arranged
        .history()
        .iter()
        .map(|change| change.note.as_deref())
        .collect();
    assert_eq!(
        notes,
        [
            None,
            Some("first hod"),
            Some("first manager"),
            Some("fleet busy"),
            None,
            Some("second hod"),
            Some("second manager"),
            None,
        ]
    );
}

#[rstest]
fn non_requester_cannot_resubmit() {
    let request = request_at(RequestStatus::ExternalTransportRequired, TransportType::Internal);
    let stranger = user("3", "Jane Doe", Role::Custodian);
    let err = apply_action(&request, WorkflowAction::Resubmit, &stranger, &context())
        .expect_err("not requester");
    assert_eq!(err.code(), ErrorCode::Forbidden);
}

#[rstest]
fn recording_external_transport_switches_type(external: ExternalTransport) {
    let request = request_at(RequestStatus::ExternalTransportRequired, TransportType::Internal);
    let next = apply_action(
        &request,
        WorkflowAction::RecordExternalTransport(external),
        &custodian(),
        &context(),
    )
    .expect("recorded");
    assert_eq!(next.status(), RequestStatus::ExternalTransportRequired);
    assert_eq!(next.transport_type(), TransportType::External);
    assert!(!next.transport_details().is_internal);
    assert!(next.check_invariants().is_ok());
}

#[rstest]
fn internal_request_cannot_record_external_before_admin(external: ExternalTransport) {
    let request = request(TransportType::Internal);
    let err = apply_action(
        &request,
        WorkflowAction::RecordExternalTransport(external),
        &custodian(),
        &context(),
    )
    .expect_err("internal request");
    assert_eq!(err.code(), ErrorCode::InvalidTransition);
}

#[rstest]
#[case(RequestStatus::PendingHodApproval)]
#[case(RequestStatus::PendingManagerApproval)]
#[case(RequestStatus::PendingAdminTransport)]
#[case(RequestStatus::TransportArranged)]
#[case(RequestStatus::InProgress)]
fn denial_keeps_prior_approvals(#[case] status: RequestStatus) {
    let request = request_at(status, TransportType::Internal);
    let next = apply_action(
        &request,
        WorkflowAction::DenyAsManager {
            reason: "budget freeze".to_owned(),
        },
        &manager(),
        &context(),
    )
    .expect("denied");
    assert_eq!(next.status(), RequestStatus::Denied);
    assert_eq!(next.approval_status().hod, request.approval_status().hod);
    assert_eq!(next.approval_status().manager, request.approval_status().manager);
    let denial = next.approval_status().denial.as_ref().expect("denial recorded");
    assert_eq!(denial.denial_reason, "budget freeze");
    assert_eq!(denial.denied_from, status);
}

#[rstest]
fn hod_denial_requires_reason() {
    let request = request(TransportType::Internal);
    let err = apply_action(
        &request,
        WorkflowAction::DenyAsHod {
            reason: "  ".to_owned(),
        },
        &hod(),
        &context(),
    )
    .expect_err("blank reason");
    assert_eq!(err.code(), ErrorCode::InvalidRequest);
    assert_eq!(request.status(), RequestStatus::PendingHodApproval);
}

#[rstest]
fn over_long_comment_is_rejected() {
    let request = request(TransportType::Internal);
    let limited = TransitionContext {
        max_comment_length: 5,
        ..context()
    };
    let err = apply_action(&request, approve("far too long"), &hod(), &limited)
        .expect_err("too long");
    assert_eq!(err.code(), ErrorCode::InvalidRequest);
}

#[rstest]
#[case(RequestStatus::Denied)]
#[case(RequestStatus::Completed)]
fn terminal_states_accept_nothing(
    #[case] status: RequestStatus,
    assignment: InternalAssignment,
    external: ExternalTransport,
) {
    let request = request_at(status, TransportType::Internal);
    let attempts = [
        (approve("ok"), hod()),
        (WorkflowAction::DenyAsHod { reason: "no".to_owned() }, hod()),
        (WorkflowAction::ApproveAsManager { comments: None }, manager()),
        (WorkflowAction::DenyAsManager { reason: "no".to_owned() }, manager()),
        (WorkflowAction::AssignInternalTransport(assignment), transport_admin()),
        (
            WorkflowAction::MarkTransportUnavailable { reason: "busy".to_owned() },
            transport_admin(),
        ),
        (WorkflowAction::RecordExternalTransport(external), custodian()),
        (WorkflowAction::Resubmit, custodian()),
        (WorkflowAction::Dispatch(DispatchDetails::default()), transport_admin()),
        (WorkflowAction::Complete, custodian()),
    ];
    for (action, actor) in attempts {
        let kind = action.kind();
        let err = apply_action(&request, action, &actor, &context())
            .expect_err("terminal status accepts nothing");
        assert_eq!(err.code(), ErrorCode::InvalidTransition, "{kind}");
    }
}

#[rstest]
fn dispatch_and_complete(assignment: InternalAssignment) {
    let mut request = request_at(RequestStatus::TransportArranged, TransportType::Internal);
    request.transport_details.assignment = Some(TransportAssignment::Internal(assignment));
    let dispatched = apply_action(
        &request,
        WorkflowAction::Dispatch(DispatchDetails {
            estimated_arrival: Some(now()),
            current_custodian_notified: true,
            new_custodian_notified: true,
        }),
        &transport_admin(),
        &context(),
    )
    .expect("dispatched");
    assert_eq!(dispatched.status(), RequestStatus::InProgress);
    assert!(dispatched.dispatch_status().is_dispatched);
    assert!(dispatched.transport_details().is_dispatched);
    assert_eq!(
        dispatched.dispatch_status().dispatched_by.as_deref(),
        Some("Transport Administrator")
    );

    let completed = apply_action(&dispatched, WorkflowAction::Complete, &custodian(), &context())
        .expect("completed");
    assert_eq!(completed.status(), RequestStatus::Completed);
    assert_eq!(completed.dispatch_status().completed_date, Some(now()));
    assert_eq!(completed.history().len(), request.history().len() + 2);
}

#[rstest]
fn dispatch_needs_arranged_transport() {
    let request = request_at(RequestStatus::Approved, TransportType::External);
    let err = apply_action(
        &request,
        WorkflowAction::Dispatch(DispatchDetails::default()),
        &transport_admin(),
        &context(),
    )
    .expect_err("no transport yet");
    assert_eq!(err.code(), ErrorCode::InvalidRequest);
}

#[rstest]
fn history_is_append_only() {
    let request = request(TransportType::Internal);
    let next = apply_action(&request, approve("ok"), &hod(), &context()).expect("approved");
    assert_eq!(next.history().len(), 2);
    assert_eq!(next.history().first(), request.history().first());
    let last = next.history().last().expect("entry");
    assert_eq!(last.from, Some(RequestStatus::PendingHodApproval));
    assert_eq!(last.to, RequestStatus::PendingManagerApproval);
    assert_eq!(last.action, WorkflowActionKind::ApproveAsHod);
    assert_eq!(last.note.as_deref(), Some("ok"));
}

#[rstest]
fn erp_only_statuses_only_accept_manager_denial() {
    for status in [RequestStatus::HodApproved, RequestStatus::ManagerApproved] {
        let allowed: Vec<_> = WorkflowActionKind::TRANSITIONS
            .into_iter()
            .filter(|kind| next_status(status, *kind, TransportType::Internal).is_some())
            .collect();
        assert_eq!(allowed, vec![WorkflowActionKind::DenyAsManager]);
    }
}

#[rstest]
#[case(hod(), vec![WorkflowActionKind::ApproveAsHod, WorkflowActionKind::DenyAsHod])]
#[case(manager(), vec![WorkflowActionKind::DenyAsManager])]
#[case(other_hod(), vec![])]
#[case(transport_admin(), vec![])]
#[case(system_admin(), vec![])]
fn available_actions_for_fresh_request(
    #[case] user: crate::domain::user::User,
    #[case] expected: Vec<WorkflowActionKind>,
) {
    assert_eq!(available_actions(&request(TransportType::Internal), &user), expected);
}

#[rstest]
fn available_actions_for_transport_queue() {
    let request = request_at(RequestStatus::PendingAdminTransport, TransportType::Internal);
    assert_eq!(
        available_actions(&request, &transport_admin()),
        vec![
            WorkflowActionKind::AssignInternalTransport,
            WorkflowActionKind::MarkTransportUnavailable,
        ]
    );
}
