//! Dashboard projector.
//!
//! Derives a user's view of the request collection: the role projection from
//! the permission resolver, role-specific stat cards counted over that
//! projection, and the rows left after the status tab and search are applied.
//! Nothing here is cached; every call recomputes from its inputs.

use std::fmt;

use serde::{Deserialize, Serialize};

use super::permissions;
use super::relocation::{RelocationRequest, RequestStatus};
use super::user::{Role, User};
use super::workflow::{self, WorkflowActionKind};

/// Capability flags and title for a user's dashboard.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardConfig {
    /// Role dashboard heading.
    pub title: String,
    /// May raise requests.
    pub can_create_requests: bool,
    /// First-line approver.
    pub can_approve_requests: bool,
    /// Final approver.
    pub can_final_approve: bool,
    /// Transport administrator.
    pub can_assign_transport: bool,
    /// System administrator.
    pub can_manage_system: bool,
    /// Sees every request.
    pub show_all_requests: bool,
    /// Works the transport queue.
    pub show_transport_queue: bool,
    /// Works an approval queue.
    pub show_approval_queue: bool,
}

impl DashboardConfig {
    /// Build the configuration for `user`.
    pub fn for_user(user: &User) -> Self {
        Self {
            title: dashboard_title(user.role).to_owned(),
            can_create_requests: permissions::can_create_request(user),
            can_approve_requests: permissions::can_approve_requests(user),
            can_final_approve: permissions::can_final_approve_requests(user),
            can_assign_transport: permissions::can_assign_transport(user),
            can_manage_system: permissions::can_manage_system(user),
            show_all_requests: permissions::can_manage_system(user),
            show_transport_queue: permissions::can_assign_transport(user),
            show_approval_queue: permissions::can_approve_requests(user)
                || permissions::can_final_approve_requests(user),
        }
    }
}

fn dashboard_title(role: Role) -> &'static str {
    match role {
        Role::SystemAdmin => "System Administrator Dashboard",
        Role::Custodian => "My Asset Relocation Requests",
        Role::TransportAdmin => "Transport Assignment Dashboard",
        Role::Hod => "HOD Approval Dashboard",
        Role::AssetManager => "Asset Manager Dashboard",
    }
}

/// Error returned when parsing an unknown filter tab.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown status filter: {input}")]
pub struct ParseStatusFilterError {
    /// The unrecognised input value.
    pub input: String,
}

/// Status tabs applied on top of the role projection.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StatusFilter {
    /// Every projected request.
    #[default]
    All,
    /// Statuses reading as pending.
    Pending,
    /// `Pending Admin Transport`.
    Admin,
    /// `Transport Arranged`.
    Arranged,
    /// `External Transport Required`.
    External,
    /// Statuses reading as approved.
    Approved,
    /// `In Progress`.
    Progress,
    /// `Completed`.
    Completed,
}

impl StatusFilter {
    /// Every tab.
    pub const ALL: [Self; 8] = [
        Self::All,
        Self::Pending,
        Self::Admin,
        Self::Arranged,
        Self::External,
        Self::Approved,
        Self::Progress,
        Self::Completed,
    ];

    /// Returns the tab key.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::All => "all",
            Self::Pending => "pending",
            Self::Admin => "admin",
            Self::Arranged => "arranged",
            Self::External => "external",
            Self::Approved => "approved",
            Self::Progress => "progress",
            Self::Completed => "completed",
        }
    }

    /// Whether a request in `status` shows under this tab.
    pub fn matches(self, status: RequestStatus) -> bool {
        match self {
            Self::All => true,
            Self::Pending => status.is_pending(),
            Self::Admin => status == RequestStatus::PendingAdminTransport,
            Self::Arranged => status == RequestStatus::TransportArranged,
            Self::External => status == RequestStatus::ExternalTransportRequired,
            Self::Approved => status.is_approved_label(),
            Self::Progress => status == RequestStatus::InProgress,
            Self::Completed => status == RequestStatus::Completed,
        }
    }
}

impl fmt::Display for StatusFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for StatusFilter {
    type Err = ParseStatusFilterError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|filter| filter.as_str() == s)
            .ok_or_else(|| ParseStatusFilterError {
                input: s.to_owned(),
            })
    }
}

/// Tab and free-text search for a dashboard.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardQuery {
    /// Status tab.
    #[serde(default)]
    pub filter: StatusFilter,
    /// Case-insensitive match on request number, asset name, asset code or
    /// requester.
    #[serde(default)]
    pub search: Option<String>,
}

impl DashboardQuery {
    /// Query for a tab with no search.
    pub fn tab(filter: StatusFilter) -> Self {
        Self {
            filter,
            search: None,
        }
    }

    fn matches(&self, request: &RelocationRequest) -> bool {
        if !self.filter.matches(request.status()) {
            return false;
        }
        let Some(needle) = self
            .search
            .as_deref()
            .map(str::trim)
            .filter(|needle| !needle.is_empty())
        else {
            return true;
        };
        let needle = needle.to_lowercase();
        [
            request.request_number().as_str(),
            request.asset().asset_name.as_str(),
            request.asset().asset_code.as_str(),
            request.requested_by(),
        ]
        .into_iter()
        .any(|field| field.to_lowercase().contains(&needle))
    }
}

/// One headline count.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StatCard {
    /// Card label.
    pub label: String,
    /// Count.
    pub value: usize,
}

impl StatCard {
    fn count(
        label: &str,
        requests: &[&RelocationRequest],
        predicate: impl Fn(RequestStatus) -> bool,
    ) -> Self {
        Self {
            label: label.to_owned(),
            value: requests
                .iter()
                .filter(|request| predicate(request.status()))
                .count(),
        }
    }
}

/// Count of projected requests in one status.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StatusCount {
    /// Status.
    pub status: RequestStatus,
    /// Number of projected requests in it.
    pub count: usize,
}

/// A projected request with the actions the viewer may take on it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardRow {
    /// The request.
    pub request: RelocationRequest,
    /// Actions the viewer may take now.
    pub available_actions: Vec<WorkflowActionKind>,
}

/// Everything a dashboard renders.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardSummary {
    /// Flags and title.
    pub config: DashboardConfig,
    /// Headline counts over the role projection.
    pub stats: Vec<StatCard>,
    /// Per-status counts over the role projection, lifecycle order, zero
    /// counts omitted.
    pub status_breakdown: Vec<StatusCount>,
    /// Tab applied to the rows.
    pub filter: StatusFilter,
    /// Rows after the tab and search, newest first.
    pub requests: Vec<DashboardRow>,
}

fn stat_cards(role: Role, projected: &[&RelocationRequest]) -> Vec<StatCard> {
    let total = StatCard {
        label: "Total Requests".to_owned(),
        value: projected.len(),
    };
    let is = |wanted: RequestStatus| move |status: RequestStatus| status == wanted;
    let role_cards = match role {
        Role::Custodian => vec![
            StatCard::count("Pending Approval", projected, RequestStatus::is_pending),
            StatCard::count("Approved", projected, RequestStatus::is_approved_label),
            StatCard::count("In Progress", projected, is(RequestStatus::InProgress)),
        ],
        Role::TransportAdmin => vec![
            StatCard::count(
                "Pending Transport Assignment",
                projected,
                is(RequestStatus::PendingAdminTransport),
            ),
            StatCard::count(
                "Transport Arranged",
                projected,
                is(RequestStatus::TransportArranged),
            ),
            StatCard::count(
                "External Required",
                projected,
                is(RequestStatus::ExternalTransportRequired),
            ),
        ],
        Role::Hod => vec![
            StatCard::count(
                "Pending My Approval",
                projected,
                is(RequestStatus::PendingHodApproval),
            ),
            StatCard::count("Approved by Me", projected, is(RequestStatus::HodApproved)),
            StatCard::count("Completed", projected, is(RequestStatus::Completed)),
        ],
        Role::AssetManager => vec![
            StatCard::count(
                "Pending Final Approval",
                projected,
                is(RequestStatus::PendingManagerApproval),
            ),
            StatCard::count("Final Approved", projected, is(RequestStatus::ManagerApproved)),
            StatCard::count("Completed", projected, is(RequestStatus::Completed)),
        ],
        Role::SystemAdmin => vec![
            StatCard::count("Pending Approval", projected, RequestStatus::is_pending),
            StatCard::count("Approved", projected, RequestStatus::is_approved_label),
            StatCard::count("Completed", projected, is(RequestStatus::Completed)),
        ],
    };
    std::iter::once(total).chain(role_cards).collect()
}

fn status_breakdown(projected: &[&RelocationRequest]) -> Vec<StatusCount> {
    RequestStatus::ALL
        .into_iter()
        .map(|status| StatusCount {
            status,
            count: projected
                .iter()
                .filter(|request| request.status() == status)
                .count(),
        })
        .filter(|entry| entry.count > 0)
        .collect()
}

/// Project `requests` for `user`.
///
/// # Examples
/// ```
/// use moveitright::domain::dashboard::{DashboardQuery, project_dashboard};
/// use moveitright::domain::{Role, User, UserId};
///
/// let admin = User::new(UserId::new("1").expect("id"), "Admin", Role::SystemAdmin);
/// let summary = project_dashboard(&[], &admin, &DashboardQuery::default());
/// assert_eq!(summary.config.title, "System Administrator Dashboard");
/// assert_eq!(summary.stats.first().map(|card| card.value), Some(0));
/// ```
pub fn project_dashboard(
    requests: &[RelocationRequest],
    user: &User,
    query: &DashboardQuery,
) -> DashboardSummary {
    let projected = permissions::filtered_requests(requests, user);
    let mut rows: Vec<DashboardRow> = projected
        .iter()
        .filter(|request| query.matches(request))
        .map(|request| DashboardRow {
            request: (*request).clone(),
            available_actions: workflow::available_actions(request, user),
        })
        .collect();
    rows.sort_by(|left, right| {
        right
            .request
            .request_date()
            .cmp(&left.request.request_date())
            .then_with(|| right.request.request_number().cmp(left.request.request_number()))
    });

    DashboardSummary {
        config: DashboardConfig::for_user(user),
        stats: stat_cards(user.role, &projected),
        status_breakdown: status_breakdown(&projected),
        filter: query.filter,
        requests: rows,
    }
}

#[cfg(test)]
mod tests {
    //! Regression coverage for this module.
    use super::*;
    use crate::domain::relocation::TransportType;
    use crate::domain::test_fixtures::{
        custodian, hod, manager, request_at, system_admin, transport_admin,
    };
    use rstest::rstest;

    fn every_status() -> Vec<RelocationRequest> {
        RequestStatus::ALL
            .into_iter()
            .map(|status| request_at(status, TransportType::Internal))
            .collect()
    }

    fn card_values(summary: &DashboardSummary) -> Vec<(&str, usize)> {
        summary
            .stats
            .iter()
            .map(|card| (card.label.as_str(), card.value))
            .collect()
    }

    #[rstest]
    fn custodian_cards_count_label_text() {
        let summary = project_dashboard(&every_status(), &custodian(), &DashboardQuery::default());
        assert_eq!(
            card_values(&summary),
            vec![
                ("Total Requests", 11),
                ("Pending Approval", 3),
                ("Approved", 3),
                ("In Progress", 1),
            ]
        );
        assert_eq!(summary.config.title, "My Asset Relocation Requests");
        assert!(summary.config.can_create_requests);
    }

    #[rstest]
    fn transport_admin_cards() {
        let summary =
            project_dashboard(&every_status(), &transport_admin(), &DashboardQuery::default());
        assert_eq!(
            card_values(&summary),
            vec![
                ("Total Requests", 3),
                ("Pending Transport Assignment", 1),
                ("Transport Arranged", 1),
                ("External Required", 1),
            ]
        );
        assert!(summary.config.show_transport_queue);
    }

    #[rstest]
    fn hod_cards_cover_only_their_queue() {
        let summary = project_dashboard(&every_status(), &hod(), &DashboardQuery::default());
        assert_eq!(
            card_values(&summary),
            vec![
                ("Total Requests", 2),
                ("Pending My Approval", 1),
                ("Approved by Me", 1),
                ("Completed", 0),
            ]
        );
        assert!(summary.config.show_approval_queue);
    }

    #[rstest]
    fn manager_rows_offer_actions() {
        let summary = project_dashboard(&every_status(), &manager(), &DashboardQuery::default());
        let pending = summary
            .requests
            .iter()
            .find(|row| row.request.status() == RequestStatus::PendingManagerApproval)
            .expect("pending manager row");
        assert_eq!(
            pending.available_actions,
            vec![
                WorkflowActionKind::ApproveAsManager,
                WorkflowActionKind::DenyAsManager
            ]
        );
    }

    #[rstest]
    #[case(StatusFilter::All, 11)]
    #[case(StatusFilter::Pending, 3)]
    #[case(StatusFilter::Admin, 1)]
    #[case(StatusFilter::Arranged, 1)]
    #[case(StatusFilter::External, 1)]
    #[case(StatusFilter::Approved, 3)]
    #[case(StatusFilter::Progress, 1)]
    #[case(StatusFilter::Completed, 1)]
    fn tabs_filter_rows_but_not_stats(#[case] filter: StatusFilter, #[case] rows: usize) {
        let summary =
            project_dashboard(&every_status(), &system_admin(), &DashboardQuery::tab(filter));
        assert_eq!(summary.requests.len(), rows);
        assert_eq!(summary.stats.first().map(|card| card.value), Some(11));
    }

    #[rstest]
    #[case("req-2024", 11)]
    #[case("office desk", 11)]
    #[case("fur-0", 11)]
    #[case("john", 11)]
    #[case("forklift", 0)]
    #[case("   ", 11)]
    fn search_matches_number_asset_name_code_and_requester(#[case] needle: &str, #[case] rows: usize) {
        let query = DashboardQuery {
            filter: StatusFilter::All,
            search: Some(needle.to_owned()),
        };
        let summary = project_dashboard(&every_status(), &system_admin(), &query);
        assert_eq!(summary.requests.len(), rows);
    }

    #[rstest]
    fn breakdown_omits_empty_statuses() {
        let summary = project_dashboard(&every_status(), &hod(), &DashboardQuery::default());
        assert_eq!(
            summary.status_breakdown,
            vec![
                StatusCount {
                    status: RequestStatus::PendingHodApproval,
                    count: 1
                },
                StatusCount {
                    status: RequestStatus::HodApproved,
                    count: 1
                },
            ]
        );
    }

    #[rstest]
    fn filter_tabs_parse() {
        for filter in StatusFilter::ALL {
            assert_eq!(filter.as_str().parse::<StatusFilter>(), Ok(filter));
        }
        assert!("archived".parse::<StatusFilter>().is_err());
    }
}
