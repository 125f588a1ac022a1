//! Port for relocation request persistence.
//!
//! Adapters store whole request records and guard writes with a revision
//! compare-and-swap, so two concurrent transitions on one request cannot
//! both land.

use async_trait::async_trait;

use crate::domain::{RelocationRequest, RequestId, RequestStatus, UserId};

use super::define_port_error;

define_port_error! {
    /// Errors raised by relocation request repository adapters.
    pub enum RelocationRequestRepositoryError {
        /// Repository connection could not be established.
        Connection { message: String } =>
            "relocation repository connection failed: {message}"; transient,
        /// Query or mutation failed during execution.
        Query { message: String } =>
            "relocation repository query failed: {message}",
        /// Optimistic concurrency check failed.
        RevisionMismatch { expected: u32, actual: u32 } =>
            "revision mismatch: expected {expected}, found {actual}",
        /// An update targeted a request that is not stored.
        NotFound { id: String } =>
            "relocation request {id} not found",
    }
}

/// Storage-level selection of requests.
///
/// Every populated criterion must match. The permission resolver builds one
/// per user; adapters may translate it into a query or apply
/// [`RequestListFilter::matches`] in memory.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RequestListFilter {
    statuses: Option<Vec<RequestStatus>>,
    requested_by: Option<UserId>,
    assigned_hod: Option<UserId>,
    assigned_manager: Option<UserId>,
}

impl RequestListFilter {
    /// Match every request.
    pub fn all() -> Self {
        Self::default()
    }

    /// Restrict to the given statuses.
    pub fn with_statuses(mut self, statuses: impl IntoIterator<Item = RequestStatus>) -> Self {
        self.statuses = Some(statuses.into_iter().collect());
        self
    }

    /// Restrict to one requester.
    pub fn requested_by(mut self, user_id: UserId) -> Self {
        self.requested_by = Some(user_id);
        self
    }

    /// Restrict to one assigned HOD.
    pub fn assigned_hod(mut self, user_id: UserId) -> Self {
        self.assigned_hod = Some(user_id);
        self
    }

    /// Restrict to one assigned asset manager.
    pub fn assigned_manager(mut self, user_id: UserId) -> Self {
        self.assigned_manager = Some(user_id);
        self
    }

    /// Status criterion, if any.
    pub fn statuses(&self) -> Option<&[RequestStatus]> {
        self.statuses.as_deref()
    }

    /// Whether `request` satisfies every populated criterion.
    pub fn matches(&self, request: &RelocationRequest) -> bool {
        let status_ok = self
            .statuses
            .as_ref()
            .is_none_or(|statuses| statuses.contains(&request.status()));
        let requester_ok = self
            .requested_by
            .as_ref()
            .is_none_or(|id| request.requested_by_user_id() == id);
        let hod_ok = self
            .assigned_hod
            .as_ref()
            .is_none_or(|id| &request.assigned_hod().id == id);
        let manager_ok = self
            .assigned_manager
            .as_ref()
            .is_none_or(|id| &request.assigned_manager().id == id);
        status_ok && requester_ok && hod_ok && manager_ok
    }
}

/// Port for relocation request storage and retrieval.
///
/// # Revision Semantics
///
/// - New requests are stored at revision 1.
/// - The caller sets the new revision on the record before saving; the
///   repository does not increment it.
/// - `save(request, None)` inserts and fails with a `Query` error when the
///   id is already stored.
/// - `save(request, Some(n))` replaces the stored record only when its
///   revision is still `n`, otherwise it returns
///   [`RelocationRequestRepositoryError::RevisionMismatch`].
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait RelocationRequestRepository: Send + Sync {
    /// Fetch one request.
    async fn find_by_id(
        &self,
        id: &RequestId,
    ) -> Result<Option<RelocationRequest>, RelocationRequestRepositoryError>;

    /// Insert or conditionally replace a request.
    async fn save(
        &self,
        request: &RelocationRequest,
        expected_revision: Option<u32>,
    ) -> Result<(), RelocationRequestRepositoryError>;

    /// List requests matching `filter`, oldest submission first.
    async fn list(
        &self,
        filter: &RequestListFilter,
    ) -> Result<Vec<RelocationRequest>, RelocationRequestRepositoryError>;

    /// Reserve the next request number sequence for `year` (starting at 1).
    async fn next_sequence(&self, year: i32) -> Result<u32, RelocationRequestRepositoryError>;
}

/// Fixture implementation for tests that do not exercise persistence.
#[derive(Debug, Default, Clone, Copy)]
pub struct FixtureRelocationRequestRepository;

#[async_trait]
impl RelocationRequestRepository for FixtureRelocationRequestRepository {
    async fn find_by_id(
        &self,
        _id: &RequestId,
    ) -> Result<Option<RelocationRequest>, RelocationRequestRepositoryError> {
        Ok(None)
    }

    async fn save(
        &self,
        _request: &RelocationRequest,
        _expected_revision: Option<u32>,
    ) -> Result<(), RelocationRequestRepositoryError> {
        Ok(())
    }

    async fn list(
        &self,
        _filter: &RequestListFilter,
    ) -> Result<Vec<RelocationRequest>, RelocationRequestRepositoryError> {
        Ok(Vec::new())
    }

    async fn next_sequence(&self, _year: i32) -> Result<u32, RelocationRequestRepositoryError> {
        Ok(1)
    }
}
