//! Driving port for relocation request reads.

use async_trait::async_trait;

use crate::domain::dashboard::{DashboardQuery, DashboardRow, DashboardSummary, project_dashboard};
use crate::domain::{Error, RequestId, User};

/// Driving port for role-scoped request views.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait RelocationQuery: Send + Sync {
    /// One request with the actions `viewer` may take on it.
    ///
    /// # Errors
    /// `not_found` when no such request exists and `forbidden` when it lies
    /// outside the viewer's projection.
    async fn get_request(&self, viewer: &User, id: &RequestId) -> Result<DashboardRow, Error>;

    /// The viewer's dashboard.
    async fn dashboard(
        &self,
        viewer: &User,
        query: &DashboardQuery,
    ) -> Result<DashboardSummary, Error>;
}

/// Fixture query over an empty store.
#[derive(Debug, Default, Clone, Copy)]
pub struct FixtureRelocationQuery;

#[async_trait]
impl RelocationQuery for FixtureRelocationQuery {
    async fn get_request(&self, _viewer: &User, id: &RequestId) -> Result<DashboardRow, Error> {
        Err(Error::not_found(format!("relocation request {id} not found")))
    }

    async fn dashboard(
        &self,
        viewer: &User,
        query: &DashboardQuery,
    ) -> Result<DashboardSummary, Error> {
        Ok(project_dashboard(&[], viewer, query))
    }
}
