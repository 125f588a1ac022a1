//! In-memory relocation request repository.

use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard};

use async_trait::async_trait;
use tracing::debug;

use crate::domain::ports::{
    RelocationRequestRepository, RelocationRequestRepositoryError, RequestListFilter,
};
use crate::domain::{RelocationRequest, RequestId};

#[derive(Debug, Default)]
struct Store {
    requests: HashMap<RequestId, RelocationRequest>,
    sequences: HashMap<i32, u32>,
}

/// Repository holding requests in a map behind one mutex.
///
/// Reads and the revision check-and-write happen under the same lock, so a
/// stale writer always sees [`RelocationRequestRepositoryError::RevisionMismatch`].
#[derive(Debug, Default)]
pub struct InMemoryRelocationRepository {
    store: Mutex<Store>,
}

impl InMemoryRelocationRepository {
    /// Create an empty repository.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a repository holding `requests`.
    ///
    /// Per-year sequences resume after the highest stored request number of
    /// each year.
    pub fn with_requests(requests: impl IntoIterator<Item = RelocationRequest>) -> Self {
        let mut store = Store::default();
        for request in requests {
            let number = request.request_number();
            let sequence = store.sequences.entry(number.year()).or_insert(0);
            *sequence = (*sequence).max(number.sequence());
            store.requests.insert(*request.id(), request);
        }
        Self {
            store: Mutex::new(store),
        }
    }

    fn lock(&self) -> Result<MutexGuard<'_, Store>, RelocationRequestRepositoryError> {
        self.store.lock().map_err(|_| {
            debug!("relocation store mutex poisoned");
            RelocationRequestRepositoryError::query("relocation store lock poisoned")
        })
    }
}

#[async_trait]
impl RelocationRequestRepository for InMemoryRelocationRepository {
    async fn find_by_id(
        &self,
        id: &RequestId,
    ) -> Result<Option<RelocationRequest>, RelocationRequestRepositoryError> {
        Ok(self.lock()?.requests.get(id).cloned())
    }

    async fn save(
        &self,
        request: &RelocationRequest,
        expected_revision: Option<u32>,
    ) -> Result<(), RelocationRequestRepositoryError> {
        let mut store = self.lock()?;
        let stored_revision = store.requests.get(request.id()).map(RelocationRequest::revision);
        match (expected_revision, stored_revision) {
            (None, Some(_)) => {
                return Err(RelocationRequestRepositoryError::query(format!(
                    "relocation request {} already exists",
                    request.request_number()
                )));
            }
            (Some(_), None) => {
                return Err(RelocationRequestRepositoryError::not_found(
                    request.id().to_string(),
                ));
            }
            (Some(expected), Some(actual)) if expected != actual => {
                debug!(
                    request_id = %request.request_number(),
                    expected,
                    actual,
                    "relocation request revision conflict"
                );
                return Err(RelocationRequestRepositoryError::revision_mismatch(
                    expected, actual,
                ));
            }
            _ => {}
        }
        store.requests.insert(*request.id(), request.clone());
        debug!(
            request_id = %request.request_number(),
            revision = request.revision(),
            status = %request.status(),
            "relocation request stored"
        );
        Ok(())
    }

    async fn list(
        &self,
        filter: &RequestListFilter,
    ) -> Result<Vec<RelocationRequest>, RelocationRequestRepositoryError> {
        let mut matching: Vec<RelocationRequest> = self
            .lock()?
            .requests
            .values()
            .filter(|request| filter.matches(request))
            .cloned()
            .collect();
        matching.sort_by(|left, right| {
            left.request_date()
                .cmp(&right.request_date())
                .then_with(|| left.request_number().cmp(right.request_number()))
        });
        Ok(matching)
    }

    async fn next_sequence(&self, year: i32) -> Result<u32, RelocationRequestRepositoryError> {
        let mut store = self.lock()?;
        let sequence = store.sequences.entry(year).or_insert(0);
        *sequence = sequence.checked_add(1).ok_or_else(|| {
            RelocationRequestRepositoryError::query(format!(
                "request number sequence exhausted for {year}"
            ))
        })?;
        Ok(*sequence)
    }
}
