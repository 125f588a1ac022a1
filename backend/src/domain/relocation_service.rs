//! Relocation workflow service.
//!
//! Implements the driving ports over the repository, catalogue and
//! notification ports: load the request, authorize, resolve catalogue
//! inputs, compute the transition on a clone, save it with a revision
//! compare-and-swap, then publish the outcome.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::Datelike;
use mockable::Clock;
use serde_json::json;
use tracing::{info, warn};

use crate::domain::dashboard::{DashboardQuery, DashboardRow, DashboardSummary, project_dashboard};
use crate::domain::ports::{
    ApplyActionRequest, NotificationSink, RelocationCommand, RelocationQuery,
    RelocationRequestRepository, RelocationRequestRepositoryError, TransitionOutcome,
    TransportCatalogue, TransportCatalogueError, WorkflowCommand,
};
use crate::domain::{
    Error, ExternalTransport, ExternalTransportInput, RelocationRequest, RelocationRequestDraft,
    RequestId, RequestNumber, TransitionContext, User, WorkflowAction, WorkflowActionKind,
    WorkflowNotification, permissions, workflow,
};

/// Tunables the service applies to every call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WorkflowRules {
    /// Prefix of request numbers, e.g. `REQ`.
    pub request_number_prefix: String,
    /// Prefix of asset collection document numbers, e.g. `ACD`.
    pub collection_document_prefix: String,
    /// Upper bound on comments and reasons, in characters.
    pub max_comment_length: usize,
}

impl Default for WorkflowRules {
    fn default() -> Self {
        Self {
            request_number_prefix: "REQ".to_owned(),
            collection_document_prefix: "ACD".to_owned(),
            max_comment_length: 500,
        }
    }
}

/// Relocation service implementing [`RelocationCommand`] and
/// [`RelocationQuery`].
#[derive(Clone)]
pub struct RelocationWorkflowService<R, C> {
    requests: Arc<R>,
    catalogue: Arc<C>,
    notifier: Arc<dyn NotificationSink>,
    clock: Arc<dyn Clock>,
    rules: WorkflowRules,
}

impl<R, C> RelocationWorkflowService<R, C> {
    /// Create a new service.
    pub fn new(
        requests: Arc<R>,
        catalogue: Arc<C>,
        notifier: Arc<dyn NotificationSink>,
        clock: Arc<dyn Clock>,
        rules: WorkflowRules,
    ) -> Self {
        Self {
            requests,
            catalogue,
            notifier,
            clock,
            rules,
        }
    }

    /// Rules in force.
    pub fn rules(&self) -> &WorkflowRules {
        &self.rules
    }

    /// Asset collection document number for `request`, e.g. `ACD-2024-001`
    /// for `REQ-2024-001`.
    ///
    /// # Errors
    /// `internal_error` when the configured prefix is unusable.
    pub fn collection_document_number(
        &self,
        request: &RelocationRequest,
    ) -> Result<RequestNumber, Error> {
        request
            .request_number()
            .with_prefix(&self.rules.collection_document_prefix)
            .map_err(|err| Error::internal(format!("invalid collection document prefix: {err}")))
    }

    fn context(&self) -> TransitionContext {
        TransitionContext {
            now: self.clock.utc(),
            max_comment_length: self.rules.max_comment_length,
        }
    }
}

impl<R, C> RelocationWorkflowService<R, C>
where
    R: RelocationRequestRepository,
    C: TransportCatalogue,
{
    fn map_repository_error(error: RelocationRequestRepositoryError) -> Error {
        match error {
            RelocationRequestRepositoryError::Connection { message } => {
                Error::service_unavailable(format!("relocation repository unavailable: {message}"))
            }
            RelocationRequestRepositoryError::Query { message } => {
                Error::internal(format!("relocation repository error: {message}"))
            }
            RelocationRequestRepositoryError::RevisionMismatch { expected, actual } => {
                Self::revision_conflict(expected, actual)
            }
            RelocationRequestRepositoryError::NotFound { id } => {
                Error::not_found(format!("relocation request {id} not found"))
            }
        }
    }

    fn map_catalogue_error(error: TransportCatalogueError) -> Error {
        match error {
            TransportCatalogueError::Connection { message } => {
                Error::service_unavailable(format!("transport catalogue unavailable: {message}"))
            }
            TransportCatalogueError::Query { message } => {
                Error::internal(format!("transport catalogue error: {message}"))
            }
        }
    }

    fn revision_conflict(expected: u32, actual: u32) -> Error {
        Error::conflict("revision mismatch").with_details(json!({
            "expectedRevision": expected,
            "actualRevision": actual,
            "code": "revision_mismatch",
        }))
    }

    async fn load(&self, id: &RequestId) -> Result<RelocationRequest, Error> {
        self.requests
            .find_by_id(id)
            .await
            .map_err(Self::map_repository_error)?
            .ok_or_else(|| Error::not_found(format!("relocation request {id} not found")))
    }

    async fn publish(&self, notification: &WorkflowNotification) {
        if let Err(error) = self.notifier.publish(notification).await {
            warn!(
                %error,
                transient = error.is_transient(),
                title = %notification.title,
                "workflow notification was not delivered"
            );
        }
    }

    async fn resolve_external(
        &self,
        input: ExternalTransportInput,
    ) -> Result<ExternalTransport, Error> {
        let transporter = self
            .catalogue
            .transporter(input.transporter_id)
            .await
            .map_err(Self::map_catalogue_error)?
            .ok_or_else(|| {
                Error::invalid_request(format!("unknown transporter {}", input.transporter_id))
                    .with_details(json!({ "field": "transporterId" }))
            })?;
        input.resolve(&transporter)
    }

    async fn resolve(
        &self,
        command: WorkflowCommand,
        request: &RelocationRequest,
    ) -> Result<WorkflowAction, Error> {
        Ok(match command {
            WorkflowCommand::ApproveAsHod { comments } => WorkflowAction::ApproveAsHod { comments },
            WorkflowCommand::DenyAsHod { reason } => WorkflowAction::DenyAsHod { reason },
            WorkflowCommand::ApproveAsManager { comments } => {
                WorkflowAction::ApproveAsManager { comments }
            }
            WorkflowCommand::DenyAsManager { reason } => WorkflowAction::DenyAsManager { reason },
            WorkflowCommand::AssignInternalTransport(input) => {
                let vehicle = self
                    .catalogue
                    .internal_vehicle(input.vehicle_id)
                    .await
                    .map_err(Self::map_catalogue_error)?
                    .ok_or_else(|| {
                        Error::invalid_request(format!(
                            "unknown internal vehicle {}",
                            input.vehicle_id
                        ))
                        .with_details(json!({ "field": "vehicleId" }))
                    })?;
                WorkflowAction::AssignInternalTransport(
                    input.resolve(&vehicle, request.requested_date())?,
                )
            }
            WorkflowCommand::MarkTransportUnavailable { reason } => {
                WorkflowAction::MarkTransportUnavailable { reason }
            }
            WorkflowCommand::RecordExternalTransport(input) => {
                WorkflowAction::RecordExternalTransport(self.resolve_external(input).await?)
            }
            WorkflowCommand::Resubmit => WorkflowAction::Resubmit,
            WorkflowCommand::Dispatch(details) => WorkflowAction::Dispatch(details),
            WorkflowCommand::Complete => WorkflowAction::Complete,
        })
    }

    async fn submit(
        &self,
        requester: &User,
        mut draft: RelocationRequestDraft,
    ) -> Result<TransitionOutcome, Error> {
        permissions::authorize_create(requester)?;
        draft.validate(requester, self.rules.max_comment_length)?;
        if let Some(vehicle_type) = draft.transport_vehicle_type {
            self.catalogue
                .vehicle_type(vehicle_type)
                .await
                .map_err(Self::map_catalogue_error)?
                .ok_or_else(|| {
                    Error::invalid_request(format!("unknown vehicle type {vehicle_type}"))
                        .with_details(json!({ "field": "transportVehicleType" }))
                })?;
        }
        let external = match draft.external_transport.take() {
            Some(input) => Some(self.resolve_external(input).await?),
            None => None,
        };

        let now = self.clock.utc();
        let year = now.year();
        let sequence = self
            .requests
            .next_sequence(year)
            .await
            .map_err(Self::map_repository_error)?;
        let number = RequestNumber::compose(&self.rules.request_number_prefix, year, sequence)
            .map_err(|err| Error::internal(format!("invalid request number prefix: {err}")))?;
        let request =
            RelocationRequest::submit(RequestId::random(), number, draft, external, requester, now);
        self.requests
            .save(&request, None)
            .await
            .map_err(Self::map_repository_error)?;

        info!(
            request_id = %request.request_number(),
            to = %request.status(),
            actor = %requester.id,
            "relocation request submitted"
        );
        let notification =
            WorkflowNotification::for_action(WorkflowActionKind::Submit, &request, now);
        self.publish(&notification).await;
        Ok(TransitionOutcome {
            request,
            notification,
        })
    }

    async fn transition(
        &self,
        actor: &User,
        request: ApplyActionRequest,
    ) -> Result<TransitionOutcome, Error> {
        let ApplyActionRequest {
            request_id,
            command,
            expected_revision,
        } = request;
        let current = self.load(&request_id).await?;
        if let Some(expected) = expected_revision.filter(|rev| *rev != current.revision()) {
            return Err(Self::revision_conflict(expected, current.revision()));
        }

        workflow::ensure_allowed(&current, command.kind(), actor)?;
        let action = self.resolve(command, &current).await?;
        let kind = action.kind();
        let context = self.context();
        let mut updated = workflow::apply_action(&current, action, actor, &context)?;
        updated.revision = current.revision().saturating_add(1);
        self.requests
            .save(&updated, Some(current.revision()))
            .await
            .map_err(Self::map_repository_error)?;

        info!(
            request_id = %updated.request_number(),
            action = %kind,
            from = %current.status(),
            to = %updated.status(),
            actor = %actor.id,
            revision = updated.revision(),
            "relocation request transitioned"
        );
        let notification = WorkflowNotification::for_action(kind, &updated, context.now);
        self.publish(&notification).await;
        Ok(TransitionOutcome {
            request: updated,
            notification,
        })
    }
}

#[async_trait]
impl<R, C> RelocationCommand for RelocationWorkflowService<R, C>
where
    R: RelocationRequestRepository,
    C: TransportCatalogue,
{
    async fn create_request(
        &self,
        requester: &User,
        draft: RelocationRequestDraft,
    ) -> Result<TransitionOutcome, Error> {
        self.submit(requester, draft).await.inspect_err(|err| {
            warn!(
                actor = %requester.id,
                code = %err.code(),
                reason = %err.message(),
                "relocation request rejected"
            );
        })
    }

    async fn apply(
        &self,
        actor: &User,
        request: ApplyActionRequest,
    ) -> Result<TransitionOutcome, Error> {
        let request_id = request.request_id;
        let kind = request.command.kind();
        self.transition(actor, request).await.inspect_err(|err| {
            warn!(
                %request_id,
                action = %kind,
                actor = %actor.id,
                code = %err.code(),
                reason = %err.message(),
                "relocation transition rejected"
            );
        })
    }
}

#[async_trait]
impl<R, C> RelocationQuery for RelocationWorkflowService<R, C>
where
    R: RelocationRequestRepository,
    C: TransportCatalogue,
{
    async fn get_request(&self, viewer: &User, id: &RequestId) -> Result<DashboardRow, Error> {
        let request = self.load(id).await?;
        permissions::authorize_view(&request, viewer)?;
        Ok(DashboardRow {
            available_actions: workflow::available_actions(&request, viewer),
            request,
        })
    }

    async fn dashboard(
        &self,
        viewer: &User,
        query: &DashboardQuery,
    ) -> Result<DashboardSummary, Error> {
        let requests = self
            .requests
            .list(&permissions::list_filter_for(viewer))
            .await
            .map_err(Self::map_repository_error)?;
        Ok(project_dashboard(&requests, viewer, query))
    }
}

#[cfg(test)]
#[path = "relocation_service_tests.rs"]
mod tests;
