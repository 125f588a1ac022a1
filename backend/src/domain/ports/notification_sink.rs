//! Port for handing workflow outcomes to the presentation layer.

use async_trait::async_trait;

use crate::domain::WorkflowNotification;

use super::define_port_error;

define_port_error! {
    /// Errors raised by notification sinks.
    pub enum NotificationSinkError {
        /// The presentation channel is unavailable.
        Unavailable { message: String } =>
            "notification sink unavailable: {message}"; transient,
    }
}

/// Receives one structured notification per accepted workflow call.
///
/// Publishing happens after the request is stored, so a sink failure never
/// undoes a transition; the service logs it and carries on.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait NotificationSink: Send + Sync {
    /// Deliver a notification.
    async fn publish(&self, notification: &WorkflowNotification)
    -> Result<(), NotificationSinkError>;
}

/// Fixture implementation that drops every notification.
#[derive(Debug, Default, Clone, Copy)]
pub struct FixtureNotificationSink;

#[async_trait]
impl NotificationSink for FixtureNotificationSink {
    async fn publish(
        &self,
        _notification: &WorkflowNotification,
    ) -> Result<(), NotificationSinkError> {
        Ok(())
    }
}
