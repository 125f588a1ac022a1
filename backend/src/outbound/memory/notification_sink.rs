//! Notification sinks that stay inside the process.

use std::sync::{Mutex, PoisonError};

use async_trait::async_trait;
use tracing::info;

use crate::domain::WorkflowNotification;
use crate::domain::ports::{NotificationSink, NotificationSinkError};

/// Emits every notification as a structured `info!` event.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingNotificationSink;

#[async_trait]
impl NotificationSink for TracingNotificationSink {
    async fn publish(
        &self,
        notification: &WorkflowNotification,
    ) -> Result<(), NotificationSinkError> {
        info!(
            kind = ?notification.kind,
            title = %notification.title,
            message = %notification.message,
            request_id = notification.request_id.as_ref().map(|id| id.as_str()),
            timestamp = %notification.timestamp,
            "workflow notification"
        );
        Ok(())
    }
}

/// Keeps every notification for later inspection.
#[derive(Debug, Default)]
pub struct RecordingNotificationSink {
    published: Mutex<Vec<WorkflowNotification>>,
}

impl RecordingNotificationSink {
    /// Create an empty sink.
    pub fn new() -> Self {
        Self::default()
    }

    /// Notifications published so far, oldest first.
    pub fn notifications(&self) -> Vec<WorkflowNotification> {
        self.published
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

#[async_trait]
impl NotificationSink for RecordingNotificationSink {
    async fn publish(
        &self,
        notification: &WorkflowNotification,
    ) -> Result<(), NotificationSinkError> {
        self.published
            .lock()
            .map_err(|_| NotificationSinkError::unavailable("recording sink lock poisoned"))?
            .push(notification.clone());
        Ok(())
    }
}
