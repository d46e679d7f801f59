//! Request notifications.
//!
//! Tells interested parties that a request was submitted, resolved or
//! cancelled. Delivery happens after the operation committed and its outcome
//! never changes the operation's result.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::models::{DeviceRequest, RequestStatus, RequestType};

/// Notification type enumeration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NotificationType {
    RequestSubmitted,
    RequestResolved,
    RequestCancelled,
}

impl std::fmt::Display for NotificationType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            NotificationType::RequestSubmitted => write!(f, "request_submitted"),
            NotificationType::RequestResolved => write!(f, "request_resolved"),
            NotificationType::RequestCancelled => write!(f, "request_cancelled"),
        }
    }
}

/// Payload describing a request state change.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct RequestNotification {
    #[serde(rename = "type")]
    pub notification_type: NotificationType,
    pub request_id: Uuid,
    pub device_id: Uuid,
    pub user_id: Uuid,
    pub request_type: RequestType,
    pub status: RequestStatus,
    /// Who caused the change (requester, resolving admin or canceller).
    pub actor_id: Uuid,
    pub timestamp: DateTime<Utc>,
}

impl RequestNotification {
    pub fn new(notification_type: NotificationType, request: &DeviceRequest, actor_id: Uuid) -> Self {
        Self {
            notification_type,
            request_id: request.id,
            device_id: request.device_id,
            user_id: request.user_id,
            request_type: request.request_type,
            status: request.status,
            actor_id,
            timestamp: Utc::now(),
        }
    }
}

/// Result of a notification send attempt.
#[derive(Debug, Clone)]
pub enum NotificationResult {
    Sent,
    /// Sending failed (but was non-blocking).
    Failed(String),
}

/// Sink for request lifecycle notifications.
#[async_trait::async_trait]
pub trait RequestNotifier: Send + Sync {
    /// A new pending request exists.
    async fn request_submitted(&self, notification: RequestNotification) -> NotificationResult;

    /// An admin approved or rejected a request.
    async fn request_resolved(&self, notification: RequestNotification) -> NotificationResult;

    /// The requester or an admin withdrew a request.
    async fn request_cancelled(&self, notification: RequestNotification) -> NotificationResult;
}

/// Notifier that only emits structured log events.
#[derive(Debug, Clone, Default)]
pub struct LoggingNotifier {
    /// Whether to simulate failures for testing.
    pub simulate_failure: bool,
}

impl LoggingNotifier {
    pub fn new() -> Self {
        Self {
            simulate_failure: false,
        }
    }

    pub fn failing() -> Self {
        Self {
            simulate_failure: true,
        }
    }

    fn emit(&self, notification: &RequestNotification) -> NotificationResult {
        if self.simulate_failure {
            tracing::warn!(
                notification_type = %notification.notification_type,
                request_id = %notification.request_id,
                "Logging notifier simulating failure"
            );
            return NotificationResult::Failed("Simulated failure".to_string());
        }

        tracing::info!(
            notification_type = %notification.notification_type,
            request_id = %notification.request_id,
            device_id = %notification.device_id,
            user_id = %notification.user_id,
            request_type = %notification.request_type,
            status = %notification.status,
            actor_id = %notification.actor_id,
            "Request notification"
        );

        NotificationResult::Sent
    }
}

#[async_trait::async_trait]
impl RequestNotifier for LoggingNotifier {
    async fn request_submitted(&self, notification: RequestNotification) -> NotificationResult {
        self.emit(&notification)
    }

    async fn request_resolved(&self, notification: RequestNotification) -> NotificationResult {
        self.emit(&notification)
    }

    async fn request_cancelled(&self, notification: RequestNotification) -> NotificationResult {
        self.emit(&notification)
    }
}
