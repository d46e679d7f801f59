//! Domain services for the device lending service.
//!
//! Services contain business logic that operates on domain models.

pub mod lifecycle;
pub mod notification;

pub use lifecycle::{
    authorize_cancellation, authorize_read, authorize_resolution, cancel, plan_submission,
    resolve, SubmissionPlan,
};

pub use notification::{
    LoggingNotifier, NotificationResult, NotificationType, RequestNotification, RequestNotifier,
};
