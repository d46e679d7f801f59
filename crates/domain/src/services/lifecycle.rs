//! Device/request lifecycle state machine.
//!
//! Pure functions that decide what a submission, resolution or cancellation
//! does to a device. Persistence applies the returned [`LifecycleState`]
//! together with the request write in a single transaction.

use chrono::{Days, NaiveDate};
use shared::validation::{
    validate_rental_period_days, validate_report_reason, validate_request_reason,
};
use uuid::Uuid;
use validator::ValidationError;

use crate::models::{
    Caller, Decision, Device, DeviceRequest, DeviceStatus, LifecycleState, ReportType,
    RequestType, SubmitDeviceRequest, SubmitRequestPayload,
};
use crate::DomainError;

/// Outcome of a successful submission check.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubmissionPlan {
    pub user_id: Uuid,
    pub request_type: RequestType,
    /// Payload with fields that do not apply to `request_type` dropped.
    pub payload: SubmitRequestPayload,
    /// Device state to persist alongside the new pending request.
    pub device: LifecycleState,
}

/// Checks a submission against the device and builds the writes it implies.
///
/// The caller must already hold the device row and know whether a pending
/// request exists for it. Checks run in a fixed order: the one-pending-request
/// rule, then authorization, then parsing and the rules of the request type.
pub fn plan_submission(
    device: &Device,
    has_pending_request: bool,
    caller: &Caller,
    user_id: Uuid,
    submission: &SubmitDeviceRequest,
) -> Result<SubmissionPlan, DomainError> {
    if has_pending_request {
        return Err(DomainError::DuplicateRequest);
    }

    if !caller.can_act_for(user_id) {
        return Err(DomainError::Authorization(
            "Cannot submit requests on behalf of another user".to_string(),
        ));
    }

    let request_type: RequestType = submission
        .request_type
        .as_deref()
        .ok_or_else(|| DomainError::Validation("type: Request type is required".to_string()))?
        .parse()
        .map_err(|e| DomainError::Validation(format!("type: {}", e)))?;

    let reason = submission
        .reason
        .as_deref()
        .map(str::trim)
        .filter(|r| !r.is_empty())
        .map(str::to_string);

    let mut normalized = SubmitRequestPayload {
        reason,
        report_type: None,
        rental_period_days: None,
    };

    match request_type {
        RequestType::Assign => {
            require_status(device, &[DeviceStatus::Available], "assignment")?;
            if let Some(days) = submission.rental_period_days {
                validate_rental_period_days(days)
                    .map_err(|e| validation("rental_period_days", e))?;
            }
            normalized.rental_period_days = submission.rental_period_days;
        }
        RequestType::Release => {
            require_status(device, &[DeviceStatus::Assigned], "release")?;
            if !caller.is_admin && device.assigned_to_id != Some(user_id) {
                return Err(DomainError::Authorization(
                    "Only the current holder may release this device".to_string(),
                ));
            }
        }
        RequestType::Report => {
            let report_type: ReportType = submission
                .report_type
                .as_deref()
                .ok_or_else(|| {
                    DomainError::Validation("report_type: Report type is required".to_string())
                })?
                .parse()
                .map_err(|e| DomainError::Validation(format!("report_type: {}", e)))?;
            let reason = normalized.reason.as_deref().ok_or_else(|| {
                DomainError::Validation("reason: Reason is required for reports".to_string())
            })?;
            validate_report_reason(reason).map_err(|e| validation("reason", e))?;
            normalized.report_type = Some(report_type);
        }
        RequestType::Return => {
            require_status(
                device,
                &[DeviceStatus::Available, DeviceStatus::Dead],
                "return",
            )?;
        }
    }

    if request_type != RequestType::Report {
        if let Some(reason) = &normalized.reason {
            validate_request_reason(reason).map_err(|e| validation("reason", e))?;
        }
    }

    let mut next = device.lifecycle();
    next.requested_by = Some(user_id);
    if request_type == RequestType::Assign {
        next.status = DeviceStatus::Pending;
    }

    Ok(SubmissionPlan {
        user_id,
        request_type,
        payload: normalized,
        device: next,
    })
}

/// Computes the device state after resolving `request` with `decision`.
pub fn resolve(
    device: &Device,
    request: &DeviceRequest,
    decision: Decision,
    resolved_on: NaiveDate,
) -> Result<LifecycleState, DomainError> {
    ensure_pending(request)?;

    let mut next = device.lifecycle();
    next.requested_by = None;

    match (request.request_type, decision) {
        (RequestType::Assign, Decision::Approved) => {
            next.status = DeviceStatus::Assigned;
            next.assigned_to_id = Some(request.user_id);
            next.received_date = Some(resolved_on);
            next.return_date = request
                .rental_period_days
                .and_then(|days| u64::try_from(days).ok())
                .and_then(|days| resolved_on.checked_add_days(Days::new(days)));
        }
        (RequestType::Assign, Decision::Rejected) => {
            if device.status == DeviceStatus::Pending {
                next.status = DeviceStatus::Available;
            }
        }
        (RequestType::Release, Decision::Approved) => {
            next.status = DeviceStatus::Available;
            next.assigned_to_id = None;
        }
        (RequestType::Release, Decision::Rejected) => {}
        (RequestType::Report, Decision::Approved) => {
            let report_type = request.report_type.ok_or_else(|| {
                DomainError::InvalidState(format!(
                    "Report request {} has no report type",
                    request.id
                ))
            })?;
            next.status = report_type.device_status();
        }
        (RequestType::Report, Decision::Rejected) => {}
        (RequestType::Return, Decision::Approved) => {
            next.status = DeviceStatus::Returned;
            next.return_date = Some(resolved_on);
        }
        (RequestType::Return, Decision::Rejected) => {
            next.status = DeviceStatus::Available;
        }
    }

    Ok(next)
}

/// Computes the device state after the requester (or an admin) withdraws `request`.
pub fn cancel(device: &Device, request: &DeviceRequest) -> Result<LifecycleState, DomainError> {
    ensure_pending(request)?;

    let mut next = device.lifecycle();
    next.requested_by = None;
    if request.request_type == RequestType::Assign && device.status == DeviceStatus::Pending {
        next.status = DeviceStatus::Available;
    }

    Ok(next)
}

pub fn authorize_resolution(caller: &Caller) -> Result<(), DomainError> {
    caller.require_admin("process requests")
}

pub fn authorize_cancellation(caller: &Caller, request: &DeviceRequest) -> Result<(), DomainError> {
    if caller.can_act_for(request.user_id) {
        Ok(())
    } else {
        Err(DomainError::Authorization(
            "Only the requester or an admin may cancel this request".to_string(),
        ))
    }
}

pub fn authorize_read(caller: &Caller, request: &DeviceRequest) -> Result<(), DomainError> {
    if caller.can_act_for(request.user_id) {
        Ok(())
    } else {
        Err(DomainError::Authorization(
            "Cannot view another user's request".to_string(),
        ))
    }
}

fn ensure_pending(request: &DeviceRequest) -> Result<(), DomainError> {
    if request.status.is_pending() {
        Ok(())
    } else {
        Err(DomainError::InvalidState(format!(
            "Request {} is already {}",
            request.id, request.status
        )))
    }
}

fn require_status(
    device: &Device,
    allowed: &[DeviceStatus],
    action: &str,
) -> Result<(), DomainError> {
    if allowed.contains(&device.status) {
        Ok(())
    } else {
        Err(DomainError::InvalidState(format!(
            "Device {} cannot be requested for {} while {}",
            device.id, action, device.status
        )))
    }
}

fn validation(field: &str, error: ValidationError) -> DomainError {
    let message = error
        .message
        .map(|m| m.to_string())
        .unwrap_or_else(|| "invalid value".to_string());
    DomainError::Validation(format!("{}: {}", field, message))
}
