//! Request workflow: submission, resolution and cancellation of device requests.
//!
//! Every operation that touches both a request and its device runs in one
//! transaction. Locks are always taken request first, then device, so
//! concurrent resolutions and cancellations of the same request serialize
//! without deadlocking against submissions (which lock the device only).

use std::sync::Arc;

use chrono::{NaiveDate, Utc};
use domain::models::{
    Caller, Decision, Device, DeviceRequest, ListRequestsQuery, ListRequestsResponse, Pagination,
    ProcessRequestResponse, RequestStatus, SubmitDeviceRequest,
};
use domain::services::lifecycle;
use domain::services::notification::{
    NotificationResult, NotificationType, RequestNotification, RequestNotifier,
};
use domain::DomainError;
use persistence::map_db_error;
use persistence::repositories::{DeviceRepository, DeviceRequestRepository};
use sqlx::PgPool;
use tracing::{info, warn};
use uuid::Uuid;

use crate::middleware::metrics::{
    record_request_cancelled, record_request_resolved, record_request_submitted,
};

#[derive(Clone)]
pub struct RequestWorkflow {
    pool: PgPool,
    devices: DeviceRepository,
    requests: DeviceRequestRepository,
    notifier: Option<Arc<dyn RequestNotifier>>,
}

impl RequestWorkflow {
    pub fn new(pool: PgPool, notifier: Option<Arc<dyn RequestNotifier>>) -> Self {
        Self {
            devices: DeviceRepository::new(pool.clone()),
            requests: DeviceRequestRepository::new(pool.clone()),
            pool,
            notifier,
        }
    }

    /// Record a new pending request against a device.
    ///
    /// Checks run in a fixed order: device existence, then the
    /// one-pending-request rule, then authorization, then type rules.
    /// An unknown `type` or `report_type` is a type rule failure.
    pub async fn submit_request(
        &self,
        caller: &Caller,
        device_id: Uuid,
        user_id: Uuid,
        submission: &SubmitDeviceRequest,
    ) -> Result<DeviceRequest, DomainError> {
        let mut tx = self.pool.begin().await.map_err(map_db_error)?;

        let device: Device = self
            .devices
            .lock_by_id(&mut *tx, device_id)
            .await
            .map_err(map_db_error)?
            .ok_or_else(|| DomainError::device_not_found(device_id))?
            .into();

        let has_pending = self
            .requests
            .has_pending_for_device(&mut *tx, device_id)
            .await
            .map_err(map_db_error)?;

        let plan =
            lifecycle::plan_submission(&device, has_pending, caller, user_id, submission)?;

        let request: DeviceRequest = self
            .requests
            .create(
                &mut *tx,
                device_id,
                plan.user_id,
                plan.request_type,
                &plan.payload,
            )
            .await
            .map_err(map_db_error)?
            .into();

        self.devices
            .update_lifecycle(&mut *tx, device_id, &plan.device)
            .await
            .map_err(map_db_error)?;

        tx.commit().await.map_err(map_db_error)?;

        record_request_submitted(request.request_type);
        info!(
            request_id = %request.id,
            device_id = %device_id,
            user_id = %request.user_id,
            request_type = %request.request_type,
            "Device request submitted"
        );

        self.notify(NotificationType::RequestSubmitted, &request, caller.user_id)
            .await;

        Ok(request)
    }

    pub async fn get_request(
        &self,
        caller: &Caller,
        id: Uuid,
    ) -> Result<DeviceRequest, DomainError> {
        let request: DeviceRequest = self
            .requests
            .find_by_id(id)
            .await
            .map_err(map_db_error)?
            .ok_or_else(|| DomainError::request_not_found(id))?
            .into();

        lifecycle::authorize_read(caller, &request)?;

        Ok(request)
    }

    /// List requests newest first. Non-admins only ever see their own.
    pub async fn list_requests(
        &self,
        caller: &Caller,
        query: &ListRequestsQuery,
    ) -> Result<ListRequestsResponse, DomainError> {
        let mut filter = query.filter();
        if !caller.is_admin {
            filter.user_id = Some(caller.user_id);
        }
        let page = query.page_request();

        let total = self.requests.count(&filter).await.map_err(map_db_error)?;
        let entities = self
            .requests
            .list(&filter, page)
            .await
            .map_err(map_db_error)?;

        Ok(ListRequestsResponse {
            data: entities.into_iter().map(DeviceRequest::from).collect(),
            pagination: Pagination::new(page, total),
        })
    }

    /// Approve or reject a pending request and apply its effect on the device.
    ///
    /// `resolution_date` defaults to today (UTC).
    pub async fn process_request(
        &self,
        caller: &Caller,
        request_id: Uuid,
        decision: Decision,
        resolution_date: Option<NaiveDate>,
    ) -> Result<ProcessRequestResponse, DomainError> {
        let mut tx = self.pool.begin().await.map_err(map_db_error)?;

        let request: DeviceRequest = self
            .requests
            .lock_by_id(&mut *tx, request_id)
            .await
            .map_err(map_db_error)?
            .ok_or_else(|| DomainError::request_not_found(request_id))?
            .into();

        lifecycle::authorize_resolution(caller)?;

        let device: Device = self
            .devices
            .lock_by_id(&mut *tx, request.device_id)
            .await
            .map_err(map_db_error)?
            .ok_or_else(|| DomainError::device_not_found(request.device_id))?
            .into();

        let resolved_on = resolution_date.unwrap_or_else(|| Utc::now().date_naive());
        let next = lifecycle::resolve(&device, &request, decision, resolved_on)?;

        let request: DeviceRequest = self
            .finish(&mut *tx, &request, decision.request_status(), caller.user_id)
            .await?;

        let device: Device = self
            .devices
            .update_lifecycle(&mut *tx, device.id, &next)
            .await
            .map_err(map_db_error)?
            .into();

        tx.commit().await.map_err(map_db_error)?;

        record_request_resolved(request.request_type, decision);
        info!(
            request_id = %request.id,
            device_id = %device.id,
            admin_id = %caller.user_id,
            request_type = %request.request_type,
            decision = %decision,
            device_status = %device.status,
            "Device request processed"
        );

        self.notify(NotificationType::RequestResolved, &request, caller.user_id)
            .await;

        Ok(ProcessRequestResponse { device, request })
    }

    /// Withdraw a pending request. Allowed for the requester and for admins.
    pub async fn cancel_request(
        &self,
        caller: &Caller,
        request_id: Uuid,
    ) -> Result<DeviceRequest, DomainError> {
        let mut tx = self.pool.begin().await.map_err(map_db_error)?;

        let request: DeviceRequest = self
            .requests
            .lock_by_id(&mut *tx, request_id)
            .await
            .map_err(map_db_error)?
            .ok_or_else(|| DomainError::request_not_found(request_id))?
            .into();

        lifecycle::authorize_cancellation(caller, &request)?;

        let device: Device = self
            .devices
            .lock_by_id(&mut *tx, request.device_id)
            .await
            .map_err(map_db_error)?
            .ok_or_else(|| DomainError::device_not_found(request.device_id))?
            .into();

        let next = lifecycle::cancel(&device, &request)?;

        let request = self
            .finish(&mut *tx, &request, RequestStatus::Cancelled, caller.user_id)
            .await?;

        self.devices
            .update_lifecycle(&mut *tx, device.id, &next)
            .await
            .map_err(map_db_error)?;

        tx.commit().await.map_err(map_db_error)?;

        record_request_cancelled(request.request_type);
        info!(
            request_id = %request.id,
            device_id = %request.device_id,
            cancelled_by = %caller.user_id,
            "Device request cancelled"
        );

        self.notify(NotificationType::RequestCancelled, &request, caller.user_id)
            .await;

        Ok(request)
    }

    async fn finish(
        &self,
        conn: &mut sqlx::PgConnection,
        request: &DeviceRequest,
        status: RequestStatus,
        processed_by: Uuid,
    ) -> Result<DeviceRequest, DomainError> {
        self.requests
            .finish(conn, request.id, status, processed_by)
            .await
            .map_err(map_db_error)?
            .map(DeviceRequest::from)
            .ok_or_else(|| {
                DomainError::InvalidState(format!("Request {} is no longer pending", request.id))
            })
    }

    async fn notify(
        &self,
        notification_type: NotificationType,
        request: &DeviceRequest,
        actor_id: Uuid,
    ) {
        let Some(notifier) = &self.notifier else {
            return;
        };

        let notification = RequestNotification::new(notification_type, request, actor_id);
        let result = match notification_type {
            NotificationType::RequestSubmitted => notifier.request_submitted(notification).await,
            NotificationType::RequestResolved => notifier.request_resolved(notification).await,
            NotificationType::RequestCancelled => notifier.request_cancelled(notification).await,
        };

        if let NotificationResult::Failed(error) = result {
            warn!(
                request_id = %request.id,
                notification_type = %notification_type,
                error = %error,
                "Failed to deliver request notification"
            );
        }
    }
}
