//! Device request endpoint handlers.

use axum::{
    extract::{rejection::JsonRejection, Path, Query, State},
    http::StatusCode,
    Json,
};
use domain::models::{
    DeviceRequest, ListRequestsQuery, ListRequestsResponse, ProcessRequestRequest,
    ProcessRequestResponse, SubmitDeviceRequest,
};
use uuid::Uuid;

use crate::app::AppState;
use crate::error::ApiError;
use crate::extractors::UserAuth;

/// Submit a request against a device.
///
/// POST /api/v1/devices/:device_id/requests
///
/// `user_id` defaults to the caller.
pub async fn submit_request(
    State(state): State<AppState>,
    auth: UserAuth,
    Path(device_id): Path<Uuid>,
    payload: Result<Json<SubmitDeviceRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<DeviceRequest>), ApiError> {
    let Json(request) = payload?;
    let user_id = request.user_id.unwrap_or(auth.user_id);

    let created = state
        .workflow
        .submit_request(&auth.caller(), device_id, user_id, &request)
        .await?;

    Ok((StatusCode::CREATED, Json(created)))
}

/// List requests. Non-admin callers only see their own.
///
/// GET /api/v1/requests?status=pending&type=assign&device_id=...&user_id=...
pub async fn list_requests(
    State(state): State<AppState>,
    auth: UserAuth,
    Query(query): Query<ListRequestsQuery>,
) -> Result<Json<ListRequestsResponse>, ApiError> {
    let response = state
        .workflow
        .list_requests(&auth.caller(), &query)
        .await?;

    Ok(Json(response))
}

/// Get a single request.
///
/// GET /api/v1/requests/:request_id
pub async fn get_request(
    State(state): State<AppState>,
    auth: UserAuth,
    Path(request_id): Path<Uuid>,
) -> Result<Json<DeviceRequest>, ApiError> {
    let request = state
        .workflow
        .get_request(&auth.caller(), request_id)
        .await?;

    Ok(Json(request))
}

/// Approve or reject a pending request (admin only).
///
/// POST /api/v1/requests/:request_id/process
pub async fn process_request(
    State(state): State<AppState>,
    auth: UserAuth,
    Path(request_id): Path<Uuid>,
    payload: Result<Json<ProcessRequestRequest>, JsonRejection>,
) -> Result<Json<ProcessRequestResponse>, ApiError> {
    let Json(request) = payload?;
    let response = state
        .workflow
        .process_request(
            &auth.caller(),
            request_id,
            request.decision,
            request.resolution_date,
        )
        .await?;

    Ok(Json(response))
}

/// Cancel a pending request (requester or admin).
///
/// POST /api/v1/requests/:request_id/cancel
pub async fn cancel_request(
    State(state): State<AppState>,
    auth: UserAuth,
    Path(request_id): Path<Uuid>,
) -> Result<Json<DeviceRequest>, ApiError> {
    let request = state
        .workflow
        .cancel_request(&auth.caller(), request_id)
        .await?;

    Ok(Json(request))
}
