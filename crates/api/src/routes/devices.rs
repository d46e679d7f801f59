//! Device endpoint handlers.

use axum::{
    extract::{rejection::JsonRejection, Path, Query, State},
    http::StatusCode,
    Json,
};
use domain::models::{
    CreateDeviceRequest, Device, ListDevicesQuery, ListDevicesResponse, UpdateDeviceRequest,
};
use uuid::Uuid;

use crate::app::AppState;
use crate::error::ApiError;
use crate::extractors::UserAuth;

/// Register a new device (admin only).
///
/// POST /api/v1/devices
pub async fn create_device(
    State(state): State<AppState>,
    auth: UserAuth,
    payload: Result<Json<CreateDeviceRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<Device>), ApiError> {
    let Json(request) = payload?;
    let device = state
        .registry
        .create_device(&auth.caller(), request)
        .await?;

    Ok((StatusCode::CREATED, Json(device)))
}

/// List devices with optional filters.
///
/// GET /api/v1/devices?status=available&project=...&type=PC&page=1&per_page=20
pub async fn list_devices(
    State(state): State<AppState>,
    _auth: UserAuth,
    Query(query): Query<ListDevicesQuery>,
) -> Result<Json<ListDevicesResponse>, ApiError> {
    let response = state.registry.list_devices(&query).await?;
    Ok(Json(response))
}

/// Get a single device.
///
/// GET /api/v1/devices/:device_id
pub async fn get_device(
    State(state): State<AppState>,
    _auth: UserAuth,
    Path(device_id): Path<Uuid>,
) -> Result<Json<Device>, ApiError> {
    let device = state.registry.get_device(device_id).await?;
    Ok(Json(device))
}

/// Edit device attributes (admin only).
///
/// PATCH /api/v1/devices/:device_id
pub async fn update_device(
    State(state): State<AppState>,
    auth: UserAuth,
    Path(device_id): Path<Uuid>,
    payload: Result<Json<UpdateDeviceRequest>, JsonRejection>,
) -> Result<Json<Device>, ApiError> {
    let Json(request) = payload?;
    let device = state
        .registry
        .update_device(&auth.caller(), device_id, request)
        .await?;

    Ok(Json(device))
}

/// Delete a device without request history (admin only).
///
/// DELETE /api/v1/devices/:device_id
pub async fn delete_device(
    State(state): State<AppState>,
    auth: UserAuth,
    Path(device_id): Path<Uuid>,
) -> Result<StatusCode, ApiError> {
    state
        .registry
        .delete_device(&auth.caller(), device_id)
        .await?;

    Ok(StatusCode::NO_CONTENT)
}
