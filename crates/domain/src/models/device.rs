//! Device domain model.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use shared::validation::validate_not_blank;
use uuid::Uuid;
use validator::{Validate, ValidationError};

use super::pagination::{default_page, default_per_page, PageRequest, Pagination};

/// Lifecycle status of a device. Single source of truth for whether it can be lent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DeviceStatus {
    Available,
    Assigned,
    Missing,
    Stolen,
    Dead,
    Returned,
    Pending,
}

impl DeviceStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            DeviceStatus::Available => "available",
            DeviceStatus::Assigned => "assigned",
            DeviceStatus::Missing => "missing",
            DeviceStatus::Stolen => "stolen",
            DeviceStatus::Dead => "dead",
            DeviceStatus::Returned => "returned",
            DeviceStatus::Pending => "pending",
        }
    }
}

impl std::fmt::Display for DeviceStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Kind of hardware (`type` on the wire).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DeviceCategory {
    Smartphone,
    Tablet,
    Smartwatch,
    Box,
    #[serde(rename = "PC")]
    Pc,
    Accessory,
    Other,
}

/// Secondary classification, independent of lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DeviceType {
    #[serde(rename = "C-Type")]
    CType,
    Lunchbox,
}

/// A physical lendable unit.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct Device {
    pub id: Uuid,
    pub project: String,
    pub project_group: String,
    #[serde(rename = "type")]
    pub category: DeviceCategory,
    pub device_type: Option<DeviceType>,
    pub imei: Option<String>,
    pub serial_number: Option<String>,
    pub status: DeviceStatus,
    pub assigned_to_id: Option<Uuid>,
    pub received_date: Option<NaiveDate>,
    pub return_date: Option<NaiveDate>,
    pub notes: Option<String>,
    pub memo: Option<String>,
    pub device_picture: Option<String>,
    /// Set while a pending request exists against this device. Written only by the workflow.
    pub requested_by: Option<Uuid>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// The device fields the request workflow reads and writes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LifecycleState {
    pub status: DeviceStatus,
    pub assigned_to_id: Option<Uuid>,
    pub requested_by: Option<Uuid>,
    pub received_date: Option<NaiveDate>,
    pub return_date: Option<NaiveDate>,
}

impl Device {
    pub fn lifecycle(&self) -> LifecycleState {
        LifecycleState {
            status: self.status,
            assigned_to_id: self.assigned_to_id,
            requested_by: self.requested_by,
            received_date: self.received_date,
            return_date: self.return_date,
        }
    }

    pub fn set_lifecycle(&mut self, state: LifecycleState) {
        self.status = state.status;
        self.assigned_to_id = state.assigned_to_id;
        self.requested_by = state.requested_by;
        self.received_date = state.received_date;
        self.return_date = state.return_date;
    }

    /// Applies a direct admin edit. `requested_by` is never touched here.
    pub fn apply_update(&mut self, update: UpdateDeviceRequest) {
        if let Some(project) = update.project {
            self.project = project.trim().to_string();
        }
        if let Some(project_group) = update.project_group {
            self.project_group = project_group.trim().to_string();
        }
        if let Some(category) = update.category {
            self.category = category;
        }
        if let Some(device_type) = update.device_type {
            self.device_type = device_type;
        }
        if let Some(imei) = update.imei {
            self.imei = imei;
        }
        if let Some(serial_number) = update.serial_number {
            self.serial_number = serial_number;
        }
        if let Some(status) = update.status {
            self.status = status;
        }
        if let Some(assigned_to_id) = update.assigned_to_id {
            self.assigned_to_id = assigned_to_id;
        }
        if let Some(received_date) = update.received_date {
            self.received_date = received_date;
        }
        if let Some(return_date) = update.return_date {
            self.return_date = return_date;
        }
        if let Some(notes) = update.notes {
            self.notes = notes;
        }
        if let Some(memo) = update.memo {
            self.memo = memo;
        }
        if let Some(device_picture) = update.device_picture {
            self.device_picture = device_picture;
        }
    }
}

/// Request payload for creating a device.
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "snake_case")]
pub struct CreateDeviceRequest {
    #[serde(default)]
    #[validate(
        custom(function = "shared::validation::validate_not_blank"),
        length(max = 120, message = "Project must be at most 120 characters")
    )]
    pub project: String,

    #[serde(default)]
    #[validate(
        custom(function = "shared::validation::validate_not_blank"),
        length(max = 120, message = "Project group must be at most 120 characters")
    )]
    pub project_group: String,

    #[serde(rename = "type")]
    #[validate(required(message = "Device type is required"))]
    pub category: Option<DeviceCategory>,

    pub device_type: Option<DeviceType>,

    #[validate(length(max = 64, message = "IMEI must be at most 64 characters"))]
    pub imei: Option<String>,

    #[validate(length(max = 128, message = "Serial number must be at most 128 characters"))]
    pub serial_number: Option<String>,

    pub received_date: Option<NaiveDate>,
    pub return_date: Option<NaiveDate>,
    pub notes: Option<String>,
    pub memo: Option<String>,
    pub device_picture: Option<String>,
}

/// Request payload for a direct admin edit.
///
/// Absent fields are left unchanged; an explicit `null` clears a nullable field.
#[derive(Debug, Clone, Default, Deserialize, Validate)]
#[serde(rename_all = "snake_case")]
#[validate(schema(function = "validate_update_fields"))]
pub struct UpdateDeviceRequest {
    pub project: Option<String>,
    pub project_group: Option<String>,
    #[serde(rename = "type")]
    pub category: Option<DeviceCategory>,
    #[serde(default, deserialize_with = "double_option")]
    pub device_type: Option<Option<DeviceType>>,
    #[serde(default, deserialize_with = "double_option")]
    pub imei: Option<Option<String>>,
    #[serde(default, deserialize_with = "double_option")]
    pub serial_number: Option<Option<String>>,
    pub status: Option<DeviceStatus>,
    #[serde(default, deserialize_with = "double_option")]
    pub assigned_to_id: Option<Option<Uuid>>,
    #[serde(default, deserialize_with = "double_option")]
    pub received_date: Option<Option<NaiveDate>>,
    #[serde(default, deserialize_with = "double_option")]
    pub return_date: Option<Option<NaiveDate>>,
    #[serde(default, deserialize_with = "double_option")]
    pub notes: Option<Option<String>>,
    #[serde(default, deserialize_with = "double_option")]
    pub memo: Option<Option<String>>,
    #[serde(default, deserialize_with = "double_option")]
    pub device_picture: Option<Option<String>>,
}

fn validate_update_fields(update: &UpdateDeviceRequest) -> Result<(), ValidationError> {
    for value in [&update.project, &update.project_group].into_iter().flatten() {
        validate_not_blank(value)?;
    }
    Ok(())
}

fn double_option<'de, D, T>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}

/// Filter for device listings.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DeviceFilter {
    pub status: Option<DeviceStatus>,
    pub assigned_to_id: Option<Uuid>,
    pub project: Option<String>,
    pub project_group: Option<String>,
    pub category: Option<DeviceCategory>,
    pub device_type: Option<DeviceType>,
}

/// Query parameters for listing devices.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct ListDevicesQuery {
    pub status: Option<DeviceStatus>,
    pub assigned_to_id: Option<Uuid>,
    pub project: Option<String>,
    pub project_group: Option<String>,
    #[serde(rename = "type")]
    pub category: Option<DeviceCategory>,
    pub device_type: Option<DeviceType>,
    #[serde(default = "default_page")]
    pub page: i64,
    #[serde(default = "default_per_page")]
    pub per_page: i64,
}

impl ListDevicesQuery {
    pub fn filter(&self) -> DeviceFilter {
        DeviceFilter {
            status: self.status,
            assigned_to_id: self.assigned_to_id,
            project: self.project.clone(),
            project_group: self.project_group.clone(),
            category: self.category,
            device_type: self.device_type,
        }
    }

    pub fn page_request(&self) -> PageRequest {
        PageRequest::new(self.page, self.per_page)
    }
}

/// Response for listing devices.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "snake_case")]
pub struct ListDevicesResponse {
    pub data: Vec<Device>,
    pub pagination: Pagination,
}
