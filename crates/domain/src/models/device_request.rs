//! Device request domain model.
//!
//! A request proposes a state change against one device. It is created
//! `pending` and moves exactly once to a terminal status.

use std::str::FromStr;

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::device::{Device, DeviceStatus};
use super::pagination::{default_page, default_per_page, PageRequest, Pagination};

/// Kind of change a request asks for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RequestType {
    Assign,
    Release,
    Report,
    Return,
}

impl RequestType {
    pub fn as_str(&self) -> &'static str {
        match self {
            RequestType::Assign => "assign",
            RequestType::Release => "release",
            RequestType::Report => "report",
            RequestType::Return => "return",
        }
    }
}

impl FromStr for RequestType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "assign" => Ok(RequestType::Assign),
            "release" => Ok(RequestType::Release),
            "report" => Ok(RequestType::Report),
            "return" => Ok(RequestType::Return),
            _ => Err(format!("Unknown request type: {}", s)),
        }
    }
}

impl std::fmt::Display for RequestType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RequestStatus {
    Pending,
    Approved,
    Rejected,
    Cancelled,
}

impl RequestStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            RequestStatus::Pending => "pending",
            RequestStatus::Approved => "approved",
            RequestStatus::Rejected => "rejected",
            RequestStatus::Cancelled => "cancelled",
        }
    }

    pub fn is_pending(&self) -> bool {
        matches!(self, RequestStatus::Pending)
    }
}

impl std::fmt::Display for RequestStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Problem being reported. Approving a report moves the device into the matching status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReportType {
    Missing,
    Stolen,
    Dead,
}

impl ReportType {
    pub fn as_str(&self) -> &'static str {
        match self {
            ReportType::Missing => "missing",
            ReportType::Stolen => "stolen",
            ReportType::Dead => "dead",
        }
    }

    pub fn device_status(&self) -> DeviceStatus {
        match self {
            ReportType::Missing => DeviceStatus::Missing,
            ReportType::Stolen => DeviceStatus::Stolen,
            ReportType::Dead => DeviceStatus::Dead,
        }
    }
}

impl FromStr for ReportType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "missing" => Ok(ReportType::Missing),
            "stolen" => Ok(ReportType::Stolen),
            "dead" => Ok(ReportType::Dead),
            _ => Err(format!("Unknown report type: {}", s)),
        }
    }
}

impl std::fmt::Display for ReportType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Admin decision on a pending request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Decision {
    Approved,
    Rejected,
}

impl Decision {
    pub fn as_str(&self) -> &'static str {
        match self {
            Decision::Approved => "approved",
            Decision::Rejected => "rejected",
        }
    }

    pub fn request_status(&self) -> RequestStatus {
        match self {
            Decision::Approved => RequestStatus::Approved,
            Decision::Rejected => RequestStatus::Rejected,
        }
    }
}

impl std::fmt::Display for Decision {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A request against a device.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct DeviceRequest {
    pub id: Uuid,
    pub device_id: Uuid,
    pub user_id: Uuid,
    #[serde(rename = "type")]
    pub request_type: RequestType,
    pub report_type: Option<ReportType>,
    pub reason: Option<String>,
    pub rental_period_days: Option<i32>,
    pub status: RequestStatus,
    pub requested_at: DateTime<Utc>,
    pub processed_at: Option<DateTime<Utc>>,
    pub processed_by: Option<Uuid>,
    pub updated_at: DateTime<Utc>,
}

/// Type-specific submission data.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct SubmitRequestPayload {
    pub reason: Option<String>,
    pub report_type: Option<ReportType>,
    pub rental_period_days: Option<i32>,
}

/// Request body for submitting a request against a device.
///
/// `user_id` defaults to the caller; admins may submit on behalf of another user.
/// `type` and `report_type` stay raw here and are parsed during submission, after
/// the duplicate and authorization checks.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct SubmitDeviceRequest {
    pub user_id: Option<Uuid>,
    #[serde(rename = "type")]
    pub request_type: Option<String>,
    pub reason: Option<String>,
    pub report_type: Option<String>,
    pub rental_period_days: Option<i32>,
}

/// Request body for resolving a pending request.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct ProcessRequestRequest {
    pub decision: Decision,
    /// Defaults to today (UTC).
    pub resolution_date: Option<NaiveDate>,
}

/// Device and request as they stand after a resolution.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "snake_case")]
pub struct ProcessRequestResponse {
    pub device: Device,
    pub request: DeviceRequest,
}

/// Filter for request listings.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RequestFilter {
    pub status: Option<RequestStatus>,
    pub request_type: Option<RequestType>,
    pub device_id: Option<Uuid>,
    pub user_id: Option<Uuid>,
}

/// Query parameters for listing requests.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct ListRequestsQuery {
    pub status: Option<RequestStatus>,
    #[serde(rename = "type")]
    pub request_type: Option<RequestType>,
    pub device_id: Option<Uuid>,
    pub user_id: Option<Uuid>,
    #[serde(default = "default_page")]
    pub page: i64,
    #[serde(default = "default_per_page")]
    pub per_page: i64,
}

impl ListRequestsQuery {
    pub fn filter(&self) -> RequestFilter {
        RequestFilter {
            status: self.status,
            request_type: self.request_type,
            device_id: self.device_id,
            user_id: self.user_id,
        }
    }

    pub fn page_request(&self) -> PageRequest {
        PageRequest::new(self.page, self.per_page)
    }
}

/// Response for listing requests.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "snake_case")]
pub struct ListRequestsResponse {
    pub data: Vec<DeviceRequest>,
    pub pagination: Pagination,
}
