//! Device request entity (database row mapping).

use chrono::{DateTime, Utc};
use domain::models::{ReportType, RequestStatus, RequestType};
use sqlx::FromRow;
use uuid::Uuid;

/// Database enum for request type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, sqlx::Type)]
#[sqlx(type_name = "request_type", rename_all = "lowercase")]
pub enum RequestTypeDb {
    Assign,
    Release,
    Report,
    Return,
}

impl From<RequestTypeDb> for RequestType {
    fn from(request_type: RequestTypeDb) -> Self {
        match request_type {
            RequestTypeDb::Assign => RequestType::Assign,
            RequestTypeDb::Release => RequestType::Release,
            RequestTypeDb::Report => RequestType::Report,
            RequestTypeDb::Return => RequestType::Return,
        }
    }
}

impl From<RequestType> for RequestTypeDb {
    fn from(request_type: RequestType) -> Self {
        match request_type {
            RequestType::Assign => RequestTypeDb::Assign,
            RequestType::Release => RequestTypeDb::Release,
            RequestType::Report => RequestTypeDb::Report,
            RequestType::Return => RequestTypeDb::Return,
        }
    }
}

/// Database enum for request status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, sqlx::Type)]
#[sqlx(type_name = "request_status", rename_all = "lowercase")]
pub enum RequestStatusDb {
    Pending,
    Approved,
    Rejected,
    Cancelled,
}

impl From<RequestStatusDb> for RequestStatus {
    fn from(status: RequestStatusDb) -> Self {
        match status {
            RequestStatusDb::Pending => RequestStatus::Pending,
            RequestStatusDb::Approved => RequestStatus::Approved,
            RequestStatusDb::Rejected => RequestStatus::Rejected,
            RequestStatusDb::Cancelled => RequestStatus::Cancelled,
        }
    }
}

impl From<RequestStatus> for RequestStatusDb {
    fn from(status: RequestStatus) -> Self {
        match status {
            RequestStatus::Pending => RequestStatusDb::Pending,
            RequestStatus::Approved => RequestStatusDb::Approved,
            RequestStatus::Rejected => RequestStatusDb::Rejected,
            RequestStatus::Cancelled => RequestStatusDb::Cancelled,
        }
    }
}

/// Database enum for report type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, sqlx::Type)]
#[sqlx(type_name = "report_type", rename_all = "lowercase")]
pub enum ReportTypeDb {
    Missing,
    Stolen,
    Dead,
}

impl From<ReportTypeDb> for ReportType {
    fn from(report_type: ReportTypeDb) -> Self {
        match report_type {
            ReportTypeDb::Missing => ReportType::Missing,
            ReportTypeDb::Stolen => ReportType::Stolen,
            ReportTypeDb::Dead => ReportType::Dead,
        }
    }
}

impl From<ReportType> for ReportTypeDb {
    fn from(report_type: ReportType) -> Self {
        match report_type {
            ReportType::Missing => ReportTypeDb::Missing,
            ReportType::Stolen => ReportTypeDb::Stolen,
            ReportType::Dead => ReportTypeDb::Dead,
        }
    }
}

/// Database row mapping for the device_requests table.
#[derive(Debug, Clone, FromRow)]
pub struct DeviceRequestEntity {
    pub id: Uuid,
    pub device_id: Uuid,
    pub user_id: Uuid,
    pub request_type: RequestTypeDb,
    pub report_type: Option<ReportTypeDb>,
    pub reason: Option<String>,
    pub rental_period_days: Option<i32>,
    pub status: RequestStatusDb,
    pub requested_at: DateTime<Utc>,
    pub processed_at: Option<DateTime<Utc>>,
    pub processed_by: Option<Uuid>,
    pub updated_at: DateTime<Utc>,
}

impl From<DeviceRequestEntity> for domain::models::DeviceRequest {
    fn from(entity: DeviceRequestEntity) -> Self {
        Self {
            id: entity.id,
            device_id: entity.device_id,
            user_id: entity.user_id,
            request_type: entity.request_type.into(),
            report_type: entity.report_type.map(Into::into),
            reason: entity.reason,
            rental_period_days: entity.rental_period_days,
            status: entity.status.into(),
            requested_at: entity.requested_at,
            processed_at: entity.processed_at,
            processed_by: entity.processed_by,
            updated_at: entity.updated_at,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_entity_to_domain() {
        let entity = DeviceRequestEntity {
            id: Uuid::new_v4(),
            device_id: Uuid::new_v4(),
            user_id: Uuid::new_v4(),
            request_type: RequestTypeDb::Report,
            report_type: Some(ReportTypeDb::Stolen),
            reason: Some("Left on the train".to_string()),
            rental_period_days: None,
            status: RequestStatusDb::Pending,
            requested_at: Utc::now(),
            processed_at: None,
            processed_by: None,
            updated_at: Utc::now(),
        };

        let request: domain::models::DeviceRequest = entity.clone().into();
        assert_eq!(request.id, entity.id);
        assert_eq!(request.request_type, RequestType::Report);
        assert_eq!(request.report_type, Some(ReportType::Stolen));
        assert_eq!(request.status, RequestStatus::Pending);
    }

    #[test]
    fn test_status_conversion_round_trip() {
        for status in [
            RequestStatus::Pending,
            RequestStatus::Approved,
            RequestStatus::Rejected,
            RequestStatus::Cancelled,
        ] {
            assert_eq!(RequestStatus::from(RequestStatusDb::from(status)), status);
        }
    }
}
