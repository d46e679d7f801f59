//! Device entity (database row mapping).

use chrono::{DateTime, NaiveDate, Utc};
use domain::models::{DeviceCategory, DeviceStatus, DeviceType};
use sqlx::FromRow;
use uuid::Uuid;

/// Database enum for device status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, sqlx::Type)]
#[sqlx(type_name = "device_status", rename_all = "lowercase")]
pub enum DeviceStatusDb {
    Available,
    Assigned,
    Missing,
    Stolen,
    Dead,
    Returned,
    Pending,
}

impl From<DeviceStatusDb> for DeviceStatus {
    fn from(status: DeviceStatusDb) -> Self {
        match status {
            DeviceStatusDb::Available => DeviceStatus::Available,
            DeviceStatusDb::Assigned => DeviceStatus::Assigned,
            DeviceStatusDb::Missing => DeviceStatus::Missing,
            DeviceStatusDb::Stolen => DeviceStatus::Stolen,
            DeviceStatusDb::Dead => DeviceStatus::Dead,
            DeviceStatusDb::Returned => DeviceStatus::Returned,
            DeviceStatusDb::Pending => DeviceStatus::Pending,
        }
    }
}

impl From<DeviceStatus> for DeviceStatusDb {
    fn from(status: DeviceStatus) -> Self {
        match status {
            DeviceStatus::Available => DeviceStatusDb::Available,
            DeviceStatus::Assigned => DeviceStatusDb::Assigned,
            DeviceStatus::Missing => DeviceStatusDb::Missing,
            DeviceStatus::Stolen => DeviceStatusDb::Stolen,
            DeviceStatus::Dead => DeviceStatusDb::Dead,
            DeviceStatus::Returned => DeviceStatusDb::Returned,
            DeviceStatus::Pending => DeviceStatusDb::Pending,
        }
    }
}

/// Database enum for the device category (`type` column).
#[derive(Debug, Clone, Copy, PartialEq, Eq, sqlx::Type)]
#[sqlx(type_name = "device_category")]
pub enum DeviceCategoryDb {
    Smartphone,
    Tablet,
    Smartwatch,
    Box,
    #[sqlx(rename = "PC")]
    Pc,
    Accessory,
    Other,
}

impl From<DeviceCategoryDb> for DeviceCategory {
    fn from(category: DeviceCategoryDb) -> Self {
        match category {
            DeviceCategoryDb::Smartphone => DeviceCategory::Smartphone,
            DeviceCategoryDb::Tablet => DeviceCategory::Tablet,
            DeviceCategoryDb::Smartwatch => DeviceCategory::Smartwatch,
            DeviceCategoryDb::Box => DeviceCategory::Box,
            DeviceCategoryDb::Pc => DeviceCategory::Pc,
            DeviceCategoryDb::Accessory => DeviceCategory::Accessory,
            DeviceCategoryDb::Other => DeviceCategory::Other,
        }
    }
}

impl From<DeviceCategory> for DeviceCategoryDb {
    fn from(category: DeviceCategory) -> Self {
        match category {
            DeviceCategory::Smartphone => DeviceCategoryDb::Smartphone,
            DeviceCategory::Tablet => DeviceCategoryDb::Tablet,
            DeviceCategory::Smartwatch => DeviceCategoryDb::Smartwatch,
            DeviceCategory::Box => DeviceCategoryDb::Box,
            DeviceCategory::Pc => DeviceCategoryDb::Pc,
            DeviceCategory::Accessory => DeviceCategoryDb::Accessory,
            DeviceCategory::Other => DeviceCategoryDb::Other,
        }
    }
}

/// Database enum for the secondary device classification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, sqlx::Type)]
#[sqlx(type_name = "device_kind")]
pub enum DeviceTypeDb {
    #[sqlx(rename = "C-Type")]
    CType,
    Lunchbox,
}

impl From<DeviceTypeDb> for DeviceType {
    fn from(device_type: DeviceTypeDb) -> Self {
        match device_type {
            DeviceTypeDb::CType => DeviceType::CType,
            DeviceTypeDb::Lunchbox => DeviceType::Lunchbox,
        }
    }
}

impl From<DeviceType> for DeviceTypeDb {
    fn from(device_type: DeviceType) -> Self {
        match device_type {
            DeviceType::CType => DeviceTypeDb::CType,
            DeviceType::Lunchbox => DeviceTypeDb::Lunchbox,
        }
    }
}

/// Database row mapping for the devices table.
#[derive(Debug, Clone, FromRow)]
pub struct DeviceEntity {
    pub id: Uuid,
    pub project: String,
    pub project_group: String,
    pub category: DeviceCategoryDb,
    pub device_type: Option<DeviceTypeDb>,
    pub imei: Option<String>,
    pub serial_number: Option<String>,
    pub status: DeviceStatusDb,
    pub assigned_to_id: Option<Uuid>,
    pub received_date: Option<NaiveDate>,
    pub return_date: Option<NaiveDate>,
    pub notes: Option<String>,
    pub memo: Option<String>,
    pub device_picture: Option<String>,
    pub requested_by: Option<Uuid>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<DeviceEntity> for domain::models::Device {
    fn from(entity: DeviceEntity) -> Self {
        Self {
            id: entity.id,
            project: entity.project,
            project_group: entity.project_group,
            category: entity.category.into(),
            device_type: entity.device_type.map(Into::into),
            imei: entity.imei,
            serial_number: entity.serial_number,
            status: entity.status.into(),
            assigned_to_id: entity.assigned_to_id,
            received_date: entity.received_date,
            return_date: entity.return_date,
            notes: entity.notes,
            memo: entity.memo,
            device_picture: entity.device_picture,
            requested_by: entity.requested_by,
            created_at: entity.created_at,
            updated_at: entity.updated_at,
        }
    }
}
