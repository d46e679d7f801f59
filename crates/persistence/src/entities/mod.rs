//! Database entity definitions.
//!
//! Entities are direct mappings to database rows.

pub mod device;
pub mod device_request;

pub use device::{DeviceCategoryDb, DeviceEntity, DeviceStatusDb, DeviceTypeDb};
pub use device_request::{DeviceRequestEntity, ReportTypeDb, RequestStatusDb, RequestTypeDb};
