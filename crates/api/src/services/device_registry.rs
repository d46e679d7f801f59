//! Device registry: authoritative store of devices and their attributes.
//!
//! Lifecycle fields are normally moved by the request workflow; the admin
//! update here is the escape hatch for corrections and does not check the
//! one-pending-request rule.

use domain::models::{
    Caller, CreateDeviceRequest, Device, ListDevicesQuery, ListDevicesResponse, Pagination,
    UpdateDeviceRequest,
};
use domain::DomainError;
use persistence::map_db_error;
use persistence::repositories::{DeviceRepository, NewDevice};
use sqlx::PgPool;
use tracing::info;
use uuid::Uuid;
use validator::Validate;

use crate::middleware::metrics::{record_device_created, record_device_deleted};

#[derive(Clone)]
pub struct DeviceRegistry {
    pool: PgPool,
    devices: DeviceRepository,
}

impl DeviceRegistry {
    pub fn new(pool: PgPool) -> Self {
        Self {
            devices: DeviceRepository::new(pool.clone()),
            pool,
        }
    }

    /// Register a new device with status `available`.
    pub async fn create_device(
        &self,
        caller: &Caller,
        request: CreateDeviceRequest,
    ) -> Result<Device, DomainError> {
        caller.require_admin("register devices")?;
        request.validate()?;

        let category = request.category.ok_or_else(|| {
            DomainError::Validation("category: Device type is required".to_string())
        })?;

        let entity = self
            .devices
            .create(NewDevice {
                project: request.project.trim(),
                project_group: request.project_group.trim(),
                category,
                device_type: request.device_type,
                imei: request.imei.as_deref(),
                serial_number: request.serial_number.as_deref(),
                received_date: request.received_date,
                return_date: request.return_date,
                notes: request.notes.as_deref(),
                memo: request.memo.as_deref(),
                device_picture: request.device_picture.as_deref(),
            })
            .await
            .map_err(map_db_error)?;

        record_device_created();
        info!(
            device_id = %entity.id,
            admin_id = %caller.user_id,
            project = %entity.project,
            "Device registered"
        );

        Ok(entity.into())
    }

    pub async fn get_device(&self, id: Uuid) -> Result<Device, DomainError> {
        self.devices
            .find_by_id(id)
            .await
            .map_err(map_db_error)?
            .map(Device::from)
            .ok_or_else(|| DomainError::device_not_found(id))
    }

    pub async fn list_devices(
        &self,
        query: &ListDevicesQuery,
    ) -> Result<ListDevicesResponse, DomainError> {
        let filter = query.filter();
        let page = query.page_request();

        let total = self.devices.count(&filter).await.map_err(map_db_error)?;
        let entities = self
            .devices
            .list(&filter, page)
            .await
            .map_err(map_db_error)?;

        Ok(ListDevicesResponse {
            data: entities.into_iter().map(Device::from).collect(),
            pagination: Pagination::new(page, total),
        })
    }

    /// Apply a direct admin edit. Any field, including `status`, may be set.
    pub async fn update_device(
        &self,
        caller: &Caller,
        id: Uuid,
        update: UpdateDeviceRequest,
    ) -> Result<Device, DomainError> {
        caller.require_admin("edit devices")?;
        update.validate()?;

        let mut tx = self.pool.begin().await.map_err(map_db_error)?;

        let mut device: Device = self
            .devices
            .lock_by_id(&mut *tx, id)
            .await
            .map_err(map_db_error)?
            .ok_or_else(|| DomainError::device_not_found(id))?
            .into();

        let previous_status = device.status;
        device.apply_update(update);

        let entity = self
            .devices
            .update_attributes(&mut *tx, &device)
            .await
            .map_err(map_db_error)?;

        tx.commit().await.map_err(map_db_error)?;

        info!(
            device_id = %id,
            admin_id = %caller.user_id,
            previous_status = %previous_status,
            status = %device.status,
            "Device updated"
        );

        Ok(entity.into())
    }

    /// Hard-delete a device. Devices with request history cannot be deleted.
    pub async fn delete_device(&self, caller: &Caller, id: Uuid) -> Result<(), DomainError> {
        caller.require_admin("delete devices")?;

        let deleted = self.devices.delete(id).await.map_err(map_db_error)?;
        if deleted == 0 {
            return Err(DomainError::device_not_found(id));
        }

        record_device_deleted();
        info!(device_id = %id, admin_id = %caller.user_id, "Device deleted");

        Ok(())
    }
}
