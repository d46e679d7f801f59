//! Device repository for database operations.

use chrono::NaiveDate;
use domain::models::{
    Device, DeviceCategory, DeviceFilter, DeviceType, LifecycleState, PageRequest,
};
use sqlx::{PgConnection, PgPool};
use uuid::Uuid;

use crate::entities::{DeviceCategoryDb, DeviceEntity, DeviceStatusDb, DeviceTypeDb};
use crate::metrics::QueryTimer;

const DEVICE_COLUMNS: &str = r#"
    id, project, project_group, category, device_type, imei, serial_number, status,
    assigned_to_id, received_date, return_date, notes, memo, device_picture,
    requested_by, created_at, updated_at
"#;

/// Attributes of a device about to be registered.
#[derive(Debug, Clone)]
pub struct NewDevice<'a> {
    pub project: &'a str,
    pub project_group: &'a str,
    pub category: DeviceCategory,
    pub device_type: Option<DeviceType>,
    pub imei: Option<&'a str>,
    pub serial_number: Option<&'a str>,
    pub received_date: Option<NaiveDate>,
    pub return_date: Option<NaiveDate>,
    pub notes: Option<&'a str>,
    pub memo: Option<&'a str>,
    pub device_picture: Option<&'a str>,
}

/// Repository for device-related database operations.
#[derive(Clone)]
pub struct DeviceRepository {
    pool: PgPool,
}

impl DeviceRepository {
    /// Creates a new DeviceRepository with the given connection pool.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Insert a new device. Status starts as `available` with no assignment.
    pub async fn create(&self, device: NewDevice<'_>) -> Result<DeviceEntity, sqlx::Error> {
        let timer = QueryTimer::new("create_device");
        let result = sqlx::query_as::<_, DeviceEntity>(&format!(
            r#"
            INSERT INTO devices (project, project_group, category, device_type, imei, serial_number,
                                 received_date, return_date, notes, memo, device_picture)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11)
            RETURNING {DEVICE_COLUMNS}
            "#
        ))
        .bind(device.project)
        .bind(device.project_group)
        .bind(DeviceCategoryDb::from(device.category))
        .bind(device.device_type.map(DeviceTypeDb::from))
        .bind(device.imei)
        .bind(device.serial_number)
        .bind(device.received_date)
        .bind(device.return_date)
        .bind(device.notes)
        .bind(device.memo)
        .bind(device.device_picture)
        .fetch_one(&self.pool)
        .await;
        timer.record();
        result
    }

    /// Find a device by ID.
    pub async fn find_by_id(&self, id: Uuid) -> Result<Option<DeviceEntity>, sqlx::Error> {
        let timer = QueryTimer::new("find_device_by_id");
        let result = sqlx::query_as::<_, DeviceEntity>(&format!(
            "SELECT {DEVICE_COLUMNS} FROM devices WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await;
        timer.record();
        result
    }

    /// Find a device by ID and hold a row lock until the transaction ends.
    pub async fn lock_by_id(
        &self,
        conn: &mut PgConnection,
        id: Uuid,
    ) -> Result<Option<DeviceEntity>, sqlx::Error> {
        let timer = QueryTimer::new("lock_device_by_id");
        let result = sqlx::query_as::<_, DeviceEntity>(&format!(
            "SELECT {DEVICE_COLUMNS} FROM devices WHERE id = $1 FOR UPDATE"
        ))
        .bind(id)
        .fetch_optional(&mut *conn)
        .await;
        timer.record();
        result
    }

    /// Write the workflow-owned fields of a device.
    pub async fn update_lifecycle(
        &self,
        conn: &mut PgConnection,
        id: Uuid,
        state: &LifecycleState,
    ) -> Result<DeviceEntity, sqlx::Error> {
        let timer = QueryTimer::new("update_device_lifecycle");
        let result = sqlx::query_as::<_, DeviceEntity>(&format!(
            r#"
            UPDATE devices
            SET status = $2, assigned_to_id = $3, requested_by = $4,
                received_date = $5, return_date = $6, updated_at = NOW()
            WHERE id = $1
            RETURNING {DEVICE_COLUMNS}
            "#
        ))
        .bind(id)
        .bind(DeviceStatusDb::from(state.status))
        .bind(state.assigned_to_id)
        .bind(state.requested_by)
        .bind(state.received_date)
        .bind(state.return_date)
        .fetch_one(&mut *conn)
        .await;
        timer.record();
        result
    }

    /// Write every admin-editable field of a device. `requested_by` is left alone.
    pub async fn update_attributes(
        &self,
        conn: &mut PgConnection,
        device: &Device,
    ) -> Result<DeviceEntity, sqlx::Error> {
        let timer = QueryTimer::new("update_device_attributes");
        let result = sqlx::query_as::<_, DeviceEntity>(&format!(
            r#"
            UPDATE devices
            SET project = $2, project_group = $3, category = $4, device_type = $5,
                imei = $6, serial_number = $7, status = $8, assigned_to_id = $9,
                received_date = $10, return_date = $11, notes = $12, memo = $13,
                device_picture = $14, updated_at = NOW()
            WHERE id = $1
            RETURNING {DEVICE_COLUMNS}
            "#
        ))
        .bind(device.id)
        .bind(&device.project)
        .bind(&device.project_group)
        .bind(DeviceCategoryDb::from(device.category))
        .bind(device.device_type.map(DeviceTypeDb::from))
        .bind(&device.imei)
        .bind(&device.serial_number)
        .bind(DeviceStatusDb::from(device.status))
        .bind(device.assigned_to_id)
        .bind(device.received_date)
        .bind(device.return_date)
        .bind(&device.notes)
        .bind(&device.memo)
        .bind(&device.device_picture)
        .fetch_one(&mut *conn)
        .await;
        timer.record();
        result
    }

    /// Delete a device. Returns the number of rows removed.
    ///
    /// Fails with a foreign key violation when requests still reference the device.
    pub async fn delete(&self, id: Uuid) -> Result<u64, sqlx::Error> {
        let timer = QueryTimer::new("delete_device");
        let result = sqlx::query("DELETE FROM devices WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await;
        timer.record();
        result.map(|r| r.rows_affected())
    }

    /// List devices matching the filter, ordered by project then creation time.
    pub async fn list(
        &self,
        filter: &DeviceFilter,
        page: PageRequest,
    ) -> Result<Vec<DeviceEntity>, sqlx::Error> {
        let timer = QueryTimer::new("list_devices");
        let result = sqlx::query_as::<_, DeviceEntity>(&format!(
            r#"
            SELECT {DEVICE_COLUMNS}
            FROM devices
            WHERE ($1::device_status IS NULL OR status = $1)
              AND ($2::UUID IS NULL OR assigned_to_id = $2)
              AND ($3::TEXT IS NULL OR project = $3)
              AND ($4::TEXT IS NULL OR project_group = $4)
              AND ($5::device_category IS NULL OR category = $5)
              AND ($6::device_kind IS NULL OR device_type = $6)
            ORDER BY project, created_at, id
            LIMIT $7 OFFSET $8
            "#
        ))
        .bind(filter.status.map(DeviceStatusDb::from))
        .bind(filter.assigned_to_id)
        .bind(filter.project.as_deref())
        .bind(filter.project_group.as_deref())
        .bind(filter.category.map(DeviceCategoryDb::from))
        .bind(filter.device_type.map(DeviceTypeDb::from))
        .bind(page.limit())
        .bind(page.offset())
        .fetch_all(&self.pool)
        .await;
        timer.record();
        result
    }

    /// Count devices matching the filter.
    pub async fn count(&self, filter: &DeviceFilter) -> Result<i64, sqlx::Error> {
        let timer = QueryTimer::new("count_devices");
        let result = sqlx::query_scalar::<_, i64>(
            r#"
            SELECT COUNT(*)
            FROM devices
            WHERE ($1::device_status IS NULL OR status = $1)
              AND ($2::UUID IS NULL OR assigned_to_id = $2)
              AND ($3::TEXT IS NULL OR project = $3)
              AND ($4::TEXT IS NULL OR project_group = $4)
              AND ($5::device_category IS NULL OR category = $5)
              AND ($6::device_kind IS NULL OR device_type = $6)
            "#,
        )
        .bind(filter.status.map(DeviceStatusDb::from))
        .bind(filter.assigned_to_id)
        .bind(filter.project.as_deref())
        .bind(filter.project_group.as_deref())
        .bind(filter.category.map(DeviceCategoryDb::from))
        .bind(filter.device_type.map(DeviceTypeDb::from))
        .fetch_one(&self.pool)
        .await;
        timer.record();
        result
    }
}
