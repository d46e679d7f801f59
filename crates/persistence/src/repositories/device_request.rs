//! Device request repository for database operations.
//!
//! Write methods take a connection so the workflow can pair them with the
//! device update inside one transaction.

use domain::models::{PageRequest, RequestFilter, RequestStatus, RequestType, SubmitRequestPayload};
use sqlx::{PgConnection, PgPool};
use uuid::Uuid;

use crate::entities::{DeviceRequestEntity, ReportTypeDb, RequestStatusDb, RequestTypeDb};
use crate::metrics::QueryTimer;

const REQUEST_COLUMNS: &str = r#"
    id, device_id, user_id, request_type, report_type, reason, rental_period_days,
    status, requested_at, processed_at, processed_by, updated_at
"#;

/// Repository for device request database operations.
#[derive(Clone)]
pub struct DeviceRequestRepository {
    pool: PgPool,
}

impl DeviceRequestRepository {
    /// Creates a new DeviceRequestRepository with the given connection pool.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Insert a new pending request.
    pub async fn create(
        &self,
        conn: &mut PgConnection,
        device_id: Uuid,
        user_id: Uuid,
        request_type: RequestType,
        payload: &SubmitRequestPayload,
    ) -> Result<DeviceRequestEntity, sqlx::Error> {
        let timer = QueryTimer::new("create_device_request");
        let result = sqlx::query_as::<_, DeviceRequestEntity>(&format!(
            r#"
            INSERT INTO device_requests (device_id, user_id, request_type, report_type, reason, rental_period_days)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING {REQUEST_COLUMNS}
            "#
        ))
        .bind(device_id)
        .bind(user_id)
        .bind(RequestTypeDb::from(request_type))
        .bind(payload.report_type.map(ReportTypeDb::from))
        .bind(payload.reason.as_deref())
        .bind(payload.rental_period_days)
        .fetch_one(&mut *conn)
        .await;
        timer.record();
        result
    }

    /// Find a request by ID.
    pub async fn find_by_id(&self, id: Uuid) -> Result<Option<DeviceRequestEntity>, sqlx::Error> {
        let timer = QueryTimer::new("find_device_request_by_id");
        let result = sqlx::query_as::<_, DeviceRequestEntity>(&format!(
            "SELECT {REQUEST_COLUMNS} FROM device_requests WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await;
        timer.record();
        result
    }

    /// Find a request by ID and hold a row lock until the transaction ends.
    pub async fn lock_by_id(
        &self,
        conn: &mut PgConnection,
        id: Uuid,
    ) -> Result<Option<DeviceRequestEntity>, sqlx::Error> {
        let timer = QueryTimer::new("lock_device_request_by_id");
        let result = sqlx::query_as::<_, DeviceRequestEntity>(&format!(
            "SELECT {REQUEST_COLUMNS} FROM device_requests WHERE id = $1 FOR UPDATE"
        ))
        .bind(id)
        .fetch_optional(&mut *conn)
        .await;
        timer.record();
        result
    }

    /// Whether a pending request exists for the device.
    pub async fn has_pending_for_device(
        &self,
        conn: &mut PgConnection,
        device_id: Uuid,
    ) -> Result<bool, sqlx::Error> {
        let timer = QueryTimer::new("has_pending_device_request");
        let result = sqlx::query_scalar::<_, bool>(
            r#"
            SELECT EXISTS(
                SELECT 1 FROM device_requests WHERE device_id = $1 AND status = 'pending'
            )
            "#,
        )
        .bind(device_id)
        .fetch_one(&mut *conn)
        .await;
        timer.record();
        result
    }

    /// Move a pending request to a terminal status.
    ///
    /// Returns `None` when the request is no longer pending, so a second
    /// resolution can never overwrite the first.
    pub async fn finish(
        &self,
        conn: &mut PgConnection,
        id: Uuid,
        status: RequestStatus,
        processed_by: Uuid,
    ) -> Result<Option<DeviceRequestEntity>, sqlx::Error> {
        let timer = QueryTimer::new("finish_device_request");
        let result = sqlx::query_as::<_, DeviceRequestEntity>(&format!(
            r#"
            UPDATE device_requests
            SET status = $2, processed_at = NOW(), processed_by = $3, updated_at = NOW()
            WHERE id = $1 AND status = 'pending'
            RETURNING {REQUEST_COLUMNS}
            "#
        ))
        .bind(id)
        .bind(RequestStatusDb::from(status))
        .bind(processed_by)
        .fetch_optional(&mut *conn)
        .await;
        timer.record();
        result
    }

    /// List requests matching the filter, newest first.
    pub async fn list(
        &self,
        filter: &RequestFilter,
        page: PageRequest,
    ) -> Result<Vec<DeviceRequestEntity>, sqlx::Error> {
        let timer = QueryTimer::new("list_device_requests");
        let result = sqlx::query_as::<_, DeviceRequestEntity>(&format!(
            r#"
            SELECT {REQUEST_COLUMNS}
            FROM device_requests
            WHERE ($1::request_status IS NULL OR status = $1)
              AND ($2::request_type IS NULL OR request_type = $2)
              AND ($3::UUID IS NULL OR device_id = $3)
              AND ($4::UUID IS NULL OR user_id = $4)
            ORDER BY requested_at DESC, id
            LIMIT $5 OFFSET $6
            "#
        ))
        .bind(filter.status.map(RequestStatusDb::from))
        .bind(filter.request_type.map(RequestTypeDb::from))
        .bind(filter.device_id)
        .bind(filter.user_id)
        .bind(page.limit())
        .bind(page.offset())
        .fetch_all(&self.pool)
        .await;
        timer.record();
        result
    }

    /// Count requests matching the filter.
    pub async fn count(&self, filter: &RequestFilter) -> Result<i64, sqlx::Error> {
        let timer = QueryTimer::new("count_device_requests");
        let result = sqlx::query_scalar::<_, i64>(
            r#"
            SELECT COUNT(*)
            FROM device_requests
            WHERE ($1::request_status IS NULL OR status = $1)
              AND ($2::request_type IS NULL OR request_type = $2)
              AND ($3::UUID IS NULL OR device_id = $3)
              AND ($4::UUID IS NULL OR user_id = $4)
            "#,
        )
        .bind(filter.status.map(RequestStatusDb::from))
        .bind(filter.request_type.map(RequestTypeDb::from))
        .bind(filter.device_id)
        .bind(filter.user_id)
        .fetch_one(&self.pool)
        .await;
        timer.record();
        result
    }
}
