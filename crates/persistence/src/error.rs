//! Mapping from database errors to domain errors.

use domain::DomainError;

/// Name of the partial unique index allowing one pending request per device.
pub const ONE_PENDING_REQUEST_INDEX: &str = "idx_device_requests_one_pending";

/// PostgreSQL unique violation.
const UNIQUE_VIOLATION: &str = "23505";

/// PostgreSQL foreign key violation.
const FOREIGN_KEY_VIOLATION: &str = "23503";

/// Converts a database error into the domain taxonomy.
///
/// Only the constraint violations the schema uses to back lifecycle rules are
/// mapped to business errors; everything else is a storage failure.
pub fn map_db_error(err: sqlx::Error) -> DomainError {
    if let sqlx::Error::RowNotFound = err {
        return DomainError::NotFound("Record not found".to_string());
    }

    if let sqlx::Error::Database(db_err) = &err {
        let code = db_err.code();
        if code.as_deref() == Some(UNIQUE_VIOLATION)
            && db_err.constraint() == Some(ONE_PENDING_REQUEST_INDEX)
        {
            return DomainError::DuplicateRequest;
        }
        if code.as_deref() == Some(FOREIGN_KEY_VIOLATION) {
            return DomainError::InvalidState(
                "Device has request history and cannot be deleted".to_string(),
            );
        }
    }

    tracing::error!(error = %err, "Database error");
    DomainError::Storage(err.to_string())
}
