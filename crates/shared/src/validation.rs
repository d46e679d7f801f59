//! Common validation utilities.

use validator::ValidationError;

/// Shortest rental period an assign request may ask for, in days.
pub const MIN_RENTAL_PERIOD_DAYS: i32 = 7;

/// Longest rental period an assign request may ask for, in days.
pub const MAX_RENTAL_PERIOD_DAYS: i32 = 365;

/// Minimum length of a report reason, in characters.
pub const MIN_REPORT_REASON_CHARS: usize = 10;

/// Maximum length of a report reason, in characters.
pub const MAX_REPORT_REASON_CHARS: usize = 500;

/// Validates that a rental period is within 7 to 365 days.
pub fn validate_rental_period_days(days: i32) -> Result<(), ValidationError> {
    if (MIN_RENTAL_PERIOD_DAYS..=MAX_RENTAL_PERIOD_DAYS).contains(&days) {
        Ok(())
    } else {
        let mut err = ValidationError::new("rental_period_range");
        err.message = Some(
            format!(
                "Rental period must be between {} and {} days",
                MIN_RENTAL_PERIOD_DAYS, MAX_RENTAL_PERIOD_DAYS
            )
            .into(),
        );
        Err(err)
    }
}

/// Validates the length of a report reason.
///
/// Length is counted in characters after trimming surrounding whitespace,
/// so multi-byte input is not penalised.
pub fn validate_report_reason(reason: &str) -> Result<(), ValidationError> {
    let len = reason.trim().chars().count();
    if (MIN_REPORT_REASON_CHARS..=MAX_REPORT_REASON_CHARS).contains(&len) {
        Ok(())
    } else {
        let mut err = ValidationError::new("reason_length");
        err.message = Some(
            format!(
                "Reason must be between {} and {} characters",
                MIN_REPORT_REASON_CHARS, MAX_REPORT_REASON_CHARS
            )
            .into(),
        );
        Err(err)
    }
}

/// Validates the optional reason on assign, release and return requests.
///
/// Only the upper bound applies; these reasons are free-form notes.
pub fn validate_request_reason(reason: &str) -> Result<(), ValidationError> {
    if reason.trim().chars().count() <= MAX_REPORT_REASON_CHARS {
        Ok(())
    } else {
        let mut err = ValidationError::new("reason_length");
        err.message = Some(
            format!(
                "Reason must be at most {} characters",
                MAX_REPORT_REASON_CHARS
            )
            .into(),
        );
        Err(err)
    }
}

/// Validates that a required text field is not empty or whitespace.
pub fn validate_not_blank(value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        let mut err = ValidationError::new("blank");
        err.message = Some("Value must not be empty".into());
        Err(err)
    } else {
        Ok(())
    }
}
