//! Chronology check and the inclusive intersection rule.

use chrono::NaiveDateTime;

use crate::error::ScheduleError;

/// Fail with [`ScheduleError::InvalidInterval`] unless `start` is strictly
/// before `end`.
///
/// Every other check assumes this one passed.
pub fn validate_chronology(start: NaiveDateTime, end: NaiveDateTime) -> Result<(), ScheduleError> {
    if start < end {
        Ok(())
    } else {
        Err(ScheduleError::InvalidInterval { start, end })
    }
}

/// Whether an existing interval touches or overlaps the proposed `[start, end]`.
///
/// Both intervals are treated as closed, so an appointment ending exactly when
/// the proposed one starts counts. This also catches an existing appointment
/// that fully contains the proposed one, where neither of its endpoints falls
/// inside the proposed range.
pub fn touches(
    existing_start: NaiveDateTime,
    existing_end: NaiveDateTime,
    start: NaiveDateTime,
    end: NaiveDateTime,
) -> bool {
    existing_start <= end && existing_end >= start
}
