use chrono::NaiveDate;
use tracing::{error, info, instrument, warn};

use crate::{
    auth::auth::AuthUser,
    error::AppError,
    model::attendance::{Attendance, AttendanceStatus, AttendanceWithOwner, NewAttendance},
    store::{HrStore, StoreError},
};

#[derive(Debug, Clone, PartialEq)]
pub enum MarkOutcome {
    Marked(Attendance),
    /// A record for this employee and day already exists.
    AlreadyMarked,
}

/// Whether the caller has a record for `today`. A failed lookup counts as
/// not marked.
pub async fn has_marked_today(store: &dyn HrStore, viewer: &AuthUser, today: NaiveDate) -> bool {
    match store.find_attendance(viewer.user_id, today).await {
        Ok(record) => record.is_some(),
        Err(e) => {
            warn!(error = %e, employee_id = viewer.user_id, "Attendance lookup failed");
            false
        }
    }
}

#[instrument(name = "attendance_mark", skip_all, fields(employee_id = viewer.user_id, status = %status))]
pub async fn mark_attendance(
    store: &dyn HrStore,
    viewer: &AuthUser,
    status: AttendanceStatus,
    today: NaiveDate,
) -> Result<MarkOutcome, AppError> {
    let result = store
        .insert_attendance(NewAttendance {
            employee_id: viewer.user_id,
            date: today,
            status,
        })
        .await;

    match result {
        Ok(record) => {
            info!(attendance_id = record.id, "Attendance marked");
            Ok(MarkOutcome::Marked(record))
        }
        Err(StoreError::Duplicate) => {
            info!("Attendance already marked for today");
            Ok(MarkOutcome::AlreadyMarked)
        }
        Err(e) => {
            error!(error = %e, "Failed to mark attendance");
            Err(AppError::Internal(anyhow::anyhow!("Failed to mark attendance: {}", e)))
        }
    }
}

/// Most recent records first, capped at `limit`.
pub async fn list_attendance(
    store: &dyn HrStore,
    viewer: &AuthUser,
    limit: u32,
) -> Result<Vec<AttendanceWithOwner>, AppError> {
    Ok(store.list_attendance(viewer.scope(), limit).await?)
}
