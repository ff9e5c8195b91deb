use chrono::NaiveDate;
use serde::Deserialize;
use tracing::{info, instrument};
use utoipa::ToSchema;

use crate::{
    auth::auth::AuthUser,
    error::AppError,
    model::leave::{Leave, LeaveDecision, LeaveStatus, LeaveType, LeaveWithOwner, NewLeave},
    store::HrStore,
};

#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct SubmitLeave {
    pub leave_type: LeaveType,
    #[schema(example = "2026-01-01", format = "date", value_type = String)]
    pub start_date: NaiveDate,
    #[schema(example = "2026-01-03", format = "date", value_type = String)]
    pub end_date: NaiveDate,
    #[schema(example = "Family event")]
    pub reason: String,
}

/// Every leave for admins, the caller's own otherwise. Newest first.
pub async fn list_leaves(
    store: &dyn HrStore,
    viewer: &AuthUser,
) -> Result<Vec<LeaveWithOwner>, AppError> {
    Ok(store.list_leaves(viewer.scope()).await?)
}

pub async fn get_leave(store: &dyn HrStore, viewer: &AuthUser, leave_id: u64) -> Result<Leave, AppError> {
    store
        .find_leave(leave_id, viewer.scope())
        .await?
        .ok_or_else(|| AppError::NotFound("Leave request not found".to_string()))
}

/// Files a leave for the caller. The new leave is always pending; date
/// order is left to the client.
#[instrument(name = "leave_submit", skip_all, fields(employee_id = viewer.user_id))]
pub async fn submit_leave(
    store: &dyn HrStore,
    viewer: &AuthUser,
    req: SubmitLeave,
) -> Result<Leave, AppError> {
    let reason = req.reason.trim().to_string();
    if reason.is_empty() {
        return Err(AppError::BadRequest("Reason must not be empty".to_string()));
    }

    let leave = store
        .insert_leave(NewLeave {
            employee_id: viewer.user_id,
            leave_type: req.leave_type,
            start_date: req.start_date,
            end_date: req.end_date,
            reason,
        })
        .await?;

    info!(leave_id = leave.id, "Leave request submitted");
    Ok(leave)
}

/// Moves a pending leave to approved or rejected. Decided leaves are
/// final: a second decision is a conflict.
#[instrument(name = "leave_decide", skip_all, fields(leave_id = leave_id, decision = ?decision))]
pub async fn set_leave_status(
    store: &dyn HrStore,
    viewer: &AuthUser,
    leave_id: u64,
    decision: LeaveDecision,
) -> Result<Leave, AppError> {
    viewer.require_admin()?;

    let leave = get_leave(store, viewer, leave_id).await?;
    let already_processed = || AppError::Conflict("Leave request already processed".to_string());

    if leave.status != LeaveStatus::Pending {
        info!(status = %leave.status, "Leave already decided");
        return Err(already_processed());
    }

    let target = LeaveStatus::from(decision);
    if !store
        .transition_leave(leave_id, LeaveStatus::Pending, target)
        .await?
    {
        // Decided by someone else between the read and the write.
        return Err(already_processed());
    }

    info!(status = %target, "Leave status updated");
    Ok(Leave {
        status: target,
        ..leave
    })
}
