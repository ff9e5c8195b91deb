use chrono::NaiveDate;

use crate::{auth::auth::AuthUser, error::AppError, model::dashboard::DashboardStats, store::HrStore};

/// Counts over the rows visible to `viewer`. The employee total is only
/// computed for admins.
pub async fn compute_stats(
    store: &dyn HrStore,
    viewer: &AuthUser,
    today: NaiveDate,
) -> Result<DashboardStats, AppError> {
    let scope = viewer.scope();
    let mut stats = DashboardStats::default();

    if viewer.is_admin() {
        stats.total_employees = store.count_profiles().await?;
    }

    let leaves = store.leave_statuses(scope).await?;
    stats.tally_leaves(&leaves);

    let attendance = store.attendance_statuses_on(scope, today).await?;
    stats.tally_attendance(&attendance);

    Ok(stats)
}
