//! Record access for the three HR collections plus the identity tables.
//!
//! Handlers and services only ever talk to [`HrStore`]; the MySQL
//! implementation backs the running service and the in-memory one backs
//! the tests.

use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};
use derive_more::Display;

use crate::model::{
    attendance::{Attendance, AttendanceStatus, AttendanceWithOwner, NewAttendance},
    leave::{Leave, LeaveStatus, LeaveWithOwner, NewLeave},
    profile::{Identity, NewAccount, Profile, ProfileUpdate},
    role::Scope,
};

#[cfg(test)]
pub mod memory;
pub mod mysql;

#[derive(Debug, Display)]
pub enum StoreError {
    /// A uniqueness constraint rejected the write.
    #[display(fmt = "duplicate record")]
    Duplicate,
    #[display(fmt = "database error: {}", _0)]
    Database(sqlx::Error),
}

impl std::error::Error for StoreError {}

impl From<sqlx::Error> for StoreError {
    fn from(err: sqlx::Error) -> Self {
        if let sqlx::Error::Database(db_err) = &err {
            if db_err.is_unique_violation() {
                return StoreError::Duplicate;
            }
        }
        StoreError::Database(err)
    }
}

pub type StoreResult<T> = Result<T, StoreError>;

#[async_trait]
pub trait HrStore: Send + Sync {
    // identities

    /// Creates the identity and its profile atomically. The profile id is
    /// the identity id.
    async fn create_account(&self, account: NewAccount) -> StoreResult<Profile>;
    async fn find_identity_by_email(&self, email: &str) -> StoreResult<Option<Identity>>;
    async fn find_identity(&self, id: u64) -> StoreResult<Option<Identity>>;
    /// Removes the identity and its profile; dependent rows cascade.
    /// Returns false when no such identity exists.
    async fn delete_account(&self, id: u64) -> StoreResult<bool>;
    async fn store_refresh_token(
        &self,
        user_id: u64,
        jti: &str,
        expires_at: DateTime<Utc>,
    ) -> StoreResult<()>;
    /// Revokes an active, unexpired refresh token. Returns false when the
    /// token is unknown, expired or already revoked.
    async fn revoke_refresh_token(&self, jti: &str) -> StoreResult<bool>;

    // profiles
    async fn list_profiles(&self) -> StoreResult<Vec<Profile>>;
    async fn find_profile(&self, id: u64) -> StoreResult<Option<Profile>>;
    async fn update_profile(&self, id: u64, update: ProfileUpdate) -> StoreResult<Option<Profile>>;
    async fn count_profiles(&self) -> StoreResult<u64>;

    // leaves
    async fn insert_leave(&self, leave: NewLeave) -> StoreResult<Leave>;
    async fn find_leave(&self, id: u64, scope: Scope) -> StoreResult<Option<Leave>>;
    async fn list_leaves(&self, scope: Scope) -> StoreResult<Vec<LeaveWithOwner>>;
    /// Compare-and-set on the status column. Returns true if the row was
    /// in `from` and now holds `to`.
    async fn transition_leave(&self, id: u64, from: LeaveStatus, to: LeaveStatus)
    -> StoreResult<bool>;
    async fn leave_statuses(&self, scope: Scope) -> StoreResult<Vec<LeaveStatus>>;

    // attendance

    /// Fails with [`StoreError::Duplicate`] when the employee already has a
    /// record for that date.
    async fn insert_attendance(&self, record: NewAttendance) -> StoreResult<Attendance>;
    async fn find_attendance(&self, employee_id: u64, date: NaiveDate)
    -> StoreResult<Option<Attendance>>;
    async fn list_attendance(&self, scope: Scope, limit: u32)
    -> StoreResult<Vec<AttendanceWithOwner>>;
    async fn attendance_statuses_on(
        &self,
        scope: Scope,
        date: NaiveDate,
    ) -> StoreResult<Vec<AttendanceStatus>>;
}
