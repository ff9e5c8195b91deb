use std::sync::{
    Mutex, MutexGuard,
    atomic::{AtomicBool, Ordering},
};

use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};

use crate::{
    model::{
        attendance::{Attendance, AttendanceStatus, AttendanceWithOwner, NewAttendance},
        leave::{Leave, LeaveStatus, LeaveWithOwner, NewLeave},
        profile::{Identity, NewAccount, Owner, Profile, ProfileUpdate},
        role::Scope,
    },
    store::{HrStore, StoreError, StoreResult},
};

struct RefreshToken {
    user_id: u64,
    jti: String,
    expires_at: DateTime<Utc>,
    revoked: bool,
}

#[derive(Default)]
struct State {
    next_id: u64,
    identities: Vec<Identity>,
    profiles: Vec<Profile>,
    leaves: Vec<Leave>,
    attendance: Vec<Attendance>,
    refresh_tokens: Vec<RefreshToken>,
}

impl State {
    fn next_id(&mut self) -> u64 {
        self.next_id += 1;
        self.next_id
    }

    fn owner(&self, employee_id: u64) -> Option<Owner> {
        self.profiles
            .iter()
            .find(|p| p.id == employee_id)
            .map(|p| Owner {
                name: p.name.clone(),
                email: p.email.clone(),
            })
    }

    /// Same rejection MySQL gives for a row whose profile does not exist.
    fn require_profile(&self, employee_id: u64) -> StoreResult<()> {
        if self.profiles.iter().any(|p| p.id == employee_id) {
            Ok(())
        } else {
            Err(StoreError::Database(sqlx::Error::Protocol(format!(
                "foreign key violation: no profile {}",
                employee_id
            ))))
        }
    }
}

/// In-memory store mirroring the MySQL schema's constraints: unique email,
/// unique (employee_id, date) attendance, profile foreign keys, cascading
/// account deletion.
#[derive(Default)]
pub struct MemoryStore {
    state: Mutex<State>,
    fail_reads: AtomicBool,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Makes every subsequent read fail with a database error.
    pub fn fail_reads(&self, fail: bool) {
        self.fail_reads.store(fail, Ordering::SeqCst);
    }

    pub fn identity_count(&self) -> usize {
        self.state().identities.len()
    }

    pub fn attendance_count(&self) -> usize {
        self.state().attendance.len()
    }

    /// Inserts a leave with an explicit status, bypassing the workflow.
    pub fn seed_leave(&self, employee_id: u64, status: LeaveStatus) -> Leave {
        let mut state = self.state();
        let id = state.next_id();
        let leave = Leave {
            id,
            employee_id,
            leave_type: crate::model::leave::LeaveType::Other,
            start_date: NaiveDate::from_ymd_opt(2026, 1, 5).expect("valid date"),
            end_date: NaiveDate::from_ymd_opt(2026, 1, 6).expect("valid date"),
            reason: "seeded".to_string(),
            status,
            created_at: Utc::now(),
        };
        state.leaves.push(leave.clone());
        leave
    }

    fn state(&self) -> MutexGuard<'_, State> {
        self.state.lock().expect("memory store poisoned")
    }

    fn read(&self) -> StoreResult<MutexGuard<'_, State>> {
        if self.fail_reads.load(Ordering::SeqCst) {
            return Err(StoreError::Database(sqlx::Error::PoolTimedOut));
        }
        Ok(self.state())
    }
}

#[async_trait]
impl HrStore for MemoryStore {
    async fn create_account(&self, account: NewAccount) -> StoreResult<Profile> {
        let mut state = self.state();
        if state.identities.iter().any(|i| i.email == account.email) {
            return Err(StoreError::Duplicate);
        }

        let id = state.next_id();
        state.identities.push(Identity {
            id,
            email: account.email.clone(),
            password_hash: account.password_hash,
            role: account.role,
        });
        let profile = Profile {
            id,
            email: account.email,
            name: account.name,
            position: account.position,
            date_of_joining: account.date_of_joining,
        };
        state.profiles.push(profile.clone());
        Ok(profile)
    }

    async fn find_identity_by_email(&self, email: &str) -> StoreResult<Option<Identity>> {
        let state = self.read()?;
        Ok(state.identities.iter().find(|i| i.email == email).cloned())
    }

    async fn find_identity(&self, id: u64) -> StoreResult<Option<Identity>> {
        let state = self.read()?;
        Ok(state.identities.iter().find(|i| i.id == id).cloned())
    }

    async fn delete_account(&self, id: u64) -> StoreResult<bool> {
        let mut state = self.state();
        let before = state.identities.len();
        state.identities.retain(|i| i.id != id);
        if state.identities.len() == before {
            return Ok(false);
        }
        state.profiles.retain(|p| p.id != id);
        state.leaves.retain(|l| l.employee_id != id);
        state.attendance.retain(|a| a.employee_id != id);
        state.refresh_tokens.retain(|t| t.user_id != id);
        Ok(true)
    }

    async fn store_refresh_token(
        &self,
        user_id: u64,
        jti: &str,
        expires_at: DateTime<Utc>,
    ) -> StoreResult<()> {
        self.state().refresh_tokens.push(RefreshToken {
            user_id,
            jti: jti.to_string(),
            expires_at,
            revoked: false,
        });
        Ok(())
    }

    async fn revoke_refresh_token(&self, jti: &str) -> StoreResult<bool> {
        let mut state = self.state();
        let now = Utc::now();
        match state
            .refresh_tokens
            .iter_mut()
            .find(|t| t.jti == jti && !t.revoked && t.expires_at > now)
        {
            Some(token) => {
                token.revoked = true;
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn list_profiles(&self) -> StoreResult<Vec<Profile>> {
        let mut profiles = self.read()?.profiles.clone();
        profiles.sort_by(|a, b| {
            b.date_of_joining
                .cmp(&a.date_of_joining)
                .then(b.id.cmp(&a.id))
        });
        Ok(profiles)
    }

    async fn find_profile(&self, id: u64) -> StoreResult<Option<Profile>> {
        Ok(self.read()?.profiles.iter().find(|p| p.id == id).cloned())
    }

    async fn update_profile(&self, id: u64, update: ProfileUpdate) -> StoreResult<Option<Profile>> {
        let mut state = self.state();
        Ok(state.profiles.iter_mut().find(|p| p.id == id).map(|profile| {
            update.apply(profile);
            profile.clone()
        }))
    }

    async fn count_profiles(&self) -> StoreResult<u64> {
        Ok(self.read()?.profiles.len() as u64)
    }

    async fn insert_leave(&self, leave: NewLeave) -> StoreResult<Leave> {
        let mut state = self.state();
        state.require_profile(leave.employee_id)?;
        let id = state.next_id();
        let leave = Leave {
            id,
            employee_id: leave.employee_id,
            leave_type: leave.leave_type,
            start_date: leave.start_date,
            end_date: leave.end_date,
            reason: leave.reason,
            status: LeaveStatus::Pending,
            created_at: Utc::now(),
        };
        state.leaves.push(leave.clone());
        Ok(leave)
    }

    async fn find_leave(&self, id: u64, scope: Scope) -> StoreResult<Option<Leave>> {
        Ok(self
            .read()?
            .leaves
            .iter()
            .find(|l| l.id == id && scope.admits(l.employee_id))
            .cloned())
    }

    async fn list_leaves(&self, scope: Scope) -> StoreResult<Vec<LeaveWithOwner>> {
        let state = self.read()?;
        let mut leaves: Vec<LeaveWithOwner> = state
            .leaves
            .iter()
            .filter(|l| scope.admits(l.employee_id))
            .filter_map(|l| {
                state.owner(l.employee_id).map(|profile| LeaveWithOwner {
                    leave: l.clone(),
                    profile,
                })
            })
            .collect();
        leaves.sort_by(|a, b| {
            b.leave
                .created_at
                .cmp(&a.leave.created_at)
                .then(b.leave.id.cmp(&a.leave.id))
        });
        Ok(leaves)
    }

    async fn transition_leave(
        &self,
        id: u64,
        from: LeaveStatus,
        to: LeaveStatus,
    ) -> StoreResult<bool> {
        let mut state = self.state();
        match state
            .leaves
            .iter_mut()
            .find(|l| l.id == id && l.status == from)
        {
            Some(leave) => {
                leave.status = to;
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn leave_statuses(&self, scope: Scope) -> StoreResult<Vec<LeaveStatus>> {
        Ok(self
            .read()?
            .leaves
            .iter()
            .filter(|l| scope.admits(l.employee_id))
            .map(|l| l.status)
            .collect())
    }

    async fn insert_attendance(&self, record: NewAttendance) -> StoreResult<Attendance> {
        let mut state = self.state();
        state.require_profile(record.employee_id)?;
        if state
            .attendance
            .iter()
            .any(|a| a.employee_id == record.employee_id && a.date == record.date)
        {
            return Err(StoreError::Duplicate);
        }
        let id = state.next_id();
        let record = Attendance {
            id,
            employee_id: record.employee_id,
            date: record.date,
            status: record.status,
        };
        state.attendance.push(record.clone());
        Ok(record)
    }

    async fn find_attendance(
        &self,
        employee_id: u64,
        date: NaiveDate,
    ) -> StoreResult<Option<Attendance>> {
        Ok(self
            .read()?
            .attendance
            .iter()
            .find(|a| a.employee_id == employee_id && a.date == date)
            .cloned())
    }

    async fn list_attendance(
        &self,
        scope: Scope,
        limit: u32,
    ) -> StoreResult<Vec<AttendanceWithOwner>> {
        let state = self.read()?;
        let mut records: Vec<AttendanceWithOwner> = state
            .attendance
            .iter()
            .filter(|a| scope.admits(a.employee_id))
            .filter_map(|a| {
                state.owner(a.employee_id).map(|profile| AttendanceWithOwner {
                    record: a.clone(),
                    profile,
                })
            })
            .collect();
        records.sort_by(|a, b| {
            b.record
                .date
                .cmp(&a.record.date)
                .then(b.record.id.cmp(&a.record.id))
        });
        records.truncate(limit as usize);
        Ok(records)
    }

    async fn attendance_statuses_on(
        &self,
        scope: Scope,
        date: NaiveDate,
    ) -> StoreResult<Vec<AttendanceStatus>> {
        Ok(self
            .read()?
            .attendance
            .iter()
            .filter(|a| a.date == date && scope.admits(a.employee_id))
            .map(|a| a.status)
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{leave::LeaveType, role::Role};
    use crate::test_support::{seed_account, today};

    #[actix_web::test]
    async fn rows_for_missing_profiles_are_rejected() {
        let store = MemoryStore::new();

        let err = store
            .insert_leave(NewLeave {
                employee_id: 404,
                leave_type: LeaveType::Sick,
                start_date: today(),
                end_date: today(),
                reason: "Flu".to_string(),
            })
            .await
            .unwrap_err();
        assert!(matches!(err, StoreError::Database(_)));

        let err = store
            .insert_attendance(NewAttendance {
                employee_id: 404,
                date: today(),
                status: AttendanceStatus::Present,
            })
            .await
            .unwrap_err();
        assert!(matches!(err, StoreError::Database(_)));
        assert_eq!(store.attendance_count(), 0);
    }

    #[actix_web::test]
    async fn joined_listings_skip_rows_without_an_owner() {
        let store = MemoryStore::new();
        let employee = seed_account(&store, "e@company.com", Role::Employee).await;
        store.seed_leave(employee.user_id, LeaveStatus::Pending);
        store.seed_leave(404, LeaveStatus::Pending);

        let leaves = store.list_leaves(Scope::All).await.unwrap();
        assert_eq!(leaves.len(), 1);
        assert_eq!(leaves[0].profile.email, "e@company.com");
    }
}
