use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};
use sqlx::MySqlPool;
use tracing::debug;

use crate::{
    model::{
        attendance::{Attendance, AttendanceStatus, AttendanceWithOwner, NewAttendance},
        leave::{Leave, LeaveStatus, LeaveWithOwner, NewLeave, decode_status},
        profile::{Identity, NewAccount, Profile, ProfileUpdate},
        role::Scope,
    },
    store::{HrStore, StoreResult},
    utils::db_utils::{SqlValue, build_update_sql, execute_update},
};

const PROFILE_COLUMNS: &str = "id, email, name, position, date_of_joining";

const LEAVE_COLUMNS: &str = r#"
    l.id, l.employee_id, l.leave_type, l.start_date, l.end_date,
    l.reason, l.status, l.created_at
"#;

/// MySQL-backed store.
#[derive(Clone)]
pub struct MySqlStore {
    pool: MySqlPool,
}

impl MySqlStore {
    pub fn new(pool: MySqlPool) -> Self {
        Self { pool }
    }
}

/// Appends the scope's owner filter to `conditions`, returning the value
/// to bind for it.
fn push_scope(conditions: &mut Vec<String>, column: &str, scope: Scope) -> Option<u64> {
    let owner = scope.owner();
    if owner.is_some() {
        conditions.push(format!("{} = ?", column));
    }
    owner
}

fn where_clause(conditions: &[String]) -> String {
    if conditions.is_empty() {
        String::new()
    } else {
        format!("WHERE {}", conditions.join(" AND "))
    }
}

fn profile_assignments(update: ProfileUpdate) -> Vec<(&'static str, SqlValue)> {
    let mut assignments = Vec::new();
    if let Some(name) = update.name {
        assignments.push(("name", SqlValue::String(name)));
    }
    if let Some(position) = update.position {
        assignments.push(("position", SqlValue::from(position)));
    }
    if let Some(date) = update.date_of_joining {
        assignments.push(("date_of_joining", SqlValue::Date(date)));
    }
    assignments
}

#[async_trait]
impl HrStore for MySqlStore {
    async fn create_account(&self, account: NewAccount) -> StoreResult<Profile> {
        let mut tx = self.pool.begin().await?;

        let id = sqlx::query("INSERT INTO users (email, password, role) VALUES (?, ?, ?)")
            .bind(&account.email)
            .bind(&account.password_hash)
            .bind(account.role.as_ref())
            .execute(&mut *tx)
            .await?
            .last_insert_id();

        sqlx::query(
            r#"
            INSERT INTO profiles (id, email, name, position, date_of_joining)
            VALUES (?, ?, ?, ?, ?)
            "#,
        )
        .bind(id)
        .bind(&account.email)
        .bind(&account.name)
        .bind(&account.position)
        .bind(account.date_of_joining)
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;

        Ok(Profile {
            id,
            email: account.email,
            name: account.name,
            position: account.position,
            date_of_joining: account.date_of_joining,
        })
    }

    async fn find_identity_by_email(&self, email: &str) -> StoreResult<Option<Identity>> {
        let identity = sqlx::query_as::<_, Identity>(
            "SELECT id, email, password, role FROM users WHERE email = ?",
        )
        .bind(email)
        .fetch_optional(&self.pool)
        .await?;
        Ok(identity)
    }

    async fn find_identity(&self, id: u64) -> StoreResult<Option<Identity>> {
        let identity = sqlx::query_as::<_, Identity>(
            "SELECT id, email, password, role FROM users WHERE id = ?",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(identity)
    }

    async fn delete_account(&self, id: u64) -> StoreResult<bool> {
        let mut tx = self.pool.begin().await?;

        sqlx::query("DELETE FROM profiles WHERE id = ?")
            .bind(id)
            .execute(&mut *tx)
            .await?;

        let removed = sqlx::query("DELETE FROM users WHERE id = ?")
            .bind(id)
            .execute(&mut *tx)
            .await?
            .rows_affected();

        tx.commit().await?;
        Ok(removed > 0)
    }

    async fn store_refresh_token(
        &self,
        user_id: u64,
        jti: &str,
        expires_at: DateTime<Utc>,
    ) -> StoreResult<()> {
        sqlx::query("INSERT INTO refresh_tokens (user_id, jti, expires_at) VALUES (?, ?, ?)")
            .bind(user_id)
            .bind(jti)
            .bind(expires_at)
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    async fn revoke_refresh_token(&self, jti: &str) -> StoreResult<bool> {
        let result = sqlx::query(
            r#"
            UPDATE refresh_tokens
            SET revoked = 1
            WHERE jti = ?
            AND revoked = 0
            AND expires_at > UTC_TIMESTAMP()
            "#,
        )
        .bind(jti)
        .execute(&self.pool)
        .await?;
        Ok(result.rows_affected() == 1)
    }

    async fn list_profiles(&self) -> StoreResult<Vec<Profile>> {
        let sql = format!(
            "SELECT {} FROM profiles ORDER BY date_of_joining DESC, id DESC",
            PROFILE_COLUMNS
        );
        Ok(sqlx::query_as::<_, Profile>(&sql).fetch_all(&self.pool).await?)
    }

    async fn find_profile(&self, id: u64) -> StoreResult<Option<Profile>> {
        let sql = format!("SELECT {} FROM profiles WHERE id = ?", PROFILE_COLUMNS);
        Ok(sqlx::query_as::<_, Profile>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?)
    }

    async fn update_profile(&self, id: u64, update: ProfileUpdate) -> StoreResult<Option<Profile>> {
        let Some(update) = build_update_sql("profiles", profile_assignments(update), "id", id) else {
            return self.find_profile(id).await;
        };
        debug!(sql = %update.sql, id, "Updating profile");

        let mut tx = self.pool.begin().await?;
        execute_update(&mut *tx, update).await?;

        // MySQL reports zero affected rows for a no-op update, so read back
        // instead of trusting the count.
        let sql = format!("SELECT {} FROM profiles WHERE id = ?", PROFILE_COLUMNS);
        let profile = sqlx::query_as::<_, Profile>(&sql)
            .bind(id)
            .fetch_optional(&mut *tx)
            .await?;

        tx.commit().await?;
        Ok(profile)
    }

    async fn count_profiles(&self) -> StoreResult<u64> {
        let total = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM profiles")
            .fetch_one(&self.pool)
            .await?;
        Ok(total.max(0) as u64)
    }

    async fn insert_leave(&self, leave: NewLeave) -> StoreResult<Leave> {
        let id = sqlx::query(
            r#"
            INSERT INTO leaves
                (employee_id, leave_type, start_date, end_date, reason, status)
            VALUES (?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(leave.employee_id)
        .bind(leave.leave_type.as_ref())
        .bind(leave.start_date)
        .bind(leave.end_date)
        .bind(&leave.reason)
        .bind(LeaveStatus::Pending.as_ref())
        .execute(&self.pool)
        .await?
        .last_insert_id();

        self.find_leave(id, Scope::All)
            .await?
            .ok_or_else(|| sqlx::Error::RowNotFound.into())
    }

    async fn find_leave(&self, id: u64, scope: Scope) -> StoreResult<Option<Leave>> {
        let mut conditions = vec!["l.id = ?".to_string()];
        let owner = push_scope(&mut conditions, "l.employee_id", scope);
        let sql = format!(
            "SELECT {} FROM leaves l {}",
            LEAVE_COLUMNS,
            where_clause(&conditions)
        );

        let mut query = sqlx::query_as::<_, Leave>(&sql).bind(id);
        if let Some(owner) = owner {
            query = query.bind(owner);
        }
        Ok(query.fetch_optional(&self.pool).await?)
    }

    async fn list_leaves(&self, scope: Scope) -> StoreResult<Vec<LeaveWithOwner>> {
        let mut conditions = Vec::new();
        let owner = push_scope(&mut conditions, "l.employee_id", scope);
        let sql = format!(
            r#"
            SELECT {}, p.name AS owner_name, p.email AS owner_email
            FROM leaves l
            JOIN profiles p ON p.id = l.employee_id
            {}
            ORDER BY l.created_at DESC, l.id DESC
            "#,
            LEAVE_COLUMNS,
            where_clause(&conditions)
        );
        debug!(sql = %sql, ?scope, "Fetching leaves");

        let mut query = sqlx::query_as::<_, LeaveWithOwner>(&sql);
        if let Some(owner) = owner {
            query = query.bind(owner);
        }
        Ok(query.fetch_all(&self.pool).await?)
    }

    async fn transition_leave(
        &self,
        id: u64,
        from: LeaveStatus,
        to: LeaveStatus,
    ) -> StoreResult<bool> {
        let result = sqlx::query(
            r#"
            UPDATE leaves
            SET status = ?
            WHERE id = ?
            AND status = ?
            "#,
        )
        .bind(to.as_ref())
        .bind(id)
        .bind(from.as_ref())
        .execute(&self.pool)
        .await?;
        Ok(result.rows_affected() == 1)
    }

    async fn leave_statuses(&self, scope: Scope) -> StoreResult<Vec<LeaveStatus>> {
        let mut conditions = Vec::new();
        let owner = push_scope(&mut conditions, "employee_id", scope);
        let sql = format!("SELECT status FROM leaves {}", where_clause(&conditions));

        let mut query = sqlx::query(&sql);
        if let Some(owner) = owner {
            query = query.bind(owner);
        }
        let rows = query.fetch_all(&self.pool).await?;
        Ok(rows
            .iter()
            .map(decode_status)
            .collect::<Result<Vec<_>, _>>()?)
    }

    async fn insert_attendance(&self, record: NewAttendance) -> StoreResult<Attendance> {
        let id = sqlx::query("INSERT INTO attendance (employee_id, date, status) VALUES (?, ?, ?)")
            .bind(record.employee_id)
            .bind(record.date)
            .bind(record.status.as_ref())
            .execute(&self.pool)
            .await?
            .last_insert_id();

        Ok(Attendance {
            id,
            employee_id: record.employee_id,
            date: record.date,
            status: record.status,
        })
    }

    async fn find_attendance(
        &self,
        employee_id: u64,
        date: NaiveDate,
    ) -> StoreResult<Option<Attendance>> {
        Ok(sqlx::query_as::<_, Attendance>(
            "SELECT id, employee_id, date, status FROM attendance WHERE employee_id = ? AND date = ?",
        )
        .bind(employee_id)
        .bind(date)
        .fetch_optional(&self.pool)
        .await?)
    }

    async fn list_attendance(
        &self,
        scope: Scope,
        limit: u32,
    ) -> StoreResult<Vec<AttendanceWithOwner>> {
        let mut conditions = Vec::new();
        let owner = push_scope(&mut conditions, "a.employee_id", scope);
        let sql = format!(
            r#"
            SELECT a.id, a.employee_id, a.date, a.status,
                   p.name AS owner_name, p.email AS owner_email
            FROM attendance a
            JOIN profiles p ON p.id = a.employee_id
            {}
            ORDER BY a.date DESC, a.id DESC
            LIMIT ?
            "#,
            where_clause(&conditions)
        );
        debug!(sql = %sql, ?scope, limit, "Fetching attendance");

        let mut query = sqlx::query_as::<_, AttendanceWithOwner>(&sql);
        if let Some(owner) = owner {
            query = query.bind(owner);
        }
        Ok(query.bind(limit).fetch_all(&self.pool).await?)
    }

    async fn attendance_statuses_on(
        &self,
        scope: Scope,
        date: NaiveDate,
    ) -> StoreResult<Vec<AttendanceStatus>> {
        let mut conditions = vec!["date = ?".to_string()];
        let owner = push_scope(&mut conditions, "employee_id", scope);
        let sql = format!("SELECT status FROM attendance {}", where_clause(&conditions));

        let mut query = sqlx::query(&sql).bind(date);
        if let Some(owner) = owner {
            query = query.bind(owner);
        }
        let rows = query.fetch_all(&self.pool).await?;
        Ok(rows
            .iter()
            .map(decode_status)
            .collect::<Result<Vec<_>, _>>()?)
    }
}
