use chrono::NaiveDate;
use tracing::{error, info, instrument, warn};

use crate::{
    auth::{
        auth::AuthUser,
        password::{hash_password, verify_password},
    },
    config::BootstrapAdmin,
    error::AppError,
    model::{
        profile::{Identity, NewAccount, Profile},
        role::Role,
    },
    models::SignupReq,
    store::{HrStore, StoreError},
};

pub const MIN_PASSWORD_LEN: usize = 6;

fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

fn invalid_credentials() -> AppError {
    AppError::Unauthorized("Invalid credentials".to_string())
}

/// Creates an identity and its profile in one step and returns the
/// provisioned profile, so callers can address it by id right away.
#[instrument(name = "account_signup", skip_all, fields(email = %req.email, role = %role))]
pub async fn signup(
    store: &dyn HrStore,
    req: SignupReq,
    role: Role,
    today: NaiveDate,
) -> Result<Profile, AppError> {
    let email = normalize_email(&req.email);
    let name = req.name.trim().to_string();

    if email.is_empty() || !email.contains('@') {
        return Err(AppError::BadRequest("A valid email is required".to_string()));
    }
    if name.is_empty() {
        return Err(AppError::BadRequest("Name must not be empty".to_string()));
    }
    if req.password.chars().count() < MIN_PASSWORD_LEN {
        return Err(AppError::BadRequest(format!(
            "Password must be at least {} characters",
            MIN_PASSWORD_LEN
        )));
    }

    let password_hash = hash_password(&req.password)
        .map_err(|e| AppError::Internal(anyhow::anyhow!("password hashing failed: {}", e)))?;

    let position = req
        .position
        .map(|p| p.trim().to_string())
        .filter(|p| !p.is_empty());

    let account = NewAccount {
        email,
        password_hash,
        role,
        name,
        position,
        date_of_joining: today,
    };

    match store.create_account(account).await {
        Ok(profile) => {
            info!(user_id = profile.id, "Account provisioned");
            Ok(profile)
        }
        Err(StoreError::Duplicate) => {
            info!("Signup rejected: email already registered");
            Err(AppError::Conflict("Email already registered".to_string()))
        }
        Err(e) => Err(e.into()),
    }
}

/// Checks an email/password pair against the stored identity.
pub async fn authenticate(
    store: &dyn HrStore,
    email: &str,
    password: &str,
) -> Result<Identity, AppError> {
    let identity = store
        .find_identity_by_email(&normalize_email(email))
        .await?
        .ok_or_else(|| {
            info!("Invalid credentials: unknown email");
            invalid_credentials()
        })?;

    if let Err(e) = verify_password(password, &identity.password_hash) {
        info!(user_id = identity.id, error = %e, "Invalid credentials: password mismatch");
        return Err(invalid_credentials());
    }

    Ok(identity)
}

/// Privileged removal of an identity together with its profile. Leaves,
/// attendance and refresh tokens of that user go with it.
#[instrument(name = "account_delete", skip_all, fields(caller = caller.user_id, user_id = user_id))]
pub async fn delete_account(
    store: &dyn HrStore,
    caller: &AuthUser,
    user_id: u64,
) -> Result<(), AppError> {
    caller.require_admin()?;

    if !store.delete_account(user_id).await? {
        warn!(user_id, "Delete requested for unknown user");
        return Err(AppError::NotFound("User not found".to_string()));
    }

    info!(user_id, "Account deleted");
    Ok(())
}

/// Creates the configured admin on first start. Returns true if an
/// account was created.
pub async fn ensure_admin(
    store: &dyn HrStore,
    admin: &BootstrapAdmin,
    today: NaiveDate,
) -> Result<bool, AppError> {
    if store
        .find_identity_by_email(&normalize_email(&admin.email))
        .await?
        .is_some()
    {
        return Ok(false);
    }

    let req = SignupReq {
        email: admin.email.clone(),
        password: admin.password.clone(),
        name: admin.name.clone(),
        position: None,
    };

    match signup(store, req, Role::Admin, today).await {
        Ok(_) => Ok(true),
        Err(AppError::Conflict(_)) => Ok(false),
        Err(e) => {
            error!(error = %e, "Failed to create bootstrap admin");
            Err(e)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::memory::MemoryStore;
    use crate::test_support::{auth_user, signup_req, today};

    #[actix_web::test]
    async fn signup_provisions_identity_and_profile_together() {
        let store = MemoryStore::new();
        let profile = signup(&store, signup_req("Jane@Company.com "), Role::Employee, today())
            .await
            .unwrap();

        assert_eq!(profile.email, "jane@company.com");
        assert_eq!(profile.date_of_joining, today());
        assert_eq!(store.find_profile(profile.id).await.unwrap(), Some(profile));
        assert_eq!(store.identity_count(), 1);
    }

    #[actix_web::test]
    async fn duplicate_email_is_a_conflict() {
        let store = MemoryStore::new();
        signup(&store, signup_req("a@company.com"), Role::Employee, today())
            .await
            .unwrap();

        let err = signup(&store, signup_req("A@company.com"), Role::Employee, today())
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Conflict(_)));
    }

    #[actix_web::test]
    async fn short_password_is_rejected() {
        let store = MemoryStore::new();
        let mut req = signup_req("a@company.com");
        req.password = "12345".into();

        let err = signup(&store, req, Role::Employee, today()).await.unwrap_err();
        assert!(matches!(err, AppError::BadRequest(_)));
        assert_eq!(store.identity_count(), 0);
    }

    #[actix_web::test]
    async fn authenticate_checks_the_password() {
        let store = MemoryStore::new();
        signup(&store, signup_req("a@company.com"), Role::Employee, today())
            .await
            .unwrap();

        assert!(authenticate(&store, "a@company.com", "secret123").await.is_ok());
        assert!(matches!(
            authenticate(&store, "a@company.com", "wrong-pass").await,
            Err(AppError::Unauthorized(_))
        ));
        assert!(matches!(
            authenticate(&store, "b@company.com", "secret123").await,
            Err(AppError::Unauthorized(_))
        ));
    }

    #[actix_web::test]
    async fn delete_removes_identity_profile_and_records() {
        let store = MemoryStore::new();
        let admin = signup(&store, signup_req("admin@company.com"), Role::Admin, today())
            .await
            .unwrap();
        let employee = signup(&store, signup_req("e@company.com"), Role::Employee, today())
            .await
            .unwrap();
        store.seed_leave(employee.id, crate::model::leave::LeaveStatus::Pending);

        delete_account(&store, &auth_user(&admin, Role::Admin), employee.id)
            .await
            .unwrap();

        assert!(store.find_profile(employee.id).await.unwrap().is_none());
        assert!(store.find_identity_by_email("e@company.com").await.unwrap().is_none());
        assert!(store.leave_statuses(crate::model::role::Scope::All).await.unwrap().is_empty());
        assert!(
            !store
                .list_profiles()
                .await
                .unwrap()
                .iter()
                .any(|p| p.id == employee.id)
        );
    }

    #[actix_web::test]
    async fn delete_requires_admin_and_an_existing_user() {
        let store = MemoryStore::new();
        let admin = signup(&store, signup_req("admin@company.com"), Role::Admin, today())
            .await
            .unwrap();
        let employee = signup(&store, signup_req("e@company.com"), Role::Employee, today())
            .await
            .unwrap();

        let err = delete_account(&store, &auth_user(&employee, Role::Employee), admin.id)
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Forbidden(_)));

        let err = delete_account(&store, &auth_user(&admin, Role::Admin), 999)
            .await
            .unwrap_err();
        assert_eq!(err.to_string(), "User not found");
    }

    #[actix_web::test]
    async fn bootstrap_admin_is_created_once() {
        let store = MemoryStore::new();
        let admin = BootstrapAdmin {
            email: "root@company.com".into(),
            password: "rootpass".into(),
            name: "Root".into(),
        };

        assert!(ensure_admin(&store, &admin, today()).await.unwrap());
        assert!(!ensure_admin(&store, &admin, today()).await.unwrap());

        let identity = store
            .find_identity_by_email("root@company.com")
            .await
            .unwrap()
            .unwrap();
        assert_eq!(identity.role, Role::Admin);
    }
}
