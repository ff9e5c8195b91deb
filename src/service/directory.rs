use chrono::NaiveDate;
use serde::Deserialize;
use tracing::{info, instrument};
use utoipa::ToSchema;

use crate::{
    auth::auth::AuthUser,
    error::AppError,
    model::{
        profile::{Profile, ProfileUpdate},
        role::Role,
    },
    models::SignupReq,
    service::accounts,
    store::HrStore,
};

#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct CreateEmployee {
    #[schema(example = "john@company.com", format = "email")]
    pub email: String,
    #[schema(example = "secret123", format = "password")]
    pub password: String,
    #[schema(example = "John Doe")]
    pub name: String,
    #[schema(example = "Analyst", nullable = true)]
    pub position: Option<String>,
    #[schema(example = "2026-01-01", format = "date", value_type = String)]
    pub date_of_joining: NaiveDate,
}

#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
pub struct UpdateEmployee {
    #[schema(example = "John Doe")]
    pub name: Option<String>,
    #[schema(example = "Senior Analyst")]
    pub position: Option<String>,
    #[schema(example = "2026-01-01", format = "date", value_type = Option<String>)]
    pub date_of_joining: Option<NaiveDate>,
}

pub async fn list_employees(store: &dyn HrStore, viewer: &AuthUser) -> Result<Vec<Profile>, AppError> {
    viewer.require_admin()?;
    Ok(store.list_profiles().await?)
}

pub async fn get_employee(
    store: &dyn HrStore,
    viewer: &AuthUser,
    employee_id: u64,
) -> Result<Profile, AppError> {
    viewer.require_admin()?;
    store
        .find_profile(employee_id)
        .await?
        .ok_or_else(|| AppError::NotFound("Employee not found".to_string()))
}

/// Provisions the account through signup, then sets the joining date on
/// the profile signup returned.
#[instrument(name = "employee_create", skip_all, fields(email = %req.email))]
pub async fn create_employee(
    store: &dyn HrStore,
    viewer: &AuthUser,
    req: CreateEmployee,
    today: NaiveDate,
) -> Result<Profile, AppError> {
    viewer.require_admin()?;

    let signup = SignupReq {
        email: req.email,
        password: req.password,
        name: req.name,
        position: req.position,
    };
    let profile = accounts::signup(store, signup, Role::Employee, today).await?;

    let update = ProfileUpdate {
        date_of_joining: Some(req.date_of_joining),
        ..Default::default()
    };
    let profile = store
        .update_profile(profile.id, update)
        .await?
        .ok_or_else(|| AppError::Internal(anyhow::anyhow!("profile {} vanished after signup", profile.id)))?;

    info!(employee_id = profile.id, "Employee created");
    Ok(profile)
}

#[instrument(name = "employee_update", skip_all, fields(employee_id = employee_id))]
pub async fn update_employee(
    store: &dyn HrStore,
    viewer: &AuthUser,
    employee_id: u64,
    req: UpdateEmployee,
) -> Result<Profile, AppError> {
    viewer.require_admin()?;

    let name = match req.name {
        Some(name) if name.trim().is_empty() => {
            return Err(AppError::BadRequest("Name must not be empty".to_string()));
        }
        other => other.map(|n| n.trim().to_string()),
    };

    let update = ProfileUpdate {
        name,
        position: req
            .position
            .map(|p| Some(p.trim().to_string()).filter(|p| !p.is_empty())),
        date_of_joining: req.date_of_joining,
    };
    if update.is_empty() {
        return Err(AppError::BadRequest("No fields provided for update".to_string()));
    }

    let profile = store
        .update_profile(employee_id, update)
        .await?
        .ok_or_else(|| AppError::NotFound("Employee not found".to_string()))?;

    info!("Employee updated");
    Ok(profile)
}

/// Goes through the privileged account deletion so the login identity is
/// removed along with the profile.
pub async fn delete_employee(
    store: &dyn HrStore,
    viewer: &AuthUser,
    employee_id: u64,
) -> Result<(), AppError> {
    accounts::delete_account(store, viewer, employee_id).await
}
