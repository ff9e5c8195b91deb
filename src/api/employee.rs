use crate::{
    auth::auth::AuthUser,
    error::AppError,
    service::directory::{self, CreateEmployee, UpdateEmployee},
    store::HrStore,
    utils::time::today_utc,
};
use actix_web::{HttpResponse, Responder, web};
use tracing::debug;

/// Create employee
#[utoipa::path(
    post,
    path = "/api/employees",
    request_body(
        content = CreateEmployee,
        description = "Employee account and profile",
        content_type = "application/json"
    ),
    responses(
        (status = 201, description = "Employee created successfully", body = crate::model::profile::Profile),
        (status = 400, description = "Bad request"),
        (status = 403, description = "Admin only"),
        (status = 409, description = "Email already registered")
    ),
    security(
        ("bearer_auth" = [])
    ),
    tag = "Employee"
)]
pub async fn create_employee(
    auth: AuthUser,
    store: web::Data<dyn HrStore>,
    payload: web::Json<CreateEmployee>,
) -> Result<impl Responder, AppError> {
    let profile =
        directory::create_employee(store.get_ref(), &auth, payload.into_inner(), today_utc()).await?;
    Ok(HttpResponse::Created().json(profile))
}

/// List employees
#[utoipa::path(
    get,
    path = "/api/employees",
    responses(
        (status = 200, description = "All employee profiles, latest joiners first", body = [crate::model::profile::Profile]),
        (status = 403, description = "Admin only")
    ),
    security(
        ("bearer_auth" = [])
    ),
    tag = "Employee"
)]
pub async fn list_employees(
    auth: AuthUser,
    store: web::Data<dyn HrStore>,
) -> Result<impl Responder, AppError> {
    let profiles = directory::list_employees(store.get_ref(), &auth).await?;
    debug!(count = profiles.len(), "Employees listed");
    Ok(HttpResponse::Ok().json(profiles))
}

/// Get employee by ID
#[utoipa::path(
    get,
    path = "/api/employees/{id}",
    params(
        ("id" = u64, Path, description = "Employee ID")
    ),
    responses(
        (status = 200, description = "Employee found", body = crate::model::profile::Profile),
        (status = 403, description = "Admin only"),
        (status = 404, description = "Employee not found")
    ),
    security(
        ("bearer_auth" = [])
    ),
    tag = "Employee"
)]
pub async fn get_employee(
    auth: AuthUser,
    store: web::Data<dyn HrStore>,
    path: web::Path<u64>,
) -> Result<impl Responder, AppError> {
    let profile = directory::get_employee(store.get_ref(), &auth, path.into_inner()).await?;
    Ok(HttpResponse::Ok().json(profile))
}

/// Update employee
#[utoipa::path(
    put,
    path = "/api/employees/{id}",
    params(
        ("id" = u64, Path, description = "Employee ID")
    ),
    request_body = UpdateEmployee,
    responses(
        (status = 200, description = "Employee updated", body = crate::model::profile::Profile),
        (status = 400, description = "No fields to update"),
        (status = 403, description = "Admin only"),
        (status = 404, description = "Employee not found")
    ),
    security(
        ("bearer_auth" = [])
    ),
    tag = "Employee"
)]
pub async fn update_employee(
    auth: AuthUser,
    store: web::Data<dyn HrStore>,
    path: web::Path<u64>,
    payload: web::Json<UpdateEmployee>,
) -> Result<impl Responder, AppError> {
    let profile =
        directory::update_employee(store.get_ref(), &auth, path.into_inner(), payload.into_inner())
            .await?;
    Ok(HttpResponse::Ok().json(profile))
}

/// Delete employee together with their account and records
#[utoipa::path(
    delete,
    path = "/api/employees/{id}",
    params(
        ("id" = u64, Path, description = "Employee ID")
    ),
    responses(
        (status = 204, description = "Employee deleted"),
        (status = 403, description = "Admin only"),
        (status = 404, description = "User not found")
    ),
    security(
        ("bearer_auth" = [])
    ),
    tag = "Employee"
)]
pub async fn delete_employee(
    auth: AuthUser,
    store: web::Data<dyn HrStore>,
    path: web::Path<u64>,
) -> Result<impl Responder, AppError> {
    directory::delete_employee(store.get_ref(), &auth, path.into_inner()).await?;
    Ok(HttpResponse::NoContent().finish())
}
