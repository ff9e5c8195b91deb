use crate::{
    auth::auth::AuthUser,
    error::AppError,
    model::leave::LeaveDecision,
    service::leave::{self as workflow, SubmitLeave},
    store::HrStore,
};
use actix_web::{HttpResponse, Responder, web};
use serde::Deserialize;
use utoipa::ToSchema;

#[derive(Deserialize, ToSchema)]
pub struct SetLeaveStatus {
    pub status: LeaveDecision,
}

/// for getting leave applications endpoint
#[utoipa::path(
    get,
    path = "/api/leaves",
    responses(
        (status = 200, description = "Leaves visible to the caller, newest first", body = [crate::model::leave::LeaveWithOwner]),
        (status = 401, description = "Unauthorized")
    ),
    security(
        ("bearer_auth" = [])
    ),
    tag = "Leave"
)]
pub async fn leave_list(
    auth: AuthUser,
    store: web::Data<dyn HrStore>,
) -> Result<impl Responder, AppError> {
    let leaves = workflow::list_leaves(store.get_ref(), &auth).await?;
    Ok(HttpResponse::Ok().json(leaves))
}

/* =========================
Create leave request
========================= */
#[utoipa::path(
    post,
    path = "/api/leaves",
    request_body(
        content = SubmitLeave,
        description = "Leave request payload",
        content_type = "application/json"
    ),
    responses(
        (status = 201, description = "Leave request submitted", body = crate::model::leave::Leave),
        (status = 400, description = "Bad request"),
        (status = 401, description = "Unauthorized")
    ),
    security(
        ("bearer_auth" = [])
    ),
    tag = "Leave"
)]
pub async fn create_leave(
    auth: AuthUser,
    store: web::Data<dyn HrStore>,
    payload: web::Json<SubmitLeave>,
) -> Result<impl Responder, AppError> {
    let leave = workflow::submit_leave(store.get_ref(), &auth, payload.into_inner()).await?;
    Ok(HttpResponse::Created().json(leave))
}

/// for getting a leave application details endpoint
#[utoipa::path(
    get,
    path = "/api/leaves/{leave_id}",
    params(
        ("leave_id" = u64, Path, description = "ID of the leave request to fetch")
    ),
    responses(
        (status = 200, description = "Leave request found", body = crate::model::leave::Leave),
        (status = 401, description = "Unauthorized"),
        (status = 404, description = "Leave request not found", body = Object, example = json!({
            "error": "Leave request not found"
        }))
    ),
    security(
        ("bearer_auth" = [])
    ),
    tag = "Leave"
)]
pub async fn get_leave(
    auth: AuthUser,
    store: web::Data<dyn HrStore>,
    path: web::Path<u64>,
) -> Result<impl Responder, AppError> {
    let leave = workflow::get_leave(store.get_ref(), &auth, path.into_inner()).await?;
    Ok(HttpResponse::Ok().json(leave))
}

async fn decide(
    auth: AuthUser,
    store: web::Data<dyn HrStore>,
    leave_id: u64,
    decision: LeaveDecision,
) -> Result<HttpResponse, AppError> {
    let leave = workflow::set_leave_status(store.get_ref(), &auth, leave_id, decision).await?;
    Ok(HttpResponse::Ok().json(leave))
}

/* =========================
Approve / reject (Admin)
========================= */
#[utoipa::path(
    put,
    path = "/api/leaves/{leave_id}/approve",
    params(
        ("leave_id" = u64, Path, description = "ID of the leave request to approve")
    ),
    responses(
        (status = 200, description = "Leave approved", body = crate::model::leave::Leave),
        (status = 403, description = "Admin only"),
        (status = 404, description = "Leave request not found"),
        (status = 409, description = "Leave request already processed", body = Object, example = json!({
            "error": "Leave request already processed"
        }))
    ),
    security(
        ("bearer_auth" = [])
    ),
    tag = "Leave"
)]
pub async fn approve_leave(
    auth: AuthUser,
    store: web::Data<dyn HrStore>,
    path: web::Path<u64>,
) -> Result<impl Responder, AppError> {
    decide(auth, store, path.into_inner(), LeaveDecision::Approved).await
}

#[utoipa::path(
    put,
    path = "/api/leaves/{leave_id}/reject",
    params(
        ("leave_id" = u64, Path, description = "ID of the leave request to reject")
    ),
    responses(
        (status = 200, description = "Leave rejected", body = crate::model::leave::Leave),
        (status = 403, description = "Admin only"),
        (status = 404, description = "Leave request not found"),
        (status = 409, description = "Leave request already processed")
    ),
    security(
        ("bearer_auth" = [])
    ),
    tag = "Leave"
)]
pub async fn reject_leave(
    auth: AuthUser,
    store: web::Data<dyn HrStore>,
    path: web::Path<u64>,
) -> Result<impl Responder, AppError> {
    decide(auth, store, path.into_inner(), LeaveDecision::Rejected).await
}

#[utoipa::path(
    put,
    path = "/api/leaves/{leave_id}/status",
    params(
        ("leave_id" = u64, Path, description = "ID of the leave request")
    ),
    request_body = SetLeaveStatus,
    responses(
        (status = 200, description = "Leave status updated", body = crate::model::leave::Leave),
        (status = 400, description = "Status must be approved or rejected"),
        (status = 403, description = "Admin only"),
        (status = 404, description = "Leave request not found"),
        (status = 409, description = "Leave request already processed")
    ),
    security(
        ("bearer_auth" = [])
    ),
    tag = "Leave"
)]
pub async fn set_leave_status(
    auth: AuthUser,
    store: web::Data<dyn HrStore>,
    path: web::Path<u64>,
    payload: web::Json<SetLeaveStatus>,
) -> Result<impl Responder, AppError> {
    decide(auth, store, path.into_inner(), payload.status).await
}
