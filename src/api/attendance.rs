use crate::{
    auth::auth::AuthUser,
    config::Config,
    error::AppError,
    model::attendance::AttendanceStatus,
    service::attendance::{self as workflow, MarkOutcome},
    store::HrStore,
    utils::time::today_utc,
};
use actix_web::{HttpResponse, Responder, web};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(Deserialize, ToSchema)]
pub struct MarkAttendance {
    pub status: AttendanceStatus,
}

#[derive(Serialize, ToSchema)]
pub struct TodayStatus {
    pub marked: bool,
}

/// Mark today's attendance
#[utoipa::path(
    post,
    path = "/api/attendance",
    request_body = MarkAttendance,
    responses(
        (status = 201, description = "Marked for today", body = Object, example = json!({
            "message": "Marked as present for today"
        })),
        (status = 200, description = "Already marked today", body = Object, example = json!({
            "message": "Attendance already marked for today",
            "already_marked": true
        })),
        (status = 401, description = "Unauthorized"),
        (status = 500, description = "Failed to mark attendance")
    ),
    security(
        ("bearer_auth" = [])
    ),
    tag = "Attendance"
)]
pub async fn mark(
    auth: AuthUser,
    store: web::Data<dyn HrStore>,
    payload: web::Json<MarkAttendance>,
) -> Result<impl Responder, AppError> {
    let status = payload.status;

    match workflow::mark_attendance(store.get_ref(), &auth, status, today_utc()).await {
        Ok(MarkOutcome::Marked(record)) => Ok(HttpResponse::Created().json(serde_json::json!({
            "message": format!("Marked as {} for today", status),
            "record": record
        }))),
        Ok(MarkOutcome::AlreadyMarked) => Ok(HttpResponse::Ok().json(serde_json::json!({
            "message": "Attendance already marked for today",
            "already_marked": true
        }))),
        Err(_) => Ok(HttpResponse::InternalServerError().json(serde_json::json!({
            "error": "Failed to mark attendance"
        }))),
    }
}

#[utoipa::path(
    get,
    path = "/api/attendance/today",
    responses(
        (status = 200, description = "Whether the caller already marked today", body = TodayStatus),
        (status = 401, description = "Unauthorized")
    ),
    security(
        ("bearer_auth" = [])
    ),
    tag = "Attendance"
)]
pub async fn today(auth: AuthUser, store: web::Data<dyn HrStore>) -> impl Responder {
    let marked = workflow::has_marked_today(store.get_ref(), &auth, today_utc()).await;
    HttpResponse::Ok().json(TodayStatus { marked })
}

#[utoipa::path(
    get,
    path = "/api/attendance",
    responses(
        (status = 200, description = "Most recent attendance visible to the caller", body = [crate::model::attendance::AttendanceWithOwner]),
        (status = 401, description = "Unauthorized")
    ),
    security(
        ("bearer_auth" = [])
    ),
    tag = "Attendance"
)]
pub async fn history(
    auth: AuthUser,
    store: web::Data<dyn HrStore>,
    config: web::Data<Config>,
) -> Result<impl Responder, AppError> {
    let records =
        workflow::list_attendance(store.get_ref(), &auth, config.attendance_history_limit).await?;
    Ok(HttpResponse::Ok().json(records))
}
