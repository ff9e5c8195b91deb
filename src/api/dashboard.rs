use crate::{
    auth::auth::AuthUser, error::AppError, service::dashboard::compute_stats, store::HrStore,
    utils::time::today_utc,
};
use actix_web::{HttpResponse, Responder, web};

/// Headline counts. Admins see the whole organization, employees their own
/// records.
#[utoipa::path(
    get,
    path = "/api/dashboard",
    responses(
        (status = 200, description = "Dashboard statistics", body = crate::model::dashboard::DashboardStats),
        (status = 401, description = "Unauthorized")
    ),
    security(
        ("bearer_auth" = [])
    ),
    tag = "Dashboard"
)]
pub async fn stats(
    auth: AuthUser,
    store: web::Data<dyn HrStore>,
) -> Result<impl Responder, AppError> {
    let stats = compute_stats(store.get_ref(), &auth, today_utc()).await?;
    Ok(HttpResponse::Ok().json(stats))
}
