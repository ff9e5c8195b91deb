use crate::{
    auth::auth::AuthUser, error::AppError, service::accounts, store::HrStore,
};
use actix_web::{HttpResponse, Responder, web};
use serde::Deserialize;
use serde_json::json;
use utoipa::ToSchema;

#[derive(Deserialize, ToSchema)]
pub struct DeleteUserReq {
    #[serde(rename = "userId")]
    #[schema(example = 42)]
    pub user_id: u64,
}

/// Privileged account deletion. Removes the identity and everything that
/// belongs to it.
#[utoipa::path(
    post,
    path = "/functions/v1/delete-user",
    request_body = DeleteUserReq,
    responses(
        (status = 200, description = "User deleted", body = Object, example = json!({
            "success": true
        })),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Admin only"),
        (status = 404, description = "User not found")
    ),
    security(
        ("bearer_auth" = [])
    ),
    tag = "Functions"
)]
pub async fn delete_user(
    auth: AuthUser,
    store: web::Data<dyn HrStore>,
    payload: web::Json<DeleteUserReq>,
) -> Result<impl Responder, AppError> {
    accounts::delete_account(store.get_ref(), &auth, payload.user_id).await?;
    Ok(HttpResponse::Ok().json(json!({ "success": true })))
}
