use crate::auth::auth::AuthUser;
use crate::auth::jwt::verify_token;
use crate::config::Config;
use crate::error::AppError;
use crate::models::TokenType;
use crate::store::HrStore;
use actix_web::middleware::Next;
use actix_web::{
    Error, HttpMessage, HttpResponse,
    body::BoxBody,
    dev::{ServiceRequest, ServiceResponse},
    web::Data,
};
use serde_json::json;

pub async fn auth_middleware(
    req: ServiceRequest,
    next: Next<BoxBody>,
) -> Result<ServiceResponse<BoxBody>, Error> {
    let config = req
        .app_data::<Data<Config>>()
        .ok_or_else(|| actix_web::error::ErrorInternalServerError("App config missing"))?;
    let store = req
        .app_data::<Data<dyn HrStore>>()
        .cloned()
        .ok_or_else(|| actix_web::error::ErrorInternalServerError("Store missing"))?;

    let header_value = match req.headers().get("Authorization") {
        Some(h) => match h.to_str() {
            Ok(v) => v,
            Err(_) => {
                let resp = HttpResponse::Unauthorized()
                    .json(json!({"error": "Invalid Authorization header encoding"}));
                return Ok(req.into_response(resp.map_into_boxed_body()));
            }
        },
        None => {
            let resp =
                HttpResponse::Unauthorized().json(json!({"error": "Missing Authorization header"}));
            return Ok(req.into_response(resp.map_into_boxed_body()));
        }
    };

    let token = match header_value.strip_prefix("Bearer ") {
        Some(t) => t,
        None => {
            let resp = HttpResponse::Unauthorized()
                .json(json!({"error": "Authorization header must start with Bearer"}));
            return Ok(req.into_response(resp.map_into_boxed_body()));
        }
    };

    let claims = match verify_token(token, &config.jwt_secret) {
        Ok(c) if c.token_type == TokenType::Access => c,
        Ok(_) => {
            let resp = HttpResponse::Unauthorized()
                .json(json!({"error": "Access token required"}));
            return Ok(req.into_response(resp.map_into_boxed_body()));
        }
        Err(e) => {
            tracing::debug!(error = %e, "Rejected bearer token");
            let resp = HttpResponse::Unauthorized()
                .json(json!({"error": "Invalid or expired token"}));
            return Ok(req.into_response(resp.map_into_boxed_body()));
        }
    };

    // Email and role come from the stored identity, not the token.
    let identity = match store.find_identity(claims.user_id).await {
        Ok(Some(identity)) => identity,
        Ok(None) => {
            tracing::warn!(user_id = claims.user_id, "Bearer token for a deleted account");
            let resp = HttpResponse::Unauthorized()
                .json(json!({"error": "Account no longer exists"}));
            return Ok(req.into_response(resp.map_into_boxed_body()));
        }
        Err(e) => return Err(AppError::from(e).into()),
    };

    let auth_user = AuthUser {
        user_id: identity.id,
        email: identity.email,
        role: identity.role,
    };

    req.extensions_mut().insert(auth_user);

    next.call(req).await
}
