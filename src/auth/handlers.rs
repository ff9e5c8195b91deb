use crate::{
    auth::{
        auth::AuthUser,
        jwt::{generate_access_token, generate_refresh_token, verify_token},
    },
    config::Config,
    error::AppError,
    model::role::Role,
    models::{LoginReqDto, SignupReq, TokenPair, TokenType},
    service::accounts,
    store::HrStore,
    utils::time::today_utc,
};
use actix_web::{HttpRequest, HttpResponse, Responder, web};
use chrono::{TimeZone, Utc};
use serde::Serialize;
use tracing::{debug, info, instrument, warn};
use utoipa::ToSchema;

#[derive(Serialize, ToSchema)]
pub struct SessionResponse {
    #[schema(example = 1)]
    pub user_id: u64,
    #[schema(example = "jane.doe@company.com")]
    pub email: String,
    pub role: Role,
    pub is_admin: bool,
}

fn bearer_token(req: &HttpRequest) -> Option<&str> {
    req.headers()
        .get("Authorization")
        .and_then(|h| h.to_str().ok())
        .and_then(|h| h.strip_prefix("Bearer "))
}

/// Issues an access/refresh pair and records the refresh token's jti.
async fn issue_session(
    store: &dyn HrStore,
    config: &Config,
    user_id: u64,
    email: String,
    role: Role,
) -> Result<TokenPair, AppError> {
    let access_token = generate_access_token(
        user_id,
        email.clone(),
        role,
        &config.jwt_secret,
        config.access_token_ttl,
    )
    .map_err(|e| AppError::Internal(e.into()))?;

    let (refresh_token, refresh_claims) = generate_refresh_token(
        user_id,
        email,
        role,
        &config.jwt_secret,
        config.refresh_token_ttl,
    )
    .map_err(|e| AppError::Internal(e.into()))?;

    let expires_at = Utc
        .timestamp_opt(refresh_claims.exp as i64, 0)
        .single()
        .ok_or_else(|| AppError::Internal(anyhow::anyhow!("refresh expiry out of range")))?;

    debug!(user_id, jti = %refresh_claims.jti, "Storing refresh token");
    store
        .store_refresh_token(user_id, &refresh_claims.jti, expires_at)
        .await?;

    Ok(TokenPair {
        access_token,
        refresh_token,
    })
}

/// Self-service registration; always creates an employee account.
#[utoipa::path(
    post,
    path = "/auth/signup",
    request_body = SignupReq,
    responses(
        (status = 201, description = "Account and profile created", body = crate::model::profile::Profile),
        (status = 400, description = "Invalid input"),
        (status = 409, description = "Email already registered")
    ),
    tag = "Auth"
)]
pub async fn signup(
    store: web::Data<dyn HrStore>,
    payload: web::Json<SignupReq>,
) -> Result<impl Responder, AppError> {
    let profile = accounts::signup(
        store.get_ref(),
        payload.into_inner(),
        Role::Employee,
        today_utc(),
    )
    .await?;

    Ok(HttpResponse::Created().json(profile))
}

#[utoipa::path(
    post,
    path = "/auth/login",
    request_body = LoginReqDto,
    responses(
        (status = 200, description = "Session tokens", body = TokenPair),
        (status = 400, description = "Email or password missing"),
        (status = 401, description = "Invalid credentials")
    ),
    tag = "Auth"
)]
#[instrument(name = "auth_login", skip_all, fields(email = %user.email))]
pub async fn login(
    user: web::Json<LoginReqDto>,
    store: web::Data<dyn HrStore>,
    config: web::Data<Config>,
) -> Result<impl Responder, AppError> {
    info!("Login request received");

    if user.email.trim().is_empty() || user.password.is_empty() {
        info!("Validation failed: empty email or password");
        return Err(AppError::BadRequest("Email and password required".to_string()));
    }

    let identity = accounts::authenticate(store.get_ref(), &user.email, &user.password).await?;
    let tokens = issue_session(
        store.get_ref(),
        config.get_ref(),
        identity.id,
        identity.email,
        identity.role,
    )
    .await?;

    info!(user_id = identity.id, "Login successful");
    Ok(HttpResponse::Ok().json(tokens))
}

/// Rotates a refresh token: the presented one is revoked and a new pair is
/// issued.
#[utoipa::path(
    post,
    path = "/auth/refresh",
    responses(
        (status = 200, description = "New session tokens", body = TokenPair),
        (status = 401, description = "Missing, invalid, expired or revoked refresh token")
    ),
    security(
        ("bearer_auth" = [])
    ),
    tag = "Auth"
)]
pub async fn refresh_token(
    req: HttpRequest,
    store: web::Data<dyn HrStore>,
    config: web::Data<Config>,
) -> Result<impl Responder, AppError> {
    let unauthorized = || AppError::Unauthorized("Invalid refresh token".to_string());

    let token = bearer_token(&req).ok_or_else(unauthorized)?;
    let claims = verify_token(token, &config.jwt_secret).map_err(|_| unauthorized())?;

    if claims.token_type != TokenType::Refresh {
        return Err(unauthorized());
    }

    if !store.revoke_refresh_token(&claims.jti).await? {
        warn!(user_id = claims.user_id, "Refresh with revoked or unknown token");
        return Err(unauthorized());
    }

    let identity = store
        .find_identity(claims.user_id)
        .await?
        .ok_or_else(unauthorized)?;

    let tokens = issue_session(
        store.get_ref(),
        config.get_ref(),
        identity.id,
        identity.email,
        identity.role,
    )
    .await?;

    Ok(HttpResponse::Ok().json(tokens))
}

/// Sign-out. Revokes the presented refresh token; succeeds even when
/// there is nothing to revoke.
#[utoipa::path(
    post,
    path = "/auth/logout",
    responses(
        (status = 204, description = "Signed out")
    ),
    security(
        ("bearer_auth" = [])
    ),
    tag = "Auth"
)]
pub async fn logout(
    req: HttpRequest,
    store: web::Data<dyn HrStore>,
    config: web::Data<Config>,
) -> impl Responder {
    let Some(token) = bearer_token(&req) else {
        return HttpResponse::NoContent().finish();
    };

    let claims = match verify_token(token, &config.jwt_secret) {
        Ok(c) if c.token_type == TokenType::Refresh => c,
        _ => return HttpResponse::NoContent().finish(),
    };

    if let Err(e) = store.revoke_refresh_token(&claims.jti).await {
        warn!(error = %e, user_id = claims.user_id, "Failed to revoke refresh token on logout");
    }

    HttpResponse::NoContent().finish()
}

/// Current identity context.
#[utoipa::path(
    get,
    path = "/api/session",
    responses(
        (status = 200, description = "Current user", body = SessionResponse),
        (status = 401, description = "Unauthorized")
    ),
    security(
        ("bearer_auth" = [])
    ),
    tag = "Auth"
)]
pub async fn session(auth: AuthUser) -> impl Responder {
    HttpResponse::Ok().json(SessionResponse {
        user_id: auth.user_id,
        is_admin: auth.is_admin(),
        email: auth.email,
        role: auth.role,
    })
}
