use chrono::NaiveDate;

use crate::{
    auth::{auth::AuthUser, jwt::generate_access_token, password::hash_password},
    config::Config,
    model::{
        profile::{NewAccount, Profile},
        role::Role,
    },
    models::SignupReq,
    store::HrStore,
};

pub const TEST_SECRET: &str = "test-secret";
pub const TEST_PASSWORD: &str = "secret123";

pub fn test_config() -> Config {
    Config {
        database_url: "mysql://unused".to_string(),
        jwt_secret: TEST_SECRET.to_string(),
        server_addr: "127.0.0.1:0".to_string(),
        access_token_ttl: 900,
        refresh_token_ttl: 3600,
        rate_login_per_min: 10_000,
        rate_signup_per_min: 10_000,
        rate_refresh_per_min: 10_000,
        rate_protected_per_min: 10_000,
        api_prefix: "/api".to_string(),
        attendance_history_limit: 50,
        log_dir: "logs".to_string(),
        log_level: tracing::Level::DEBUG,
        bootstrap_admin: None,
    }
}

pub fn today() -> NaiveDate {
    NaiveDate::from_ymd_opt(2026, 3, 2).expect("valid date")
}

pub fn signup_req(email: &str) -> SignupReq {
    SignupReq {
        email: email.to_string(),
        password: TEST_PASSWORD.to_string(),
        name: "Test User".to_string(),
        position: Some("Engineer".to_string()),
    }
}

pub fn auth_user(profile: &Profile, role: Role) -> AuthUser {
    AuthUser {
        user_id: profile.id,
        email: profile.email.clone(),
        role,
    }
}

/// Creates an account with [`TEST_PASSWORD`] and returns its identity
/// context.
pub async fn seed_account(store: &dyn HrStore, email: &str, role: Role) -> AuthUser {
    let profile = store
        .create_account(NewAccount {
            email: email.to_string(),
            password_hash: hash_password(TEST_PASSWORD).expect("hash"),
            role,
            name: email.split('@').next().unwrap_or(email).to_string(),
            position: None,
            date_of_joining: today(),
        })
        .await
        .expect("seed account");
    auth_user(&profile, role)
}

pub fn bearer(user: &AuthUser) -> (&'static str, String) {
    let token = generate_access_token(user.user_id, user.email.clone(), user.role, TEST_SECRET, 900)
        .expect("token");
    ("Authorization", format!("Bearer {}", token))
}

pub fn request() -> actix_web::test::TestRequest {
    actix_web::test::TestRequest::default().peer_addr("127.0.0.1:40000".parse().expect("addr"))
}

/// Initialises the full route table over the given store.
macro_rules! test_app {
    ($store:expr) => {{
        let store: std::sync::Arc<dyn $crate::store::HrStore> = $store;
        let config = $crate::test_support::test_config();
        let routes_config = config.clone();
        actix_web::test::init_service(
            actix_web::App::new()
                .app_data(actix_web::web::Data::from(store))
                .app_data(actix_web::web::Data::new(config))
                .configure(move |cfg| $crate::routes::configure(cfg, routes_config)),
        )
        .await
    }};
}

pub(crate) use test_app;
