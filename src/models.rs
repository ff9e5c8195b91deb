use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::model::role::Role;

#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct SignupReq {
    #[schema(example = "jane.doe@company.com", format = "email")]
    pub email: String,
    #[schema(example = "secret123", format = "password")]
    pub password: String,
    #[schema(example = "Jane Doe")]
    pub name: String,
    #[schema(example = "Engineer", nullable = true)]
    pub position: Option<String>,
}

#[derive(Deserialize, ToSchema)]
pub struct LoginReqDto {
    #[schema(example = "jane.doe@company.com", format = "email")]
    pub email: String,
    #[schema(example = "secret123", format = "password")]
    pub password: String,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct TokenPair {
    pub access_token: String,
    pub refresh_token: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    pub user_id: u64,
    /// account email
    pub sub: String,
    pub role: Role,
    pub exp: usize,
    pub jti: String,

    pub token_type: TokenType,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub enum TokenType {
    Access,
    Refresh,
}
