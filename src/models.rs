use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(Deserialize, ToSchema)]
pub struct LoginReqDto {
    #[schema(example = "user7")]
    pub username: String,
    #[schema(example = "3f9c0a1b7d2e")]
    pub password: String,
}

#[derive(Serialize, Deserialize, ToSchema)]
pub struct LoginResponse {
    pub access_token: String,
    #[schema(example = "Bearer")]
    pub token_type: String,
    /// Seconds until the token expires.
    #[schema(example = 86400)]
    pub expires_in: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Claims {
    pub sub: String,
    pub role: u8, // role id
    /// Present only for employee logins
    pub employee_id: Option<u64>,
    pub exp: usize,
    pub jti: String,
}
