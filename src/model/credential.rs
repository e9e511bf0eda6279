use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Login credential, exactly one per employee.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, sqlx::FromRow)]
pub struct Credential {
    pub employee_id: u64,
    pub username: String,
    #[serde(skip_serializing)]
    pub password_hash: String,
}

impl Credential {
    pub fn username_for(employee_id: u64) -> String {
        format!("user{employee_id}")
    }
}

/// Returned once to the admin when an employee is created.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct IssuedCredential {
    #[schema(example = "user7")]
    pub username: String,
    #[schema(example = "3f9c0a1b7d2e")]
    pub password: String,
}
