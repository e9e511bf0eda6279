use crate::{
    auth::{jwt::generate_access_token, password::verify_password},
    config::Config,
    leave::{LeaveError, LeaveService},
    model::role::Role,
    models::{LoginReqDto, LoginResponse},
    store::LeaveStore,
};
use actix_web::{HttpResponse, error::ErrorInternalServerError, web};
use serde_json::json;
use tracing::{debug, error, info, instrument};

/// Login for the administrator and for employees
#[utoipa::path(
    post,
    path = "/auth/login",
    request_body = LoginReqDto,
    responses(
        (status = 200, description = "Login successful", body = LoginResponse),
        (status = 400, description = "Username or password missing"),
        (status = 401, description = "Invalid credentials"),
        (status = 429, description = "Too many requests")
    ),
    tag = "Auth"
)]
#[instrument(
    name = "auth_login",
    skip(service, config, user),
    fields(username = %user.username)
)]
pub async fn login<S: LeaveStore>(
    user: web::Json<LoginReqDto>,
    service: web::Data<LeaveService<S>>,
    config: web::Data<Config>,
) -> actix_web::Result<HttpResponse> {
    info!("Login request received");

    if user.username.trim().is_empty() || user.password.is_empty() {
        info!("Validation failed: empty username or password");
        return Ok(HttpResponse::BadRequest().json(json!({
            "error": "BadRequest",
            "message": "Username or password required"
        })));
    }

    let (role, employee_id) = if user.username == config.admin_username {
        debug!("Verifying administrator password");
        if let Err(e) = verify_password(&user.password, &config.admin_password_hash) {
            info!(error = %e, "Invalid credentials: administrator password mismatch");
            return Err(LeaveError::InvalidCredentials.into());
        }
        (Role::Admin, None)
    } else {
        let credential = service.authenticate(&user.username, &user.password).await?;
        (Role::Employee, Some(credential.employee_id))
    };

    let access_token = generate_access_token(
        user.username.clone(),
        role,
        employee_id,
        &config.jwt_secret,
        config.access_token_ttl,
    )
    .map_err(|e| {
        error!(error = %e, "Failed to sign access token");
        ErrorInternalServerError("Internal Server Error")
    })?;

    info!(role = ?role, "Login successful");

    Ok(HttpResponse::Ok().json(LoginResponse {
        access_token,
        token_type: "Bearer".to_string(),
        expires_in: config.access_token_ttl,
    }))
}
