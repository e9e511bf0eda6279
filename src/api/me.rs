//! Self-service routes for the logged-in employee.

use crate::{
    auth::auth::AuthUser,
    leave::{LeaveApplication, LeaveService},
    store::LeaveStore,
};
use actix_web::{HttpResponse, web};
use chrono::Local;
use serde::Deserialize;
use utoipa::ToSchema;

#[derive(Deserialize, ToSchema)]
pub struct ApplyLeave {
    #[schema(example = "2024-01-01")]
    pub start_date: String,
    #[schema(example = "2024-01-05")]
    pub end_date: String,
    #[schema(example = "Family visit")]
    pub reason: String,
}

#[utoipa::path(
    get,
    path = "/api/me",
    responses(
        (status = 200, description = "Own record and leave balance", body = crate::leave::service::EmployeeProfile),
        (status = 403, description = "Not an employee")
    ),
    security(
        ("bearer_auth" = [])
    ),
    tag = "Self service"
)]
pub async fn profile<S: LeaveStore>(
    auth: AuthUser,
    service: web::Data<LeaveService<S>>,
) -> actix_web::Result<HttpResponse> {
    let employee_id = auth.require_employee()?;
    Ok(HttpResponse::Ok().json(service.profile(employee_id).await?))
}

/// Apply for leave
#[utoipa::path(
    post,
    path = "/api/me/leaves",
    request_body = ApplyLeave,
    responses(
        (status = 201, description = "Leave request submitted as Pending", body = crate::model::leave_request::LeaveRequest),
        (status = 400, description = "Invalid dates or insufficient balance"),
        (status = 403, description = "Not an employee")
    ),
    security(
        ("bearer_auth" = [])
    ),
    tag = "Self service"
)]
pub async fn apply_leave<S: LeaveStore>(
    auth: AuthUser,
    service: web::Data<LeaveService<S>>,
    payload: web::Json<ApplyLeave>,
) -> actix_web::Result<HttpResponse> {
    let employee_id = auth.require_employee()?;
    let ApplyLeave {
        start_date,
        end_date,
        reason,
    } = payload.into_inner();

    let leave = service
        .apply_leave(
            LeaveApplication {
                employee_id,
                start_date,
                end_date,
                reason,
            },
            Local::now().naive_local(),
        )
        .await?;
    Ok(HttpResponse::Created().json(leave))
}

#[utoipa::path(
    get,
    path = "/api/me/leaves",
    responses(
        (status = 200, description = "Own leave history, most recent first", body = [crate::model::leave_request::LeaveRequest]),
        (status = 403, description = "Not an employee")
    ),
    security(
        ("bearer_auth" = [])
    ),
    tag = "Self service"
)]
pub async fn my_leaves<S: LeaveStore>(
    auth: AuthUser,
    service: web::Data<LeaveService<S>>,
) -> actix_web::Result<HttpResponse> {
    let employee_id = auth.require_employee()?;
    Ok(HttpResponse::Ok().json(service.leave_history(employee_id).await?))
}

#[utoipa::path(
    get,
    path = "/api/me/status",
    responses(
        (status = 200, description = "Latest request and remaining balance", body = crate::leave::tracker::LeaveStatusSummary),
        (status = 403, description = "Not an employee")
    ),
    security(
        ("bearer_auth" = [])
    ),
    tag = "Self service"
)]
pub async fn status<S: LeaveStore>(
    auth: AuthUser,
    service: web::Data<LeaveService<S>>,
) -> actix_web::Result<HttpResponse> {
    let employee_id = auth.require_employee()?;
    Ok(HttpResponse::Ok().json(service.leave_status(employee_id).await?))
}

/// Notice about the latest request; `null` when there is none
#[utoipa::path(
    get,
    path = "/api/me/notification",
    responses(
        (status = 200, description = "Notice for the latest request", body = crate::leave::tracker::LeaveNotice),
        (status = 403, description = "Not an employee")
    ),
    security(
        ("bearer_auth" = [])
    ),
    tag = "Self service"
)]
pub async fn notification<S: LeaveStore>(
    auth: AuthUser,
    service: web::Data<LeaveService<S>>,
) -> actix_web::Result<HttpResponse> {
    let employee_id = auth.require_employee()?;
    Ok(HttpResponse::Ok().json(service.notification(employee_id).await?))
}
