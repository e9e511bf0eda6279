use crate::{
    auth::auth::AuthUser,
    leave::LeaveService,
    model::employee::{EmployeePatch, NewEmployee},
    store::LeaveStore,
};
use actix_web::{HttpResponse, web};
use serde::Serialize;
use serde_json::json;
use utoipa::ToSchema;

#[derive(Serialize, ToSchema)]
pub struct BalanceResponse {
    #[schema(example = 7)]
    pub employee_id: u64,
    #[schema(example = 15)]
    pub leave_balance: i64,
}

/* =========================
Employee directory (Admin)
========================= */

/// List employees ordered by id
#[utoipa::path(
    get,
    path = "/api/employees",
    responses(
        (status = 200, description = "All employees", body = [crate::model::employee::Employee]),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden")
    ),
    security(
        ("bearer_auth" = [])
    ),
    tag = "Employee"
)]
pub async fn list_employees<S: LeaveStore>(
    auth: AuthUser,
    service: web::Data<LeaveService<S>>,
) -> actix_web::Result<HttpResponse> {
    auth.require_admin()?;
    Ok(HttpResponse::Ok().json(service.employees().await?))
}

/// Create an employee and issue its login credential
#[utoipa::path(
    post,
    path = "/api/employees",
    request_body = NewEmployee,
    responses(
        (status = 201, description = "Employee created; the password is shown only once", body = crate::leave::service::CreatedEmployee),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden"),
        (status = 503, description = "Store unavailable")
    ),
    security(
        ("bearer_auth" = [])
    ),
    tag = "Employee"
)]
pub async fn create_employee<S: LeaveStore>(
    auth: AuthUser,
    service: web::Data<LeaveService<S>>,
    payload: web::Json<NewEmployee>,
) -> actix_web::Result<HttpResponse> {
    auth.require_admin()?;
    let created = service.add_employee(payload.into_inner()).await?;
    Ok(HttpResponse::Created().json(created))
}

/// Employee record with leave history, most recent first
#[utoipa::path(
    get,
    path = "/api/employees/{id}",
    params(
        ("id" = u64, Path, description = "Employee id")
    ),
    responses(
        (status = 200, description = "Employee found", body = crate::leave::service::EmployeeDetails),
        (status = 404, description = "Employee not found")
    ),
    security(
        ("bearer_auth" = [])
    ),
    tag = "Employee"
)]
pub async fn get_employee<S: LeaveStore>(
    auth: AuthUser,
    service: web::Data<LeaveService<S>>,
    path: web::Path<u64>,
) -> actix_web::Result<HttpResponse> {
    auth.require_admin()?;
    Ok(HttpResponse::Ok().json(service.employee(path.into_inner()).await?))
}

/// Update some fields of an employee
#[utoipa::path(
    patch,
    path = "/api/employees/{id}",
    params(
        ("id" = u64, Path, description = "Employee id")
    ),
    request_body = EmployeePatch,
    responses(
        (status = 200, description = "Employee updated", body = crate::model::employee::Employee),
        (status = 400, description = "No fields to update"),
        (status = 404, description = "Employee not found")
    ),
    security(
        ("bearer_auth" = [])
    ),
    tag = "Employee"
)]
pub async fn update_employee<S: LeaveStore>(
    auth: AuthUser,
    service: web::Data<LeaveService<S>>,
    path: web::Path<u64>,
    payload: web::Json<EmployeePatch>,
) -> actix_web::Result<HttpResponse> {
    auth.require_admin()?;
    let employee = service
        .edit_employee(path.into_inner(), payload.into_inner())
        .await?;
    Ok(HttpResponse::Ok().json(employee))
}

/// Delete an employee with its credential, leave requests and ledger
#[utoipa::path(
    delete,
    path = "/api/employees/{id}",
    params(
        ("id" = u64, Path, description = "Employee id")
    ),
    responses(
        (status = 200, description = "Employee deleted"),
        (status = 404, description = "Employee not found")
    ),
    security(
        ("bearer_auth" = [])
    ),
    tag = "Employee"
)]
pub async fn delete_employee<S: LeaveStore>(
    auth: AuthUser,
    service: web::Data<LeaveService<S>>,
    path: web::Path<u64>,
) -> actix_web::Result<HttpResponse> {
    auth.require_admin()?;
    let employee = service.delete_employee(path.into_inner()).await?;
    Ok(HttpResponse::Ok().json(json!({
        "message": "Employee deleted",
        "employee": employee
    })))
}

#[utoipa::path(
    get,
    path = "/api/employees/{id}/balance",
    params(
        ("id" = u64, Path, description = "Employee id")
    ),
    responses(
        (status = 200, description = "Current leave balance", body = BalanceResponse),
        (status = 404, description = "Employee not found")
    ),
    security(
        ("bearer_auth" = [])
    ),
    tag = "Employee"
)]
pub async fn employee_balance<S: LeaveStore>(
    auth: AuthUser,
    service: web::Data<LeaveService<S>>,
    path: web::Path<u64>,
) -> actix_web::Result<HttpResponse> {
    auth.require_admin()?;
    let employee_id = path.into_inner();
    let leave_balance = service.get_balance(employee_id).await?;
    Ok(HttpResponse::Ok().json(BalanceResponse {
        employee_id,
        leave_balance,
    }))
}

#[utoipa::path(
    get,
    path = "/api/employees/{id}/leaves",
    params(
        ("id" = u64, Path, description = "Employee id")
    ),
    responses(
        (status = 200, description = "Leave history, most recent first", body = [crate::model::leave_request::LeaveRequest]),
        (status = 404, description = "Employee not found")
    ),
    security(
        ("bearer_auth" = [])
    ),
    tag = "Employee"
)]
pub async fn employee_leaves<S: LeaveStore>(
    auth: AuthUser,
    service: web::Data<LeaveService<S>>,
    path: web::Path<u64>,
) -> actix_web::Result<HttpResponse> {
    auth.require_admin()?;
    Ok(HttpResponse::Ok().json(service.leave_history(path.into_inner()).await?))
}
