use crate::{auth::auth::AuthUser, leave::LeaveService, store::LeaveStore};
use actix_web::{HttpResponse, web};

/// Every leave request with the employee's name, by id
#[utoipa::path(
    get,
    path = "/api/leaves",
    responses(
        (status = 200, description = "All leave requests", body = [crate::leave::tracker::NamedLeave]),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden")
    ),
    security(
        ("bearer_auth" = [])
    ),
    tag = "Leave"
)]
pub async fn leave_list<S: LeaveStore>(
    auth: AuthUser,
    service: web::Data<LeaveService<S>>,
) -> actix_web::Result<HttpResponse> {
    auth.require_admin()?;
    Ok(HttpResponse::Ok().json(service.list_all_leaves().await?))
}

/// Requests awaiting a decision, oldest application first
#[utoipa::path(
    get,
    path = "/api/leaves/pending",
    responses(
        (status = 200, description = "Pending leave requests", body = [crate::leave::tracker::EmployeeLeave]),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden")
    ),
    security(
        ("bearer_auth" = [])
    ),
    tag = "Leave"
)]
pub async fn pending_leaves<S: LeaveStore>(
    auth: AuthUser,
    service: web::Data<LeaveService<S>>,
) -> actix_web::Result<HttpResponse> {
    auth.require_admin()?;
    Ok(HttpResponse::Ok().json(service.list_pending().await?))
}

/* =========================
Approve leave (Admin)
========================= */
#[utoipa::path(
    put,
    path = "/api/leaves/{id}/approve",
    params(
        ("id" = u64, Path, description = "ID of the leave request to approve")
    ),
    responses(
        (status = 200, description = "Leave approved", body = crate::model::leave_request::LeaveRequest),
        (status = 404, description = "Leave request not found"),
        (status = 409, description = "Leave request already decided"),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden")
    ),
    security(
        ("bearer_auth" = [])
    ),
    tag = "Leave"
)]
pub async fn approve_leave<S: LeaveStore>(
    auth: AuthUser,
    service: web::Data<LeaveService<S>>,
    path: web::Path<u64>,
) -> actix_web::Result<HttpResponse> {
    auth.require_admin()?;
    Ok(HttpResponse::Ok().json(service.approve_leave(path.into_inner()).await?))
}

/* =========================
Reject leave (Admin)
========================= */
#[utoipa::path(
    put,
    path = "/api/leaves/{id}/reject",
    params(
        ("id" = u64, Path, description = "ID of the leave request to reject")
    ),
    responses(
        (status = 200, description = "Leave rejected; the deducted days are not restored", body = crate::model::leave_request::LeaveRequest),
        (status = 404, description = "Leave request not found"),
        (status = 409, description = "Leave request already decided"),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden")
    ),
    security(
        ("bearer_auth" = [])
    ),
    tag = "Leave"
)]
pub async fn reject_leave<S: LeaveStore>(
    auth: AuthUser,
    service: web::Data<LeaveService<S>>,
    path: web::Path<u64>,
) -> actix_web::Result<HttpResponse> {
    auth.require_admin()?;
    Ok(HttpResponse::Ok().json(service.reject_leave(path.into_inner()).await?))
}
