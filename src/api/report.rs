use crate::{
    auth::auth::AuthUser,
    leave::{LeaveError, LeaveService, validator::parse_date},
    store::LeaveStore,
};
use actix_web::{HttpResponse, web};
use chrono::{Local, NaiveDate};
use serde::Deserialize;
use utoipa::IntoParams;

#[derive(Deserialize, IntoParams)]
pub struct ReportQuery {
    /// Reference date (YYYY-MM-DD); defaults to the server's local date
    #[param(example = "2024-01-10")]
    pub on: Option<String>,
}

impl ReportQuery {
    fn today(&self) -> Result<NaiveDate, LeaveError> {
        match self.on.as_deref() {
            Some(raw) => parse_date(raw),
            None => Ok(Local::now().date_naive()),
        }
    }
}

/// Approved requests the employee has not returned from, by end date
#[utoipa::path(
    get,
    path = "/api/reports/on-leave",
    responses(
        (status = 200, description = "Employees on leave", body = [crate::leave::tracker::EmployeeLeave]),
        (status = 403, description = "Forbidden")
    ),
    security(
        ("bearer_auth" = [])
    ),
    tag = "Report"
)]
pub async fn on_leave<S: LeaveStore>(
    auth: AuthUser,
    service: web::Data<LeaveService<S>>,
) -> actix_web::Result<HttpResponse> {
    auth.require_admin()?;
    Ok(HttpResponse::Ok().json(service.list_on_leave().await?))
}

/// Active leaves whose end date has passed
#[utoipa::path(
    get,
    path = "/api/reports/overdue",
    params(ReportQuery),
    responses(
        (status = 200, description = "Overdue returns", body = [crate::leave::tracker::EmployeeLeave]),
        (status = 400, description = "Malformed reference date"),
        (status = 403, description = "Forbidden")
    ),
    security(
        ("bearer_auth" = [])
    ),
    tag = "Report"
)]
pub async fn overdue<S: LeaveStore>(
    auth: AuthUser,
    service: web::Data<LeaveService<S>>,
    query: web::Query<ReportQuery>,
) -> actix_web::Result<HttpResponse> {
    auth.require_admin()?;
    Ok(HttpResponse::Ok().json(service.list_overdue(query.today()?).await?))
}

/// Employees considered at work, by name
#[utoipa::path(
    get,
    path = "/api/reports/present",
    params(ReportQuery),
    responses(
        (status = 200, description = "Present employees", body = [crate::leave::tracker::PresentEmployee]),
        (status = 400, description = "Malformed reference date"),
        (status = 403, description = "Forbidden")
    ),
    security(
        ("bearer_auth" = [])
    ),
    tag = "Report"
)]
pub async fn present<S: LeaveStore>(
    auth: AuthUser,
    service: web::Data<LeaveService<S>>,
    query: web::Query<ReportQuery>,
) -> actix_web::Result<HttpResponse> {
    auth.require_admin()?;
    Ok(HttpResponse::Ok().json(service.list_present(query.today()?).await?))
}

/// Leave days taken per employee
#[utoipa::path(
    get,
    path = "/api/reports/leave-days",
    responses(
        (status = 200, description = "Per-request rows and per-employee totals", body = crate::leave::tracker::LeaveTally),
        (status = 403, description = "Forbidden")
    ),
    security(
        ("bearer_auth" = [])
    ),
    tag = "Report"
)]
pub async fn leave_days<S: LeaveStore>(
    auth: AuthUser,
    service: web::Data<LeaveService<S>>,
) -> actix_web::Result<HttpResponse> {
    auth.require_admin()?;
    Ok(HttpResponse::Ok().json(service.leave_tally().await?))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn query(raw: &str) -> ReportQuery {
        web::Query::<ReportQuery>::from_query(raw).unwrap().into_inner()
    }

    #[test]
    fn reference_date_must_be_zero_padded() {
        assert_eq!(
            query("on=2024-01-10").today().unwrap(),
            NaiveDate::from_ymd_opt(2024, 1, 10).unwrap()
        );
        for raw in ["on=2024-1-10", "on=2024-01-5", "on=%202024-01-10"] {
            assert!(
                matches!(query(raw).today(), Err(LeaveError::InvalidDateFormat(_))),
                "{raw} was accepted"
            );
        }
    }

    #[test]
    fn missing_reference_date_is_today() {
        assert_eq!(query("").today().unwrap(), Local::now().date_naive());
    }
}
