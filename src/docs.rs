use crate::api::employee::BalanceResponse;
use crate::api::me::ApplyLeave;
use crate::leave::service::{CreatedEmployee, EmployeeDetails, EmployeeProfile};
use crate::leave::tracker::{
    EmployeeLeave, EmployeeTotal, LeaveNotice, LeaveStatusSummary, LeaveTally, NamedLeave,
    PresentEmployee, TallyRow,
};
use crate::model::credential::IssuedCredential;
use crate::model::employee::{Employee, EmployeePatch, NewEmployee};
use crate::model::leave_request::{LeaveRequest, LeaveStatus, Returned};
use crate::models::{LoginReqDto, LoginResponse};
use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi, openapi};

pub struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut openapi::OpenApi) {
        let components = openapi.components.get_or_insert_with(Default::default);
        components.add_security_scheme(
            "bearer_auth",
            SecurityScheme::Http(
                HttpBuilder::new()
                    .scheme(HttpAuthScheme::Bearer)
                    .bearer_format("JWT")
                    .build(),
            ),
        );
    }
}

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Leave Tracker API",
        version = "1.0.0",
        description = r#"
## Employee Leave Tracker

Every employee starts with **20 leave days**. Applying for leave deducts the
requested days immediately; the request then waits for an administrator to
approve or reject it. Rejecting does not give the days back.

### Security
All routes except `/auth/login` need a **JWT Bearer** token. Directory,
decision and report routes are for the administrator; `/api/me/*` is for
employees.
"#,
    ),
    paths(
        crate::auth::handlers::login,

        crate::api::employee::list_employees,
        crate::api::employee::create_employee,
        crate::api::employee::get_employee,
        crate::api::employee::update_employee,
        crate::api::employee::delete_employee,
        crate::api::employee::employee_balance,
        crate::api::employee::employee_leaves,

        crate::api::leave_request::leave_list,
        crate::api::leave_request::pending_leaves,
        crate::api::leave_request::approve_leave,
        crate::api::leave_request::reject_leave,

        crate::api::report::on_leave,
        crate::api::report::overdue,
        crate::api::report::present,
        crate::api::report::leave_days,

        crate::api::me::profile,
        crate::api::me::apply_leave,
        crate::api::me::my_leaves,
        crate::api::me::status,
        crate::api::me::notification
    ),
    components(
        schemas(
            LoginReqDto,
            LoginResponse,
            Employee,
            NewEmployee,
            EmployeePatch,
            IssuedCredential,
            CreatedEmployee,
            EmployeeDetails,
            EmployeeProfile,
            BalanceResponse,
            ApplyLeave,
            LeaveRequest,
            LeaveStatus,
            Returned,
            EmployeeLeave,
            PresentEmployee,
            NamedLeave,
            TallyRow,
            EmployeeTotal,
            LeaveTally,
            LeaveStatusSummary,
            LeaveNotice
        )
    ),
    modifiers(&SecurityAddon),
    tags(
        (name = "Auth", description = "Login"),
        (name = "Employee", description = "Employee directory"),
        (name = "Leave", description = "Leave decisions"),
        (name = "Report", description = "On-leave, overdue and presence reports"),
        (name = "Self service", description = "Employee's own profile and leave"),
    )
)]
pub struct ApiDoc;
