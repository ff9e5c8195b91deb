use crate::api::{attendance::{MarkAttendance, TodayStatus}, functions::DeleteUserReq, leave::SetLeaveStatus};
use crate::auth::handlers::SessionResponse;
use crate::model::{
    attendance::{Attendance, AttendanceStatus, AttendanceWithOwner},
    dashboard::DashboardStats,
    leave::{Leave, LeaveDecision, LeaveStatus, LeaveType, LeaveWithOwner},
    profile::{Owner, Profile},
    role::Role,
};
use crate::models::{LoginReqDto, SignupReq, TokenPair};
use crate::service::{
    directory::{CreateEmployee, UpdateEmployee},
    leave::SubmitLeave,
};
use utoipa::Modify;
use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{OpenApi, openapi};

#[derive(OpenApi)]
#[openapi(
    info(
        title = "HRIS API",
        version = "1.0.0",
        description = r#"
## Human Resource Information System

Backend for a small HR system: employee accounts and profiles, leave requests
with an approval workflow, daily attendance and a role-aware dashboard.

### 🔐 Security
Every endpoint except `/auth/*` requires a **JWT Bearer** access token.
Admins see and manage everything. Employees only see their own records.

### 📦 Response Format
- JSON bodies
- Errors are `{"error": "<message>"}`
"#,
    ),
    paths(
        crate::auth::handlers::signup,
        crate::auth::handlers::login,
        crate::auth::handlers::refresh_token,
        crate::auth::handlers::logout,
        crate::auth::handlers::session,

        crate::api::dashboard::stats,

        crate::api::leave::leave_list,
        crate::api::leave::get_leave,
        crate::api::leave::create_leave,
        crate::api::leave::approve_leave,
        crate::api::leave::reject_leave,
        crate::api::leave::set_leave_status,

        crate::api::attendance::mark,
        crate::api::attendance::today,
        crate::api::attendance::history,

        crate::api::employee::create_employee,
        crate::api::employee::get_employee,
        crate::api::employee::list_employees,
        crate::api::employee::update_employee,
        crate::api::employee::delete_employee,

        crate::api::functions::delete_user
    ),
    components(
        schemas(
            SignupReq,
            LoginReqDto,
            TokenPair,
            SessionResponse,
            Role,
            Profile,
            Owner,
            CreateEmployee,
            UpdateEmployee,
            LeaveType,
            LeaveStatus,
            LeaveDecision,
            Leave,
            LeaveWithOwner,
            SubmitLeave,
            SetLeaveStatus,
            AttendanceStatus,
            Attendance,
            AttendanceWithOwner,
            MarkAttendance,
            TodayStatus,
            DashboardStats,
            DeleteUserReq
        )
    ),
    modifiers(&SecurityAddon),
    tags(
        (name = "Auth", description = "Signup, login and session tokens"),
        (name = "Dashboard", description = "Headline statistics"),
        (name = "Leave", description = "Leave requests and approvals"),
        (name = "Attendance", description = "Daily attendance"),
        (name = "Employee", description = "Employee directory (admin)"),
        (name = "Functions", description = "Privileged server-side functions"),
    )
)]
pub struct ApiDoc;

struct SecurityAddon;

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
