use utoipa::openapi::security::{ApiKey, ApiKeyValue, SecurityScheme};
use utoipa::{Modify, OpenApi};

use rollcall_core::Role;
use rollcall_models::{
    AccountResponse, CreateSubjectRequest, DashboardResponse, EnrollRequest, Enrollment,
    MessageResponse, SessionResponse, SignInForm, SignInRequest, SignInResponse, SignUpRequest,
    Subject, SubjectListResponse, WhoAmIResponse,
};

use crate::modules::dashboard::controller::{LandingResponse, SignInLink};
use crate::modules::sessions::controller::ErrorResponse;

#[derive(OpenApi)]
#[openapi(
    paths(
        crate::modules::dashboard::controller::landing,
        crate::modules::sessions::controller::sign_in_form,
        crate::modules::sessions::controller::sign_in,
        crate::modules::sessions::controller::sign_out,
        crate::modules::sessions::controller::current_session,
        crate::modules::registrations::controller::sign_up,
        crate::modules::dashboard::controller::whoami,
        crate::modules::dashboard::controller::student_dashboard,
        crate::modules::subjects::controller::list_taught,
        crate::modules::subjects::controller::create_subject,
        crate::modules::subjects::controller::list_available,
    ),
    components(
        schemas(
            Role,
            AccountResponse,
            SignInRequest,
            SignInResponse,
            SignUpRequest,
            SignInForm,
            SessionResponse,
            MessageResponse,
            WhoAmIResponse,
            DashboardResponse,
            LandingResponse,
            SignInLink,
            Subject,
            Enrollment,
            CreateSubjectRequest,
            EnrollRequest,
            SubjectListResponse,
            ErrorResponse,
        )
    ),
    modifiers(&SessionCookies),
    tags(
        (name = "Sessions", description = "Per-role sign-in and sign-out"),
        (name = "Registrations", description = "Per-role account registration"),
        (name = "Dashboard", description = "Landing page and role-dispatched dashboards"),
        (name = "Subjects", description = "Subjects taught and enrolled in")
    ),
    info(
        title = "Rollcall API",
        version = "0.1.0",
        description = "Student and teacher accounts sharing one account table, with independent per-role sessions."
    )
)]
pub struct ApiDoc;

struct SessionCookies;

impl Modify for SessionCookies {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            for role in Role::ALL {
                components.add_security_scheme(
                    role.cookie_name(),
                    SecurityScheme::ApiKey(ApiKey::Cookie(ApiKeyValue::new(role.cookie_name()))),
                );
            }
        }
    }
}
