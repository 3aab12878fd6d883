use axum::{Extension, Json, extract::State};
use rollcall_core::{AppError, Role};
use rollcall_models::{AccountResponse, DashboardResponse, WhoAmIResponse};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::middleware::guard::ActiveRoles;
use crate::middleware::sessions::{ActiveSessions, SignedIn, Students, Teachers};
use crate::state::AppState;

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct SignInLink {
    pub role: Role,
    #[schema(example = "/students/sign_in")]
    pub sign_in: String,
    #[schema(example = "/students/sign_up")]
    pub sign_up: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct LandingResponse {
    #[schema(example = "rollcall")]
    pub service: String,
    pub version: String,
    pub sign_in: Vec<SignInLink>,
}

/// Service landing page
///
/// Lists where each role signs in.
#[utoipa::path(
    get,
    path = "/",
    responses((status = 200, description = "Service landing", body = LandingResponse)),
    tag = "Dashboard"
)]
pub async fn landing() -> Json<LandingResponse> {
    let sign_in = Role::ALL
        .into_iter()
        .map(|role| SignInLink {
            role,
            sign_in: role.sign_in_path().to_string(),
            sign_up: format!("/{}/sign_up", role.scope()),
        })
        .collect();

    Json(LandingResponse {
        service: env!("CARGO_PKG_NAME").to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        sign_in,
    })
}

/// Roles signed in on this browser
///
/// Open to any member of the `user` group. Lists every active role of the
/// group with its account, in priority order.
#[utoipa::path(
    get,
    path = "/whoami",
    responses(
        (status = 200, description = "Active roles and their accounts", body = WhoAmIResponse),
        (status = 303, description = "No role of the group signed in; redirects to sign-in")
    ),
    tag = "Dashboard"
)]
pub async fn whoami(
    State(state): State<AppState>,
    Extension(ActiveRoles(roles)): Extension<ActiveRoles>,
    active: ActiveSessions,
) -> Result<Json<WhoAmIResponse>, AppError> {
    let mut accounts = Vec::with_capacity(roles.len());
    for role in &roles {
        let Some(session) = active.session(*role) else {
            continue;
        };
        if let Some(account) = state.authenticator(*role).account_for(session).await? {
            accounts.push(AccountResponse::from(account));
        }
    }

    Ok(Json(WhoAmIResponse { roles, accounts }))
}

/// Dashboard of the acting role
///
/// Students and teachers get different dashboards at the same path.
#[utoipa::path(
    get,
    path = "/dashboard",
    responses(
        (status = 200, description = "Dashboard of the acting role", body = DashboardResponse),
        (status = 303, description = "No role signed in; redirects to sign-in")
    ),
    tag = "Dashboard"
)]
pub async fn student_dashboard(
    SignedIn { account, .. }: SignedIn<Students>,
) -> Json<DashboardResponse> {
    Json(DashboardResponse {
        role: Role::Student,
        greeting: format!("Welcome back, {}.", account.name),
        account: AccountResponse::from(account),
        links: vec![
            "/dashboard/subjects".to_string(),
            "/dashboard/subjects/available".to_string(),
            "/students/session".to_string(),
        ],
    })
}

pub async fn teacher_dashboard(
    SignedIn { account, .. }: SignedIn<Teachers>,
) -> Json<DashboardResponse> {
    Json(DashboardResponse {
        role: Role::Teacher,
        greeting: format!("Good day, {}.", account.name),
        account: AccountResponse::from(account),
        links: vec![
            "/dashboard/subjects".to_string(),
            "/teachers/session".to_string(),
        ],
    })
}
