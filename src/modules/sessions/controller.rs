use axum::Json;
use axum::extract::State;
use axum_extra::extract::cookie::CookieJar;
use rollcall_core::{AppError, AuthError};
use rollcall_models::{
    AccountResponse, MessageResponse, SessionResponse, SignInForm, SignInRequest, SignInResponse,
};
use tracing::instrument;
use utoipa::ToSchema;

use crate::middleware::sessions::ScopeRole;
use crate::state::AppState;
use crate::validator::ValidatedJson;

#[derive(ToSchema)]
pub struct ErrorResponse {
    pub error: String,
}

/// Describe the sign-in form of a role
///
/// Unauthenticated requests to guarded routes are redirected here.
#[utoipa::path(
    get,
    path = "/{scope}/sign_in",
    params(("scope" = String, Path, description = "Role scope: `students` or `teachers`")),
    responses(
        (status = 200, description = "Sign-in form descriptor", body = SignInForm),
        (status = 404, description = "Unknown scope", body = ErrorResponse)
    ),
    tag = "Sessions"
)]
pub async fn sign_in_form(ScopeRole(role): ScopeRole) -> Json<SignInForm> {
    Json(SignInForm::for_role(role))
}

/// Sign in as a role
///
/// Sets the role's session cookie. Sessions of other roles are untouched; a
/// previous session of the same role in this browser is revoked.
#[utoipa::path(
    post,
    path = "/{scope}/sign_in",
    params(("scope" = String, Path, description = "Role scope: `students` or `teachers`")),
    request_body = SignInRequest,
    responses(
        (status = 200, description = "Signed in; session cookie set", body = SignInResponse),
        (status = 400, description = "Malformed request body", body = ErrorResponse),
        (status = 401, description = "Invalid email or password", body = ErrorResponse),
        (status = 404, description = "Unknown scope", body = ErrorResponse),
        (status = 429, description = "Too many attempts", body = ErrorResponse)
    ),
    tag = "Sessions"
)]
#[instrument(skip_all, fields(role = %role))]
pub async fn sign_in(
    ScopeRole(role): ScopeRole,
    State(state): State<AppState>,
    jar: CookieJar,
    ValidatedJson(dto): ValidatedJson<SignInRequest>,
) -> Result<(CookieJar, Json<SignInResponse>), AppError> {
    let auth = state.authenticator(role);
    let signed_in = auth.sign_in(&dto.email, &dto.password).await?;
    auth.revoke_previous(&jar, &signed_in.session).await?;

    let jar = jar.add(auth.session_cookie(signed_in.token));
    Ok((
        jar,
        Json(SignInResponse {
            message: "Signed in successfully.".to_string(),
            role,
            account: AccountResponse::from(signed_in.account),
        }),
    ))
}

/// Sign out of a role
///
/// Only this role's session ends. Succeeds even when not signed in.
#[utoipa::path(
    delete,
    path = "/{scope}/sign_out",
    params(("scope" = String, Path, description = "Role scope: `students` or `teachers`")),
    responses(
        (status = 200, description = "Signed out; session cookie cleared", body = MessageResponse),
        (status = 404, description = "Unknown scope", body = ErrorResponse)
    ),
    tag = "Sessions"
)]
#[instrument(skip_all, fields(role = %role))]
pub async fn sign_out(
    ScopeRole(role): ScopeRole,
    State(state): State<AppState>,
    jar: CookieJar,
) -> Result<(CookieJar, Json<MessageResponse>), AppError> {
    let auth = state.authenticator(role);
    if let Some(session) = auth.current_session(&jar).await? {
        auth.sign_out(&session).await?;
    }

    let jar = jar.remove(auth.removal_cookie());
    Ok((
        jar,
        Json(MessageResponse {
            message: "Signed out successfully.".to_string(),
        }),
    ))
}

/// Current session of a role
#[utoipa::path(
    get,
    path = "/{scope}/session",
    params(("scope" = String, Path, description = "Role scope: `students` or `teachers`")),
    responses(
        (status = 200, description = "The role's current session and account", body = SessionResponse),
        (status = 303, description = "Not signed in as this role; redirects to its sign-in page"),
        (status = 404, description = "Unknown scope", body = ErrorResponse)
    ),
    tag = "Sessions"
)]
#[instrument(skip_all, fields(role = %role))]
pub async fn current_session(
    ScopeRole(role): ScopeRole,
    State(state): State<AppState>,
    jar: CookieJar,
) -> Result<Json<SessionResponse>, AppError> {
    let auth = state.authenticator(role);
    let session = auth
        .current_session(&jar)
        .await?
        .ok_or(AuthError::Unauthenticated { role })?;
    let account = auth
        .account_for(&session)
        .await?
        .ok_or(AuthError::Unauthenticated { role })?;

    Ok(Json(SessionResponse {
        role,
        account: AccountResponse::from(account),
        issued_at: session.issued_at,
        expires_at: session.expires_at,
    }))
}
