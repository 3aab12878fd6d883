use axum::Json;
use axum::extract::State;
use axum::http::StatusCode;
use axum_extra::extract::cookie::CookieJar;
use rollcall_core::AppError;
use rollcall_models::{AccountResponse, SignInResponse, SignUpRequest};
use tracing::instrument;

use crate::middleware::sessions::ScopeRole;
use crate::modules::sessions::controller::ErrorResponse;
use crate::state::AppState;
use crate::validator::ValidatedJson;

/// Register an account for a role
///
/// The new account is signed in as that role straight away.
#[utoipa::path(
    post,
    path = "/{scope}/sign_up",
    params(("scope" = String, Path, description = "Role scope: `students` or `teachers`")),
    request_body = SignUpRequest,
    responses(
        (status = 201, description = "Account created and signed in", body = SignInResponse),
        (status = 400, description = "Malformed request body", body = ErrorResponse),
        (status = 404, description = "Unknown scope", body = ErrorResponse),
        (status = 422, description = "Invalid fields or email already taken", body = ErrorResponse),
        (status = 429, description = "Too many attempts", body = ErrorResponse)
    ),
    tag = "Registrations"
)]
#[instrument(skip_all, fields(role = %role))]
pub async fn sign_up(
    ScopeRole(role): ScopeRole,
    State(state): State<AppState>,
    jar: CookieJar,
    ValidatedJson(dto): ValidatedJson<SignUpRequest>,
) -> Result<(StatusCode, CookieJar, Json<SignInResponse>), AppError> {
    let auth = state.authenticator(role);
    let signed_in = auth.sign_up(&dto.email, &dto.password, &dto.name).await?;
    auth.revoke_previous(&jar, &signed_in.session).await?;

    let jar = jar.add(auth.session_cookie(signed_in.token));
    Ok((
        StatusCode::CREATED,
        jar,
        Json(SignInResponse {
            message: "Welcome! You have signed up successfully.".to_string(),
            role,
            account: AccountResponse::from(signed_in.account),
        }),
    ))
}
