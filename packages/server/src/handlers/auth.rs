use axum::{Json, extract::State};
use tracing::instrument;

use crate::error::{AppError, ErrorBody};
use crate::extractors::auth::Session;
use crate::extractors::json::AppJson;
use crate::models::auth::{
    AuthorizeUrlResponse, LoginRequest, LoginResponse, MeResponse, SlackCallbackRequest,
    validate_login_request,
};
use crate::services::IdentityService;
use crate::state::AppState;
use crate::utils::jwt;

fn issue_token(state: &AppState, session: Session) -> Result<LoginResponse, AppError> {
    let auth = &state.config.auth;
    let token = jwt::sign(
        session.user_id,
        &session.username,
        session.role,
        &auth.jwt_secret,
        auth.token_ttl_hours,
    )
    .map_err(|e| AppError::Internal(format!("JWT sign error: {}", e)))?;

    Ok(LoginResponse {
        token,
        user_id: session.user_id,
        username: session.username,
        role: session.role,
    })
}

/// Log in as an administrator.
#[utoipa::path(
    post,
    path = "/login",
    tag = "Auth",
    operation_id = "login",
    summary = "Administrator login",
    description = "Checks username and password against administrator accounts. Unknown users, wrong passwords and non-admin accounts all fail the same way.",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Login successful", body = LoginResponse),
        (status = 400, description = "Validation error (VALIDATION_ERROR)", body = ErrorBody),
        (status = 401, description = "Invalid credentials (INVALID_CREDENTIALS)", body = ErrorBody),
    ),
)]
#[instrument(skip(state, payload), fields(username = %payload.username))]
pub async fn login(
    State(state): State<AppState>,
    AppJson(payload): AppJson<LoginRequest>,
) -> Result<Json<LoginResponse>, AppError> {
    validate_login_request(&payload)?;

    let session = IdentityService::new(&state.db)
        .login_admin(payload.username.trim(), &payload.password)
        .await?;

    Ok(Json(issue_token(&state, session)?))
}

/// URL that starts the Slack login flow.
#[utoipa::path(
    get,
    path = "/slack/authorize-url",
    tag = "Auth",
    operation_id = "slackAuthorizeUrl",
    summary = "Slack authorization URL",
    responses(
        (status = 200, description = "Authorization URL", body = AuthorizeUrlResponse),
    ),
)]
#[instrument(skip(state))]
pub async fn slack_authorize_url(
    State(state): State<AppState>,
) -> Result<Json<AuthorizeUrlResponse>, AppError> {
    let url = state.identity.authorize_url()?;
    Ok(Json(AuthorizeUrlResponse { url }))
}

/// Complete Slack login with the authorization code.
#[utoipa::path(
    post,
    path = "/slack/callback",
    tag = "Auth",
    operation_id = "slackCallback",
    summary = "Slack login callback",
    description = "Exchanges the authorization code with Slack and logs the member in. Accounts created this way are never administrators.",
    request_body = SlackCallbackRequest,
    responses(
        (status = 200, description = "Login successful", body = LoginResponse),
        (status = 400, description = "Validation error (VALIDATION_ERROR)", body = ErrorBody),
        (status = 401, description = "Slack refused the code (PROVIDER_REJECTED)", body = ErrorBody),
    ),
)]
#[instrument(skip(state, payload))]
pub async fn slack_callback(
    State(state): State<AppState>,
    AppJson(payload): AppJson<SlackCallbackRequest>,
) -> Result<Json<LoginResponse>, AppError> {
    let code = payload.code.trim();
    if code.is_empty() {
        return Err(AppError::Validation("Authorization code must not be empty".into()));
    }

    let profile = state.identity.exchange_code(code).await?;
    let session = IdentityService::new(&state.db)
        .resolve_external(&profile)
        .await?;

    Ok(Json(issue_token(&state, session)?))
}

/// Return the current session.
#[utoipa::path(
    get,
    path = "/me",
    tag = "Auth",
    operation_id = "me",
    summary = "Current session",
    responses(
        (status = 200, description = "Current session", body = MeResponse),
        (status = 401, description = "Unauthorized (TOKEN_MISSING, TOKEN_INVALID)", body = ErrorBody),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(session), fields(user_id = session.user_id))]
pub async fn me(session: Session) -> Json<MeResponse> {
    Json(MeResponse::from(session))
}
