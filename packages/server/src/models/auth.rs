use common::Role;
use serde::{Deserialize, Serialize};

use crate::error::AppError;
use crate::extractors::auth::Session;

/// Request body for administrator login.
#[derive(Deserialize, utoipa::ToSchema)]
pub struct LoginRequest {
    #[schema(example = "admin")]
    pub username: String,
    #[schema(example = "s3cure_P@ss!")]
    pub password: String,
}

pub fn validate_login_request(payload: &LoginRequest) -> Result<(), AppError> {
    if payload.username.trim().is_empty() {
        return Err(AppError::Validation("Username must not be empty".into()));
    }
    if payload.password.is_empty() {
        return Err(AppError::Validation("Password must not be empty".into()));
    }
    Ok(())
}

/// Request body for the Slack OAuth callback.
#[derive(Deserialize, utoipa::ToSchema)]
pub struct SlackCallbackRequest {
    /// Authorization code Slack appended to the redirect URI.
    #[schema(example = "1234.5678.abcdef")]
    pub code: String,
}

/// Where to send the browser to start Slack login.
#[derive(Serialize, utoipa::ToSchema)]
pub struct AuthorizeUrlResponse {
    #[schema(example = "https://slack.com/oauth/v2/authorize?user_scope=identity.basic%2Cidentity.email&client_id=123&redirect_uri=https%3A%2F%2Fprompts.example.org%2Fcallback")]
    pub url: String,
}

/// Successful login response, for both login paths.
#[derive(Serialize, utoipa::ToSchema)]
pub struct LoginResponse {
    /// JWT bearer token valid for 7 days.
    #[schema(example = "eyJhbGciOiJIUzI1NiIsInR5cCI6IkpXVCJ9...")]
    pub token: String,
    #[schema(example = 42)]
    pub user_id: i32,
    #[schema(example = "dana")]
    pub username: String,
    pub role: Role,
}

/// The caller's session.
#[derive(Serialize, utoipa::ToSchema)]
pub struct MeResponse {
    #[schema(example = 42)]
    pub id: i32,
    #[schema(example = "dana")]
    pub username: String,
    pub role: Role,
}

impl From<Session> for MeResponse {
    fn from(session: Session) -> Self {
        Self {
            id: session.user_id,
            username: session.username,
            role: session.role,
        }
    }
}
