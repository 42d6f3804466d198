use axum::{
    Json,
    extract::{Path, State},
};
use tracing::instrument;

use crate::error::{AppError, ErrorBody};
use crate::extractors::auth::Session;
use crate::models::prompt::{ModerationResponse, PromptResponse};
use crate::services::ModerationService;
use crate::services::moderation::ModerationOutcome;
use crate::state::AppState;

fn moderation_response(id: i32, outcome: ModerationOutcome) -> ModerationResponse {
    ModerationResponse {
        id,
        status: outcome.status,
        rows_affected: outcome.affected,
    }
}

/// The moderation queue.
#[utoipa::path(
    get,
    path = "/pending",
    tag = "Moderation",
    operation_id = "listPendingPrompts",
    summary = "List pending prompts",
    description = "Prompts awaiting a decision, oldest first. Administrators only.",
    responses(
        (status = 200, description = "Pending prompts", body = Vec<PromptResponse>),
        (status = 401, description = "Unauthorized (TOKEN_MISSING, TOKEN_INVALID)", body = ErrorBody),
        (status = 403, description = "Forbidden (PERMISSION_DENIED)", body = ErrorBody),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(state, session), fields(user_id = session.user_id))]
pub async fn list_pending(
    session: Session,
    State(state): State<AppState>,
) -> Result<Json<Vec<PromptResponse>>, AppError> {
    let prompts = ModerationService::new(&state.db)
        .list_pending(&session)
        .await?;
    Ok(Json(prompts.into_iter().map(PromptResponse::from).collect()))
}

/// Publish a pending prompt.
#[utoipa::path(
    post,
    path = "/{id}/approve",
    tag = "Moderation",
    operation_id = "approvePrompt",
    summary = "Approve a prompt",
    description = "Moves a pending prompt into the public library. Already decided or unknown prompts are left untouched and report `rows_affected: 0`.",
    params(("id" = i32, Path, description = "Prompt ID")),
    responses(
        (status = 200, description = "Decision applied", body = ModerationResponse),
        (status = 401, description = "Unauthorized (TOKEN_MISSING, TOKEN_INVALID)", body = ErrorBody),
        (status = 403, description = "Forbidden (PERMISSION_DENIED)", body = ErrorBody),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(state, session), fields(user_id = session.user_id))]
pub async fn approve(
    session: Session,
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<Json<ModerationResponse>, AppError> {
    let outcome = ModerationService::new(&state.db)
        .approve(&session, id)
        .await?;
    Ok(Json(moderation_response(id, outcome)))
}

/// Discard a pending prompt.
#[utoipa::path(
    post,
    path = "/{id}/reject",
    tag = "Moderation",
    operation_id = "rejectPrompt",
    summary = "Reject a prompt",
    description = "Removes a pending prompt from the queue without publishing it. Already decided or unknown prompts are left untouched and report `rows_affected: 0`.",
    params(("id" = i32, Path, description = "Prompt ID")),
    responses(
        (status = 200, description = "Decision applied", body = ModerationResponse),
        (status = 401, description = "Unauthorized (TOKEN_MISSING, TOKEN_INVALID)", body = ErrorBody),
        (status = 403, description = "Forbidden (PERMISSION_DENIED)", body = ErrorBody),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(state, session), fields(user_id = session.user_id))]
pub async fn reject(
    session: Session,
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<Json<ModerationResponse>, AppError> {
    let outcome = ModerationService::new(&state.db)
        .reject(&session, id)
        .await?;
    Ok(Json(moderation_response(id, outcome)))
}
