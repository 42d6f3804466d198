use axum::{
    Json,
    extract::{Path, State},
};
use tracing::instrument;

use crate::error::{AppError, ErrorBody};
use crate::extractors::auth::Session;
use crate::extractors::json::AppJson;
use crate::models::vote::{CastVoteRequest, RatingResponse, VoteResponse};
use crate::services::{ModerationService, RatingService};
use crate::state::AppState;

async fn ensure_approved(state: &AppState, id: i32) -> Result<(), AppError> {
    ModerationService::new(&state.db)
        .find_approved(id)
        .await?
        .map(|_| ())
        .ok_or_else(|| AppError::NotFound(format!("Prompt {id} not found")))
}

/// Average rating of an approved prompt.
#[utoipa::path(
    get,
    path = "/prompts/{id}/rating",
    tag = "Votes",
    operation_id = "getPromptRating",
    summary = "Get prompt rating",
    description = "Mean of all stored ratings, retracted votes counted as 0. `0` when nobody voted.",
    params(("id" = i32, Path, description = "Prompt ID")),
    responses(
        (status = 200, description = "Rating", body = RatingResponse),
        (status = 404, description = "Prompt not found or not approved (NOT_FOUND)", body = ErrorBody),
    ),
)]
#[instrument(skip(state))]
pub async fn get_rating(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<Json<RatingResponse>, AppError> {
    ensure_approved(&state, id).await?;

    let summary = RatingService::new(&state.db).summary(id).await?;
    Ok(Json(RatingResponse {
        prompt_id: id,
        average: summary.average,
        count: summary.count,
    }))
}

/// The caller's vote on a prompt.
#[utoipa::path(
    get,
    path = "/prompts/{id}/vote",
    tag = "Votes",
    operation_id = "getMyVote",
    summary = "Get my vote",
    params(("id" = i32, Path, description = "Prompt ID")),
    responses(
        (status = 200, description = "Stored rating, 0 if none", body = VoteResponse),
        (status = 401, description = "Unauthorized (TOKEN_MISSING, TOKEN_INVALID)", body = ErrorBody),
        (status = 404, description = "Prompt not found or not approved (NOT_FOUND)", body = ErrorBody),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(state, session), fields(user_id = session.user_id))]
pub async fn get_my_vote(
    session: Session,
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<Json<VoteResponse>, AppError> {
    ensure_approved(&state, id).await?;

    let rating = RatingService::new(&state.db)
        .current_user_vote(id, session.user_id)
        .await?;
    Ok(Json(VoteResponse {
        prompt_id: id,
        rating,
    }))
}

/// Click a star.
#[utoipa::path(
    post,
    path = "/prompts/{id}/vote",
    tag = "Votes",
    operation_id = "castVote",
    summary = "Cast a vote",
    description = "Stores the clicked star. Clicking the star already held retracts the vote to 0. Each member keeps one vote per prompt.",
    params(("id" = i32, Path, description = "Prompt ID")),
    request_body = CastVoteRequest,
    responses(
        (status = 200, description = "Rating now stored", body = VoteResponse),
        (status = 400, description = "Star outside 1-5 (VALIDATION_ERROR)", body = ErrorBody),
        (status = 401, description = "Unauthorized (TOKEN_MISSING, TOKEN_INVALID)", body = ErrorBody),
        (status = 404, description = "Prompt not found or not approved (NOT_FOUND)", body = ErrorBody),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(state, session, payload), fields(user_id = session.user_id, star = payload.star))]
pub async fn cast_vote(
    session: Session,
    State(state): State<AppState>,
    Path(id): Path<i32>,
    AppJson(payload): AppJson<CastVoteRequest>,
) -> Result<Json<VoteResponse>, AppError> {
    let rating = RatingService::new(&state.db)
        .cast_vote(&session, id, payload.star)
        .await?;
    Ok(Json(VoteResponse {
        prompt_id: id,
        rating,
    }))
}
