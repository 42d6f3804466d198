use axum::{
    Json,
    extract::{Query, State},
    http::StatusCode,
};
use common::{PromptFilter, SubmissionForm, tags};
use tracing::instrument;

use crate::error::{AppError, ErrorBody};
use crate::extractors::auth::Session;
use crate::extractors::json::AppJson;
use crate::models::category::{CategoryResponse, catalog};
use crate::models::prompt::{
    PromptListItem, PromptListQuery, PromptListResponse, PromptResponse, SubmitPromptRequest,
    TagListResponse,
};
use crate::services::{ModerationService, RatingService};
use crate::state::AppState;

/// The category catalog.
#[utoipa::path(
    get,
    path = "/categories",
    tag = "Prompts",
    operation_id = "listCategories",
    summary = "List categories",
    description = "Returns every category with its predefined tags.",
    responses(
        (status = 200, description = "Category catalog", body = Vec<CategoryResponse>),
    ),
)]
pub async fn list_categories() -> Json<Vec<CategoryResponse>> {
    Json(catalog())
}

/// Browse the approved library.
#[utoipa::path(
    get,
    path = "/prompts",
    tag = "Prompts",
    operation_id = "listPrompts",
    summary = "List approved prompts",
    description = "Returns approved prompts with their average rating, best rated first. `search` matches title or text; every tag in `tags` must occur in the prompt's tags. Both checks are case-insensitive substring matches. Logged-in callers also get their own vote.",
    params(PromptListQuery),
    responses(
        (status = 200, description = "Approved prompts", body = PromptListResponse),
        (status = 401, description = "Bad token (TOKEN_INVALID)", body = ErrorBody),
    ),
    security((), ("jwt" = [])),
)]
#[instrument(skip(state, session, query))]
pub async fn list_prompts(
    session: Option<Session>,
    State(state): State<AppState>,
    Query(query): Query<PromptListQuery>,
) -> Result<Json<PromptListResponse>, AppError> {
    let filter = PromptFilter::new(query.search.as_deref(), &query.tag_list());

    let prompts: Vec<_> = ModerationService::new(&state.db)
        .list_approved()
        .await?
        .into_iter()
        .filter(|p| filter.matches(&p.title, &p.prompt_text, &p.tags))
        .collect();

    let ids: Vec<i32> = prompts.iter().map(|p| p.id).collect();
    let ratings = RatingService::new(&state.db);
    let summaries = ratings.summaries(&ids).await?;
    let my_votes = match &session {
        Some(s) => Some(ratings.user_votes(s.user_id, &ids).await?),
        None => None,
    };

    let mut data: Vec<PromptListItem> = prompts
        .into_iter()
        .map(|p| {
            let summary = summaries.get(&p.id).copied().unwrap_or_default();
            let my_vote = my_votes
                .as_ref()
                .map(|votes| votes.get(&p.id).copied().unwrap_or_default());
            PromptListItem::new(p, summary, my_vote)
        })
        .collect();
    data.sort_by(|a, b| b.avg_rating.total_cmp(&a.avg_rating));

    Ok(Json(PromptListResponse {
        total: data.len(),
        data,
    }))
}

/// Submit a prompt for review.
#[utoipa::path(
    post,
    path = "/prompts",
    tag = "Prompts",
    operation_id = "submitPrompt",
    summary = "Submit a prompt",
    description = "Stores the prompt as `pending` until an administrator decides on it. At least one tag is required; selected tags must belong to the category.",
    request_body = SubmitPromptRequest,
    responses(
        (status = 201, description = "Prompt submitted", body = PromptResponse),
        (status = 400, description = "Validation error (VALIDATION_ERROR)", body = ErrorBody),
        (status = 401, description = "Unauthorized (TOKEN_MISSING, TOKEN_INVALID)", body = ErrorBody),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(state, session, payload), fields(user_id = session.user_id))]
pub async fn submit_prompt(
    session: Session,
    State(state): State<AppState>,
    AppJson(payload): AppJson<SubmitPromptRequest>,
) -> Result<(StatusCode, Json<PromptResponse>), AppError> {
    let submission = SubmissionForm::from(payload).validate()?;

    let model = ModerationService::new(&state.db)
        .submit(&session, submission)
        .await?;

    Ok((StatusCode::CREATED, Json(model.into())))
}

/// Tags in use across the approved library.
#[utoipa::path(
    get,
    path = "/prompts/tags",
    tag = "Prompts",
    operation_id = "listPromptTags",
    summary = "List tags in use",
    description = "Distinct tags of approved prompts, sorted. Used to populate the tag filter.",
    responses(
        (status = 200, description = "Tags", body = TagListResponse),
    ),
)]
#[instrument(skip(state))]
pub async fn list_tags(State(state): State<AppState>) -> Result<Json<TagListResponse>, AppError> {
    let prompts = ModerationService::new(&state.db).list_approved().await?;
    let tags = tags::collect_tags(prompts.iter().map(|p| p.tags.as_str()));
    Ok(Json(TagListResponse { tags }))
}
