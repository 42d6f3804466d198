use chrono::{DateTime, Utc};
use common::{Category, PromptStatus, RatingSummary, SubmissionForm, TagSet, tags};
use serde::{Deserialize, Serialize};

use crate::entity::prompt;

/// Request body for submitting a prompt.
#[derive(Deserialize, utoipa::ToSchema)]
pub struct SubmitPromptRequest {
    /// Title (1-256 characters).
    #[schema(example = "Murmur workup coach")]
    pub title: String,
    #[schema(example = "Act as an attending and quiz me on systolic murmurs.")]
    pub prompt_text: String,
    /// Category label, see `GET /categories`.
    #[schema(example = "Clinical Students")]
    pub category: String,
    /// Predefined tags of the chosen category.
    #[serde(default)]
    #[schema(example = json!(["Clerkship Prep"]))]
    pub selected_tags: Vec<String>,
    /// Free-typed, comma-separated extra tags.
    #[serde(default)]
    #[schema(example = "Cardiology, Physical Exam")]
    pub custom_tags: String,
}

impl From<SubmitPromptRequest> for SubmissionForm {
    fn from(req: SubmitPromptRequest) -> Self {
        Self {
            title: req.title,
            prompt_text: req.prompt_text,
            category: req.category,
            selected_tags: req.selected_tags,
            custom_tags: req.custom_tags,
        }
    }
}

/// Query parameters for the approved prompt library.
#[derive(Debug, Default, Deserialize, utoipa::IntoParams)]
pub struct PromptListQuery {
    /// Case-insensitive keyword matched against title and prompt text.
    #[param(example = "murmur")]
    pub search: Option<String>,
    /// Comma-separated tags; a prompt must match every one.
    #[param(example = "Cardiology, Clerkship Prep")]
    pub tags: Option<String>,
}

impl PromptListQuery {
    pub fn tag_list(&self) -> Vec<String> {
        self.tags
            .as_deref()
            .map(tags::parse_custom_tags)
            .unwrap_or_default()
    }
}

/// A prompt as stored, with its moderation status.
#[derive(Serialize, utoipa::ToSchema)]
pub struct PromptResponse {
    #[schema(example = 7)]
    pub id: i32,
    #[schema(example = "Murmur workup coach")]
    pub title: String,
    pub prompt_text: String,
    pub category: Category,
    #[schema(example = json!(["Cardiology", "Clerkship Prep"]))]
    pub tags: Vec<String>,
    /// Submitter name at submission time.
    #[schema(example = "dana")]
    pub username: String,
    pub status: PromptStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<prompt::Model> for PromptResponse {
    fn from(m: prompt::Model) -> Self {
        Self {
            id: m.id,
            tags: split_tags(&m.tags),
            title: m.title,
            prompt_text: m.prompt_text,
            category: m.category,
            username: m.username,
            status: m.status,
            created_at: m.created_at,
            updated_at: m.updated_at,
        }
    }
}

/// An approved prompt with its rating.
#[derive(Serialize, utoipa::ToSchema)]
pub struct PromptListItem {
    #[schema(example = 7)]
    pub id: i32,
    #[schema(example = "Murmur workup coach")]
    pub title: String,
    pub prompt_text: String,
    pub category: Category,
    #[schema(example = json!(["Cardiology", "Clerkship Prep"]))]
    pub tags: Vec<String>,
    #[schema(example = "dana")]
    pub username: String,
    pub created_at: DateTime<Utc>,
    /// Mean of stored ratings, retracted votes counted as 0.
    #[schema(example = 4.5)]
    pub avg_rating: f64,
    #[schema(example = 2)]
    pub vote_count: u64,
    /// The caller's stored rating; only present for logged-in callers.
    #[serde(skip_serializing_if = "Option::is_none")]
    #[schema(example = 5)]
    pub my_vote: Option<i32>,
}

impl PromptListItem {
    pub fn new(m: prompt::Model, rating: RatingSummary, my_vote: Option<i32>) -> Self {
        Self {
            id: m.id,
            tags: split_tags(&m.tags),
            title: m.title,
            prompt_text: m.prompt_text,
            category: m.category,
            username: m.username,
            created_at: m.created_at,
            avg_rating: rating.average,
            vote_count: rating.count,
            my_vote,
        }
    }
}

#[derive(Serialize, utoipa::ToSchema)]
pub struct PromptListResponse {
    pub data: Vec<PromptListItem>,
    /// Number of prompts that passed the filter.
    #[schema(example = 1)]
    pub total: usize,
}

/// Distinct tags used by approved prompts.
#[derive(Serialize, utoipa::ToSchema)]
pub struct TagListResponse {
    #[schema(example = json!(["Cardiology", "Clerkship Prep", "PostgreSQL"]))]
    pub tags: Vec<String>,
}

/// Result of an approve or reject call.
#[derive(Serialize, utoipa::ToSchema)]
pub struct ModerationResponse {
    #[schema(example = 7)]
    pub id: i32,
    /// Status the decision asked for.
    pub status: PromptStatus,
    /// `1` if a pending prompt changed, `0` if the id is unknown or the
    /// prompt was already decided.
    #[schema(example = 1)]
    pub rows_affected: u64,
}

fn split_tags(column: &str) -> Vec<String> {
    TagSet::from_joined(column).iter().map(str::to_string).collect()
}
