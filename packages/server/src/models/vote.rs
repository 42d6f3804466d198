use serde::{Deserialize, Serialize};

/// Request body for a star click.
#[derive(Deserialize, utoipa::ToSchema)]
pub struct CastVoteRequest {
    /// Star clicked, 1-5. Clicking the star already held retracts the vote.
    #[schema(example = 4)]
    pub star: i32,
}

/// The caller's stored rating on a prompt.
#[derive(Serialize, utoipa::ToSchema)]
pub struct VoteResponse {
    #[schema(example = 7)]
    pub prompt_id: i32,
    /// Stored rating, `0` when never voted or retracted.
    #[schema(example = 4)]
    pub rating: i32,
}

#[derive(Serialize, utoipa::ToSchema)]
pub struct RatingResponse {
    #[schema(example = 7)]
    pub prompt_id: i32,
    #[schema(example = 4.25)]
    pub average: f64,
    #[schema(example = 4)]
    pub count: u64,
}
