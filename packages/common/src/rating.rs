/// Lowest star a member can click.
pub const MIN_STAR: i32 = 1;
/// Highest star a member can click.
pub const MAX_STAR: i32 = 5;
/// Stored rating of a retracted vote.
pub const NO_VOTE: i32 = 0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("Star must be between 1 and 5, got {0}")]
pub struct StarOutOfRange(pub i32);

pub fn validate_star(star: i32) -> Result<i32, StarOutOfRange> {
    if (MIN_STAR..=MAX_STAR).contains(&star) {
        Ok(star)
    } else {
        Err(StarOutOfRange(star))
    }
}

/// Rating stored after a member clicks `star` while holding `current`.
///
/// Clicking the star that is already selected retracts the vote.
pub fn toggle(current: i32, star: i32) -> i32 {
    if star == current { NO_VOTE } else { star }
}

/// Mean of all stored ratings for a prompt, `0.0` when there are none.
///
/// Retracted votes are stored as `0` and are part of the mean.
pub fn average(ratings: &[i32]) -> f64 {
    if ratings.is_empty() {
        return 0.0;
    }
    let sum: i64 = ratings.iter().map(|&r| i64::from(r)).sum();
    sum as f64 / ratings.len() as f64
}

/// Average rating together with the number of stored votes.
#[derive(Debug, Clone, Copy, Default, PartialEq, serde::Serialize, utoipa::ToSchema)]
pub struct RatingSummary {
    /// Mean rating in `[0, 5]`.
    #[schema(example = 4.25)]
    pub average: f64,
    /// Number of vote rows, retracted ones included.
    #[schema(example = 4)]
    pub count: u64,
}

impl RatingSummary {
    pub fn from_ratings(ratings: &[i32]) -> Self {
        Self {
            average: average(ratings),
            count: ratings.len() as u64,
        }
    }
}
