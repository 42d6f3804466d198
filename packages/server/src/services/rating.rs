use std::collections::HashMap;

use chrono::Utc;
use common::RatingSummary;
use common::rating::{self, NO_VOTE};
use sea_orm::sea_query::OnConflict;
use sea_orm::{ColumnTrait, ConnectionTrait, EntityTrait, QueryFilter, QuerySelect, Set};
use tracing::{debug, instrument};

use crate::entity::vote;
use crate::error::AppError;
use crate::extractors::auth::Session;
use crate::services::ModerationService;

pub struct RatingService<'a, C: ConnectionTrait> {
    conn: &'a C,
}

impl<'a, C: ConnectionTrait> RatingService<'a, C> {
    pub fn new(conn: &'a C) -> Self {
        Self { conn }
    }

    /// Stored ratings for one prompt, retracted votes included.
    pub async fn ratings(&self, prompt_id: i32) -> Result<Vec<i32>, AppError> {
        Ok(vote::Entity::find()
            .select_only()
            .column(vote::Column::Rating)
            .filter(vote::Column::PromptId.eq(prompt_id))
            .into_tuple::<i32>()
            .all(self.conn)
            .await?)
    }

    pub async fn summary(&self, prompt_id: i32) -> Result<RatingSummary, AppError> {
        let ratings = self.ratings(prompt_id).await?;
        Ok(RatingSummary::from_ratings(&ratings))
    }

    /// Summaries for a batch of prompts. Prompts without votes map to an
    /// empty summary.
    pub async fn summaries(
        &self,
        prompt_ids: &[i32],
    ) -> Result<HashMap<i32, RatingSummary>, AppError> {
        let rows: Vec<(i32, i32)> = vote::Entity::find()
            .select_only()
            .column(vote::Column::PromptId)
            .column(vote::Column::Rating)
            .filter(vote::Column::PromptId.is_in(prompt_ids.iter().copied()))
            .into_tuple()
            .all(self.conn)
            .await?;

        let mut grouped: HashMap<i32, Vec<i32>> =
            prompt_ids.iter().map(|&id| (id, Vec::new())).collect();
        for (prompt_id, rating) in rows {
            grouped.entry(prompt_id).or_default().push(rating);
        }

        Ok(grouped
            .into_iter()
            .map(|(id, ratings)| (id, RatingSummary::from_ratings(&ratings)))
            .collect())
    }

    /// The member's stored rating, `0` when they never voted or retracted.
    pub async fn current_user_vote(&self, prompt_id: i32, user_id: i32) -> Result<i32, AppError> {
        let stored = vote::Entity::find_by_id((prompt_id, user_id))
            .one(self.conn)
            .await?;
        Ok(stored.map_or(NO_VOTE, |v| v.rating))
    }

    /// The member's stored ratings across a batch of prompts. Prompts they
    /// never voted on are absent.
    pub async fn user_votes(
        &self,
        user_id: i32,
        prompt_ids: &[i32],
    ) -> Result<HashMap<i32, i32>, AppError> {
        let rows: Vec<(i32, i32)> = vote::Entity::find()
            .select_only()
            .column(vote::Column::PromptId)
            .column(vote::Column::Rating)
            .filter(vote::Column::UserId.eq(user_id))
            .filter(vote::Column::PromptId.is_in(prompt_ids.iter().copied()))
            .into_tuple()
            .all(self.conn)
            .await?;
        Ok(rows.into_iter().collect())
    }

    /// Record a star click and return the rating now stored.
    ///
    /// Clicking the star already held retracts the vote to `0`. The write is
    /// an upsert on `(prompt_id, user_id)`, so repeated clicks never create a
    /// second row.
    #[instrument(skip(self, session), fields(user_id = session.user_id))]
    pub async fn cast_vote(
        &self,
        session: &Session,
        prompt_id: i32,
        star: i32,
    ) -> Result<i32, AppError> {
        let star = rating::validate_star(star)?;

        if ModerationService::new(self.conn)
            .find_approved(prompt_id)
            .await?
            .is_none()
        {
            return Err(AppError::NotFound(format!("Prompt {prompt_id} not found")));
        }

        let current = self.current_user_vote(prompt_id, session.user_id).await?;
        let new_rating = rating::toggle(current, star);

        let row = vote::ActiveModel {
            prompt_id: Set(prompt_id),
            user_id: Set(session.user_id),
            rating: Set(new_rating),
            updated_at: Set(Utc::now()),
        };
        vote::Entity::insert(row)
            .on_conflict(
                OnConflict::columns([vote::Column::PromptId, vote::Column::UserId])
                    .update_columns([vote::Column::Rating, vote::Column::UpdatedAt])
                    .to_owned(),
            )
            .exec_without_returning(self.conn)
            .await?;

        debug!(prompt_id, current, new_rating, "Vote stored");
        Ok(new_rating)
    }
}
