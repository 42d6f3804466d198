use chrono::Utc;
use common::{Decision, PromptStatus, ValidSubmission};
use sea_orm::prelude::Expr;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, EntityTrait, QueryFilter, QueryOrder, Set,
};
use tracing::{info, instrument};

use crate::entity::prompt;
use crate::error::AppError;
use crate::extractors::auth::Session;
use crate::services::IdentityService;

/// Outcome of an approve/reject call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ModerationOutcome {
    /// Status the decision asked for.
    pub status: PromptStatus,
    /// Rows changed: `1` when a pending prompt moved, `0` when the id is
    /// unknown or the prompt was already decided.
    pub affected: u64,
}

/// Prompt lifecycle: submission into the pending queue and the admin
/// decisions that move prompts out of it.
pub struct ModerationService<'a, C: ConnectionTrait> {
    conn: &'a C,
}

impl<'a, C: ConnectionTrait> ModerationService<'a, C> {
    pub fn new(conn: &'a C) -> Self {
        Self { conn }
    }

    /// Store a validated submission as `pending`, attributed to the caller.
    #[instrument(skip(self, session, submission), fields(user_id = session.user_id))]
    pub async fn submit(
        &self,
        session: &Session,
        submission: ValidSubmission,
    ) -> Result<prompt::Model, AppError> {
        let now = Utc::now();
        let new_prompt = prompt::ActiveModel {
            title: Set(submission.title),
            prompt_text: Set(submission.prompt_text),
            category: Set(submission.category),
            tags: Set(submission.tags.joined()),
            submitted_by_id: Set(session.user_id),
            username: Set(session.username.clone()),
            status: Set(PromptStatus::Pending),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        };

        let model = new_prompt.insert(self.conn).await?;
        info!(prompt_id = model.id, "Prompt submitted for approval");
        Ok(model)
    }

    /// The moderation queue. Admin only.
    pub async fn list_pending(&self, session: &Session) -> Result<Vec<prompt::Model>, AppError> {
        IdentityService::new(self.conn).authorize_admin(session).await?;
        self.list_by_status(PromptStatus::Pending).await
    }

    /// The public library.
    pub async fn list_approved(&self) -> Result<Vec<prompt::Model>, AppError> {
        self.list_by_status(PromptStatus::Approved).await
    }

    /// An approved prompt by id, `None` for unknown or unapproved ids.
    pub async fn find_approved(&self, id: i32) -> Result<Option<prompt::Model>, AppError> {
        Ok(prompt::Entity::find_by_id(id)
            .filter(prompt::Column::Status.eq(PromptStatus::Approved))
            .one(self.conn)
            .await?)
    }

    pub async fn approve(&self, session: &Session, id: i32) -> Result<ModerationOutcome, AppError> {
        self.decide(session, id, Decision::Approve).await
    }

    pub async fn reject(&self, session: &Session, id: i32) -> Result<ModerationOutcome, AppError> {
        self.decide(session, id, Decision::Reject).await
    }

    /// Apply a decision with a single guarded `UPDATE`. Only rows in a status
    /// the decision may move out of match, so decided prompts and unknown ids
    /// are silent no-ops.
    #[instrument(skip(self, session), fields(user_id = session.user_id))]
    async fn decide(
        &self,
        session: &Session,
        id: i32,
        decision: Decision,
    ) -> Result<ModerationOutcome, AppError> {
        IdentityService::new(self.conn).authorize_admin(session).await?;

        let status = decision.target_status();
        let result = prompt::Entity::update_many()
            .col_expr(prompt::Column::Status, Expr::value(status))
            .col_expr(prompt::Column::UpdatedAt, Expr::value(Utc::now()))
            .filter(prompt::Column::Id.eq(id))
            .filter(prompt::Column::Status.is_in(decision.source_statuses()))
            .exec(self.conn)
            .await?;

        if result.rows_affected > 0 {
            info!(prompt_id = id, %status, "Prompt moderated");
        }

        Ok(ModerationOutcome {
            status,
            affected: result.rows_affected,
        })
    }

    async fn list_by_status(&self, status: PromptStatus) -> Result<Vec<prompt::Model>, AppError> {
        Ok(prompt::Entity::find()
            .filter(prompt::Column::Status.eq(status))
            .order_by_asc(prompt::Column::Id)
            .all(self.conn)
            .await?)
    }
}
