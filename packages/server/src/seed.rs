use chrono::Utc;
use common::Role;
use sea_orm::sea_query::{Index, IndexCreateStatement, PostgresQueryBuilder, SqliteQueryBuilder};
use sea_orm::*;
use tracing::{info, warn};

use crate::config::AdminConfig;
use crate::entity::{prompt, user, vote};
use crate::utils::hash;

/// Create the configured administrator unless an admin with that username
/// already exists. An existing account keeps its password.
pub async fn seed_admin<C: ConnectionTrait>(db: &C, admin: &AdminConfig) -> Result<(), DbErr> {
    let username = admin.username.trim();
    if username.is_empty() || admin.password.is_empty() {
        warn!("Admin seed skipped: username or password is empty");
        return Ok(());
    }

    let existing = user::Entity::find()
        .filter(user::Column::Username.eq(username))
        .filter(user::Column::Role.eq(Role::Admin))
        .one(db)
        .await?;
    if existing.is_some() {
        return Ok(());
    }

    let password_hash = hash::hash_password(&admin.password)
        .map_err(|e| DbErr::Custom(format!("Password hash error: {}", e)))?;

    user::ActiveModel {
        username: Set(username.to_string()),
        password_hash: Set(Some(password_hash)),
        role: Set(Role::Admin),
        external_id: Set(None),
        created_at: Set(Utc::now()),
        ..Default::default()
    }
    .insert(db)
    .await?;

    info!(username, "Seeded administrator account");
    Ok(())
}

/// Ensure required database indexes exist.
///
/// Failures are logged and do not stop startup.
pub async fn ensure_indexes<C: ConnectionTrait>(db: &C) -> Result<(), DbErr> {
    // Moderation queue and public library both filter on status:
    // SELECT * FROM prompts WHERE status = ? ORDER BY id
    let mut stmt = Index::create();
    stmt.if_not_exists()
        .name("idx_prompts_status")
        .table(prompt::Entity)
        .col(prompt::Column::Status);
    create_index(db, "idx_prompts_status", stmt).await;

    // Per-user vote lookups when listing with my_vote.
    let mut stmt = Index::create();
    stmt.if_not_exists()
        .name("idx_votes_user")
        .table(vote::Entity)
        .col(vote::Column::UserId);
    create_index(db, "idx_votes_user", stmt).await;

    Ok(())
}

async fn create_index<C: ConnectionTrait>(db: &C, name: &str, stmt: IndexCreateStatement) {
    let sql = match db.get_database_backend() {
        DbBackend::Postgres => stmt.to_string(PostgresQueryBuilder),
        _ => stmt.to_string(SqliteQueryBuilder),
    };

    match db.execute_unprepared(&sql).await {
        Ok(_) => info!("Ensured index {} exists", name),
        Err(e) => warn!("Failed to create index {}: {}", name, e),
    }
}
