use std::time::Duration;

use sea_orm::sea_query::{PostgresQueryBuilder, SqliteQueryBuilder, TableCreateStatement};
use sea_orm::{ConnectOptions, ConnectionTrait, Database, DatabaseConnection, DbBackend, DbErr, Schema};
use tracing::info;

use crate::config::DatabaseConfig;
use crate::entity::{prompt, user, vote};

pub async fn init_db(config: &DatabaseConfig) -> Result<DatabaseConnection, DbErr> {
    let mut opt = ConnectOptions::new(config.url.to_owned());

    // Set connection pool options
    opt.max_connections(config.max_connections)
        .min_connections(1)
        .connect_timeout(Duration::from_secs(8))
        .acquire_timeout(Duration::from_secs(8))
        .sqlx_logging(false);

    let db = Database::connect(opt).await?;
    create_tables(&db).await?;

    Ok(db)
}

/// Create the `users`, `prompts` and `votes` tables if they do not exist.
///
/// Order matters: prompts and votes carry foreign keys to the tables before them.
/// Only PostgreSQL and SQLite are supported.
pub async fn create_tables<C: ConnectionTrait>(db: &C) -> Result<(), DbErr> {
    let backend = db.get_database_backend();
    let schema = Schema::new(backend);

    create_table(db, backend, schema.create_table_from_entity(user::Entity)).await?;
    create_table(db, backend, schema.create_table_from_entity(prompt::Entity)).await?;
    create_table(db, backend, schema.create_table_from_entity(vote::Entity)).await?;

    info!("Ensured tables users, prompts, votes exist");
    Ok(())
}

async fn create_table<C: ConnectionTrait>(
    db: &C,
    backend: DbBackend,
    mut stmt: TableCreateStatement,
) -> Result<(), DbErr> {
    stmt.if_not_exists();
    let sql = match backend {
        DbBackend::Postgres => stmt.to_string(PostgresQueryBuilder),
        _ => stmt.to_string(SqliteQueryBuilder),
    };
    db.execute_unprepared(&sql).await?;
    Ok(())
}
