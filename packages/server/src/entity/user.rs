use common::Role;
use sea_orm::entity::prelude::*;

/// An account. Administrators are provisioned with a password hash;
/// members signing in through Slack are keyed by `external_id` and have none.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "users")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,

    pub username: String,
    /// Argon2 PHC string, or a hex SHA-256 digest on migrated rows.
    pub password_hash: Option<String>,
    pub role: Role,

    /// Identity-provider subject (Slack user ID).
    #[sea_orm(unique)]
    pub external_id: Option<String>,

    pub created_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::prompt::Entity")]
    Prompts,
    #[sea_orm(has_many = "super::vote::Entity")]
    Votes,
}

impl Related<super::prompt::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Prompts.def()
    }
}

impl Related<super::vote::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Votes.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
