use chrono::Utc;
use common::Role;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, EntityTrait, QueryFilter, Set, SqlErr,
};
use tracing::{debug, info, instrument};

use crate::entity::user;
use crate::error::AppError;
use crate::extractors::auth::Session;
use crate::identity::ExternalProfile;
use crate::utils::hash;

/// Maps admin credentials or an identity-provider profile to a [`Session`].
pub struct IdentityService<'a, C: ConnectionTrait> {
    conn: &'a C,
}

impl<'a, C: ConnectionTrait> IdentityService<'a, C> {
    pub fn new(conn: &'a C) -> Self {
        Self { conn }
    }

    /// Authenticate an administrator.
    ///
    /// Unknown username, wrong password, a non-admin account and an account
    /// without a usable stored hash all fail with the same
    /// `InvalidCredentials`, and all of them cost one password verification.
    #[instrument(skip(self, password))]
    pub async fn login_admin(&self, username: &str, password: &str) -> Result<Session, AppError> {
        let account = user::Entity::find()
            .filter(user::Column::Username.eq(username))
            .filter(user::Column::Role.eq(Role::Admin))
            .one(self.conn)
            .await?;

        let is_valid = match account.as_ref().and_then(|a| a.password_hash.as_deref()) {
            Some(stored) => hash::verify_password(password, stored),
            None => {
                hash::verify_dummy(password);
                false
            }
        };

        match account {
            Some(account) if is_valid => Ok(Session {
                user_id: account.id,
                username: account.username,
                role: Role::Admin,
            }),
            _ => Err(AppError::InvalidCredentials),
        }
    }

    /// Confirm a session still belongs to an administrator.
    ///
    /// The token role is only a hint; the account row decides, so a demoted
    /// or deleted admin loses access before the token expires.
    pub async fn authorize_admin(&self, session: &Session) -> Result<(), AppError> {
        session.require_admin()?;

        let account = user::Entity::find_by_id(session.user_id)
            .one(self.conn)
            .await?;
        match account {
            Some(account) if account.role == Role::Admin => Ok(()),
            _ => {
                debug!(user_id = session.user_id, "Token role is stale");
                Err(AppError::PermissionDenied)
            }
        }
    }

    /// Resolve a provider profile to a member account, creating it on first
    /// login and refreshing the display name afterwards.
    ///
    /// The session role is always `user`: external login never grants admin.
    #[instrument(skip(self), fields(external_id = %profile.external_id))]
    pub async fn resolve_external(&self, profile: &ExternalProfile) -> Result<Session, AppError> {
        let account = match self.find_external(&profile.external_id).await? {
            Some(existing) => {
                if existing.username != profile.display_name {
                    let mut active: user::ActiveModel = existing.into();
                    active.username = Set(profile.display_name.clone());
                    active.update(self.conn).await?
                } else {
                    existing
                }
            }
            None => self.create_member(profile).await?,
        };

        Ok(Session {
            user_id: account.id,
            username: account.username,
            role: Role::User,
        })
    }

    async fn find_external(&self, external_id: &str) -> Result<Option<user::Model>, AppError> {
        Ok(user::Entity::find()
            .filter(user::Column::ExternalId.eq(external_id))
            .one(self.conn)
            .await?)
    }

    async fn create_member(&self, profile: &ExternalProfile) -> Result<user::Model, AppError> {
        let new_user = user::ActiveModel {
            username: Set(profile.display_name.clone()),
            password_hash: Set(None),
            role: Set(Role::User),
            external_id: Set(Some(profile.external_id.clone())),
            created_at: Set(Utc::now()),
            ..Default::default()
        };

        match new_user.insert(self.conn).await {
            Ok(model) => {
                info!(user_id = model.id, "Created member account on first login");
                Ok(model)
            }
            Err(e) => match e.sql_err() {
                Some(SqlErr::UniqueConstraintViolation(_)) => {
                    debug!("Concurrent first login: unique constraint caught on insert");
                    self.find_external(&profile.external_id)
                        .await?
                        .ok_or_else(|| AppError::Internal("Member vanished after insert".into()))
                }
                _ => Err(AppError::from(e)),
            },
        }
    }
}
