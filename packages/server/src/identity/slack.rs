use async_trait::async_trait;
use reqwest::{Client, Url};
use serde::Deserialize;
use tracing::{debug, instrument};

use super::{ExternalProfile, IdentityProvider, ProviderError};
use crate::config::SlackConfig;

/// Display name used when Slack does not return one.
const FALLBACK_DISPLAY_NAME: &str = "Slack User";

/// "Sign in with Slack" over OAuth v2 user scopes.
pub struct SlackProvider {
    client: Client,
    config: SlackConfig,
}

#[derive(Debug, Deserialize)]
struct TokenResponse {
    ok: bool,
    error: Option<String>,
    authed_user: Option<AuthedUser>,
}

#[derive(Debug, Deserialize)]
struct AuthedUser {
    id: Option<String>,
    name: Option<String>,
}

impl SlackProvider {
    pub fn new(config: SlackConfig) -> Self {
        Self {
            client: Client::new(),
            config,
        }
    }
}

#[async_trait]
impl IdentityProvider for SlackProvider {
    fn authorize_url(&self) -> Result<String, ProviderError> {
        let url = Url::parse_with_params(
            &self.config.authorize_endpoint,
            &[
                ("user_scope", self.config.user_scopes.as_str()),
                ("client_id", self.config.client_id.as_str()),
                ("redirect_uri", self.config.redirect_uri.as_str()),
            ],
        )
        .map_err(|e| ProviderError::InvalidUrl(e.to_string()))?;
        Ok(url.into())
    }

    #[instrument(skip(self, code))]
    async fn exchange_code(&self, code: &str) -> Result<ExternalProfile, ProviderError> {
        let params = [
            ("client_id", self.config.client_id.as_str()),
            ("client_secret", self.config.client_secret.as_str()),
            ("code", code),
            ("redirect_uri", self.config.redirect_uri.as_str()),
        ];

        let response: TokenResponse = self
            .client
            .post(&self.config.token_endpoint)
            .form(&params)
            .send()
            .await?
            .json()
            .await?;

        if !response.ok {
            return Err(ProviderError::Rejected(
                response.error.unwrap_or_else(|| "Unknown".to_string()),
            ));
        }

        let user = response
            .authed_user
            .ok_or_else(|| ProviderError::Malformed("missing authed_user".into()))?;
        let external_id = user
            .id
            .filter(|id| !id.is_empty())
            .ok_or_else(|| ProviderError::Malformed("missing authed_user.id".into()))?;
        let display_name = user
            .name
            .filter(|n| !n.trim().is_empty())
            .unwrap_or_else(|| FALLBACK_DISPLAY_NAME.to_string());

        debug!(%external_id, "Slack code exchanged");
        Ok(ExternalProfile {
            external_id,
            display_name,
        })
    }
}
