//! External identity providers used for member login.
//!
//! A provider turns an OAuth authorization code into an [`ExternalProfile`].
//! Only the profile matters to the rest of the service; accounts resolved
//! from a profile always get the `user` role.

mod slack;

pub use slack::SlackProvider;

use async_trait::async_trait;

/// Identity asserted by the provider after a successful code exchange.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExternalProfile {
    /// Stable provider-side user identifier.
    pub external_id: String,
    pub display_name: String,
}

#[derive(Debug, thiserror::Error)]
pub enum ProviderError {
    /// The provider answered but refused the code.
    #[error("Identity provider rejected the login: {0}")]
    Rejected(String),

    #[error("Identity provider request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("Malformed identity provider response: {0}")]
    Malformed(String),

    #[error("Invalid identity provider URL: {0}")]
    InvalidUrl(String),
}

#[async_trait]
pub trait IdentityProvider: Send + Sync {
    /// URL the member's browser is sent to in order to start the login.
    fn authorize_url(&self) -> Result<String, ProviderError>;

    /// Exchange an authorization code for the member's profile.
    async fn exchange_code(&self, code: &str) -> Result<ExternalProfile, ProviderError>;
}
