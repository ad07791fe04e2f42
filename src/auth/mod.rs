//! Access token acquisition.

use std::time::Instant;

pub mod client_credentials;
pub mod metadata;
pub mod token_manager;

pub use token_manager::TokenManager;

/// Identity facility: mints a fresh access token for a scope.
#[async_trait::async_trait]
pub trait TokenProvider: Send + Sync {
    type Token: ExpiringToken;
    type Error: Send + Sync;

    async fn get_auth_token(&self, scope: &str) -> Result<Self::Token, Self::Error>;
}

#[async_trait::async_trait]
impl<P> TokenProvider for std::sync::Arc<P>
where
    P: TokenProvider + ?Sized,
{
    type Token = P::Token;
    type Error = P::Error;

    async fn get_auth_token(&self, scope: &str) -> Result<Self::Token, Self::Error> {
        (**self).get_auth_token(scope).await
    }
}

pub trait Token: Send {
    fn access_token(&self) -> &str;
}

pub trait ExpiringToken: Token {
    fn expires_at(&self) -> Instant;
}

/// Token shape shared by the OAuth-style token endpoints.
#[derive(Debug, serde::Deserialize)]
pub struct AuthResponse {
    access_token: String,
    /// Lifetime of the token in seconds.
    expires_in: u64,
}

#[derive(Debug, Clone)]
pub struct AccessToken {
    pub access_token: String,
    pub expires_at: Instant,
}

impl From<AuthResponse> for AccessToken {
    fn from(auth: AuthResponse) -> Self {
        let AuthResponse {
            access_token,
            expires_in,
        } = auth;
        let expires_in = std::time::Duration::from_secs(expires_in);
        let expires_at = Instant::now() + expires_in;
        Self {
            access_token,
            expires_at,
        }
    }
}

impl Token for AccessToken {
    fn access_token(&self) -> &str {
        self.access_token.as_str()
    }
}

impl ExpiringToken for AccessToken {
    fn expires_at(&self) -> Instant {
        self.expires_at
    }
}
