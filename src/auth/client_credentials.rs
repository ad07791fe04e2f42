//! Authorize using the OAuth 2.0 client credentials flow.

use crate::utils::{check_status, ServerError};

use super::{AccessToken, AuthResponse};

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("reqwest: {0}")]
    Reqwest(#[from] reqwest::Error),
    #[error("server: {0}")]
    Server(#[from] ServerError),
    #[error("encoding form: {0}")]
    Form(#[from] serde_urlencoded::ser::Error),
}

pub struct ClientCredentials {
    pub client: reqwest::Client,
    pub token_url: String,
    pub client_id: String,
    pub client_secret: String,
}

impl ClientCredentials {
    /// Perform the client credentials flow for a single scope.
    pub async fn perform(&self, scope: &str) -> Result<AuthResponse, Error> {
        let params = &[
            ("grant_type", "client_credentials"),
            ("client_id", self.client_id.as_str()),
            ("client_secret", self.client_secret.as_str()),
            ("scope", scope),
        ];
        let params = serde_urlencoded::to_string(params)?;

        let req = self
            .client
            .post(&self.token_url)
            .header("Content-Type", "application/x-www-form-urlencoded")
            .body(params)
            .build()?;

        let res = self.client.execute(req).await?;
        check_status(res.status())?;
        let auth_response = res.json().await?;
        Ok(auth_response)
    }
}

#[async_trait::async_trait]
impl super::TokenProvider for ClientCredentials {
    type Token = AccessToken;
    type Error = Error;

    async fn get_auth_token(&self, scope: &str) -> Result<Self::Token, Self::Error> {
        let auth_response = self.perform(scope).await?;
        Ok(auth_response.into())
    }
}
