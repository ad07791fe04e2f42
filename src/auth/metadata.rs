//! Platform identity through the compute metadata service.

use crate::utils::{check_status, ServerError};

use super::{AccessToken, AuthResponse};

pub const DEFAULT_HOST: &str = "http://metadata.google.internal";
pub const DEFAULT_ACCOUNT: &str = "default";

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("reqwest: {0}")]
    Reqwest(#[from] reqwest::Error),
    #[error("server: {0}")]
    Server(#[from] ServerError),
}

/// Mints tokens for the service account attached to the running instance.
pub struct MetadataServer {
    pub client: reqwest::Client,
    pub host: String,
    pub service_account: String,
}

impl MetadataServer {
    pub fn new(client: reqwest::Client) -> Self {
        Self {
            client,
            host: DEFAULT_HOST.to_owned(),
            service_account: DEFAULT_ACCOUNT.to_owned(),
        }
    }

    fn token_url(&self) -> String {
        format!(
            "{host}/computeMetadata/v1/instance/service-accounts/{account}/token",
            host = self.host.trim_end_matches('/'),
            account = self.service_account,
        )
    }

    pub async fn fetch(&self, scope: &str) -> Result<AuthResponse, Error> {
        let req = self
            .client
            .get(self.token_url())
            .header("Metadata-Flavor", "Google")
            .query(&[("scopes", scope)])
            .build()?;

        let res = self.client.execute(req).await?;
        check_status(res.status())?;
        let auth_response = res.json().await?;
        Ok(auth_response)
    }
}

#[async_trait::async_trait]
impl super::TokenProvider for MetadataServer {
    type Token = AccessToken;
    type Error = Error;

    async fn get_auth_token(&self, scope: &str) -> Result<Self::Token, Self::Error> {
        let auth_response = self.fetch(scope).await?;
        Ok(auth_response.into())
    }
}
