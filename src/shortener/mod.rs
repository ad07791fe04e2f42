//! URL shortener API client.

use tracing::info;

use crate::{
    auth::TokenProvider,
    cache::Cache,
    core::ShortUrl,
    transport::{authorized, AuthorizedClient, AuthorizedClientFactory},
    utils::{check_status, ServerError},
};

pub const DEFAULT_BASE_URL: &str = "https://www.googleapis.com/urlshortener/v1";
pub const DEFAULT_SCOPE: &str = "https://www.googleapis.com/auth/urlshortener";

#[derive(Debug, thiserror::Error)]
pub enum Error<AuthError> {
    #[error("error creating authorized client: {0}")]
    Auth(#[source] authorized::Error<AuthError>),
    #[error("error sending request: {0}")]
    Reqwest(#[from] reqwest::Error),
    #[error("error decoding json body: {0}")]
    Decode(#[from] serde_json::Error),
    #[error("urlshortener API error: {0}")]
    Api(model::ApiError),
    #[error("server: {0}")]
    Server(#[from] ServerError),
}

pub struct Client<Provider, C> {
    pub base_url: String,
    pub scope: String,
    pub authorizer: AuthorizedClientFactory<Provider, C>,
}

impl<Provider, C> Client<Provider, C>
where
    Provider: TokenProvider,
    C: Cache,
{
    pub fn new(authorizer: AuthorizedClientFactory<Provider, C>) -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_owned(),
            scope: DEFAULT_SCOPE.to_owned(),
            authorizer,
        }
    }

    fn build_url(&self, path: &str) -> String {
        format!("{}{}", self.base_url.trim_end_matches('/'), path)
    }

    async fn authorized(&self) -> Result<AuthorizedClient, Error<Provider::Error>> {
        self.authorizer
            .authorized_client(&self.scope)
            .await
            .map_err(Error::Auth)
    }

    pub async fn history(&self) -> Result<model::History, Error<Provider::Error>> {
        let client = self.authorized().await?;
        let res = client.get(&self.build_url("/url/history")).await?;
        let history: model::History = Self::parse_envelope(res).await?;
        info!(message = "urlshortener API response", items = history.items.len());
        Ok(history)
    }

    pub async fn insert(&self, long_url: &str) -> Result<model::Url, Error<Provider::Error>> {
        let client = self.authorized().await?;
        let body = model::InsertRequest { long_url };
        let res = client.post_json(&self.build_url("/url"), &body).await?;
        let url: model::Url = Self::parse_envelope(res).await?;
        info!(message = "urlshortener API response", id = ?url.id, long_url = ?url.long_url);
        Ok(url)
    }

    /// Decodes a response body, surfacing an in-body error before the status.
    async fn parse_envelope<T>(res: reqwest::Response) -> Result<T, Error<Provider::Error>>
    where
        T: for<'de> serde::Deserialize<'de> + model::Envelope,
    {
        let status = res.status();
        let bytes = res.bytes().await?;
        let body: T = serde_json::from_slice(&bytes)?;
        if let Some(err) = body.api_error() {
            return Err(Error::Api(err.clone()));
        }
        check_status(status)?;
        Ok(body)
    }
}

pub mod model {
    use std::fmt;

    use serde::{Deserialize, Serialize};

    pub trait Envelope {
        fn error(&self) -> Option<&ApiError>;

        /// The error payload, if it reports a failure.
        fn api_error(&self) -> Option<&ApiError> {
            self.error().filter(|err| err.code != 0)
        }
    }

    #[derive(Debug, Serialize)]
    #[serde(rename_all = "camelCase")]
    pub struct InsertRequest<'a> {
        pub long_url: &'a str,
    }

    #[derive(Default, Debug, Clone, PartialEq, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct History {
        #[serde(default)]
        pub items: Vec<Url>,
        pub error: Option<ApiError>,
    }

    #[derive(Default, Debug, Clone, PartialEq, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct Url {
        /// Short URL.
        #[serde(default)]
        pub id: String,
        #[serde(default)]
        pub long_url: String,
        pub error: Option<ApiError>,
    }

    #[derive(Default, Debug, Clone, PartialEq, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct ApiError {
        #[serde(default)]
        pub code: i64,
        #[serde(default)]
        pub message: String,
        #[serde(default)]
        pub errors: Vec<ErrorDetail>,
    }

    #[derive(Default, Debug, Clone, PartialEq, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct ErrorDetail {
        #[serde(default)]
        pub reason: String,
        #[serde(default)]
        pub message: String,
        #[serde(default)]
        pub location: String,
    }

    impl fmt::Display for ApiError {
        fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            write!(f, "{} (code {})", self.message, self.code)?;
            for detail in &self.errors {
                write!(f, "; {}: {}", detail.reason, detail.message)?;
                if !detail.location.is_empty() {
                    write!(f, " at {}", detail.location)?;
                }
            }
            Ok(())
        }
    }

    impl Envelope for History {
        fn error(&self) -> Option<&ApiError> {
            self.error.as_ref()
        }
    }

    impl Envelope for Url {
        fn error(&self) -> Option<&ApiError> {
            self.error.as_ref()
        }
    }

    impl From<Url> for crate::core::ShortUrl {
        fn from(val: Url) -> Self {
            Self {
                id: val.id,
                long_url: val.long_url,
            }
        }
    }
}

#[async_trait::async_trait]
impl<Provider, C> crate::core::Shortener for Client<Provider, C>
where
    Provider: TokenProvider,
    <Provider as TokenProvider>::Error: std::error::Error + 'static,
    C: Cache,
{
    async fn history(&self) -> Result<Vec<ShortUrl>, anyhow::Error> {
        let history = self.history().await?;
        Ok(history.items.into_iter().map(Into::into).collect())
    }

    async fn shorten(&self, long_url: &str) -> Result<ShortUrl, anyhow::Error> {
        let url = self.insert(long_url).await?;
        Ok(url.into())
    }
}
