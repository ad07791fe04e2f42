//! Authorization header injection.

use std::sync::Arc;

use reqwest::{
    header::{HeaderValue, InvalidHeaderValue, AUTHORIZATION},
    Method,
};
use serde::Serialize;

use crate::{
    auth::{TokenManager, TokenProvider},
    cache::Cache,
};

use super::Transport;

#[derive(Debug, thiserror::Error)]
pub enum Error<AuthError> {
    #[error("token provider: {0}")]
    Token(#[source] AuthError),
    #[error("access token is not a valid header value")]
    InvalidToken(#[from] InvalidHeaderValue),
}

/// Decorates a [`Transport`] with an `Authorization: OAuth <token>` header.
///
/// The token is bound at construction and never refreshed; once it expires
/// the transport keeps sending it.
#[derive(Clone)]
pub struct AuthorizedTransport<T> {
    transport: T,
    authorization: HeaderValue,
}

impl<T> AuthorizedTransport<T>
where
    T: Transport,
{
    pub fn new(transport: T, token: &str) -> Result<Self, InvalidHeaderValue> {
        let mut authorization = HeaderValue::from_str(&format!("OAuth {token}"))?;
        authorization.set_sensitive(true);
        Ok(Self {
            transport,
            authorization,
        })
    }
}

#[async_trait::async_trait]
impl<T> Transport for AuthorizedTransport<T>
where
    T: Transport,
{
    async fn round_trip(
        &self,
        mut request: reqwest::Request,
    ) -> Result<reqwest::Response, reqwest::Error> {
        request
            .headers_mut()
            .insert(AUTHORIZATION, self.authorization.clone());
        self.transport.round_trip(request).await
    }
}

/// HTTP client whose every request carries one bound access token.
pub struct AuthorizedClient {
    client: reqwest::Client,
    transport: AuthorizedTransport<Arc<dyn Transport>>,
}

impl AuthorizedClient {
    /// Starts a request. Send it with [`AuthorizedClient::execute`].
    pub fn request(&self, method: Method, url: &str) -> reqwest::RequestBuilder {
        self.client.request(method, url)
    }

    pub async fn execute(
        &self,
        request: reqwest::Request,
    ) -> Result<reqwest::Response, reqwest::Error> {
        self.transport.round_trip(request).await
    }

    pub async fn get(&self, url: &str) -> Result<reqwest::Response, reqwest::Error> {
        let request = self.request(Method::GET, url).build()?;
        self.execute(request).await
    }

    pub async fn post_json<B>(&self, url: &str, body: &B) -> Result<reqwest::Response, reqwest::Error>
    where
        B: Serialize + ?Sized,
    {
        let request = self.request(Method::POST, url).json(body).build()?;
        self.execute(request).await
    }
}

/// Builds [`AuthorizedClient`]s from tokens handed out by a [`TokenManager`].
pub struct AuthorizedClientFactory<Provider, C> {
    tokens: TokenManager<Provider, C>,
    client: reqwest::Client,
    transport: Arc<dyn Transport>,
}

impl<Provider, C> AuthorizedClientFactory<Provider, C>
where
    Provider: TokenProvider,
    C: Cache,
{
    pub fn new(
        tokens: TokenManager<Provider, C>,
        client: reqwest::Client,
        transport: Arc<dyn Transport>,
    ) -> Self {
        Self {
            tokens,
            client,
            transport,
        }
    }

    pub async fn authorized_client(
        &self,
        scope: &str,
    ) -> Result<AuthorizedClient, Error<Provider::Error>> {
        let token = self.tokens.get_token(scope).await.map_err(Error::Token)?;
        let transport = AuthorizedTransport::new(Arc::clone(&self.transport), &token)?;
        Ok(AuthorizedClient {
            client: self.client.clone(),
            transport,
        })
    }
}
