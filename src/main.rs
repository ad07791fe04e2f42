use std::sync::Arc;

use anyhow::Context as _;
use shorten::{
    api,
    auth::{client_credentials::ClientCredentials, metadata::MetadataServer, TokenManager},
    cache::MemoryCache,
    config::{Config, Identity},
    core::Core,
    shortener,
    transport::{AuthorizedClientFactory, ReqwestTransport, Transport},
};
use tracing::info;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let config = Config::from_env().context("loading configuration")?;

    let reqwest_client = reqwest::Client::builder()
        .build()
        .context("building http client")?;
    let transport: Arc<dyn Transport> = Arc::new(ReqwestTransport::new(reqwest_client.clone()));
    let cache = MemoryCache::new();

    let core = match config.identity {
        Identity::Metadata {
            host,
            service_account,
        } => {
            let identity = MetadataServer {
                host,
                service_account,
                ..MetadataServer::new(reqwest_client.clone())
            };
            let tokens = TokenManager::new(identity, cache);
            let authorizer = AuthorizedClientFactory::new(tokens, reqwest_client, transport);
            Core::new(shortener::Client {
                base_url: config.api_base,
                scope: config.scope,
                ..shortener::Client::new(authorizer)
            })
        }
        Identity::ClientCredentials {
            token_url,
            client_id,
            client_secret,
        } => {
            let identity = ClientCredentials {
                client: reqwest_client.clone(),
                token_url,
                client_id,
                client_secret,
            };
            let tokens = TokenManager::new(identity, cache);
            let authorizer = AuthorizedClientFactory::new(tokens, reqwest_client, transport);
            Core::new(shortener::Client {
                base_url: config.api_base,
                scope: config.scope,
                ..shortener::Client::new(authorizer)
            })
        }
    };

    let app = api::http::router(Arc::new(core));

    let listener = tokio::net::TcpListener::bind(config.listen_addr)
        .await
        .with_context(|| format!("binding {}", config.listen_addr))?;

    info!(message = "Listening", addr = %config.listen_addr);

    axum::serve(listener, app).await.context("serving http")?;
    Ok(())
}
