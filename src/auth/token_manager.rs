use std::time::Instant;

use tracing::{debug, info};

use crate::cache::{AdvisoryCache, Cache};

use super::{ExpiringToken, Token, TokenProvider};

/// Hands out access tokens, consulting the advisory cache before the identity
/// facility. Entries are keyed by scope.
pub struct TokenManager<Provider, C> {
    provider: Provider,
    cache: AdvisoryCache<C>,
}

impl<Provider, C> TokenManager<Provider, C>
where
    Provider: TokenProvider,
    C: Cache,
{
    pub fn new(provider: Provider, cache: C) -> Self {
        Self {
            provider,
            cache: AdvisoryCache::new(cache),
        }
    }

    /// Returns a token for `scope`. Errors from the identity facility are
    /// passed through untouched; cache failures never surface.
    pub async fn get_token(&self, scope: &str) -> Result<String, Provider::Error> {
        if let Some(token) = self.cache.lookup(scope).await {
            debug!(message = "Using cached token", scope);
            return Ok(token);
        }

        info!(message = "No cached token found, about to get a new one", scope);

        let token = self.provider.get_auth_token(scope).await?;
        let expires_at = token.expires_at();

        match expires_at.checked_duration_since(Instant::now()) {
            Some(ttl) if !ttl.is_zero() => {
                self.cache.advise(scope, token.access_token(), ttl).await;
            }
            _ => debug!(message = "Fresh token already expired, not caching", scope),
        }

        debug!(message = "Got new token", scope, token_expires_at = ?expires_at);

        Ok(token.access_token().to_owned())
    }
}
