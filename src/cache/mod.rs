//! Advisory key/value cache.
//!
//! Nothing stored here is authoritative: a failed read is a miss and a failed
//! write is dropped.

use std::time::Duration;

use tracing::debug;

pub mod memory;

pub use memory::MemoryCache;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("cache backend: {message}")]
    Backend { message: String },
}

#[async_trait::async_trait]
pub trait Cache: Send + Sync {
    /// Returns the value stored under `key`, or `None` on a miss.
    async fn get(&self, key: &str) -> Result<Option<Vec<u8>>, Error>;

    /// Stores `value` under `key` for at most `ttl`.
    async fn set(&self, key: &str, value: Vec<u8>, ttl: Duration) -> Result<(), Error>;
}

#[async_trait::async_trait]
impl<C> Cache for std::sync::Arc<C>
where
    C: Cache + ?Sized,
{
    async fn get(&self, key: &str) -> Result<Option<Vec<u8>>, Error> {
        (**self).get(key).await
    }

    async fn set(&self, key: &str, value: Vec<u8>, ttl: Duration) -> Result<(), Error> {
        (**self).set(key, value, ttl).await
    }
}

/// Wraps a [`Cache`] so that none of its failures reach the caller.
#[derive(Clone)]
pub struct AdvisoryCache<C> {
    inner: C,
}

impl<C> AdvisoryCache<C>
where
    C: Cache,
{
    pub fn new(inner: C) -> Self {
        Self { inner }
    }

    /// Reads a UTF-8 value. Backend errors and undecodable bytes are misses.
    pub async fn lookup(&self, key: &str) -> Option<String> {
        let bytes = match self.inner.get(key).await {
            Ok(bytes) => bytes?,
            Err(err) => {
                debug!(message = "Cache read failed, treating as miss", key, error = %err);
                return None;
            }
        };
        match String::from_utf8(bytes) {
            Ok(value) => Some(value),
            Err(_) => {
                debug!(message = "Cached value is not UTF-8, treating as miss", key);
                None
            }
        }
    }

    /// Best-effort write. The outcome is deliberately not returned.
    pub async fn advise(&self, key: &str, value: &str, ttl: Duration) {
        if let Err(err) = self.inner.set(key, value.as_bytes().to_vec(), ttl).await {
            debug!(message = "Cache write failed, ignoring", key, error = %err);
        }
    }
}
