//! Environment configuration.

use std::net::SocketAddr;

use crate::{auth::metadata, shortener};

pub const DEFAULT_LISTEN_ADDR: &str = "0.0.0.0:8080";

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("env var {0} is not set")]
    Missing(&'static str),
    #[error("env var {name} has invalid value {value:?}")]
    Invalid { name: &'static str, value: String },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Identity {
    Metadata {
        host: String,
        service_account: String,
    },
    ClientCredentials {
        token_url: String,
        client_id: String,
        client_secret: String,
    },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub listen_addr: SocketAddr,
    pub api_base: String,
    pub scope: String,
    pub identity: Identity,
}

impl Config {
    pub fn from_env() -> Result<Self, Error> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self, Error>
    where
        F: Fn(&str) -> Option<String>,
    {
        let or_default = |key: &str, default: &str| lookup(key).unwrap_or_else(|| default.to_owned());
        let required = |key: &'static str| lookup(key).ok_or(Error::Missing(key));

        let listen_addr = or_default("SHORTEN_LISTEN_ADDR", DEFAULT_LISTEN_ADDR);
        let listen_addr = listen_addr.parse::<SocketAddr>().map_err(|_| Error::Invalid {
            name: "SHORTEN_LISTEN_ADDR",
            value: listen_addr.clone(),
        })?;

        let identity = match or_default("SHORTEN_IDENTITY", "metadata").as_str() {
            "metadata" => Identity::Metadata {
                host: or_default("SHORTEN_METADATA_HOST", metadata::DEFAULT_HOST),
                service_account: or_default("SHORTEN_SERVICE_ACCOUNT", metadata::DEFAULT_ACCOUNT),
            },
            "client-credentials" => Identity::ClientCredentials {
                token_url: required("SHORTEN_TOKEN_URL")?,
                client_id: required("SHORTEN_CLIENT_ID")?,
                client_secret: required("SHORTEN_CLIENT_SECRET")?,
            },
            other => {
                return Err(Error::Invalid {
                    name: "SHORTEN_IDENTITY",
                    value: other.to_owned(),
                })
            }
        };

        Ok(Self {
            listen_addr,
            api_base: or_default("SHORTEN_API_BASE", shortener::DEFAULT_BASE_URL),
            scope: or_default("SHORTEN_SCOPE", shortener::DEFAULT_SCOPE),
            identity,
        })
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn load(vars: &[(&str, &str)]) -> Result<Config, Error> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Config::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn defaults() {
        let config = load(&[]).unwrap();
        assert_eq!(config.listen_addr, "0.0.0.0:8080".parse().unwrap());
        assert_eq!(config.api_base, "https://www.googleapis.com/urlshortener/v1");
        assert_eq!(config.scope, "https://www.googleapis.com/auth/urlshortener");
        assert_eq!(
            config.identity,
            Identity::Metadata {
                host: "http://metadata.google.internal".into(),
                service_account: "default".into(),
            }
        );
    }

    #[test]
    fn client_credentials_requires_secret() {
        let err = load(&[
            ("SHORTEN_IDENTITY", "client-credentials"),
            ("SHORTEN_TOKEN_URL", "https://auth.example/token"),
            ("SHORTEN_CLIENT_ID", "id"),
        ])
        .unwrap_err();
        assert_eq!(err.to_string(), "env var SHORTEN_CLIENT_SECRET is not set");
    }

    #[test]
    fn client_credentials() {
        let config = load(&[
            ("SHORTEN_IDENTITY", "client-credentials"),
            ("SHORTEN_TOKEN_URL", "https://auth.example/token"),
            ("SHORTEN_CLIENT_ID", "id"),
            ("SHORTEN_CLIENT_SECRET", "secret"),
            ("SHORTEN_LISTEN_ADDR", "127.0.0.1:9000"),
        ])
        .unwrap();
        assert_eq!(config.listen_addr.port(), 9000);
        assert_eq!(
            config.identity,
            Identity::ClientCredentials {
                token_url: "https://auth.example/token".into(),
                client_id: "id".into(),
                client_secret: "secret".into(),
            }
        );
    }

    #[test]
    fn rejects_bad_values() {
        assert!(matches!(
            load(&[("SHORTEN_LISTEN_ADDR", "nowhere")]),
            Err(Error::Invalid { name: "SHORTEN_LISTEN_ADDR", .. })
        ));
        assert!(matches!(
            load(&[("SHORTEN_IDENTITY", "kerberos")]),
            Err(Error::Invalid { name: "SHORTEN_IDENTITY", .. })
        ));
    }
}
