//! Process configuration, read from environment variables.
//!
//! | Variable | Default | Meaning |
//! |----------|---------|---------|
//! | `BIND_ADDR` | `0.0.0.0:8080` | listen address |
//! | `USE_PERSISTENT_STORES` | `false` | use Postgres instead of the in-memory store |
//! | `DATABASE_URL` | — | required when `USE_PERSISTENT_STORES=true` |
//! | `LOG_FORMAT` | `json` | `json` or `pretty` |
//!
//! `RUST_LOG` is read separately by the tracing subscriber.

use std::net::SocketAddr;

use anyhow::{Context, bail};

use beerstock_observability::LogFormat;

const DEFAULT_BIND_ADDR: &str = "0.0.0.0:8080";

/// Which `BeerStore` backs the ledger.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreBackend {
    InMemory,
    Postgres { database_url: String },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiConfig {
    pub bind_addr: SocketAddr,
    pub store: StoreBackend,
    pub log_format: LogFormat,
}

impl ApiConfig {
    pub fn from_env() -> anyhow::Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build the configuration from an arbitrary key lookup.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> anyhow::Result<Self> {
        let bind_addr = lookup("BIND_ADDR")
            .unwrap_or_else(|| DEFAULT_BIND_ADDR.to_string())
            .parse::<SocketAddr>()
            .context("BIND_ADDR must be a socket address such as 0.0.0.0:8080")?;

        let use_persistent = match lookup("USE_PERSISTENT_STORES") {
            Some(v) => v
                .parse::<bool>()
                .with_context(|| format!("USE_PERSISTENT_STORES must be true or false, got {v:?}"))?,
            None => false,
        };

        let store = if use_persistent {
            match lookup("DATABASE_URL") {
                Some(url) if !url.trim().is_empty() => StoreBackend::Postgres { database_url: url },
                _ => bail!("DATABASE_URL must be set when USE_PERSISTENT_STORES=true"),
            }
        } else {
            StoreBackend::InMemory
        };

        let log_format = match lookup("LOG_FORMAT") {
            Some(v) => v.parse::<LogFormat>().map_err(anyhow::Error::msg)?,
            None => LogFormat::default(),
        };

        Ok(Self {
            bind_addr,
            store,
            log_format,
        })
    }
}
