//! Environment-driven settings. `.env` is loaded by the binaries before any of this runs.

use crate::error::ConfigError;
use regex::Regex;
use std::str::FromStr;
use std::sync::LazyLock;
use std::time::Duration;
use tracing::info;

pub const DEFAULT_PORT: u16 = 8080;
pub const DEFAULT_COLLECTION: &str = "contacts";
const DEFAULT_SERVER_SELECTION_TIMEOUT_MS: u64 = 5_000;
const DEFAULT_CONNECT_TIMEOUT_MS: u64 = 10_000;

static USERINFO_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"://.*@").expect("userinfo pattern compiles"));

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreKind {
    Mongo,
    Memory,
}

impl FromStr for StoreKind {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "mongo" | "mongodb" => Ok(StoreKind::Mongo),
            "memory" => Ok(StoreKind::Memory),
            _ => Err(()),
        }
    }
}

#[derive(Debug, Clone)]
pub struct MongoSettings {
    pub uri: String,
    /// Overrides the database named in the URI.
    pub database: Option<String>,
    pub collection: String,
    pub server_selection_timeout: Duration,
    pub connect_timeout: Duration,
}

impl MongoSettings {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let uri = lookup("MONGODB_URI")
            .filter(|s| !s.trim().is_empty())
            .ok_or(ConfigError::Missing("MONGODB_URI"))?;
        let database = lookup("MONGODB_DATABASE").filter(|s| !s.trim().is_empty());
        let collection = lookup("MONGODB_COLLECTION")
            .filter(|s| !s.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_COLLECTION.to_string());
        let server_selection_ms = parse_or(
            &lookup,
            "MONGODB_SERVER_SELECTION_TIMEOUT_MS",
            DEFAULT_SERVER_SELECTION_TIMEOUT_MS,
        )?;
        let connect_ms = parse_or(&lookup, "MONGODB_CONNECT_TIMEOUT_MS", DEFAULT_CONNECT_TIMEOUT_MS)?;
        Ok(Self {
            uri,
            database,
            collection,
            server_selection_timeout: Duration::from_millis(server_selection_ms),
            connect_timeout: Duration::from_millis(connect_ms),
        })
    }

    pub fn redacted_uri(&self) -> String {
        redact_uri(&self.uri)
    }
}

/// Which backend serves the contacts collection.
#[derive(Debug, Clone)]
pub enum StoreConfig {
    Mongo(MongoSettings),
    Memory,
}

impl StoreConfig {
    pub fn kind(&self) -> StoreKind {
        match self {
            StoreConfig::Mongo(_) => StoreKind::Mongo,
            StoreConfig::Memory => StoreKind::Memory,
        }
    }
}

#[derive(Debug, Clone)]
pub struct Config {
    pub port: u16,
    pub store: StoreConfig,
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let port = parse_or(&lookup, "PORT", DEFAULT_PORT)?;
        let kind = match lookup("CONTACTS_STORE") {
            Some(v) => v.parse::<StoreKind>().map_err(|_| ConfigError::Invalid {
                key: "CONTACTS_STORE",
                value: v.clone(),
            })?,
            None => StoreKind::Mongo,
        };
        let store = match kind {
            StoreKind::Mongo => StoreConfig::Mongo(MongoSettings::from_lookup(&lookup)?),
            StoreKind::Memory => StoreConfig::Memory,
        };
        Ok(Self { port, store })
    }
}

fn parse_or<T: FromStr>(
    lookup: &impl Fn(&str) -> Option<String>,
    key: &'static str,
    default: T,
) -> Result<T, ConfigError> {
    match lookup(key) {
        Some(v) => v
            .trim()
            .parse()
            .map_err(|_| ConfigError::Invalid { key, value: v }),
        None => {
            info!("{key} not set, using default");
            Ok(default)
        }
    }
}

/// Hide the userinfo part of a connection string: `scheme://user:pw@host` becomes `scheme://<credentials>@host`.
pub fn redact_uri(uri: &str) -> String {
    USERINFO_RE.replace(uri, "://<credentials>@").into_owned()
}
