use std::env;
use std::str::FromStr;

/// Environment variable names - single source of truth
pub mod env_vars {
    pub const PORT: &str = "PORT";
    pub const BIND_ADDRESS: &str = "BIND_ADDRESS";
    /// Path of the SQLite file backing the notes collection
    pub const DATABASE_URL: &str = "DATABASE_URL";
    /// Upper bound on pooled SQLite connections
    pub const DB_POOL_SIZE: &str = "DB_POOL_SIZE";
}

/// Default values
pub mod defaults {
    pub const PORT: u16 = 8080;
    pub const BIND_ADDRESS: &str = "0.0.0.0";
    pub const DATABASE_URL: &str = "./.db/notes.db";
    pub const DB_POOL_SIZE: u32 = 8;
}

#[derive(Clone, Debug)]
pub struct Config {
    pub port: u16,
    pub bind_address: String,
    pub database_url: String,
    pub db_pool_size: u32,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            port: defaults::PORT,
            bind_address: defaults::BIND_ADDRESS.to_string(),
            database_url: defaults::DATABASE_URL.to_string(),
            db_pool_size: defaults::DB_POOL_SIZE,
        }
    }
}

impl Config {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build a config from an arbitrary key lookup. Unset keys take their
    /// default; unparsable numbers log a warning and take their default.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let pool_size = parse_or_default(
            env_vars::DB_POOL_SIZE,
            lookup(env_vars::DB_POOL_SIZE),
            defaults::DB_POOL_SIZE,
        );

        Self {
            port: parse_or_default(env_vars::PORT, lookup(env_vars::PORT), defaults::PORT),
            bind_address: lookup(env_vars::BIND_ADDRESS)
                .filter(|s| !s.trim().is_empty())
                .unwrap_or_else(|| defaults::BIND_ADDRESS.to_string()),
            database_url: lookup(env_vars::DATABASE_URL)
                .filter(|s| !s.trim().is_empty())
                .unwrap_or_else(|| defaults::DATABASE_URL.to_string()),
            // r2d2 rejects an empty pool
            db_pool_size: pool_size.max(1),
        }
    }
}

fn parse_or_default<T: FromStr + Copy + std::fmt::Display>(
    name: &str,
    raw: Option<String>,
    default: T,
) -> T {
    match raw {
        Some(value) => value.trim().parse().unwrap_or_else(|_| {
            log::warn!(
                "{} must be a valid number (got {:?}), using default {}",
                name,
                value,
                default
            );
            default
        }),
        None => default,
    }
}
