//! Process settings, layered: built-in defaults, then an optional
//! `config.toml`, then environment variables.
//!
//! Environment keys use the `NOTELY_` prefix and `__` between sections, e.g.
//! `NOTELY_AUTH__SECRET` or `NOTELY_AUTH__TOKEN_TTL_SECS`. The conventional
//! `DATABASE_URL` and `PORT` variables are honored as well and win over
//! everything else.

use std::env;

use anyhow::bail;
use api::HasherConfig;
use config::builder::DefaultState;
use config::{Config, ConfigBuilder, ConfigError, Environment, File, FileFormat};
use serde::Deserialize;

const THIRTY_DAYS_SECS: i64 = 30 * 24 * 60 * 60;

#[derive(Debug, Clone, Copy, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Backend {
    Memory,
    Postgres,
}

#[derive(Debug, Deserialize)]
pub struct Server {
    pub host: String,
    pub port: u16,
}

impl Server {
    pub fn address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

#[derive(Debug, Deserialize)]
pub struct Database {
    pub backend: Backend,
    pub url: String,
    pub max_connections: u32,
}

#[derive(Debug, Deserialize)]
pub struct Auth {
    pub secret: String,
    pub token_ttl_secs: i64,
    pub argon2_m_cost: u32,
    pub argon2_t_cost: u32,
    pub argon2_p_cost: u32,
}

impl Auth {
    pub fn token_ttl(&self) -> chrono::Duration {
        chrono::Duration::seconds(self.token_ttl_secs)
    }

    pub fn hasher_config(&self) -> HasherConfig {
        HasherConfig {
            m_cost: self.argon2_m_cost,
            t_cost: self.argon2_t_cost,
            p_cost: self.argon2_p_cost,
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct Settings {
    pub server: Server,
    pub database: Database,
    pub auth: Auth,
}

impl Settings {
    pub fn new() -> Result<Self, ConfigError> {
        Self::defaults()?
            .add_source(
                File::with_name("config.toml")
                    .format(FileFormat::Toml)
                    .required(false),
            )
            .add_source(environment())
            .set_override_option("database.url", env::var("DATABASE_URL").ok())?
            .set_override_option("server.port", env::var("PORT").ok())?
            .build()?
            .try_deserialize()
    }

    fn defaults() -> Result<ConfigBuilder<DefaultState>, ConfigError> {
        let hasher = HasherConfig::default();
        Config::builder()
            .set_default("server.host", "127.0.0.1")?
            .set_default("server.port", 5000)?
            .set_default("database.backend", "memory")?
            .set_default("database.url", "")?
            .set_default("database.max_connections", 5)?
            .set_default("auth.secret", "")?
            .set_default("auth.token_ttl_secs", THIRTY_DAYS_SECS)?
            .set_default("auth.argon2_m_cost", i64::from(hasher.m_cost))?
            .set_default("auth.argon2_t_cost", i64::from(hasher.t_cost))?
            .set_default("auth.argon2_p_cost", i64::from(hasher.p_cost))
    }

    /// Reject settings the server cannot start with.
    pub fn validate(&self) -> anyhow::Result<()> {
        if self.auth.secret.trim().is_empty() {
            bail!("auth.secret is not set (NOTELY_AUTH__SECRET)");
        }
        if self.auth.token_ttl_secs <= 0 {
            bail!("auth.token_ttl_secs must be positive");
        }
        if self.database.backend == Backend::Postgres && self.database.url.is_empty() {
            bail!("database.url is required for the postgres backend (DATABASE_URL)");
        }
        Ok(())
    }
}

fn environment() -> Environment {
    Environment::with_prefix("NOTELY")
        .prefix_separator("_")
        .separator("__")
        .try_parsing(true)
}
