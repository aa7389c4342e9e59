//! PostgreSQL pool construction shared by Hoot services.
//!
//! `DbConfig::from_env` reads `DATABASE_URL` plus optional `DB_*` tuning
//! variables; `create_pool` connects and proves the pool with one query.

pub mod env_utils;

use env_utils::{parse_env_required, parse_env_with_default};
use sqlx::postgres::{PgPool, PgPoolOptions};
use std::fmt;
use std::time::Duration;
use tracing::{error, info};

#[derive(Clone)]
pub struct DbConfig {
    /// Label attached to pool log lines
    pub service_name: String,
    pub database_url: String,
    pub max_connections: u32,
    pub min_connections: u32,
    /// Bound on the startup `SELECT 1`
    pub connect_timeout_secs: u64,
    pub acquire_timeout_secs: u64,
    pub idle_timeout_secs: u64,
    pub max_lifetime_secs: u64,
}

// Credentials live in the URL
impl fmt::Debug for DbConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DbConfig")
            .field("service_name", &self.service_name)
            .field("database_url", &"[REDACTED]")
            .field("max_connections", &self.max_connections)
            .field("min_connections", &self.min_connections)
            .field("connect_timeout_secs", &self.connect_timeout_secs)
            .field("acquire_timeout_secs", &self.acquire_timeout_secs)
            .field("idle_timeout_secs", &self.idle_timeout_secs)
            .field("max_lifetime_secs", &self.max_lifetime_secs)
            .finish()
    }
}

impl Default for DbConfig {
    fn default() -> Self {
        Self {
            service_name: "unknown".to_string(),
            database_url: String::new(),
            max_connections: 10,
            min_connections: 2,
            connect_timeout_secs: 5,
            acquire_timeout_secs: 10,
            idle_timeout_secs: 600,
            max_lifetime_secs: 1800,
        }
    }
}

impl DbConfig {
    /// Fails only when `DATABASE_URL` is missing; unparsable tuning values
    /// fall back to the defaults.
    pub fn from_env(service_name: &str) -> Result<Self, String> {
        let base = Self::default();

        Ok(Self {
            service_name: service_name.to_string(),
            database_url: parse_env_required("DATABASE_URL")?,
            max_connections: parse_env_with_default("DB_MAX_CONNECTIONS", base.max_connections),
            min_connections: parse_env_with_default("DB_MIN_CONNECTIONS", base.min_connections),
            connect_timeout_secs: parse_env_with_default(
                "DB_CONNECT_TIMEOUT_SECS",
                base.connect_timeout_secs,
            ),
            acquire_timeout_secs: parse_env_with_default(
                "DB_ACQUIRE_TIMEOUT_SECS",
                base.acquire_timeout_secs,
            ),
            idle_timeout_secs: parse_env_with_default("DB_IDLE_TIMEOUT_SECS", base.idle_timeout_secs),
            max_lifetime_secs: parse_env_with_default("DB_MAX_LIFETIME_SECS", base.max_lifetime_secs),
        })
    }

    pub fn log_config(&self) {
        info!(
            service = %self.service_name,
            max_connections = self.max_connections,
            min_connections = self.min_connections,
            acquire_timeout_secs = self.acquire_timeout_secs,
            idle_timeout_secs = self.idle_timeout_secs,
            max_lifetime_secs = self.max_lifetime_secs,
            "database pool settings"
        );
    }
}

/// Connect and run `SELECT 1` within `connect_timeout_secs`
pub async fn create_pool(config: DbConfig) -> Result<PgPool, sqlx::Error> {
    let pool = PgPoolOptions::new()
        .max_connections(config.max_connections)
        .min_connections(config.min_connections)
        .acquire_timeout(Duration::from_secs(config.acquire_timeout_secs))
        .idle_timeout(Duration::from_secs(config.idle_timeout_secs))
        .max_lifetime(Duration::from_secs(config.max_lifetime_secs))
        .test_before_acquire(true)
        .connect(&config.database_url)
        .await?;

    let probe = tokio::time::timeout(
        Duration::from_secs(config.connect_timeout_secs),
        sqlx::query("SELECT 1").execute(&pool),
    )
    .await;

    match probe {
        Ok(Ok(_)) => {
            info!(service = %config.service_name, "database pool ready");
            Ok(pool)
        }
        Ok(Err(e)) => {
            error!(service = %config.service_name, error = %e, "database probe failed");
            Err(e)
        }
        Err(_) => {
            error!(
                service = %config.service_name,
                timeout_secs = config.connect_timeout_secs,
                "database probe timed out"
            );
            Err(sqlx::Error::PoolTimedOut)
        }
    }
}
