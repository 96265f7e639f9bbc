use std::env;
use std::path::PathBuf;

use anyhow::{Context, Result};

/// Runtime configuration, sourced from the process environment
/// (`.env` honored).
pub struct Config {
    pub host: String,
    pub port: u16,
    pub db_path: PathBuf,
    pub jwt_secret: String,
    pub token_ttl_hours: i64,
    pub tick_secs: u64,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        let host = env::var("ECOCORE_HOST").unwrap_or_else(|_| "0.0.0.0".into());
        let port = env::var("ECOCORE_PORT")
            .unwrap_or_else(|_| "3000".into())
            .parse()
            .context("ECOCORE_PORT must be a port number")?;
        let db_path = env::var("ECOCORE_DB_PATH")
            .unwrap_or_else(|_| "ecocore.db".into())
            .into();
        let jwt_secret =
            env::var("ECOCORE_JWT_SECRET").unwrap_or_else(|_| "dev-secret-change-me".into());
        let token_ttl_hours = env::var("ECOCORE_JWT_EXPIRY_HOURS")
            .unwrap_or_else(|_| "24".into())
            .parse()
            .context("ECOCORE_JWT_EXPIRY_HOURS must be a number of hours")?;
        let tick_secs = env::var("ECOCORE_TICK_SECS")
            .unwrap_or_else(|_| "5".into())
            .parse()
            .context("ECOCORE_TICK_SECS must be a number of seconds")?;

        Ok(Self {
            host,
            port,
            db_path,
            jwt_secret,
            token_ttl_hours,
            tick_secs,
        })
    }
}
