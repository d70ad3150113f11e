use std::{net::SocketAddr, time::Duration};

use anyhow::Context;

#[derive(Clone, Debug)]
pub struct Config {
    pub addr: SocketAddr,
    pub database_url: String,
    pub omdb_api_key: String,
    pub omdb_base_url: String,
    /// Unset means outbound lookups wait for as long as the provider takes.
    pub omdb_timeout: Option<Duration>,
}

impl Config {
    pub fn from_env() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();

        let host = std::env::var("HOST").unwrap_or_else(|_| "0.0.0.0".to_string());
        let port: u16 =
            std::env::var("PORT").unwrap_or_else(|_| "3000".to_string()).parse().context("PORT")?;

        let database_url = std::env::var("DATABASE_URL")
            .unwrap_or_else(|_| "sqlite://movies.sqlite?mode=rwc".to_string());

        let omdb_api_key = std::env::var("OMDB_API_KEY").unwrap_or_default();
        let omdb_base_url = std::env::var("OMDB_BASE_URL")
            .unwrap_or_else(|_| "http://www.omdbapi.com/".to_string());

        let omdb_timeout = match std::env::var("OMDB_TIMEOUT_SECS") {
            Ok(secs) => Some(Duration::from_secs(secs.parse().context("OMDB_TIMEOUT_SECS")?)),
            Err(_) => None,
        };

        Ok(Self {
            addr: format!("{host}:{port}").parse().context("HOST/PORT")?,
            database_url,
            omdb_api_key,
            omdb_base_url,
            omdb_timeout,
        })
    }
}
