mod config;
mod data_manager;
mod db;
mod entities;
mod error;
mod flash;
mod models;
mod omdb;
mod routes;
mod templates;

use std::sync::Arc;

use tower_http::trace::TraceLayer;

use crate::{
    config::Config,
    data_manager::{DataManager, SqliteDataManager},
    omdb::OmdbClient,
};

pub struct AppState {
    pub data: Arc<dyn DataManager>,
    pub omdb: Arc<OmdbClient>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            std::env::var("RUST_LOG")
                .unwrap_or_else(|_| "info,moviedex=debug,sqlx=warn".to_string()),
        )
        .init();

    let config = Config::from_env()?;

    let mut http = reqwest::Client::builder().user_agent("moviedex/0.1");
    if let Some(timeout) = config.omdb_timeout {
        http = http.timeout(timeout);
    }
    let http = http.build()?;

    let db = db::connect_and_migrate(&config.database_url).await?;
    let data: Arc<dyn DataManager> = Arc::new(SqliteDataManager::new(db));

    let omdb = OmdbClient::new(http, config.omdb_api_key.clone(), config.omdb_base_url.clone());

    let state = Arc::new(AppState { data, omdb: Arc::new(omdb) });

    let app = routes::router(state).layer(TraceLayer::new_for_http());

    let listener = tokio::net::TcpListener::bind(config.addr).await?;
    tracing::info!(addr = %config.addr, "listening");
    axum::serve(listener, app).await?;

    Ok(())
}
