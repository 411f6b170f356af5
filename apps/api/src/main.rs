mod config;
mod errors;
mod feed;
mod matching;
mod models;
mod routes;
mod session;
mod state;

use anyhow::{Context, Result};
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::Config;
use crate::feed::aggregator::BoardsClient;
use crate::feed::source::{HttpJobSource, JobSource};
use crate::feed::JobFeed;
use crate::matching::scoring::{MatchScorer, RuleMatchScorer};
use crate::routes::build_router;
use crate::session::store::{FileStateStore, MemoryStateStore, UserStateStore};
use crate::session::SessionRegistry;
use crate::state::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    // Load configuration first (fails fast on malformed env vars)
    let config = Config::from_env()?;

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!("{}={}", env!("CARGO_PKG_NAME"), &config.rust_log))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting Job-Ting API v{}", env!("CARGO_PKG_VERSION"));

    // Persistence: file-backed when STATE_DIR is set
    let store: Arc<dyn UserStateStore> = match &config.state_dir {
        Some(dir) => {
            info!("Persisting user state under {}", dir.display());
            Arc::new(FileStateStore::new(dir.clone()))
        }
        None => {
            info!("STATE_DIR not set; user state is kept in memory");
            Arc::new(MemoryStateStore::new())
        }
    };

    // Remote feed, with the embedded catalog as fallback
    let remote: Option<Arc<dyn JobSource>> = if config.feed_remote_enabled {
        let source = HttpJobSource::new(
            config.feed_url.clone(),
            config.feed_companies.clone(),
            config.feed_source.clone(),
            config.feed_timeout,
        )
        .context("Failed to build the remote feed client")?;
        info!("Remote feed: {} ({})", config.feed_url, config.feed_companies);
        Some(Arc::new(source))
    } else {
        info!("Remote feed disabled; serving the embedded catalog");
        None
    };
    let feed = Arc::new(JobFeed::new(remote));

    let boards = BoardsClient::new(config.boards_api_url.clone(), config.feed_timeout)
        .context("Failed to build the job-board client")?;

    let scorer: Arc<dyn MatchScorer> = Arc::new(RuleMatchScorer);
    info!("Match scorer: {}", scorer.backend());

    // Build app state
    let state = AppState {
        sessions: Arc::new(SessionRegistry::new(feed, Arc::clone(&store))),
        store,
        scorer,
        boards,
    };

    // Build router
    let app = build_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive());

    let addr: SocketAddr = format!("0.0.0.0:{}", config.port).parse()?;
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
