mod config;
mod models;
mod puzzle;
mod routes;
mod utils;
mod websocket;

use std::{
    sync::Arc,
    time::{Duration, Instant},
};

use anyhow::{Context, Result};
use axum::{routing::get, Router};
use chrono::{DateTime, Utc};
use config::Config;
use dashmap::DashMap;
use models::Puzzle;
use tower_http::{
    cors::{Any, CorsLayer},
    services::ServeDir,
    trace::TraceLayer,
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use uuid::Uuid;

/// How often the background task looks for expired puzzles
pub const PUZZLE_CLEANUP_INTERVAL: Duration = Duration::from_secs(60);

/// A finished puzzle kept around so it can be fetched or exported
#[derive(Debug, Clone)]
pub struct StoredPuzzle {
    pub puzzle_id: Uuid,
    /// Seed that reproduces the puzzle, when it was generated from one
    pub seed: Option<u64>,
    pub puzzle: Arc<Puzzle>,
    pub created_at: DateTime<Utc>,
    /// Monotonic timestamp used for expiry
    pub stored_at: Instant,
}

/// Application state shared across all handlers
pub struct AppState {
    pub config: Config,
    /// Generated puzzles keyed by puzzle_id; read-only once inserted
    pub puzzles: DashMap<Uuid, StoredPuzzle>,
}

impl AppState {
    pub fn new(config: Config) -> Self {
        Self {
            config,
            puzzles: DashMap::new(),
        }
    }

    /// Keep a finished puzzle for later export and return its id
    pub fn store_puzzle(&self, puzzle: Arc<Puzzle>, seed: Option<u64>) -> StoredPuzzle {
        let stored = StoredPuzzle {
            puzzle_id: Uuid::new_v4(),
            seed,
            puzzle,
            created_at: Utc::now(),
            stored_at: Instant::now(),
        };
        self.puzzles.insert(stored.puzzle_id, stored.clone());
        stored
    }

    pub fn get_puzzle(&self, puzzle_id: &Uuid) -> Option<StoredPuzzle> {
        self.puzzles.get(puzzle_id).map(|entry| entry.value().clone())
    }

    pub fn puzzle_ttl(&self) -> Duration {
        Duration::from_secs(self.config.puzzle.puzzle_ttl_secs)
    }

    /// Drop puzzles stored longer than `ttl` before `now`; returns how many went
    pub fn prune_expired_puzzles(&self, now: Instant, ttl: Duration) -> usize {
        let before = self.puzzles.len();
        self.puzzles
            .retain(|_, stored| now.saturating_duration_since(stored.stored_at) <= ttl);
        before - self.puzzles.len()
    }
}

pub fn build_router(state: Arc<AppState>) -> Router {
    // Configure CORS
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    // Serve frontend static files
    let frontend_service = ServeDir::new(&state.config.server.static_dir);

    Router::new()
        // WebSocket endpoint
        .route("/ws", get(websocket::handle_websocket))
        // API routes
        .merge(routes::create_routes())
        .fallback_service(frontend_service)
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "word_search_backend=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("Starting word search backend server...");

    // Load configuration
    let config = Config::from_env()?;
    tracing::info!(
        "Configuration loaded (default grid: {}, diagonal: {}, backwards: {}, attempts per word: {})",
        config.puzzle.default_settings.size.label(),
        config.puzzle.default_settings.allow_diagonal,
        config.puzzle.default_settings.allow_backwards,
        config.puzzle.attempts_per_word
    );

    let addr = config.server_addr();
    let state = Arc::new(AppState::new(config));

    // Spawn background task to forget old puzzles
    let cleanup_state = state.clone();
    tokio::spawn(async move {
        puzzle_cleanup_task(cleanup_state).await;
    });

    let app = build_router(state);

    // Start server
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("failed to bind {}", addr))?;

    tracing::info!("Server listening on {}", addr);
    tracing::info!("WebSocket endpoint: ws://{}/ws", addr);
    tracing::info!("Health check: http://{}/health", addr);

    axum::serve(listener, app).await?;

    Ok(())
}

/// Background task that periodically evicts puzzles past their TTL
async fn puzzle_cleanup_task(state: Arc<AppState>) {
    let mut interval = tokio::time::interval(PUZZLE_CLEANUP_INTERVAL);

    loop {
        interval.tick().await;

        let removed = state.prune_expired_puzzles(Instant::now(), state.puzzle_ttl());
        if removed > 0 {
            tracing::info!(
                "Removed {} expired puzzle(s), {} still stored",
                removed,
                state.puzzles.len()
            );
        }
    }
}
