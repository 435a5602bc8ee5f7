pub mod error;
pub mod health;
pub mod puzzles;

use std::sync::Arc;

use axum::{routing::get, Router};

use crate::AppState;

pub fn create_routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/health", get(health::health_check))
        .nest("/api", api_routes())
}

fn api_routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/grid-sizes", get(puzzles::list_grid_sizes))
        .route("/puzzles", axum::routing::post(puzzles::create_puzzle))
        .route("/puzzles/{puzzle_id}", get(puzzles::get_puzzle))
        .route("/puzzles/{puzzle_id}/export", get(puzzles::export_puzzle))
        .route("/puzzles/{puzzle_id}/svg", get(puzzles::puzzle_svg))
        .route("/puzzles/{puzzle_id}/text", get(puzzles::puzzle_text))
}
