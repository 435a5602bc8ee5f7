use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::{header, StatusCode},
    response::IntoResponse,
    Json,
};
use chrono::{DateTime, Utc};
use rand::{rngs::StdRng, Rng, SeedableRng};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{
    models::{GridSize, Placement, PuzzleSettings},
    puzzle::{render_png, render_svg, render_text, PlacementEngine, WordList, EXPORT_FILENAME},
    routes::error::ApiError,
    AppState, StoredPuzzle,
};

#[derive(Debug, Deserialize)]
pub struct GeneratePuzzleRequest {
    pub words: Vec<String>,
    /// Falls back to the configured defaults when omitted
    pub size: Option<GridSize>,
    pub allow_diagonal: Option<bool>,
    pub allow_backwards: Option<bool>,
    /// Reuse a seed from an earlier response to get the same grid again
    pub seed: Option<u64>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct PuzzleResponse {
    pub puzzle_id: Uuid,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub seed: Option<u64>,
    pub size: GridSize,
    pub side: usize,
    /// One string per grid row
    pub grid: Vec<String>,
    pub words: Vec<String>,
    pub placements: Vec<Placement>,
    pub created_at: DateTime<Utc>,
}

impl From<&StoredPuzzle> for PuzzleResponse {
    fn from(stored: &StoredPuzzle) -> Self {
        Self {
            puzzle_id: stored.puzzle_id,
            seed: stored.seed,
            size: stored.puzzle.size,
            side: stored.puzzle.side(),
            grid: stored.puzzle.rows(),
            words: stored.puzzle.words.clone(),
            placements: stored.puzzle.placements.clone(),
            created_at: stored.created_at,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct GridSizeInfo {
    pub size: GridSize,
    pub side: usize,
    pub max_word_length: usize,
}

/// List the grid sizes a client can pick from
pub async fn list_grid_sizes() -> Json<Vec<GridSizeInfo>> {
    Json(
        GridSize::ALL
            .into_iter()
            .map(|size| GridSizeInfo {
                size,
                side: size.side(),
                max_word_length: size.max_word_len(),
            })
            .collect(),
    )
}

/// Validate the word list, run the placement engine and keep the result
pub async fn create_puzzle(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<GeneratePuzzleRequest>,
) -> Result<(StatusCode, Json<PuzzleResponse>), ApiError> {
    let defaults = state.config.puzzle.default_settings;
    let settings = PuzzleSettings {
        size: payload.size.unwrap_or(defaults.size),
        allow_diagonal: payload.allow_diagonal.unwrap_or(defaults.allow_diagonal),
        allow_backwards: payload.allow_backwards.unwrap_or(defaults.allow_backwards),
    };

    let words = WordList::from_words(&payload.words, settings.size).map_err(|e| {
        tracing::warn!("Rejected word list: {}", e);
        e
    })?;

    let seed = payload.seed.unwrap_or_else(|| rand::rng().random());
    let mut rng = StdRng::seed_from_u64(seed);

    tracing::info!(
        "Generating {}x{} puzzle with {} words (seed {})",
        settings.size.side(),
        settings.size.side(),
        words.len(),
        seed
    );

    let puzzle = PlacementEngine::new(settings)
        .with_attempts(state.config.puzzle.attempts_per_word)
        .generate(words.words(), &mut rng)
        .map_err(|e| {
            tracing::warn!("Puzzle generation failed: {}", e);
            e
        })?;

    let stored = state.store_puzzle(Arc::new(puzzle), Some(seed));
    tracing::info!("Stored puzzle {}", stored.puzzle_id);

    Ok((StatusCode::CREATED, Json(PuzzleResponse::from(&stored))))
}

pub async fn get_puzzle(
    State(state): State<Arc<AppState>>,
    Path(puzzle_id): Path<Uuid>,
) -> Result<Json<PuzzleResponse>, ApiError> {
    let stored = state
        .get_puzzle(&puzzle_id)
        .ok_or(ApiError::NotFound(puzzle_id))?;
    Ok(Json(PuzzleResponse::from(&stored)))
}

/// Download the finished puzzle as a PNG image
pub async fn export_puzzle(
    State(state): State<Arc<AppState>>,
    Path(puzzle_id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    let stored = state
        .get_puzzle(&puzzle_id)
        .ok_or(ApiError::NotFound(puzzle_id))?;

    tracing::debug!("Exporting puzzle {}", puzzle_id);

    let png = render_png(&stored.puzzle).map_err(|e| {
        tracing::error!("Failed to render puzzle {}: {}", puzzle_id, e);
        e
    })?;

    Ok((
        [
            (header::CONTENT_TYPE, "image/png".to_string()),
            (
                header::CONTENT_DISPOSITION,
                format!("attachment; filename=\"{}\"", EXPORT_FILENAME),
            ),
        ],
        png,
    ))
}

pub async fn puzzle_svg(
    State(state): State<Arc<AppState>>,
    Path(puzzle_id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    let stored = state
        .get_puzzle(&puzzle_id)
        .ok_or(ApiError::NotFound(puzzle_id))?;

    Ok((
        [(header::CONTENT_TYPE, "image/svg+xml")],
        render_svg(&stored.puzzle),
    ))
}

pub async fn puzzle_text(
    State(state): State<Arc<AppState>>,
    Path(puzzle_id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    let stored = state
        .get_puzzle(&puzzle_id)
        .ok_or(ApiError::NotFound(puzzle_id))?;

    Ok((
        [(header::CONTENT_TYPE, "text/plain; charset=utf-8")],
        render_text(&stored.puzzle),
    ))
}
