use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use uuid::Uuid;

use crate::puzzle::{GenerateError, RenderError, WordListError};

/// Errors returned by the puzzle API
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error(transparent)]
    InvalidInput(#[from] WordListError),

    #[error(transparent)]
    Generation(#[from] GenerateError),

    #[error("Puzzle {0} not found")]
    NotFound(Uuid),

    #[error(transparent)]
    Render(#[from] RenderError),
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::InvalidInput(_) => StatusCode::BAD_REQUEST,
            ApiError::Generation(_) => StatusCode::UNPROCESSABLE_ENTITY,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::Render(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn code(&self) -> &'static str {
        match self {
            ApiError::InvalidInput(_) => "invalid_input",
            ApiError::Generation(GenerateError::PlacementExhausted { .. }) => "placement_exhausted",
            ApiError::NotFound(_) => "not_found",
            ApiError::Render(_) => "render_failed",
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let mut body = json!({
            "error": self.code(),
            "message": self.to_string(),
        });

        // Tell the client which word to drop or shorten
        if let ApiError::Generation(GenerateError::PlacementExhausted { word, .. }) = &self {
            body["word"] = json!(word);
            body["hint"] = json!("Try fewer words or a bigger grid");
        }

        (self.status(), Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_codes() {
        assert_eq!(
            ApiError::from(WordListError::NoWords).status(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            ApiError::from(GenerateError::PlacementExhausted {
                word: "CAT".to_string(),
                attempts: 100,
            })
            .status(),
            StatusCode::UNPROCESSABLE_ENTITY
        );
        assert_eq!(
            ApiError::NotFound(Uuid::nil()).status(),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            ApiError::from(RenderError::Pixmap {
                width: 0,
                height: 0
            })
            .status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn test_not_found_message() {
        let err = ApiError::NotFound(Uuid::nil());
        assert_eq!(
            err.to_string(),
            "Puzzle 00000000-0000-0000-0000-000000000000 not found"
        );
    }
}
