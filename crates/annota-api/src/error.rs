//! API error mapping.

use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;

/// HTTP-facing error. Provider failures never reach this type; the
/// enrichment pipeline converts them into fallback results upstream.
#[derive(Debug)]
pub enum ApiError {
    Internal(annota_core::Error),
    NotFound(String),
    BadRequest(String),
    Conflict(String),
}

impl From<annota_core::Error> for ApiError {
    fn from(err: annota_core::Error) -> Self {
        use annota_core::Error;
        match &err {
            Error::NoteNotFound(id) => ApiError::NotFound(format!("Note {} not found", id)),
            Error::CategoryNotFound(id) => {
                ApiError::NotFound(format!("Category {} not found", id))
            }
            Error::NotFound(msg) => ApiError::NotFound(msg.clone()),
            Error::InvalidInput(msg) => ApiError::BadRequest(msg.clone()),
            Error::Conflict(msg) => ApiError::Conflict(msg.clone()),
            _ => ApiError::Internal(err),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> axum::response::Response {
        let (status, message) = match self {
            ApiError::Internal(err) => (StatusCode::INTERNAL_SERVER_ERROR, err.to_string()),
            ApiError::NotFound(msg) => (StatusCode::NOT_FOUND, msg),
            ApiError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg),
            ApiError::Conflict(msg) => (StatusCode::CONFLICT, msg),
        };

        let body = Json(serde_json::json!({
            "error": message,
        }));

        (status, body).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use uuid::Uuid;

    #[test]
    fn note_not_found_maps_to_404() {
        let id = Uuid::new_v4();
        let api_err = ApiError::from(annota_core::Error::NoteNotFound(id));
        assert!(matches!(api_err, ApiError::NotFound(_)));
    }

    #[test]
    fn conflict_maps_to_409() {
        let api_err = ApiError::from(annota_core::Error::Conflict("dup".to_string()));
        assert!(matches!(api_err, ApiError::Conflict(_)));
    }

    #[test]
    fn inference_error_is_internal() {
        let api_err = ApiError::from(annota_core::Error::Inference("boom".to_string()));
        assert!(matches!(api_err, ApiError::Internal(_)));
    }
}
