//! Admin API handlers.
//!
//! These endpoints require the `Paycred-Admin-Authorization` header with
//! the plaintext admin secret.
//!
//! # Endpoints
//!
//! - `POST /credentials/import` – import a credentials JSON document into a scope

use axum::{Router, http::StatusCode, response::IntoResponse, routing::post};
use paycred_core::importer::ImportError;

use crate::state::AppState;

mod import_credentials;

/// Build the Admin API router.
pub fn router() -> Router<AppState> {
    Router::new().route(
        "/credentials/import",
        post(import_credentials::import_credentials),
    )
}

// ---------------------------------------------------------------------------
// Shared error type
// ---------------------------------------------------------------------------

/// Errors that can occur in Admin API handlers.
#[derive(Debug)]
pub(crate) enum AdminApiError {
    Import(ImportError),
}

impl IntoResponse for AdminApiError {
    fn into_response(self) -> axum::response::Response {
        match self {
            AdminApiError::Import(e) => {
                tracing::error!(error = %e, "Admin API import error");
                (StatusCode::INTERNAL_SERVER_ERROR, "internal server error").into_response()
            }
        }
    }
}
