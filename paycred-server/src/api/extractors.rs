//! Custom Axum extractors for request authentication.
//!
//! Provides `AdminAuth`, which checks the plaintext secret carried in the
//! `Paycred-Admin-Authorization` header against the argon2 hash from the
//! configuration.

use axum::{
    extract::FromRequestParts,
    http::{StatusCode, request::Parts},
    response::{IntoResponse, Response},
};
use paycred_sdk::ADMIN_AUTH_HEADER;

use crate::state::AppState;

/// Marker extractor: present in a handler's arguments, it rejects requests
/// without a valid admin secret.
pub struct AdminAuth;

/// Errors returned by the [`AdminAuth`] extractor.
#[derive(Debug, thiserror::Error)]
pub enum AdminAuthError {
    #[error("missing Paycred-Admin-Authorization header")]
    MissingHeader,
    #[error("invalid Paycred-Admin-Authorization header")]
    InvalidHeader,
    #[error("admin authentication failed")]
    Unauthorized,
}

impl IntoResponse for AdminAuthError {
    fn into_response(self) -> Response {
        let status = match self {
            AdminAuthError::MissingHeader | AdminAuthError::Unauthorized => StatusCode::UNAUTHORIZED,
            AdminAuthError::InvalidHeader => StatusCode::BAD_REQUEST,
        };
        (status, self.to_string()).into_response()
    }
}

impl FromRequestParts<AppState> for AdminAuth {
    type Rejection = AdminAuthError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let secret = parts
            .headers
            .get(ADMIN_AUTH_HEADER)
            .ok_or(AdminAuthError::MissingHeader)?
            .to_str()
            .map_err(|_| AdminAuthError::InvalidHeader)?;

        let admin = state.admin.read().await;
        let verified = admin.verify_secret(secret);
        drop(admin);

        if !verified {
            tracing::warn!("Rejected admin request with wrong secret");
            return Err(AdminAuthError::Unauthorized);
        }
        Ok(AdminAuth)
    }
}
