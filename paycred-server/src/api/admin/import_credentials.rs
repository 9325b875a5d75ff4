use axum::{Json, extract::State, http::StatusCode, response::IntoResponse};
use paycred_core::importer::{ImportOutcome, MessageCollection};
use paycred_sdk::objects::admin::{
    ImportCredentialsRequest, ImportCredentialsResponse, ImportOutcomeKind,
};

use crate::api::extractors::AdminAuth;
use crate::state::AppState;

use super::AdminApiError;

/// `POST /credentials/import`: import a credentials JSON document.
///
/// Answers `200` when the fields were written and `422` when the payload
/// was rejected or could not be applied; both carry the reported messages.
/// Store and field-encryption failures are `500`.
pub async fn import_credentials(
    State(state): State<AppState>,
    _auth: AdminAuth,
    Json(request): Json<ImportCredentialsRequest>,
) -> Result<impl IntoResponse, AdminApiError> {
    let importer = state.importer().await;
    let scope = request.scope_descriptor();
    let mut messages = MessageCollection::new();

    let result = importer
        .process_credentials_json(&request.credentials_json, &scope, &mut messages)
        .await;

    let (status, outcome, fields_written, enveloped) = match result {
        Ok(ImportOutcome::Applied {
            fields_written,
            enveloped,
        }) => (
            StatusCode::OK,
            ImportOutcomeKind::Applied,
            fields_written,
            enveloped,
        ),
        Ok(ImportOutcome::Rejected) => (
            StatusCode::UNPROCESSABLE_ENTITY,
            ImportOutcomeKind::Rejected,
            0,
            false,
        ),
        Err(e) if e.is_payload_error() => (
            StatusCode::UNPROCESSABLE_ENTITY,
            ImportOutcomeKind::Failed,
            0,
            false,
        ),
        Err(e) => return Err(AdminApiError::Import(e)),
    };

    tracing::info!(%scope, ?outcome, "Admin credentials import finished");

    Ok((
        status,
        Json(ImportCredentialsResponse {
            outcome,
            fields_written,
            enveloped,
            messages: messages.into_errors(),
        }),
    ))
}
