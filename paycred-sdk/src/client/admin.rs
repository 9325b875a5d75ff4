//! Admin API client (admin tooling → paycred server).
//!
//! All requests carry the plaintext admin secret in the
//! `Paycred-Admin-Authorization` header.

use reqwest::{Client, StatusCode};
use url::Url;

use super::ClientError;
use crate::ADMIN_AUTH_HEADER;
use crate::objects::admin::{ImportCredentialsRequest, ImportCredentialsResponse};

/// Typed HTTP client for the paycred **Admin API**.
#[derive(Debug, Clone)]
pub struct AdminClient {
    http: Client,
    base_url: Url,
    admin_secret: String,
}

impl AdminClient {
    /// Create a new `AdminClient`.
    ///
    /// * `base_url` – root URL of the paycred server.
    /// * `admin_secret` – the plaintext admin secret.
    pub fn new(base_url: Url, admin_secret: impl Into<String>) -> Self {
        Self {
            http: Client::new(),
            base_url,
            admin_secret: admin_secret.into(),
        }
    }

    /// Replace the default `reqwest::Client` with a custom one.
    pub fn with_http_client(mut self, client: Client) -> Self {
        self.http = client;
        self
    }

    /// `POST /api/v1/admin/credentials/import` – import a credentials JSON
    /// document into the given scope.
    ///
    /// A rejected or unappliable payload is answered with
    /// `422 Unprocessable Entity` and a regular response body; that case is
    /// returned as `Ok` so the caller can show the messages.
    pub async fn import_credentials(
        &self,
        request: &ImportCredentialsRequest,
    ) -> Result<ImportCredentialsResponse, ClientError> {
        let url = self.base_url.join("/api/v1/admin/credentials/import")?;

        let resp = self
            .http
            .post(url)
            .header(ADMIN_AUTH_HEADER, &self.admin_secret)
            .json(request)
            .send()
            .await?;

        let status = resp.status();
        if status.is_success() || status == StatusCode::UNPROCESSABLE_ENTITY {
            let bytes = resp.bytes().await?;
            return serde_json::from_slice(&bytes).map_err(ClientError::Json);
        }

        let body = resp.text().await.unwrap_or_default();
        Err(ClientError::Api { status, body })
    }
}
