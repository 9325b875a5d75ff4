//! Axum server setup and router configuration.

use crate::api;
use crate::shutdown::shutdown_signal;
use crate::state::AppState;
use axum::{Json, Router, response::IntoResponse, routing::get};
use serde::Serialize;
use std::net::SocketAddr;
use tokio::net::TcpListener;

/// Build the main application router.
pub fn build_router(state: AppState) -> Router {
    Router::new()
        // Health check endpoint
        .route("/health", get(health_check))
        .nest("/api/v1/admin", api::admin::router())
        .with_state(state)
}

/// Health check response.
#[derive(Serialize)]
struct HealthResponse {
    status: &'static str,
    version: &'static str,
}

/// Simple health check - returns OK if the server is running.
async fn health_check() -> impl IntoResponse {
    Json(HealthResponse {
        status: "healthy",
        version: env!("CARGO_PKG_VERSION"),
    })
}

/// Run the server with graceful shutdown support.
pub async fn run_server(router: Router, addr: SocketAddr) -> Result<(), std::io::Error> {
    let listener = TcpListener::bind(addr).await?;
    tracing::info!("Server listening on {}", addr);

    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::LoadedConfig;
    use crate::config::hash_secret;
    use crate::config::runtime::{AdminConfig, CredentialsConfig, EncryptionConfig, ServerConfig};
    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use paycred_core::importer::AeadEncryptor;
    use paycred_core::store::MemoryConfigStore;
    use paycred_core::{ConfigScope, ScopeDescriptor};
    use paycred_sdk::ADMIN_AUTH_HEADER;
    use paycred_sdk::crypto::{SecretKey, seal_envelope};
    use paycred_sdk::objects::admin::{
        ImportCredentialsRequest, ImportCredentialsResponse, ImportOutcomeKind,
    };
    use std::sync::Arc;
    use tower::ServiceExt;

    const ADMIN_SECRET: &str = "admin-secret";

    struct Harness {
        router: Router,
        store: MemoryConfigStore,
        config: LoadedConfig,
    }

    fn harness() -> Harness {
        let config = LoadedConfig {
            server: ServerConfig {
                listen: "127.0.0.1:0".parse().unwrap(),
            },
            admin: AdminConfig::new(hash_secret(ADMIN_SECRET).unwrap()),
            credentials: CredentialsConfig {
                fields: vec!["merchant_id".to_string(), "secret_key".to_string()],
                encrypted_fields: vec!["secret_key".to_string()],
            },
            encryption: EncryptionConfig {
                key_version: 1,
                key: SecretKey::generate().unwrap(),
                envelope_key: SecretKey::generate().unwrap(),
            },
        };
        let store = MemoryConfigStore::new();
        let state = AppState::new(Arc::new(store.clone()), &config).unwrap();
        Harness {
            router: build_router(state),
            store,
            config,
        }
    }

    fn import_request(secret: Option<&str>, credentials_json: &str) -> Request<Body> {
        let body = serde_json::to_vec(&ImportCredentialsRequest {
            scope: ConfigScope::Websites,
            scope_id: 1,
            credentials_json: credentials_json.to_string(),
        })
        .unwrap();
        let mut builder = Request::post("/api/v1/admin/credentials/import")
            .header("content-type", "application/json");
        if let Some(secret) = secret {
            builder = builder.header(ADMIN_AUTH_HEADER, secret);
        }
        builder.body(Body::from(body)).unwrap()
    }

    async fn read_response(response: axum::response::Response) -> ImportCredentialsResponse {
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    fn website() -> ScopeDescriptor {
        ScopeDescriptor::new(ConfigScope::Websites, 1)
    }

    #[tokio::test]
    async fn test_health_check() {
        let h = harness();
        let response = h
            .router
            .oneshot(Request::get("/health").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn test_import_requires_admin_secret() {
        let h = harness();
        let payload = r#"{"merchant_id":"M1","secret_key":"s"}"#;

        let missing = h
            .router
            .clone()
            .oneshot(import_request(None, payload))
            .await
            .unwrap();
        assert_eq!(missing.status(), StatusCode::UNAUTHORIZED);

        let wrong = h
            .router
            .oneshot(import_request(Some("nope"), payload))
            .await
            .unwrap();
        assert_eq!(wrong.status(), StatusCode::UNAUTHORIZED);
        assert!(h.store.scope_entries(&website()).await.is_empty());
    }

    #[tokio::test]
    async fn test_import_writes_scoped_fields() {
        let h = harness();
        let response = h
            .router
            .oneshot(import_request(
                Some(ADMIN_SECRET),
                r#"{"merchant_id":"M1","secret_key":"s3cr3t"}"#,
            ))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let body = read_response(response).await;
        assert_eq!(body.outcome, ImportOutcomeKind::Applied);
        assert_eq!(body.fields_written, 2);
        assert!(!body.enveloped);

        assert_eq!(
            h.store
                .get("payment/amazon_payment/merchant_id", &website())
                .await
                .as_deref(),
            Some("M1")
        );
        let secret = h
            .store
            .get("payment/amazon_payment/secret_key", &website())
            .await
            .unwrap();
        let encryptor = AeadEncryptor::from_config(&h.config.encryption);
        assert_eq!(encryptor.decrypt(&secret).unwrap(), "s3cr3t");
    }

    #[tokio::test]
    async fn test_import_accepts_envelope() {
        let h = harness();
        let sealed = seal_envelope(
            &h.config.encryption.envelope_key,
            r#"{"merchant_id":"M2","secret_key":"k"}"#,
        )
        .unwrap()
        .to_json()
        .unwrap();

        let response = h
            .router
            .oneshot(import_request(Some(ADMIN_SECRET), &sealed))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert!(read_response(response).await.enveloped);
        assert_eq!(
            h.store
                .get("payment/amazon_payment/merchant_id", &website())
                .await
                .as_deref(),
            Some("M2")
        );
    }

    #[tokio::test]
    async fn test_rejected_import_returns_messages() {
        let h = harness();
        let response = h
            .router
            .oneshot(import_request(Some(ADMIN_SECRET), r#"{"merchant_id":"M1"}"#))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
        let body = read_response(response).await;
        assert_eq!(body.outcome, ImportOutcomeKind::Rejected);
        assert_eq!(
            body.messages,
            vec!["Missing required credential field: secret_key.".to_string()]
        );
        assert!(h.store.scope_entries(&website()).await.is_empty());
    }

    #[tokio::test]
    async fn test_corrupted_envelope_is_unprocessable() {
        use paycred_core::store::ConfigWriter;

        let h = harness();
        let blob = "payment/amazon_payment/credentials_json";
        h.store.save_config(blob, "{}", &website()).await.unwrap();

        let incomplete = h
            .router
            .clone()
            .oneshot(import_request(Some(ADMIN_SECRET), r#"{"encryptedKey":"abc"}"#))
            .await
            .unwrap();
        assert_eq!(incomplete.status(), StatusCode::UNPROCESSABLE_ENTITY);
        let body = read_response(incomplete).await;
        assert_eq!(body.outcome, ImportOutcomeKind::Rejected);
        assert_eq!(body.messages.len(), 1);
        assert_eq!(h.store.get(blob, &website()).await.as_deref(), Some("{}"));

        let unreadable = h
            .router
            .oneshot(import_request(
                Some(ADMIN_SECRET),
                r#"{"encryptedKey":"abc","encryptedPayload":"def","iv":"ghi"}"#,
            ))
            .await
            .unwrap();
        assert_eq!(unreadable.status(), StatusCode::UNPROCESSABLE_ENTITY);
        let body = read_response(unreadable).await;
        assert_eq!(body.outcome, ImportOutcomeKind::Failed);
        assert_eq!(body.messages.len(), 1);
        assert!(body.messages[0].starts_with("envelope decryption failed"));
        assert_eq!(h.store.get(blob, &website()).await, None);
    }

    #[tokio::test]
    async fn test_admin_client_against_router() {
        use paycred_sdk::client::{AdminClient, ClientError};

        let h = harness();
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let router = h.router.clone();
        tokio::spawn(async move { axum::serve(listener, router).await });

        let base_url = url::Url::parse(&format!("http://{addr}")).unwrap();
        let request = |credentials_json: &str| ImportCredentialsRequest {
            scope: ConfigScope::Websites,
            scope_id: 1,
            credentials_json: credentials_json.to_string(),
        };
        let client = AdminClient::new(base_url.clone(), ADMIN_SECRET);

        let applied = client
            .import_credentials(&request(r#"{"merchant_id":"M3","secret_key":"k"}"#))
            .await
            .unwrap();
        assert_eq!(applied.outcome, ImportOutcomeKind::Applied);
        assert_eq!(applied.fields_written, 2);

        // 422 carries a regular body and is not an error for the client.
        let rejected = client
            .import_credentials(&request(r#"{"merchant_id":"M3"}"#))
            .await
            .unwrap();
        assert_eq!(rejected.outcome, ImportOutcomeKind::Rejected);
        assert_eq!(
            rejected.messages,
            vec!["Missing required credential field: secret_key.".to_string()]
        );

        let err = AdminClient::new(base_url, "wrong-secret")
            .import_credentials(&request(r#"{"merchant_id":"M4","secret_key":"k"}"#))
            .await
            .unwrap_err();
        assert!(
            matches!(&err, ClientError::Api { status, .. } if status.as_u16() == 401),
            "{err:?}"
        );
        assert_eq!(
            h.store
                .get("payment/amazon_payment/merchant_id", &website())
                .await
                .as_deref(),
            Some("M3")
        );
    }
}
