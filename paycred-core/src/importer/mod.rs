//! Credential importer.
//!
//! Takes a credentials JSON document as pasted by an administrator, checks
//! it with a [`CredentialsValidator`], opens it if it is an envelope, and
//! writes every mandatory field into the config store under
//! [`CREDENTIALS_CONFIG_PREFIX`](crate::store::CREDENTIALS_CONFIG_PREFIX).
//! Fields named by the [`FieldRegistry`] as secret are encrypted first.
//!
//! Order of effects for a payload that passes validation:
//!
//! 1. decode the JSON (nothing is touched if this fails)
//! 2. delete the stored raw credentials JSON blob for the scope
//! 3. decrypt the envelope, if any, and decode the plaintext
//! 4. resolve and encrypt every mandatory field
//! 5. write all fields in one [`ConfigWriter::save_all`] call
//!
//! The blob delete in step 2 stands even when a later step fails.

mod encryption;
mod messages;
mod registry;
mod validator;

pub use encryption::{
    AeadEncryptor, EncryptionError, Encryptor, EnvelopeDecryptor, EnvelopeError, EnvelopeFlags,
    KeyWrapEnvelopeDecryptor,
};
pub use messages::{MessageCollection, MessageReporter};
pub use registry::{ConfiguredFieldRegistry, FieldRegistry, RegistryError};
pub use validator::{CredentialsValidator, JsonConfigValidator, ValidationReport};

use std::sync::Arc;

use paycred_sdk::crypto::ENVELOPE_MARKER;
use serde_json::{Map, Value};
use thiserror::Error;
use tracing::{debug, info, warn};

use crate::ScopeDescriptor;
use crate::config::{CredentialsConfig, EncryptionConfig};
use crate::store::{
    CREDENTIALS_JSON_FIELD, ConfigEntry, ConfigWriter, StoreError, credentials_config_path,
};

/// Errors raised while applying a validated payload.
#[derive(Debug, Error)]
pub enum ImportError {
    /// The payload, or the plaintext inside its envelope, is not a JSON object.
    #[error("malformed credentials payload: {0}")]
    MalformedPayload(#[source] serde_json::Error),

    #[error("missing mandatory credential field: {0}")]
    MissingField(String),

    /// A mandatory field holds `null`, an array or an object.
    #[error("credential field {0} must be a text value")]
    InvalidFieldValue(String),

    #[error(transparent)]
    Envelope(#[from] EnvelopeError),

    #[error(transparent)]
    Encryption(#[from] EncryptionError),

    #[error("config store error: {0}")]
    Store(#[from] StoreError),
}

impl ImportError {
    /// Whether the error describes a problem with the submitted payload and
    /// should be shown to the administrator.
    pub fn is_payload_error(&self) -> bool {
        match self {
            ImportError::MalformedPayload(_)
            | ImportError::MissingField(_)
            | ImportError::InvalidFieldValue(_) => true,
            ImportError::Envelope(e) => e.is_malformed(),
            ImportError::Encryption(_) | ImportError::Store(_) => false,
        }
    }
}

/// How a successful call to
/// [`process_credentials_json`](CredentialImporter::process_credentials_json)
/// ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImportOutcome {
    /// Every mandatory field was written.
    Applied { fields_written: usize, enveloped: bool },
    /// Validation failed; the store was not touched.
    Rejected,
}

/// Imports payment-gateway credentials into a scoped config store.
#[derive(Clone)]
pub struct CredentialImporter {
    validator: Arc<dyn CredentialsValidator>,
    store: Arc<dyn ConfigWriter>,
    encryptor: Arc<dyn Encryptor>,
    envelope: Arc<dyn EnvelopeDecryptor>,
    registry: Arc<dyn FieldRegistry>,
}

impl CredentialImporter {
    pub fn new(
        validator: Arc<dyn CredentialsValidator>,
        store: Arc<dyn ConfigWriter>,
        encryptor: Arc<dyn Encryptor>,
        envelope: Arc<dyn EnvelopeDecryptor>,
        registry: Arc<dyn FieldRegistry>,
    ) -> Self {
        Self {
            validator,
            store,
            encryptor,
            envelope,
            registry,
        }
    }

    /// Build an importer with the shipped validator, encryptor and envelope
    /// decryptor, writing to `store`.
    pub fn from_config(
        store: Arc<dyn ConfigWriter>,
        credentials: &CredentialsConfig,
        encryption: &EncryptionConfig,
    ) -> Result<Self, RegistryError> {
        let registry: Arc<dyn FieldRegistry> =
            Arc::new(ConfiguredFieldRegistry::from_config(credentials)?);
        Ok(Self::new(
            Arc::new(JsonConfigValidator::new(registry.clone())),
            store,
            Arc::new(AeadEncryptor::from_config(encryption)),
            Arc::new(KeyWrapEnvelopeDecryptor::from_config(encryption)),
            registry,
        ))
    }

    /// Validate `json_credentials` and, if valid, write its fields into
    /// `scope`.
    ///
    /// Every validator message is passed to `reporter`, whether or not the
    /// payload was valid. Payload errors found while applying
    /// ([`ImportError::is_payload_error`]) are reported as well, and then
    /// returned.
    #[tracing::instrument(skip_all, fields(scope = %scope))]
    pub async fn process_credentials_json<R>(
        &self,
        json_credentials: &str,
        scope: &ScopeDescriptor,
        reporter: &mut R,
    ) -> Result<ImportOutcome, ImportError>
    where
        R: MessageReporter + Send,
    {
        let report = self.validator.validate(json_credentials);

        let result = if report.is_valid() {
            self.apply(json_credentials, scope).await.map(Some)
        } else {
            debug!(messages = report.messages().len(), "Credentials rejected by validator");
            Ok(None)
        };

        for message in report.messages() {
            reporter.add_error_message(message.clone());
        }

        match result {
            Ok(Some(outcome)) => Ok(outcome),
            Ok(None) => Ok(ImportOutcome::Rejected),
            Err(err) => {
                if err.is_payload_error() {
                    reporter.add_error_message(err.to_string());
                }
                warn!(error = %err, "Failed to apply credentials");
                Err(err)
            }
        }
    }

    async fn apply(
        &self,
        json_credentials: &str,
        scope: &ScopeDescriptor,
    ) -> Result<ImportOutcome, ImportError> {
        let credentials = decode_credentials(json_credentials)?;

        self.store
            .delete_config(&credentials_config_path(CREDENTIALS_JSON_FIELD), scope)
            .await?;

        let (credentials, enveloped) = if credentials.contains_key(ENVELOPE_MARKER) {
            let serialized =
                serde_json::to_string(&credentials).map_err(ImportError::MalformedPayload)?;
            let plaintext = self
                .envelope
                .decrypt_payload(&serialized, EnvelopeFlags::OFF)?;
            (decode_credentials(&plaintext)?, true)
        } else {
            (credentials, false)
        };

        let entries = self.resolve_entries(&credentials)?;
        self.store.save_all(&entries, scope).await?;

        info!(
            fields_written = entries.len(),
            enveloped, "Credentials imported"
        );
        Ok(ImportOutcome::Applied {
            fields_written: entries.len(),
            enveloped,
        })
    }

    /// Build the config entries for every mandatory field, in registry
    /// order. Nothing is written until all fields resolve.
    fn resolve_entries(
        &self,
        credentials: &Map<String, Value>,
    ) -> Result<Vec<ConfigEntry>, ImportError> {
        let fields = self.registry.credentials_fields();
        let encrypted_fields = self.registry.encrypted_fields();

        let mut entries = Vec::with_capacity(fields.len());
        for field in fields {
            let value = credentials
                .get(field)
                .ok_or_else(|| ImportError::MissingField(field.clone()))?;
            let value =
                scalar_text(value).ok_or_else(|| ImportError::InvalidFieldValue(field.clone()))?;

            let value = if encrypted_fields.contains(field) {
                self.encryptor.encrypt(&value)?
            } else {
                value
            };

            entries.push(ConfigEntry::new(credentials_config_path(field), value));
        }
        Ok(entries)
    }
}

fn decode_credentials(json: &str) -> Result<Map<String, Value>, ImportError> {
    serde_json::from_str(json).map_err(ImportError::MalformedPayload)
}

/// Storage text of a scalar JSON value.
fn scalar_text(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        Value::Null | Value::Array(_) | Value::Object(_) => None,
    }
}
