//! Pre-import validation of credentials JSON.

use std::sync::Arc;

use paycred_sdk::crypto::{ENVELOPE_MARKER, Envelope};
use serde_json::{Map, Value};

use super::registry::FieldRegistry;

/// Outcome of validating one credentials payload.
///
/// `messages` may be non-empty even when the payload is valid.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ValidationReport {
    valid: bool,
    messages: Vec<String>,
}

impl ValidationReport {
    pub fn valid() -> Self {
        Self {
            valid: true,
            messages: Vec::new(),
        }
    }

    pub fn invalid(message: impl Into<String>) -> Self {
        Self {
            valid: false,
            messages: vec![message.into()],
        }
    }

    /// Add a message that marks the payload invalid.
    pub fn reject(&mut self, message: impl Into<String>) {
        self.valid = false;
        self.messages.push(message.into());
    }

    /// Add a message that leaves validity untouched.
    pub fn note(&mut self, message: impl Into<String>) {
        self.messages.push(message.into());
    }

    pub fn is_valid(&self) -> bool {
        self.valid
    }

    pub fn messages(&self) -> &[String] {
        &self.messages
    }
}

/// Decides whether a credentials JSON string may be imported.
pub trait CredentialsValidator: Send + Sync {
    fn validate(&self, json_credentials: &str) -> ValidationReport;
}

/// Checks that the payload is a JSON object carrying every mandatory field
/// with a non-empty scalar value.
///
/// Enveloped payloads must carry every envelope key; their credential fields
/// are checked by the importer after decryption. Keys that are not credential fields are
/// reported but do not invalidate the payload.
pub struct JsonConfigValidator {
    registry: Arc<dyn FieldRegistry>,
}

impl JsonConfigValidator {
    pub fn new(registry: Arc<dyn FieldRegistry>) -> Self {
        Self { registry }
    }

    fn check_fields(&self, credentials: &Map<String, Value>, report: &mut ValidationReport) {
        let fields = self.registry.credentials_fields();

        for field in fields {
            match credentials.get(field) {
                None => report.reject(format!("Missing required credential field: {field}.")),
                Some(Value::String(s)) if s.trim().is_empty() => {
                    report.reject(format!("Credential field {field} must not be empty."))
                }
                Some(Value::String(_) | Value::Number(_) | Value::Bool(_)) => {}
                Some(_) => report.reject(format!("Credential field {field} must be a text value.")),
            }
        }

        for key in credentials.keys() {
            if !fields.iter().any(|f| f == key) {
                report.note(format!("Unrecognized credential field ignored: {key}."));
            }
        }
    }
}

impl CredentialsValidator for JsonConfigValidator {
    fn validate(&self, json_credentials: &str) -> ValidationReport {
        if json_credentials.trim().is_empty() {
            return ValidationReport::invalid("The credentials JSON is empty.");
        }

        let credentials: Map<String, Value> = match serde_json::from_str(json_credentials) {
            Ok(map) => map,
            Err(e) => {
                return ValidationReport::invalid(format!(
                    "The credentials JSON could not be parsed: {e}."
                ));
            }
        };

        let mut report = ValidationReport::valid();
        if credentials.contains_key(ENVELOPE_MARKER) {
            if let Err(e) = Envelope::from_json(json_credentials) {
                report.reject(format!("The credentials envelope is incomplete: {e}."));
            }
            return report;
        }
        self.check_fields(&credentials, &mut report);
        report
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::importer::registry::ConfiguredFieldRegistry;

    fn validator() -> JsonConfigValidator {
        let registry = ConfiguredFieldRegistry::new(
            vec!["merchant_id".to_string(), "secret_key".to_string()],
            vec!["secret_key".to_string()],
        )
        .unwrap();
        JsonConfigValidator::new(Arc::new(registry))
    }

    #[test]
    fn test_complete_payload_is_valid() {
        let report = validator().validate(r#"{"merchant_id":"M1","secret_key":"s"}"#);
        assert!(report.is_valid());
        assert!(report.messages().is_empty());
    }

    #[test]
    fn test_empty_and_malformed_payloads() {
        let report = validator().validate("   ");
        assert!(!report.is_valid());
        assert_eq!(report.messages(), ["The credentials JSON is empty."]);

        let report = validator().validate("{not json");
        assert!(!report.is_valid());
        assert!(report.messages()[0].starts_with("The credentials JSON could not be parsed"));

        let report = validator().validate(r#"["merchant_id"]"#);
        assert!(!report.is_valid());
    }

    #[test]
    fn test_missing_and_empty_fields() {
        let report = validator().validate(r#"{"merchant_id":" "}"#);
        assert!(!report.is_valid());
        assert_eq!(
            report.messages(),
            [
                "Credential field merchant_id must not be empty.",
                "Missing required credential field: secret_key.",
            ]
        );
    }

    #[test]
    fn test_non_scalar_field_is_rejected() {
        let report = validator().validate(r#"{"merchant_id":{"a":1},"secret_key":"s"}"#);
        assert!(!report.is_valid());
        assert_eq!(report.messages(), ["Credential field merchant_id must be a text value."]);
    }

    #[test]
    fn test_unknown_field_is_reported_but_valid() {
        let report = validator().validate(r#"{"merchant_id":"M1","secret_key":"s","region":"eu"}"#);
        assert!(report.is_valid());
        assert_eq!(report.messages(), ["Unrecognized credential field ignored: region."]);
    }

    #[test]
    fn test_envelope_skips_field_checks() {
        let report = validator()
            .validate(r#"{"encryptedKey":"abc","encryptedPayload":"def","iv":"ghi"}"#);
        assert!(report.is_valid());
        assert!(report.messages().is_empty());
    }

    #[test]
    fn test_incomplete_envelope_is_rejected() {
        let report = validator().validate(r#"{"encryptedKey":"abc"}"#);
        assert!(!report.is_valid());
        assert_eq!(report.messages().len(), 1);
        assert!(
            report.messages()[0].starts_with("The credentials envelope is incomplete"),
            "{:?}",
            report.messages()
        );
    }
}
