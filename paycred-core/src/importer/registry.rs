//! Credential field registry.

use std::collections::HashSet;

use thiserror::Error;

use crate::config::CredentialsConfig;

/// Supplies the mandatory credential fields and the subset stored encrypted.
pub trait FieldRegistry: Send + Sync {
    /// Mandatory field names, in write order.
    fn credentials_fields(&self) -> &[String];

    /// Fields whose stored value must be encrypted.
    fn encrypted_fields(&self) -> &HashSet<String>;
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RegistryError {
    #[error("no credential fields configured")]
    Empty,
    #[error("credential field {0} is listed more than once")]
    Duplicate(String),
    #[error("encrypted field {0} is not a credential field")]
    UnknownEncryptedField(String),
}

/// Field registry driven by the `[credentials]` configuration section.
#[derive(Debug, Clone)]
pub struct ConfiguredFieldRegistry {
    fields: Vec<String>,
    encrypted: HashSet<String>,
}

impl ConfiguredFieldRegistry {
    pub fn new(
        fields: Vec<String>,
        encrypted: impl IntoIterator<Item = String>,
    ) -> Result<Self, RegistryError> {
        if fields.is_empty() {
            return Err(RegistryError::Empty);
        }

        let mut seen = HashSet::with_capacity(fields.len());
        for field in &fields {
            if !seen.insert(field.as_str()) {
                return Err(RegistryError::Duplicate(field.clone()));
            }
        }

        let encrypted: HashSet<String> = encrypted.into_iter().collect();
        if let Some(unknown) = encrypted.iter().find(|f| !seen.contains(f.as_str())) {
            return Err(RegistryError::UnknownEncryptedField(unknown.clone()));
        }

        Ok(Self { fields, encrypted })
    }

    pub fn from_config(config: &CredentialsConfig) -> Result<Self, RegistryError> {
        Self::new(config.fields.clone(), config.encrypted_fields.iter().cloned())
    }
}

impl FieldRegistry for ConfiguredFieldRegistry {
    fn credentials_fields(&self) -> &[String] {
        &self.fields
    }

    fn encrypted_fields(&self) -> &HashSet<String> {
        &self.encrypted
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn names(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_default_config_builds() {
        let registry = ConfiguredFieldRegistry::from_config(&CredentialsConfig::default()).unwrap();
        assert_eq!(registry.credentials_fields()[0], "merchant_id");
        assert!(registry.encrypted_fields().contains("secret_key"));
        assert!(!registry.encrypted_fields().contains("merchant_id"));
    }

    #[test]
    fn test_encrypted_must_be_subset() {
        let err = ConfiguredFieldRegistry::new(names(&["a"]), names(&["b"])).unwrap_err();
        assert_eq!(err, RegistryError::UnknownEncryptedField("b".to_string()));
    }

    #[test]
    fn test_rejects_duplicates_and_empty() {
        assert_eq!(
            ConfiguredFieldRegistry::new(names(&["a", "a"]), vec![]).unwrap_err(),
            RegistryError::Duplicate("a".to_string())
        );
        assert_eq!(
            ConfiguredFieldRegistry::new(vec![], vec![]).unwrap_err(),
            RegistryError::Empty
        );
    }
}
