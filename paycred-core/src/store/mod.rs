//! Scoped configuration storage.
//!
//! The importer writes through [`ConfigWriter`]; it never reads back.
//! Two backends ship with the crate: [`MemoryConfigStore`] and
//! [`PgConfigStore`].

mod memory;
mod postgres;

pub use memory::MemoryConfigStore;
pub use postgres::PgConfigStore;

use async_trait::async_trait;
use thiserror::Error;

use crate::ScopeDescriptor;

/// Namespace under which every credential field is stored.
pub const CREDENTIALS_CONFIG_PREFIX: &str = "payment/amazon_payment/";

/// Field name of the raw credentials JSON blob left by earlier imports.
pub const CREDENTIALS_JSON_FIELD: &str = "credentials_json";

/// Full config path of a credential field.
pub fn credentials_config_path(field: &str) -> String {
    format!("{CREDENTIALS_CONFIG_PREFIX}{field}")
}

/// One `(path, value)` pair destined for a scope.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfigEntry {
    pub path: String,
    pub value: String,
}

impl ConfigEntry {
    pub fn new(path: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            value: value.into(),
        }
    }
}

/// Errors raised by config store backends.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("config store unavailable: {0}")]
    Unavailable(String),
}

/// Write access to a scoped configuration store.
///
/// `save_config` overwrites; `delete_config` is a no-op when the path is
/// absent.
#[async_trait]
pub trait ConfigWriter: Send + Sync {
    async fn save_config(
        &self,
        path: &str,
        value: &str,
        scope: &ScopeDescriptor,
    ) -> Result<(), StoreError>;

    async fn delete_config(&self, path: &str, scope: &ScopeDescriptor) -> Result<(), StoreError>;

    /// Store several values for one scope.
    ///
    /// The default writes entries one by one in order, so a failure leaves
    /// the earlier entries committed. Backends that can do better override
    /// this with an all-or-nothing write.
    async fn save_all(&self, entries: &[ConfigEntry], scope: &ScopeDescriptor) -> Result<(), StoreError> {
        for entry in entries {
            self.save_config(&entry.path, &entry.value, scope).await?;
        }
        Ok(())
    }
}
