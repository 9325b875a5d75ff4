//! Application state shared across all request handlers.

use crate::config::LoadedConfig;
use crate::config::runtime::AdminConfig;
use paycred_core::importer::{CredentialImporter, RegistryError};
use paycred_core::store::ConfigWriter;
use std::sync::Arc;
use tokio::sync::RwLock;

/// Application state that is shared across all request handlers.
///
/// This is cloneable and cheap to pass around (everything is behind Arc).
#[derive(Clone)]
pub struct AppState {
    /// Config store every import writes to.
    pub store: Arc<dyn ConfigWriter>,
    /// Admin authentication (can be reloaded via SIGHUP).
    pub admin: Arc<RwLock<AdminConfig>>,
    /// Importer built from the current credentials and encryption sections.
    pub importer: Arc<RwLock<Arc<CredentialImporter>>>,
}

impl AppState {
    /// Create the state from a freshly loaded configuration.
    pub fn new(store: Arc<dyn ConfigWriter>, config: &LoadedConfig) -> Result<Self, RegistryError> {
        let importer = build_importer(store.clone(), config)?;
        Ok(Self {
            store,
            admin: Arc::new(RwLock::new(config.admin.clone())),
            importer: Arc::new(RwLock::new(importer)),
        })
    }

    /// The importer for the current configuration.
    pub async fn importer(&self) -> Arc<CredentialImporter> {
        self.importer.read().await.clone()
    }

    /// Swap in a reloaded configuration (used during SIGHUP reload).
    ///
    /// Nothing is replaced if the new credentials section is invalid.
    pub async fn apply_config(&self, config: &LoadedConfig) -> Result<(), RegistryError> {
        let importer = build_importer(self.store.clone(), config)?;
        *self.importer.write().await = importer;
        *self.admin.write().await = config.admin.clone();
        Ok(())
    }
}

fn build_importer(
    store: Arc<dyn ConfigWriter>,
    config: &LoadedConfig,
) -> Result<Arc<CredentialImporter>, RegistryError> {
    CredentialImporter::from_config(store, &config.credentials, &config.encryption).map(Arc::new)
}
