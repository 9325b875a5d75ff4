//! PostgreSQL-backed config store over the `core_config_data` table.

use async_trait::async_trait;
use kanau::processor::Processor;
use sqlx::PgPool;
use tracing::debug;

use super::{ConfigEntry, ConfigWriter, StoreError};
use crate::ScopeDescriptor;
use crate::entities::config_data::{DeleteConfigValue, SaveConfigValue, SaveConfigValues};
use crate::framework::DatabaseProcessor;

/// Config store persisting to PostgreSQL.
///
/// [`save_all`](ConfigWriter::save_all) runs in a single transaction.
#[derive(Clone)]
pub struct PgConfigStore {
    processor: DatabaseProcessor,
}

impl PgConfigStore {
    pub fn new(pool: PgPool) -> Self {
        Self {
            processor: DatabaseProcessor::new(pool),
        }
    }
}

#[async_trait]
impl ConfigWriter for PgConfigStore {
    async fn save_config(
        &self,
        path: &str,
        value: &str,
        scope: &ScopeDescriptor,
    ) -> Result<(), StoreError> {
        self.processor
            .process(SaveConfigValue {
                scope: *scope,
                path: path.to_owned(),
                value: value.to_owned(),
            })
            .await?;
        Ok(())
    }

    async fn delete_config(&self, path: &str, scope: &ScopeDescriptor) -> Result<(), StoreError> {
        let removed = self
            .processor
            .process(DeleteConfigValue {
                scope: *scope,
                path: path.to_owned(),
            })
            .await?;
        debug!(%scope, path, removed, "Deleted config value");
        Ok(())
    }

    async fn save_all(&self, entries: &[ConfigEntry], scope: &ScopeDescriptor) -> Result<(), StoreError> {
        let written = self
            .processor
            .process(SaveConfigValues {
                scope: *scope,
                entries: entries.to_vec(),
            })
            .await?;
        debug!(%scope, written, "Saved config values");
        Ok(())
    }
}
