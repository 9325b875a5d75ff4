//! In-process config store.
//!
//! `MemoryConfigStore` keeps every scope in one `BTreeMap` behind a tokio
//! `RwLock`. Clones share the same map.

use std::collections::BTreeMap;
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::RwLock;

use super::{ConfigEntry, ConfigWriter, StoreError};
use crate::ScopeDescriptor;

type StoreKey = (ScopeDescriptor, String);

/// A shared in-memory configuration store.
#[derive(Clone, Default)]
pub struct MemoryConfigStore {
    data: Arc<RwLock<BTreeMap<StoreKey, String>>>,
}

impl MemoryConfigStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Read one value.
    pub async fn get(&self, path: &str, scope: &ScopeDescriptor) -> Option<String> {
        self.data
            .read()
            .await
            .get(&(*scope, path.to_owned()))
            .cloned()
    }

    /// All entries of one scope, ordered by path.
    pub async fn scope_entries(&self, scope: &ScopeDescriptor) -> Vec<ConfigEntry> {
        self.data
            .read()
            .await
            .iter()
            .filter(|((entry_scope, _), _)| entry_scope == scope)
            .map(|((_, path), value)| ConfigEntry::new(path.clone(), value.clone()))
            .collect()
    }
}

#[async_trait]
impl ConfigWriter for MemoryConfigStore {
    async fn save_config(
        &self,
        path: &str,
        value: &str,
        scope: &ScopeDescriptor,
    ) -> Result<(), StoreError> {
        self.data
            .write()
            .await
            .insert((*scope, path.to_owned()), value.to_owned());
        Ok(())
    }

    async fn delete_config(&self, path: &str, scope: &ScopeDescriptor) -> Result<(), StoreError> {
        self.data.write().await.remove(&(*scope, path.to_owned()));
        Ok(())
    }

    /// Applies the whole batch under one write lock.
    async fn save_all(&self, entries: &[ConfigEntry], scope: &ScopeDescriptor) -> Result<(), StoreError> {
        let mut guard = self.data.write().await;
        for entry in entries {
            guard.insert((*scope, entry.path.clone()), entry.value.clone());
        }
        Ok(())
    }
}
