// Copyright 2024 - Nym Technologies SA <contact@nymtech.net>
// SPDX-License-Identifier: Apache-2.0

use crate::backend::KeyValueBackend;
use crate::error::MinterStorageError;
use crate::models::StoreKey;
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

/// In-memory backend. Nothing survives the process, so it is only useful
/// for dry runs and tests.
#[derive(Debug, Clone, Default)]
pub struct EphemeralBackend {
    values: Arc<RwLock<HashMap<StoreKey, String>>>,
}

impl EphemeralBackend {
    pub fn new() -> Self {
        Default::default()
    }

    pub async fn raw_value(&self, key: StoreKey) -> Option<String> {
        self.values.read().await.get(&key).cloned()
    }
}

#[async_trait]
impl KeyValueBackend for EphemeralBackend {
    async fn get(&self, key: StoreKey) -> Result<Option<String>, MinterStorageError> {
        Ok(self.raw_value(key).await)
    }

    async fn set(&self, key: StoreKey, value: String) -> Result<(), MinterStorageError> {
        self.values.write().await.insert(key, value);
        Ok(())
    }
}
