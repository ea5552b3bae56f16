// Copyright 2024 - Nym Technologies SA <contact@nymtech.net>
// SPDX-License-Identifier: Apache-2.0

use crate::backend::KeyValueBackend;
use serde::de::DeserializeOwned;
use std::sync::Arc;
use tokio::time::Instant;
use tracing::{debug, error, info, trace, warn};

pub mod backend;
pub mod error;
pub mod models;
pub mod writer;

pub use backend::ephemeral::EphemeralBackend;
pub use backend::persistent::PersistentBackend;
pub use error::MinterStorageError;
pub use models::{ContractRegistryEntry, Metadata, PersistedSession, StoreKey};
pub use writer::{PersistHandle, StoreWriter};

pub(crate) fn log_db_operation_time(op_name: &str, start_time: Instant) {
    let elapsed = start_time.elapsed();
    let formatted = humantime::format_duration(elapsed);

    match elapsed.as_millis() {
        v if v > 10000 => error!("{op_name} took {formatted} to execute"),
        v if v > 1000 => warn!("{op_name} took {formatted} to execute"),
        v if v > 100 => info!("{op_name} took {formatted} to execute"),
        v if v > 10 => debug!("{op_name} took {formatted} to execute"),
        _ => trace!("{op_name} took {formatted} to execute"),
    }
}

/// Typed view over the registry key space.
///
/// Reads go straight to the backend, writes are queued on the [`StoreWriter`]
/// and only their [`PersistHandle`] is returned.
pub struct RegistryStore<B: ?Sized> {
    backend: Arc<B>,
    writer: StoreWriter,
}

impl<B: ?Sized> Clone for RegistryStore<B> {
    fn clone(&self) -> Self {
        RegistryStore {
            backend: Arc::clone(&self.backend),
            writer: self.writer.clone(),
        }
    }
}

impl<B> RegistryStore<B>
where
    B: KeyValueBackend + ?Sized + 'static,
{
    /// Must be called from within a tokio runtime as it spawns the writer task.
    pub fn new(backend: Arc<B>) -> Self {
        let (writer, _) = StoreWriter::spawn(Arc::clone(&backend));
        RegistryStore { backend, writer }
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    async fn get_json<T: DeserializeOwned>(
        &self,
        key: StoreKey,
    ) -> Result<Option<T>, MinterStorageError> {
        let Some(raw) = self.backend.get(key).await? else {
            return Ok(None);
        };
        serde_json::from_str(&raw)
            .map(Some)
            .map_err(|source| MinterStorageError::MalformedValue { key, source })
    }

    pub async fn load_metadata(&self) -> Result<Option<Metadata>, MinterStorageError> {
        self.get_json(StoreKey::Metadata).await
    }

    pub async fn load_contract_address(&self) -> Result<Option<String>, MinterStorageError> {
        self.get_json(StoreKey::ContractAddress).await
    }

    pub async fn load_stored_contracts(
        &self,
    ) -> Result<Vec<ContractRegistryEntry>, MinterStorageError> {
        Ok(self
            .get_json(StoreKey::StoredContracts)
            .await?
            .unwrap_or_default())
    }

    pub async fn load_session(&self) -> Result<PersistedSession, MinterStorageError> {
        Ok(PersistedSession {
            metadata: self.load_metadata().await?,
            contract_address: self.load_contract_address().await?,
            stored_contracts: self.load_stored_contracts().await?,
        })
    }

    pub fn persist_metadata(&self, metadata: &Metadata) -> PersistHandle {
        self.writer.write(StoreKey::Metadata, metadata)
    }

    pub fn persist_contract_address(&self, address: &str) -> PersistHandle {
        self.writer.write(StoreKey::ContractAddress, address)
    }

    pub fn persist_stored_contracts(&self, contracts: &[ContractRegistryEntry]) -> PersistHandle {
        self.writer.write(StoreKey::StoredContracts, contracts)
    }
}
