// Copyright 2024 - Nym Technologies SA <contact@nymtech.net>
// SPDX-License-Identifier: Apache-2.0

use crate::error::MinterStorageError;
use crate::models::StoreKey;
use async_trait::async_trait;

pub mod ephemeral;
pub mod persistent;

/// Raw key-value access. Values are JSON documents.
#[async_trait]
pub trait KeyValueBackend: Send + Sync {
    async fn get(&self, key: StoreKey) -> Result<Option<String>, MinterStorageError>;

    async fn set(&self, key: StoreKey, value: String) -> Result<(), MinterStorageError>;
}
