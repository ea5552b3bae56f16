// Copyright 2024 - Nym Technologies SA <contact@nymtech.net>
// SPDX-License-Identifier: Apache-2.0

use crate::models::StoreKey;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum MinterStorageError {
    #[error("database experienced an internal error: {source}")]
    InternalDatabaseError {
        #[from]
        source: sqlx::Error,
    },

    #[error("failed to perform database migration: {source}")]
    MigrationError {
        #[from]
        source: sqlx::migrate::MigrateError,
    },

    #[error("the value stored under '{key}' could not be (de)serialised: {source}")]
    MalformedValue {
        key: StoreKey,
        #[source]
        source: serde_json::Error,
    },

    #[error("the registry writer has shut down before acknowledging the write to '{key}'")]
    WriterShutdown { key: StoreKey },

    #[error("the storage backend is unavailable: {reason}")]
    Unavailable { reason: String },
}
