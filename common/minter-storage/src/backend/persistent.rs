// Copyright 2024 - Nym Technologies SA <contact@nymtech.net>
// SPDX-License-Identifier: Apache-2.0

use crate::backend::KeyValueBackend;
use crate::error::MinterStorageError;
use crate::log_db_operation_time;
use crate::models::StoreKey;
use async_trait::async_trait;
use sqlx::ConnectOptions;
use std::fmt::Debug;
use std::path::Path;
use tokio::time::Instant;
use tracing::{error, info, instrument};

#[derive(Clone)]
struct StorageManager {
    connection_pool: sqlx::SqlitePool,
}

impl StorageManager {
    async fn get_value(&self, key: &str) -> Result<Option<String>, sqlx::Error> {
        sqlx::query_scalar::<_, String>("SELECT value FROM key_value_store WHERE key = ?")
            .bind(key)
            .fetch_optional(&self.connection_pool)
            .await
    }

    async fn set_value(&self, key: &str, value: &str) -> Result<(), sqlx::Error> {
        sqlx::query(
            r#"
                INSERT INTO key_value_store(key, value) VALUES (?, ?)
                ON CONFLICT(key) DO UPDATE SET value = excluded.value, last_updated = CURRENT_TIMESTAMP
            "#,
        )
        .bind(key)
        .bind(value)
        .execute(&self.connection_pool)
        .await?;
        Ok(())
    }
}

/// Sqlite-backed key space that survives process restarts.
#[derive(Clone)]
pub struct PersistentBackend {
    manager: StorageManager,
}

impl PersistentBackend {
    #[instrument]
    pub async fn init<P: AsRef<Path> + Debug>(database_path: P) -> Result<Self, MinterStorageError> {
        let opts = sqlx::sqlite::SqliteConnectOptions::new()
            .filename(database_path)
            .create_if_missing(true)
            .disable_statement_logging();

        let connection_pool = match sqlx::SqlitePool::connect_with(opts).await {
            Ok(db) => db,
            Err(err) => {
                error!("Failed to connect to SQLx database: {err}");
                return Err(err.into());
            }
        };

        if let Err(err) = sqlx::migrate!("./migrations").run(&connection_pool).await {
            error!("Failed to initialize SQLx database: {err}");
            return Err(err.into());
        }

        info!("Database migration finished!");

        Ok(PersistentBackend {
            manager: StorageManager { connection_pool },
        })
    }
}

#[async_trait]
impl KeyValueBackend for PersistentBackend {
    async fn get(&self, key: StoreKey) -> Result<Option<String>, MinterStorageError> {
        let start = Instant::now();
        let value = self.manager.get_value(key.as_str()).await?;
        log_db_operation_time("reading registry value", start);
        Ok(value)
    }

    async fn set(&self, key: StoreKey, value: String) -> Result<(), MinterStorageError> {
        let start = Instant::now();
        self.manager.set_value(key.as_str(), &value).await?;
        log_db_operation_time("writing registry value", start);
        Ok(())
    }
}
