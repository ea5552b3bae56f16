// Copyright 2024 - Nym Technologies SA <contact@nymtech.net>
// SPDX-License-Identifier: Apache-2.0

use crate::backend::KeyValueBackend;
use crate::error::MinterStorageError;
use crate::log_db_operation_time;
use crate::models::StoreKey;
use serde::Serialize;
use std::sync::Arc;
use tokio::sync::{mpsc, oneshot};
use tokio::task::JoinHandle;
use tokio::time::Instant;
use tracing::{debug, error, trace};

struct WriteRequest {
    key: StoreKey,
    value: String,
    ack: oneshot::Sender<Result<(), MinterStorageError>>,
}

/// Completion handle of a single queued write.
///
/// Dropping it does not cancel the write.
#[derive(Debug)]
pub struct PersistHandle {
    key: StoreKey,
    ack: oneshot::Receiver<Result<(), MinterStorageError>>,
}

impl PersistHandle {
    fn resolved(key: StoreKey, result: Result<(), MinterStorageError>) -> Self {
        let (tx, ack) = oneshot::channel();
        // the receiver is still alive so this can't fail
        let _ = tx.send(result);
        PersistHandle { key, ack }
    }

    pub fn key(&self) -> StoreKey {
        self.key
    }

    /// Waits until the backend has applied (or rejected) the write.
    pub async fn wait(self) -> Result<(), MinterStorageError> {
        let key = self.key;
        self.ack
            .await
            .map_err(|_| MinterStorageError::WriterShutdown { key })?
    }

    /// Non-blocking check. `None` means the write is still queued.
    pub fn try_result(&mut self) -> Option<Result<(), MinterStorageError>> {
        match self.ack.try_recv() {
            Ok(result) => Some(result),
            Err(oneshot::error::TryRecvError::Empty) => None,
            Err(oneshot::error::TryRecvError::Closed) => {
                Some(Err(MinterStorageError::WriterShutdown { key: self.key }))
            }
        }
    }
}

/// Serialises all writes through a single task so they hit the backend in
/// the order they were issued.
#[derive(Clone)]
pub struct StoreWriter {
    sender: mpsc::UnboundedSender<WriteRequest>,
}

impl StoreWriter {
    /// Spawns the writer task onto the current tokio runtime.
    /// The task exits once every [`StoreWriter`] clone has been dropped.
    pub fn spawn<B>(backend: Arc<B>) -> (StoreWriter, JoinHandle<()>)
    where
        B: KeyValueBackend + ?Sized + 'static,
    {
        let (sender, receiver) = mpsc::unbounded_channel();
        let task = tokio::spawn(run_writer(backend, receiver));
        (StoreWriter { sender }, task)
    }

    pub fn write<T: Serialize + ?Sized>(&self, key: StoreKey, value: &T) -> PersistHandle {
        let value = match serde_json::to_string(value) {
            Ok(value) => value,
            Err(source) => {
                return PersistHandle::resolved(
                    key,
                    Err(MinterStorageError::MalformedValue { key, source }),
                )
            }
        };

        let (ack_tx, ack) = oneshot::channel();
        let request = WriteRequest {
            key,
            value,
            ack: ack_tx,
        };
        if self.sender.send(request).is_err() {
            return PersistHandle::resolved(key, Err(MinterStorageError::WriterShutdown { key }));
        }
        PersistHandle { key, ack }
    }
}

async fn run_writer<B>(backend: Arc<B>, mut receiver: mpsc::UnboundedReceiver<WriteRequest>)
where
    B: KeyValueBackend + ?Sized,
{
    debug!("starting the registry writer");
    while let Some(request) = receiver.recv().await {
        let start = Instant::now();
        let result = backend.set(request.key, request.value).await;
        log_db_operation_time("persisting registry write", start);

        if let Err(err) = &result {
            error!("failed to persist '{}': {err}", request.key);
        }
        if request.ack.send(result).is_err() {
            trace!("nobody is waiting for the '{}' write", request.key);
        }
    }
    debug!("registry writer has finished");
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::ephemeral::EphemeralBackend;

    #[tokio::test]
    async fn writes_are_applied_in_issue_order() {
        let backend = Arc::new(EphemeralBackend::new());
        let (writer, task) = StoreWriter::spawn(backend.clone());

        let handles: Vec<_> = (0..50u32)
            .map(|count| writer.write(StoreKey::Metadata, &count))
            .collect();
        for handle in handles {
            handle.wait().await.unwrap();
        }

        assert_eq!(
            backend.raw_value(StoreKey::Metadata).await,
            Some("49".to_string())
        );

        drop(writer);
        task.await.unwrap();
    }

    #[tokio::test]
    async fn writes_after_shutdown_report_failure() {
        let backend = Arc::new(EphemeralBackend::new());
        let (writer, task) = StoreWriter::spawn(backend);
        task.abort();
        let _ = task.await;

        let result = writer.write(StoreKey::ContractAddress, "0x01").wait().await;
        assert!(matches!(
            result,
            Err(MinterStorageError::WriterShutdown {
                key: StoreKey::ContractAddress
            })
        ));
    }
}
