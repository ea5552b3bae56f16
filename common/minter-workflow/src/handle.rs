// Copyright 2024 - Nym Technologies SA <contact@nymtech.net>
// SPDX-License-Identifier: Apache-2.0

use crate::command::WorkflowCommand;
use crate::controller::{SubmissionOutcome, WorkflowController};
use crate::error::WorkflowError;
use crate::session::Session;
use nym_minter_chain::{Address, ChainClient};
use nym_minter_storage::backend::KeyValueBackend;
use tokio::sync::{mpsc, oneshot};
use tokio::task::{JoinError, JoinHandle};
use tracing::{debug, error, trace, warn};

enum ControlRequest {
    Command {
        command: WorkflowCommand,
        reply: oneshot::Sender<Result<(), WorkflowError>>,
    },
    Settle {
        reply: oneshot::Sender<Result<Option<Address>, WorkflowError>>,
    },
    Snapshot {
        reply: oneshot::Sender<Session>,
    },
    Flush {
        reply: oneshot::Sender<Result<(), WorkflowError>>,
    },
}

enum ControlEvent {
    Request(Option<ControlRequest>),
    SubmissionFinished(Result<SubmissionOutcome, JoinError>),
}

/// Cheaply cloneable access to a controller running on its own task.
#[derive(Clone)]
pub struct WorkflowHandle {
    sender: mpsc::UnboundedSender<ControlRequest>,
}

impl WorkflowHandle {
    async fn request<T>(
        &self,
        make_request: impl FnOnce(oneshot::Sender<T>) -> ControlRequest,
    ) -> Result<T, WorkflowError> {
        let (reply, response) = oneshot::channel();
        self.sender
            .send(make_request(reply))
            .map_err(|_| WorkflowError::ControllerShutdown)?;
        response.await.map_err(|_| WorkflowError::ControllerShutdown)
    }

    pub async fn send(&self, command: WorkflowCommand) -> Result<(), WorkflowError> {
        self.request(|reply| ControlRequest::Command { command, reply })
            .await?
    }

    /// Waits for the pending submission. If it already finished in the
    /// background, its result is returned instead (once).
    pub async fn settle(&self) -> Result<Option<Address>, WorkflowError> {
        self.request(|reply| ControlRequest::Settle { reply }).await?
    }

    pub async fn snapshot(&self) -> Result<Session, WorkflowError> {
        self.request(|reply| ControlRequest::Snapshot { reply })
            .await
    }

    pub async fn flush(&self) -> Result<(), WorkflowError> {
        self.request(|reply| ControlRequest::Flush { reply }).await?
    }
}

struct ControllerTask<C: ?Sized, B: ?Sized> {
    controller: WorkflowController<C, B>,
    receiver: mpsc::UnboundedReceiver<ControlRequest>,

    // result of a submission that finished without anybody waiting for it
    unclaimed: Option<Result<Address, WorkflowError>>,
}

impl<C, B> ControllerTask<C, B>
where
    C: ChainClient + ?Sized + 'static,
    B: KeyValueBackend + ?Sized + 'static,
{
    async fn next_event(&mut self) -> ControlEvent {
        let submitting = self.controller.is_submitting();
        tokio::select! {
            request = self.receiver.recv() => ControlEvent::Request(request),
            joined = self.controller.join_submission(), if submitting => {
                ControlEvent::SubmissionFinished(joined)
            }
        }
    }

    fn reply<T>(reply: oneshot::Sender<T>, value: T) {
        if reply.send(value).is_err() {
            trace!("the requester has gone away before receiving the response");
        }
    }

    async fn handle_request(&mut self, request: ControlRequest) {
        match request {
            ControlRequest::Command { command, reply } => {
                let res = self.controller.handle_command(command).await;
                if let Err(err) = &res {
                    debug!("command rejected: {err}");
                }
                Self::reply(reply, res)
            }
            ControlRequest::Settle { reply } => {
                let res = if self.controller.is_submitting() {
                    self.controller.settle_submission().await
                } else {
                    self.unclaimed.take().map(|res| res.map(Some)).unwrap_or(Ok(None))
                };
                Self::reply(reply, res)
            }
            ControlRequest::Snapshot { reply } => {
                Self::reply(reply, self.controller.session().clone())
            }
            ControlRequest::Flush { reply } => {
                let res = self.controller.flush_pending_writes().await;
                Self::reply(reply, res)
            }
        }
    }

    async fn run(mut self) -> Session {
        debug!("starting the workflow controller");

        loop {
            match self.next_event().await {
                ControlEvent::Request(Some(request)) => self.handle_request(request).await,
                ControlEvent::Request(None) => break,
                ControlEvent::SubmissionFinished(joined) => {
                    let res = self.controller.complete_submission(joined);
                    if let Some(previous) = self.unclaimed.replace(res) {
                        trace!("discarding unclaimed submission result: {previous:?}");
                    }
                }
            }
        }

        debug!("all workflow handles have been dropped");
        if self.controller.is_submitting() {
            warn!("waiting for the pending submission before shutting down");
            if let Err(err) = self.controller.settle_submission().await {
                error!("the pending submission has failed: {err}");
            }
        }
        if let Err(err) = self.controller.flush_pending_writes().await {
            error!("failed to persist the session before shutting down: {err}");
        }
        self.controller.session().clone()
    }
}

impl<C, B> WorkflowController<C, B>
where
    C: ChainClient + ?Sized + 'static,
    B: KeyValueBackend + ?Sized + 'static,
{
    /// Moves the controller onto its own task. The task keeps running until
    /// every [`WorkflowHandle`] is dropped, after which it settles the pending
    /// submission, flushes outstanding writes and returns the final session.
    pub fn start(self) -> (WorkflowHandle, JoinHandle<Session>) {
        let (sender, receiver) = mpsc::unbounded_channel();
        let task = ControllerTask {
            controller: self,
            receiver,
            unclaimed: None,
        };
        (WorkflowHandle { sender }, tokio::spawn(task.run()))
    }
}
