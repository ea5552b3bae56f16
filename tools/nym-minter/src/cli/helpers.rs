// Copyright 2024 - Nym Technologies SA <contact@nymtech.net>
// SPDX-License-Identifier: Apache-2.0

use crate::config::{try_load_current_config, Config, DEFAULT_MINTER_ID};
use crate::error::MinterCliError;
use crate::output::OutputFormat;
use nym_minter_chain::{ContractArtifact, DeploymentExecutor, EvmClient};
use nym_minter_storage::{PersistentBackend, RegistryStore};
use nym_minter_workflow::{
    NotificationReceiver, Notifier, Session, WorkflowCommand, WorkflowController, WorkflowHandle,
};
use std::sync::Arc;
use tokio::task::JoinHandle;
use tracing::{debug, warn};
use url::Url;

#[derive(clap::Args, Debug, Clone)]
pub(crate) struct CommonArgs {
    /// Id of the minter instance to use.
    #[arg(long, env = "NYM_MINTER_ID", default_value = DEFAULT_MINTER_ID)]
    pub(crate) id: String,

    /// Hex encoded private key of the account used for deployments and role checks.
    /// Without it the wallet is treated as disconnected.
    #[arg(long, env = "NYM_MINTER_PRIVATE_KEY", hide_env_values = true)]
    pub(crate) private_key: Option<String>,

    /// Overrides the rpc endpoint set in the config file.
    #[arg(long)]
    pub(crate) rpc_url: Option<Url>,

    #[arg(short, long, default_value_t = OutputFormat::default())]
    pub(crate) output: OutputFormat,
}

pub(crate) struct MinterContext {
    pub(crate) config: Config,
    pub(crate) chain: Arc<EvmClient>,
    pub(crate) store: RegistryStore<PersistentBackend>,
}

impl MinterContext {
    pub(crate) async fn load(args: &CommonArgs) -> Result<Self, MinterCliError> {
        let config = try_load_current_config(&args.id)?;

        let rpc_url = args
            .rpc_url
            .clone()
            .unwrap_or_else(|| config.chain.rpc_url.clone());
        debug!("using rpc endpoint at {rpc_url}");
        let chain = EvmClient::new_with_private_key(rpc_url, args.private_key.as_deref())?;

        let backend = PersistentBackend::init(config.database_path()).await?;
        let store = RegistryStore::new(Arc::new(backend));

        Ok(MinterContext {
            config,
            chain: Arc::new(chain),
            store,
        })
    }

    fn executor(&self) -> Result<DeploymentExecutor, MinterCliError> {
        let executor = DeploymentExecutor::new(self.config.accepted_networks());
        match self.config.artifact_path() {
            Some(path) => Ok(executor.with_artifact(ContractArtifact::load(path)?)),
            None => {
                debug!("no contract artifact has been configured");
                Ok(executor)
            }
        }
    }

    pub(crate) async fn start_workflow(
        &self,
        output: OutputFormat,
    ) -> Result<RunningWorkflow, MinterCliError> {
        let (notifier, notifications) = Notifier::new();
        let controller = WorkflowController::resume(
            Arc::clone(&self.chain),
            self.store.clone(),
            self.executor()?,
            notifier,
        )
        .await?;

        let (handle, controller_task) = controller.start();
        Ok(RunningWorkflow {
            handle,
            controller_task,
            printer: spawn_notification_printer(notifications, output),
        })
    }
}

pub(crate) struct RunningWorkflow {
    pub(crate) handle: WorkflowHandle,
    controller_task: JoinHandle<Session>,
    printer: JoinHandle<()>,
}

impl RunningWorkflow {
    pub(crate) async fn send_all<I>(&self, commands: I) -> Result<(), MinterCliError>
    where
        I: IntoIterator<Item = WorkflowCommand>,
    {
        for command in commands {
            self.handle.send(command).await?;
        }
        Ok(())
    }

    /// Stops the controller once all of its writes have landed and returns the final session.
    pub(crate) async fn finish(self) -> Result<Session, MinterCliError> {
        let flushed = self.handle.flush().await;
        drop(self.handle);

        let session = self.controller_task.await?;
        if self.printer.await.is_err() {
            warn!("the notification printer has crashed");
        }
        flushed?;
        Ok(session)
    }
}

fn spawn_notification_printer(
    mut notifications: NotificationReceiver,
    output: OutputFormat,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        while let Some(notification) = notifications.recv().await {
            // keep stdout parseable when printing json
            if output.is_json() {
                eprintln!("{notification}")
            } else {
                println!("{notification}")
            }
        }
    })
}
