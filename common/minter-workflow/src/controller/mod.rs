// Copyright 2024 - Nym Technologies SA <contact@nymtech.net>
// SPDX-License-Identifier: Apache-2.0

use crate::command::WorkflowCommand;
use crate::error::WorkflowError;
use crate::notification::{self, Notifier};
use crate::session::{ImageRecord, Session};
use crate::stage::{DeployStage, Stage};
use nym_minter_chain::{
    parse_contract_address, Address, Admissibility, ChainClient, ContractValidator, DeployError,
    DeploymentExecutor, InadmissibleReason, WalletState,
};
use nym_minter_storage::backend::KeyValueBackend;
use nym_minter_storage::models::append_unique;
use nym_minter_storage::{
    ContractRegistryEntry, Metadata, MinterStorageError, PersistHandle, RegistryStore, StoreKey,
};
use std::future;
use std::sync::Arc;
use tokio::task::{JoinError, JoinHandle};
use tracing::{debug, error, info, instrument, warn};

#[cfg(test)]
mod tests;

/// Result of a deployment or import that ran in the background.
#[derive(Debug)]
pub(crate) enum SubmissionOutcome {
    Deployment {
        name: String,
        token_symbol: String,
        result: Result<Address, DeployError>,
    },
    Import {
        // as entered by the user, after trimming
        entered: String,
        address: Address,
        admissibility: Admissibility,
    },
}

impl SubmissionOutcome {
    fn origin(&self) -> DeployStage {
        match self {
            SubmissionOutcome::Deployment { .. } => DeployStage::DeployForm,
            SubmissionOutcome::Import { .. } => DeployStage::ImportForm,
        }
    }
}

/// Drives the contract deployment/import workflow of a single session.
///
/// The controller is the only writer of the [`Session`]. Chain calls run on
/// their own task so that the user may leave a form while a submission is
/// still pending; their result is applied once [`Self::settle_submission`]
/// (or the task started through [`Self::start`]) picks it up.
pub struct WorkflowController<C: ?Sized, B: ?Sized> {
    session: Session,
    chain: Arc<C>,
    store: RegistryStore<B>,
    validator: ContractValidator,
    executor: DeploymentExecutor,
    notifier: Notifier,

    in_flight: Option<JoinHandle<SubmissionOutcome>>,
    pending_writes: Vec<PersistHandle>,
}

impl<C, B> WorkflowController<C, B>
where
    C: ChainClient + ?Sized + 'static,
    B: KeyValueBackend + ?Sized + 'static,
{
    pub fn new(
        chain: Arc<C>,
        store: RegistryStore<B>,
        executor: DeploymentExecutor,
        notifier: Notifier,
    ) -> Self {
        WorkflowController {
            session: Session::default(),
            chain,
            store,
            validator: ContractValidator::default(),
            executor,
            notifier,
            in_flight: None,
            pending_writes: Vec::new(),
        }
    }

    /// Creates a controller whose session is restored from the store.
    pub async fn resume(
        chain: Arc<C>,
        store: RegistryStore<B>,
        executor: DeploymentExecutor,
        notifier: Notifier,
    ) -> Result<Self, WorkflowError> {
        let persisted = store.load_session().await?;
        debug!(
            "resuming session with {} stored contracts",
            persisted.stored_contracts.len()
        );

        let mut controller = Self::new(chain, store, executor, notifier);
        controller.session = Session::resume(persisted);
        Ok(controller)
    }

    #[must_use]
    pub fn with_validator(mut self, validator: ContractValidator) -> Self {
        self.validator = validator;
        self
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn is_submitting(&self) -> bool {
        self.in_flight.is_some()
    }

    #[instrument(skip_all, fields(stage = %self.session.stage, command = command.name()))]
    pub async fn handle_command(&mut self, command: WorkflowCommand) -> Result<(), WorkflowError> {
        self.reap_completed_writes();

        match (self.session.stage, command) {
            (Stage::Configure, WorkflowCommand::OpenContractStage) => {
                self.transition(Stage::Deploy(DeployStage::Idle));
            }
            (Stage::Deploy(DeployStage::Idle), WorkflowCommand::ChooseDeployNew) => {
                self.transition(Stage::Deploy(DeployStage::DeployForm));
            }
            (Stage::Deploy(DeployStage::Idle), WorkflowCommand::ChooseImportExisting) => {
                self.transition(Stage::Deploy(DeployStage::ImportForm));
            }
            (Stage::Deploy(DeployStage::DeployForm), WorkflowCommand::SetContractName(name)) => {
                self.session.deploy_form.name = name;
            }
            (Stage::Deploy(DeployStage::DeployForm), WorkflowCommand::SetTokenSymbol(symbol)) => {
                self.session.deploy_form.token_symbol = symbol;
            }
            (Stage::Deploy(DeployStage::ImportForm), WorkflowCommand::SetImportAddress(address)) => {
                self.session.import_form.address = address;
            }
            (
                Stage::Deploy(DeployStage::ImportForm),
                WorkflowCommand::SelectStoredContract(index),
            ) => {
                let entry = self
                    .session
                    .stored_contracts
                    .get(index)
                    .ok_or(WorkflowError::UnknownStoredContract { index })?;
                self.session.import_form.address = entry.address.clone();
            }
            (Stage::Deploy(DeployStage::DeployForm), WorkflowCommand::SubmitDeploy) => {
                self.submit_deploy().await?;
            }
            (Stage::Deploy(DeployStage::ImportForm), WorkflowCommand::SubmitImport) => {
                self.submit_import().await?;
            }
            (
                Stage::Deploy(DeployStage::DeployForm | DeployStage::ImportForm),
                WorkflowCommand::Cancel,
            ) => {
                if self.is_submitting() {
                    info!("leaving the form while the submission is still pending");
                }
                self.transition(Stage::Deploy(DeployStage::Idle));
            }
            (Stage::Configure, WorkflowCommand::SetMetadataName(name)) => {
                self.edit_metadata(|metadata| metadata.name = name);
            }
            (Stage::Configure, WorkflowCommand::SetMetadataDescription(description)) => {
                self.edit_metadata(|metadata| metadata.description = description);
            }
            (Stage::Configure, WorkflowCommand::SetMetadataCount(raw)) => {
                self.set_count(raw)?;
            }
            (Stage::Configure, WorkflowCommand::SetImages(images)) => {
                self.set_images(images);
            }
            (Stage::Configure, WorkflowCommand::Proceed) => {
                if self.session.selected_contract.is_none() {
                    return Err(WorkflowError::MissingContract);
                }
                if self.session.images.is_empty() {
                    return Err(WorkflowError::MissingImages);
                }
                self.transition(Stage::Ping);
            }
            (Stage::Ping, WorkflowCommand::PingCompleted) => self.transition(Stage::Assign),
            (Stage::Assign, WorkflowCommand::AssignCompleted) => self.transition(Stage::Confirm),
            (stage, command) => {
                return Err(WorkflowError::InvalidTransition {
                    stage,
                    command: command.name(),
                })
            }
        }
        Ok(())
    }

    fn transition(&mut self, to: Stage) {
        debug!("{} -> {to}", self.session.stage);
        self.session.stage = to;
    }

    fn edit_metadata<F>(&mut self, edit: F)
    where
        F: FnOnce(&mut Metadata),
    {
        edit(&mut self.session.metadata);
        let handle = self.store.persist_metadata(&self.session.metadata);
        self.pending_writes.push(handle);
    }

    fn set_count(&mut self, raw: String) -> Result<(), WorkflowError> {
        if !self.session.count_editable() {
            return Err(WorkflowError::CountRequiresSingleImage {
                images: self.session.images.len(),
            });
        }

        let count = match raw.trim().parse::<u32>() {
            Ok(count) => count,
            Err(source) => return Err(WorkflowError::InvalidCount { input: raw, source }),
        };
        self.edit_metadata(|metadata| metadata.count = count);
        Ok(())
    }

    fn set_images(&mut self, images: Vec<ImageRecord>) {
        let missing = images.iter().filter(|image| image.is_missing()).count();
        if missing > 0 {
            warn!("{missing} of the {} selected images have no data", images.len());
        }
        self.session.images = images;
    }

    async fn query_wallet(&self) -> Result<WalletState, WorkflowError> {
        self.chain.wallet_state().await.map_err(|err| {
            error!("failed to query the wallet state: {err}");
            self.notifier.error(notification::WALLET_UNAVAILABLE);
            err.into()
        })
    }

    fn notify_deploy_failure(&self, err: &DeployError) {
        let message = match err {
            DeployError::ValidationFailed => notification::MISSING_NAME_OR_SYMBOL,
            DeployError::WalletNotConnected => notification::CONNECT_WALLET,
            DeployError::WrongNetwork { .. } => notification::SWITCH_NETWORK,
            DeployError::SubmissionFailed { .. } => notification::DEPLOYMENT_FAILED,
        };
        self.notifier.error(message);
    }

    async fn submit_deploy(&mut self) -> Result<(), WorkflowError> {
        if self.is_submitting() {
            return Err(WorkflowError::SubmissionInFlight);
        }

        let name = self.session.deploy_form.name.clone();
        let token_symbol = self.session.deploy_form.token_symbol.clone();
        if name.is_empty() || token_symbol.is_empty() {
            self.notify_deploy_failure(&DeployError::ValidationFailed);
            return Err(DeployError::ValidationFailed.into());
        }

        let wallet = self.query_wallet().await?;
        if let Err(err) = self
            .executor
            .check_preconditions(&name, &token_symbol, &wallet)
        {
            warn!("refusing to deploy: {err}");
            self.notify_deploy_failure(&err);
            return Err(err.into());
        }

        self.notifier.info(notification::DEPLOYING_CONTRACT);
        self.session.deploying = true;

        let chain = Arc::clone(&self.chain);
        let executor = self.executor.clone();
        self.in_flight = Some(tokio::spawn(async move {
            let result = executor
                .deploy(&*chain, &name, &token_symbol, &wallet)
                .await;
            SubmissionOutcome::Deployment {
                name,
                token_symbol,
                result,
            }
        }));
        Ok(())
    }

    async fn submit_import(&mut self) -> Result<(), WorkflowError> {
        if self.is_submitting() {
            return Err(WorkflowError::SubmissionInFlight);
        }

        let trimmed = self.session.import_form.address.trim().to_string();
        self.session.import_form.address.clone_from(&trimmed);

        let address = parse_contract_address(&trimmed).inspect_err(|err| {
            debug!("rejecting import: {err}");
            self.notifier.error(notification::INVALID_ADDRESS);
        })?;

        let wallet = self.query_wallet().await?;

        self.notifier.info(notification::VALIDATING_CONTRACT);
        self.session.deploying = true;

        let chain = Arc::clone(&self.chain);
        let validator = self.validator;
        self.in_flight = Some(tokio::spawn(async move {
            let admissibility = validator.validate(&*chain, address, &wallet).await;
            SubmissionOutcome::Import {
                entered: trimmed,
                address,
                admissibility,
            }
        }));
        Ok(())
    }

    /// Resolves once the pending submission task finishes. Pending forever if
    /// nothing is in flight. Cancel safe: the task is only polled by reference.
    pub(crate) async fn join_submission(&mut self) -> Result<SubmissionOutcome, JoinError> {
        match self.in_flight.as_mut() {
            Some(task) => task.await,
            None => future::pending().await,
        }
    }

    /// Waits for the in-flight submission, if any, and applies its result.
    /// Returns the address that got selected.
    pub async fn settle_submission(&mut self) -> Result<Option<Address>, WorkflowError> {
        if !self.is_submitting() {
            return Ok(None);
        }
        let joined = self.join_submission().await;
        self.complete_submission(joined).map(Some)
    }

    pub(crate) fn complete_submission(
        &mut self,
        joined: Result<SubmissionOutcome, JoinError>,
    ) -> Result<Address, WorkflowError> {
        self.in_flight = None;
        self.session.deploying = false;

        let outcome = joined.map_err(|err| {
            error!("the submission task did not complete: {err}");
            self.notifier.error(notification::DEPLOYMENT_FAILED);
            WorkflowError::from(err)
        })?;
        self.apply_outcome(outcome)
    }

    fn apply_outcome(&mut self, outcome: SubmissionOutcome) -> Result<Address, WorkflowError> {
        let origin = outcome.origin();

        match outcome {
            SubmissionOutcome::Deployment {
                name,
                token_symbol,
                result: Ok(address),
            } => {
                let checksummed = address.to_checksum(None);
                info!("deployed '{name}' ({token_symbol}) at {checksummed}");

                self.select_contract(&checksummed, origin);
                let entry = ContractRegistryEntry::new(checksummed, name, token_symbol);
                if append_unique(&mut self.session.stored_contracts, entry) {
                    let handle = self
                        .store
                        .persist_stored_contracts(&self.session.stored_contracts);
                    self.pending_writes.push(handle);
                } else {
                    debug!("{address} is already present in the registry");
                }

                self.notifier.success(notification::CONTRACT_DEPLOYED);
                Ok(address)
            }
            SubmissionOutcome::Deployment {
                result: Err(err), ..
            } => {
                error!("contract deployment has failed: {err}");
                self.notify_deploy_failure(&err);
                Err(err.into())
            }
            SubmissionOutcome::Import {
                entered,
                address,
                admissibility: Admissibility::Admissible,
            } => {
                info!("imported contract {address}");
                self.select_contract(&entered, origin);
                self.notifier.success(notification::CONTRACT_IMPORTED);
                Ok(address)
            }
            SubmissionOutcome::Import {
                entered,
                admissibility: Admissibility::Inadmissible(reason),
                ..
            } => {
                let message = match reason {
                    InadmissibleReason::NotAuthorized => notification::MISSING_MINTER_ROLE,
                    InadmissibleReason::CallFailed => notification::VALIDATION_FAILED,
                };
                self.notifier.error(message);
                Err(WorkflowError::Inadmissible {
                    address: entered,
                    reason,
                })
            }
        }
    }

    // the contract exists regardless of where the user went in the meantime,
    // only the stage change depends on it
    fn select_contract(&mut self, address: &str, origin: DeployStage) {
        self.session.selected_contract = Some(address.to_string());
        self.session.import_form.address = address.to_string();

        let handle = self.store.persist_contract_address(address);
        self.pending_writes.push(handle);

        if self.session.stage == Stage::Deploy(origin) {
            self.transition(Stage::Configure);
        } else {
            info!(
                "submission resolved after leaving the {origin}, staying in {}",
                self.session.stage
            );
        }
    }

    fn report_write_failure(&self, key: StoreKey, err: &MinterStorageError) {
        error!("failed to persist '{key}': {err}");
        self.notifier.error(notification::SAVE_FAILED);
    }

    /// Drops the handles of writes that have already completed, reporting failures.
    pub fn reap_completed_writes(&mut self) {
        let mut failures = Vec::new();
        self.pending_writes
            .retain_mut(|handle| match handle.try_result() {
                None => true,
                Some(Ok(())) => false,
                Some(Err(err)) => {
                    failures.push((handle.key(), err));
                    false
                }
            });

        for (key, err) in failures {
            self.report_write_failure(key, &err);
        }
    }

    /// Waits for every write issued so far. The first failure is returned,
    /// every failure is reported.
    pub async fn flush_pending_writes(&mut self) -> Result<(), WorkflowError> {
        let mut first_failure = None;
        for handle in std::mem::take(&mut self.pending_writes) {
            let key = handle.key();
            if let Err(err) = handle.wait().await {
                self.report_write_failure(key, &err);
                first_failure.get_or_insert(err);
            }
        }

        match first_failure {
            Some(err) => Err(err.into()),
            None => Ok(()),
        }
    }
}
