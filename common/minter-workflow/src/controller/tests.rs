// Copyright 2024 - Nym Technologies SA <contact@nymtech.net>
// SPDX-License-Identifier: Apache-2.0

use super::*;
use crate::error::ErrorCategory;
use crate::notification::{Notification, NotificationReceiver, Severity};
use async_trait::async_trait;
use nym_minter_chain::testing::{test_artifact, MockChainClient};
use nym_minter_chain::AcceptedNetworks;
use nym_minter_storage::EphemeralBackend;
use std::time::Duration;

const IMPORTED: &str = "0xabcdef0123456789abcdef0123456789abcdef01";

struct FailingBackend;

#[async_trait]
impl KeyValueBackend for FailingBackend {
    async fn get(&self, _key: StoreKey) -> Result<Option<String>, MinterStorageError> {
        Ok(None)
    }

    async fn set(&self, _key: StoreKey, _value: String) -> Result<(), MinterStorageError> {
        Err(MinterStorageError::Unavailable {
            reason: "disk is full".to_string(),
        })
    }
}

struct TestSetup<B: ?Sized> {
    chain: MockChainClient,
    store: RegistryStore<B>,
    controller: WorkflowController<MockChainClient, B>,
    notifications: NotificationReceiver,
}

impl<B> TestSetup<B>
where
    B: KeyValueBackend + ?Sized + 'static,
{
    fn new(backend: Arc<B>) -> Self {
        let chain = MockChainClient::new();
        let store = RegistryStore::new(backend);
        let (notifier, notifications) = Notifier::new();
        let executor =
            DeploymentExecutor::new(AcceptedNetworks::default()).with_artifact(test_artifact());

        let controller =
            WorkflowController::new(Arc::new(chain.clone()), store.clone(), executor, notifier);
        TestSetup {
            chain,
            store,
            controller,
            notifications,
        }
    }

    fn connect_wallet(&self, chain_id: u64) {
        self.chain.connect(Address::with_last_byte(1), chain_id);
    }

    async fn send(&mut self, command: WorkflowCommand) -> Result<(), WorkflowError> {
        self.controller.handle_command(command).await
    }

    async fn open_deploy_form(&mut self, name: &str, symbol: &str) {
        self.send(WorkflowCommand::OpenContractStage).await.unwrap();
        self.send(WorkflowCommand::ChooseDeployNew).await.unwrap();
        self.send(WorkflowCommand::SetContractName(name.to_string()))
            .await
            .unwrap();
        self.send(WorkflowCommand::SetTokenSymbol(symbol.to_string()))
            .await
            .unwrap();
    }

    async fn open_import_form(&mut self, address: &str) {
        self.send(WorkflowCommand::OpenContractStage).await.unwrap();
        self.send(WorkflowCommand::ChooseImportExisting).await.unwrap();
        self.send(WorkflowCommand::SetImportAddress(address.to_string()))
            .await
            .unwrap();
    }

    fn notifications(&mut self) -> Vec<Notification> {
        let mut received = Vec::new();
        while let Ok(notification) = self.notifications.try_recv() {
            received.push(notification);
        }
        received
    }

    fn last_error(&mut self) -> Option<String> {
        self.notifications()
            .into_iter()
            .filter(|n| n.severity == Severity::Error)
            .map(|n| n.message)
            .last()
    }
}

fn ephemeral_setup() -> TestSetup<EphemeralBackend> {
    TestSetup::new(Arc::new(EphemeralBackend::new()))
}

fn image(name: &str) -> ImageRecord {
    ImageRecord::new(format!("data:image/png;base64,{name}"), name)
}

#[tokio::test]
async fn metadata_edits_are_written_through() {
    let mut setup = ephemeral_setup();
    setup
        .send(WorkflowCommand::SetImages(vec![image("a.png")]))
        .await
        .unwrap();

    setup
        .send(WorkflowCommand::SetMetadataName("Batch".to_string()))
        .await
        .unwrap();
    setup
        .send(WorkflowCommand::SetMetadataDescription("first".to_string()))
        .await
        .unwrap();
    setup
        .send(WorkflowCommand::SetMetadataCount("5".to_string()))
        .await
        .unwrap();
    setup
        .send(WorkflowCommand::SetMetadataDescription("second".to_string()))
        .await
        .unwrap();
    setup.controller.flush_pending_writes().await.unwrap();

    let persisted = setup.store.load_metadata().await.unwrap().unwrap();
    assert_eq!(&persisted, setup.controller.session().metadata());
    assert_eq!(persisted.description, "second");
    assert_eq!(persisted.count, 5);
}

#[tokio::test]
async fn non_numeric_count_is_rejected_without_touching_the_store() {
    let mut setup = ephemeral_setup();
    setup
        .send(WorkflowCommand::SetImages(vec![image("a.png")]))
        .await
        .unwrap();
    setup
        .send(WorkflowCommand::SetMetadataCount("3".to_string()))
        .await
        .unwrap();
    setup.controller.flush_pending_writes().await.unwrap();

    for input in ["abc", "-1", "", "2.5"] {
        let err = setup
            .send(WorkflowCommand::SetMetadataCount(input.to_string()))
            .await
            .unwrap_err();
        assert!(matches!(err, WorkflowError::InvalidCount { .. }));
        assert_eq!(err.category(), ErrorCategory::InputValidation);
    }
    setup.controller.flush_pending_writes().await.unwrap();

    assert_eq!(setup.controller.session().metadata().count, 3);
    assert_eq!(setup.store.load_metadata().await.unwrap().unwrap().count, 3);
}

#[tokio::test]
async fn count_needs_exactly_one_image() {
    let mut setup = ephemeral_setup();

    let err = setup
        .send(WorkflowCommand::SetMetadataCount("2".to_string()))
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        WorkflowError::CountRequiresSingleImage { images: 0 }
    ));

    setup
        .send(WorkflowCommand::SetImages(vec![image("a.png"), image("b.png")]))
        .await
        .unwrap();
    assert!(setup
        .send(WorkflowCommand::SetMetadataCount("2".to_string()))
        .await
        .is_err());
    assert_eq!(setup.controller.session().metadata().count, 0);
}

#[tokio::test]
async fn deploy_with_missing_fields_never_reaches_the_chain() {
    let mut setup = ephemeral_setup();
    setup.connect_wallet(71);

    for (name, symbol) in [("", "FOO"), ("Foo", ""), ("", "")] {
        setup.open_deploy_form(name, symbol).await;
        let err = setup.send(WorkflowCommand::SubmitDeploy).await.unwrap_err();

        assert!(matches!(
            err,
            WorkflowError::Deploy(DeployError::ValidationFailed)
        ));
        assert_eq!(err.category(), ErrorCategory::InputValidation);
        assert_eq!(
            setup.controller.session().stage(),
            Stage::Deploy(DeployStage::DeployForm)
        );
        assert_eq!(
            setup.last_error().as_deref(),
            Some(notification::MISSING_NAME_OR_SYMBOL)
        );

        setup.send(WorkflowCommand::Cancel).await.unwrap();
        // get back to configure for the next round
        setup.controller.session.stage = Stage::Configure;
    }

    assert_eq!(setup.chain.deploy_calls(), 0);
    assert!(!setup.controller.is_submitting());
}

#[tokio::test]
async fn deploy_form_text_is_submitted_as_entered() {
    let mut setup = ephemeral_setup();
    setup.connect_wallet(71);
    setup.open_deploy_form(" ", " FOO ").await;

    setup.send(WorkflowCommand::SubmitDeploy).await.unwrap();
    let address = setup.controller.settle_submission().await.unwrap().unwrap();
    assert_eq!(setup.chain.deploy_calls(), 1);

    assert_eq!(
        setup.chain.last_name_and_symbol(),
        Some((" ".to_string(), " FOO ".to_string()))
    );
    assert_eq!(
        setup.controller.session().stored_contracts(),
        &[ContractRegistryEntry::new(
            address.to_checksum(None),
            " ",
            " FOO "
        )]
    );
}

#[tokio::test]
async fn deploy_on_unsupported_network_never_reaches_the_chain() {
    let mut setup = ephemeral_setup();
    setup.connect_wallet(1);
    setup.open_deploy_form("Foo", "FOO").await;

    let err = setup.send(WorkflowCommand::SubmitDeploy).await.unwrap_err();
    assert!(matches!(
        err,
        WorkflowError::Deploy(DeployError::WrongNetwork { chain_id: 1, .. })
    ));
    assert_eq!(err.category(), ErrorCategory::WalletState);
    assert_eq!(
        setup.last_error().as_deref(),
        Some(notification::SWITCH_NETWORK)
    );
    assert_eq!(setup.chain.deploy_calls(), 0);
}

#[tokio::test]
async fn deploy_without_wallet_asks_for_a_connection() {
    let mut setup = ephemeral_setup();
    setup.open_deploy_form("Foo", "FOO").await;

    let err = setup.send(WorkflowCommand::SubmitDeploy).await.unwrap_err();
    assert!(matches!(
        err,
        WorkflowError::Deploy(DeployError::WalletNotConnected)
    ));
    assert_eq!(
        setup.last_error().as_deref(),
        Some(notification::CONNECT_WALLET)
    );
    assert_eq!(setup.chain.deploy_calls(), 0);
}

#[tokio::test]
async fn successful_deploy_appends_exactly_one_registry_entry() {
    let mut setup = ephemeral_setup();
    setup.connect_wallet(1030);
    setup.open_deploy_form("Foo", "FOO").await;

    setup.send(WorkflowCommand::SubmitDeploy).await.unwrap();
    assert!(setup.controller.session().is_deploying());

    let address = setup.controller.settle_submission().await.unwrap().unwrap();
    assert_eq!(setup.chain.deployed(), vec![address]);

    let session = setup.controller.session();
    assert_eq!(session.stage(), Stage::Configure);
    assert!(!session.is_deploying());
    assert_eq!(
        session.selected_contract(),
        Some(address.to_checksum(None).as_str())
    );
    assert_eq!(
        session.stored_contracts(),
        &[ContractRegistryEntry::new(
            address.to_checksum(None),
            "Foo",
            "FOO"
        )]
    );

    setup.controller.flush_pending_writes().await.unwrap();
    let persisted = setup.store.load_session().await.unwrap();
    assert_eq!(persisted.stored_contracts.len(), 1);
    assert_eq!(persisted.stored_contracts[0].name, "Foo");
    assert_eq!(
        persisted.contract_address,
        Some(address.to_checksum(None))
    );

    let messages: Vec<_> = setup
        .notifications()
        .into_iter()
        .map(|n| n.message)
        .collect();
    assert_eq!(
        messages,
        vec![
            notification::DEPLOYING_CONTRACT.to_string(),
            notification::CONTRACT_DEPLOYED.to_string()
        ]
    );
}

#[tokio::test]
async fn failed_deploy_stays_in_the_form() {
    let mut setup = ephemeral_setup();
    setup.connect_wallet(71);
    setup.chain.set_deploy_failure(true);
    setup.open_deploy_form("Foo", "FOO").await;

    setup.send(WorkflowCommand::SubmitDeploy).await.unwrap();
    let err = setup.controller.settle_submission().await.unwrap_err();
    assert_eq!(err.category(), ErrorCategory::NetworkFailure);

    let session = setup.controller.session();
    assert_eq!(session.stage(), Stage::Deploy(DeployStage::DeployForm));
    assert!(session.stored_contracts().is_empty());
    assert!(session.selected_contract().is_none());
    assert_eq!(
        setup.last_error().as_deref(),
        Some(notification::DEPLOYMENT_FAILED)
    );

    // recoverable by submitting again
    setup.chain.set_deploy_failure(false);
    setup.send(WorkflowCommand::SubmitDeploy).await.unwrap();
    assert!(setup.controller.settle_submission().await.unwrap().is_some());
    assert_eq!(setup.chain.deploy_calls(), 2);
}

#[tokio::test]
async fn import_without_wallet_is_always_admissible() {
    let mut setup = ephemeral_setup();
    setup.chain.set_role_response(Some(false));
    setup.open_import_form(IMPORTED).await;

    setup.send(WorkflowCommand::SubmitImport).await.unwrap();
    setup.controller.settle_submission().await.unwrap();

    assert_eq!(setup.controller.session().stage(), Stage::Configure);
    assert_eq!(setup.chain.role_check_calls(), 0);
}

#[tokio::test]
async fn import_with_wallet_follows_the_role_check() {
    let mut setup = ephemeral_setup();
    setup.connect_wallet(71);
    setup.chain.set_role_response(Some(false));
    setup.open_import_form(IMPORTED).await;

    setup.send(WorkflowCommand::SubmitImport).await.unwrap();
    let err = setup.controller.settle_submission().await.unwrap_err();
    assert!(matches!(
        err,
        WorkflowError::Inadmissible {
            reason: InadmissibleReason::NotAuthorized,
            ..
        }
    ));
    assert_eq!(
        setup.controller.session().stage(),
        Stage::Deploy(DeployStage::ImportForm)
    );
    assert!(setup.controller.session().selected_contract().is_none());
    assert_eq!(
        setup.last_error().as_deref(),
        Some(notification::MISSING_MINTER_ROLE)
    );

    setup.chain.set_role_response(None);
    setup.send(WorkflowCommand::SubmitImport).await.unwrap();
    assert!(matches!(
        setup.controller.settle_submission().await,
        Err(WorkflowError::Inadmissible {
            reason: InadmissibleReason::CallFailed,
            ..
        })
    ));
    assert_eq!(
        setup.controller.session().stage(),
        Stage::Deploy(DeployStage::ImportForm)
    );

    setup.chain.set_role_response(Some(true));
    setup.send(WorkflowCommand::SubmitImport).await.unwrap();
    setup.controller.settle_submission().await.unwrap();
    assert_eq!(setup.controller.session().stage(), Stage::Configure);
    assert_eq!(setup.chain.role_check_calls(), 3);
}

#[tokio::test]
async fn malformed_import_address_is_rejected_before_any_call() {
    let mut setup = ephemeral_setup();
    setup.connect_wallet(71);
    setup.open_import_form("0x1234").await;

    let err = setup.send(WorkflowCommand::SubmitImport).await.unwrap_err();
    assert!(matches!(err, WorkflowError::InvalidAddress(_)));
    assert_eq!(err.category(), ErrorCategory::InputValidation);
    assert!(!setup.controller.is_submitting());
    assert_eq!(setup.chain.role_check_calls(), 0);
    assert_eq!(
        setup.last_error().as_deref(),
        Some(notification::INVALID_ADDRESS)
    );
}

#[tokio::test]
async fn importing_an_existing_contract_end_to_end() {
    let mut setup = ephemeral_setup();
    assert_eq!(setup.controller.session().stage(), Stage::Configure);

    let typed = "0xABCDEF0123456789ABCDEF0123456789ABCDEF01";
    setup.open_import_form(&format!("  {typed} ")).await;
    setup.send(WorkflowCommand::SubmitImport).await.unwrap();
    let address = setup.controller.settle_submission().await.unwrap().unwrap();
    setup.controller.flush_pending_writes().await.unwrap();

    let expected = IMPORTED.parse::<Address>().unwrap();
    assert_eq!(address, expected);

    // the address is kept the way it was typed, only trimmed
    let session = setup.controller.session();
    assert_eq!(session.stage(), Stage::Configure);
    assert_eq!(session.selected_contract(), Some(typed));
    assert_eq!(session.import_form().address, typed);
    assert_eq!(
        setup.store.load_contract_address().await.unwrap().as_deref(),
        Some(typed)
    );
    // imports never touch the registry of deployed contracts
    assert!(session.stored_contracts().is_empty());
}

#[tokio::test]
async fn second_submission_is_rejected_while_one_is_in_flight() {
    let mut setup = ephemeral_setup();
    setup.connect_wallet(71);
    let gate = setup.chain.hold_deployments();
    setup.open_deploy_form("Foo", "FOO").await;

    setup.send(WorkflowCommand::SubmitDeploy).await.unwrap();
    assert!(matches!(
        setup.send(WorkflowCommand::SubmitDeploy).await,
        Err(WorkflowError::SubmissionInFlight)
    ));

    gate.notify_one();
    setup.controller.settle_submission().await.unwrap();
    assert_eq!(setup.chain.deploy_calls(), 1);
}

#[tokio::test]
async fn result_arriving_after_cancel_is_still_recorded() {
    let mut setup = ephemeral_setup();
    setup.connect_wallet(71);
    let gate = setup.chain.hold_deployments();
    setup.open_deploy_form("Foo", "FOO").await;

    setup.send(WorkflowCommand::SubmitDeploy).await.unwrap();
    setup.send(WorkflowCommand::Cancel).await.unwrap();
    assert_eq!(
        setup.controller.session().stage(),
        Stage::Deploy(DeployStage::Idle)
    );

    gate.notify_one();
    let address = setup.controller.settle_submission().await.unwrap().unwrap();

    let session = setup.controller.session();
    assert_eq!(session.stage(), Stage::Deploy(DeployStage::Idle));
    assert_eq!(
        session.selected_contract(),
        Some(address.to_checksum(None).as_str())
    );
    assert_eq!(session.stored_contracts().len(), 1);
}

#[tokio::test]
async fn commands_without_a_transition_leave_the_session_untouched() {
    let mut setup = ephemeral_setup();
    let before = setup.controller.session().clone();

    for command in [
        WorkflowCommand::ChooseDeployNew,
        WorkflowCommand::SubmitImport,
        WorkflowCommand::Cancel,
        WorkflowCommand::PingCompleted,
        WorkflowCommand::SetContractName("Foo".to_string()),
    ] {
        let err = setup.send(command).await.unwrap_err();
        assert!(matches!(
            err,
            WorkflowError::InvalidTransition {
                stage: Stage::Configure,
                ..
            }
        ));
    }
    assert_eq!(setup.controller.session(), &before);

    setup.send(WorkflowCommand::OpenContractStage).await.unwrap();
    assert!(setup
        .send(WorkflowCommand::SetMetadataName("nope".to_string()))
        .await
        .is_err());
    assert_eq!(setup.controller.session().metadata().name, "");
}

#[tokio::test]
async fn proceeding_requires_a_contract_and_images() {
    let mut setup = ephemeral_setup();
    assert!(matches!(
        setup.send(WorkflowCommand::Proceed).await,
        Err(WorkflowError::MissingContract)
    ));

    setup.open_import_form(IMPORTED).await;
    setup.send(WorkflowCommand::SubmitImport).await.unwrap();
    setup.controller.settle_submission().await.unwrap();
    assert!(matches!(
        setup.send(WorkflowCommand::Proceed).await,
        Err(WorkflowError::MissingImages)
    ));

    setup
        .send(WorkflowCommand::SetImages(vec![image("a.png")]))
        .await
        .unwrap();
    setup.send(WorkflowCommand::Proceed).await.unwrap();
    assert_eq!(setup.controller.session().stage(), Stage::Ping);

    setup.send(WorkflowCommand::PingCompleted).await.unwrap();
    setup.send(WorkflowCommand::AssignCompleted).await.unwrap();
    let stage = setup.controller.session().stage();
    assert_eq!(stage, Stage::Confirm);
    assert!(stage.is_terminal());
    assert!(setup.controller.session().selected_contract().is_some());
}

#[tokio::test]
async fn stored_contracts_can_be_selected_for_import() {
    let backend = Arc::new(EphemeralBackend::new());
    let entries = vec![
        ContractRegistryEntry::new("0x5FbDB2315678afecb367f032d93F642f64180aa3", "Foo", "FOO"),
        ContractRegistryEntry::new(IMPORTED, "Bar", "BAR"),
    ];
    backend
        .set(
            StoreKey::StoredContracts,
            serde_json::to_string(&entries).unwrap(),
        )
        .await
        .unwrap();

    let mut setup = TestSetup::new(backend);
    let executor = DeploymentExecutor::default();
    let (notifier, _notifications) = Notifier::new();
    setup.controller = WorkflowController::resume(
        Arc::new(setup.chain.clone()),
        setup.store.clone(),
        executor,
        notifier,
    )
    .await
    .unwrap();
    assert_eq!(setup.controller.session().stored_contracts(), &entries[..]);

    setup.send(WorkflowCommand::OpenContractStage).await.unwrap();
    setup.send(WorkflowCommand::ChooseImportExisting).await.unwrap();
    setup
        .send(WorkflowCommand::SelectStoredContract(1))
        .await
        .unwrap();
    assert_eq!(setup.controller.session().import_form().address, IMPORTED);

    assert!(matches!(
        setup.send(WorkflowCommand::SelectStoredContract(2)).await,
        Err(WorkflowError::UnknownStoredContract { index: 2 })
    ));
}

#[tokio::test]
async fn persistence_failures_surface_on_flush() {
    let mut setup = TestSetup::new(Arc::new(FailingBackend));

    setup
        .send(WorkflowCommand::SetMetadataName("Batch".to_string()))
        .await
        .unwrap();
    // the in-memory state is authoritative regardless
    assert_eq!(setup.controller.session().metadata().name, "Batch");

    let err = setup.controller.flush_pending_writes().await.unwrap_err();
    assert_eq!(err.category(), ErrorCategory::PersistenceFailure);
    assert_eq!(setup.last_error().as_deref(), Some(notification::SAVE_FAILED));

    // nothing is retried
    setup.controller.flush_pending_writes().await.unwrap();
}

#[tokio::test]
async fn controller_task_applies_background_results() {
    let setup = ephemeral_setup();
    let (handle, task) = setup.controller.start();

    handle.send(WorkflowCommand::OpenContractStage).await.unwrap();
    handle
        .send(WorkflowCommand::ChooseImportExisting)
        .await
        .unwrap();
    handle
        .send(WorkflowCommand::SetImportAddress(IMPORTED.to_string()))
        .await
        .unwrap();
    handle.send(WorkflowCommand::SubmitImport).await.unwrap();

    let mut stage = handle.snapshot().await.unwrap().stage();
    for _ in 0..100 {
        if stage == Stage::Configure {
            break;
        }
        tokio::time::sleep(Duration::from_millis(10)).await;
        stage = handle.snapshot().await.unwrap().stage();
    }
    assert_eq!(stage, Stage::Configure);

    // the result is handed out exactly once
    let address = handle.settle().await.unwrap();
    assert_eq!(address, Some(IMPORTED.parse().unwrap()));
    assert_eq!(handle.settle().await.unwrap(), None);

    handle.flush().await.unwrap();
    drop(handle);

    let session = task.await.unwrap();
    assert_eq!(session.selected_contract(), Some(IMPORTED));
    assert_eq!(
        setup.store.load_contract_address().await.unwrap().as_deref(),
        session.selected_contract()
    );
}

#[tokio::test]
async fn stopped_controller_rejects_requests() {
    let setup = ephemeral_setup();
    let (handle, task) = setup.controller.start();
    task.abort();
    let _ = task.await;

    assert!(matches!(
        handle.send(WorkflowCommand::OpenContractStage).await,
        Err(WorkflowError::ControllerShutdown)
    ));
}
