// Copyright 2024 - Nym Technologies SA <contact@nymtech.net>
// SPDX-License-Identifier: Apache-2.0

use crate::stage::Stage;
use nym_minter_chain::{AddressError, ChainClientError, DeployError, InadmissibleReason};
use nym_minter_storage::MinterStorageError;
use serde::Serialize;
use std::num::ParseIntError;
use thiserror::Error;
use tokio::task::JoinError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorCategory {
    InputValidation,
    WalletState,
    NetworkFailure,
    PersistenceFailure,
    Workflow,
}

#[derive(Debug, Error)]
pub enum WorkflowError {
    #[error("'{command}' is not allowed in the {stage} stage")]
    InvalidTransition { stage: Stage, command: &'static str },

    #[error(transparent)]
    InvalidAddress(#[from] AddressError),

    #[error("'{input}' is not a valid count: {source}")]
    InvalidCount {
        input: String,
        #[source]
        source: ParseIntError,
    },

    #[error("the count can only be changed with exactly one image selected (currently {images})")]
    CountRequiresSingleImage { images: usize },

    #[error("there is no stored contract at position {index}")]
    UnknownStoredContract { index: usize },

    #[error("another submission is still in flight")]
    SubmissionInFlight,

    #[error("no contract has been selected")]
    MissingContract,

    #[error("no images have been selected")]
    MissingImages,

    #[error(transparent)]
    Deploy(#[from] DeployError),

    #[error("contract {address} can't be used: {reason}")]
    Inadmissible {
        address: String,
        reason: InadmissibleReason,
    },

    #[error("failed to persist the session: {0}")]
    Storage(#[from] MinterStorageError),

    #[error("failed to query the wallet: {0}")]
    WalletQuery(#[from] ChainClientError),

    #[error("the submission task has failed: {0}")]
    SubmissionTaskFailure(#[from] JoinError),

    #[error("the workflow controller is no longer running")]
    ControllerShutdown,
}

impl WorkflowError {
    pub fn category(&self) -> ErrorCategory {
        match self {
            WorkflowError::InvalidAddress(_)
            | WorkflowError::InvalidCount { .. }
            | WorkflowError::CountRequiresSingleImage { .. }
            | WorkflowError::UnknownStoredContract { .. }
            | WorkflowError::MissingContract
            | WorkflowError::MissingImages
            | WorkflowError::Deploy(DeployError::ValidationFailed) => ErrorCategory::InputValidation,
            WorkflowError::Deploy(DeployError::WalletNotConnected)
            | WorkflowError::Deploy(DeployError::WrongNetwork { .. })
            | WorkflowError::WalletQuery(_) => ErrorCategory::WalletState,
            WorkflowError::Deploy(DeployError::SubmissionFailed { .. })
            | WorkflowError::Inadmissible { .. } => ErrorCategory::NetworkFailure,
            WorkflowError::Storage(_) => ErrorCategory::PersistenceFailure,
            WorkflowError::InvalidTransition { .. }
            | WorkflowError::SubmissionInFlight
            | WorkflowError::SubmissionTaskFailure(_)
            | WorkflowError::ControllerShutdown => ErrorCategory::Workflow,
        }
    }
}
