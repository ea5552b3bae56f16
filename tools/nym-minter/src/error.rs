// Copyright 2024 - Nym Technologies SA <contact@nymtech.net>
// SPDX-License-Identifier: Apache-2.0

use nym_minter_chain::ChainClientError;
use nym_minter_storage::MinterStorageError;
use nym_minter_workflow::WorkflowError;
use std::io;
use std::path::PathBuf;
use thiserror::Error;
use tokio::task::JoinError;

#[derive(Debug, Error)]
pub(crate) enum MinterCliError {
    #[error("could not determine the home directory of the current user")]
    HomeDirUnavailable,

    #[error("failed to load config file for id {id} using path '{}'. detailed message: {source}", path.display())]
    ConfigLoadFailure {
        id: String,
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("config file at '{}' is malformed: {source}", path.display())]
    MalformedConfig {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("failed to save config file for id {id} using path '{}'. detailed message: {source}", path.display())]
    ConfigSaveFailure {
        id: String,
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("failed to render the config template: {source}")]
    ConfigRenderFailure {
        #[from]
        source: handlebars::TemplateRenderError,
    },

    #[error("the provided url is malformed: {source}")]
    MalformedUrl {
        #[from]
        source: url::ParseError,
    },

    #[error("minter '{id}' has already been initialised at '{}'. use --force to overwrite it", path.display())]
    AlreadyInitialised { id: String, path: PathBuf },

    #[error("failed to initialise the path at '{}': {source}", path.display())]
    PathInitFailure {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error(transparent)]
    StorageFailure(#[from] MinterStorageError),

    #[error(transparent)]
    ChainFailure(#[from] ChainClientError),

    #[error(transparent)]
    WorkflowFailure(#[from] WorkflowError),

    #[error("the workflow controller task has crashed: {source}")]
    ControllerTaskFailure {
        #[from]
        source: JoinError,
    },
}
