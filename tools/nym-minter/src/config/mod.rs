// Copyright 2024 - Nym Technologies SA <contact@nymtech.net>
// SPDX-License-Identifier: Apache-2.0

use crate::config::template::CONFIG_TEMPLATE;
use crate::error::MinterCliError;
use crate::logging::LoggingSettings;
use handlebars::Handlebars;
use nym_minter_chain::network::{
    ESPACE_MAINNET_CHAIN_ID, ESPACE_MAINNET_RPC_URL, ESPACE_TESTNET_CHAIN_ID,
};
use nym_minter_chain::AcceptedNetworks;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info};
use url::Url;

mod template;

pub(crate) const DEFAULT_MINTER_ID: &str = "default";

const NYM_DIR: &str = ".nym";
const DEFAULT_MINTER_DIR: &str = "minter";
const DEFAULT_CONFIG_DIR: &str = "config";
const DEFAULT_DATA_DIR: &str = "data";
const DEFAULT_CONFIG_FILENAME: &str = "config.toml";
const DEFAULT_DATABASE_FILENAME: &str = "minter.sqlite";

fn minters_directory() -> Result<PathBuf, MinterCliError> {
    dirs::home_dir()
        .map(|home| home.join(NYM_DIR).join(DEFAULT_MINTER_DIR))
        .ok_or(MinterCliError::HomeDirUnavailable)
}

/// Get default path to minter's config directory.
/// It should get resolved to `$HOME/.nym/minter/<id>/config`
pub(crate) fn default_config_directory(id: &str) -> Result<PathBuf, MinterCliError> {
    Ok(minters_directory()?.join(id).join(DEFAULT_CONFIG_DIR))
}

/// Get default path to minter's config file.
/// It should get resolved to `$HOME/.nym/minter/<id>/config/config.toml`
pub(crate) fn default_config_filepath(id: &str) -> Result<PathBuf, MinterCliError> {
    Ok(default_config_directory(id)?.join(DEFAULT_CONFIG_FILENAME))
}

/// Get default path to minter's data directory.
/// It should get resolved to `$HOME/.nym/minter/<id>/data`
pub(crate) fn default_data_directory(id: &str) -> Result<PathBuf, MinterCliError> {
    Ok(minters_directory()?.join(id).join(DEFAULT_DATA_DIR))
}

#[derive(Debug, Clone, Deserialize, PartialEq, Eq, Serialize)]
#[serde(deny_unknown_fields)]
pub(crate) struct Config {
    // additional metadata holding on-disk location of this config file
    #[serde(skip)]
    pub(crate) save_path: Option<PathBuf>,

    pub(crate) minter: Minter,

    pub(crate) chain: Chain,

    pub(crate) storage: StoragePaths,

    #[serde(default)]
    pub(crate) logging: LoggingSettings,
}

#[derive(Debug, Clone, Deserialize, PartialEq, Eq, Serialize)]
#[serde(deny_unknown_fields)]
pub(crate) struct Minter {
    /// Human readable ID of this particular minter instance.
    pub(crate) id: String,
}

#[derive(Debug, Clone, Deserialize, PartialEq, Eq, Serialize)]
#[serde(deny_unknown_fields)]
pub(crate) struct Chain {
    pub(crate) rpc_url: Url,

    pub(crate) mainnet_chain_id: u64,

    pub(crate) testnet_chain_id: u64,

    /// An empty path is treated the same as no path.
    pub(crate) artifact_path: Option<PathBuf>,
}

#[derive(Debug, Clone, Deserialize, PartialEq, Eq, Serialize)]
#[serde(deny_unknown_fields)]
pub(crate) struct StoragePaths {
    pub(crate) database_path: PathBuf,
}

impl Config {
    pub(crate) fn new(id: impl Into<String>) -> Result<Self, MinterCliError> {
        let id = id.into();
        let database_path = default_data_directory(&id)?.join(DEFAULT_DATABASE_FILENAME);
        Ok(Config {
            save_path: None,
            minter: Minter { id },
            chain: Chain {
                rpc_url: ESPACE_MAINNET_RPC_URL.parse()?,
                mainnet_chain_id: ESPACE_MAINNET_CHAIN_ID,
                testnet_chain_id: ESPACE_TESTNET_CHAIN_ID,
                artifact_path: None,
            },
            storage: StoragePaths { database_path },
            logging: Default::default(),
        })
    }

    pub(crate) fn accepted_networks(&self) -> AcceptedNetworks {
        AcceptedNetworks::new(self.chain.mainnet_chain_id, self.chain.testnet_chain_id)
    }

    pub(crate) fn artifact_path(&self) -> Option<&Path> {
        self.chain
            .artifact_path
            .as_deref()
            .filter(|path| !path.as_os_str().is_empty())
    }

    pub(crate) fn database_path(&self) -> &Path {
        &self.storage.database_path
    }

    pub(crate) fn render(&self) -> Result<String, MinterCliError> {
        let mut registry = Handlebars::new();
        registry.register_escape_fn(handlebars::no_escape);
        Ok(registry.render_template(CONFIG_TEMPLATE, self)?)
    }

    pub(crate) fn save_to_path<P: AsRef<Path>>(&self, path: P) -> Result<(), MinterCliError> {
        let path = path.as_ref();
        let save_failure = |source| MinterCliError::ConfigSaveFailure {
            id: self.minter.id.clone(),
            path: path.to_path_buf(),
            source,
        };

        info!("saving config file to {}", path.display());
        let rendered = self.render()?;
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(save_failure)?;
        }
        fs::write(path, rendered).map_err(save_failure)
    }

    pub(crate) fn read_from_path<P: AsRef<Path>>(
        id: &str,
        path: P,
    ) -> Result<Self, MinterCliError> {
        let path = path.as_ref();
        let raw = fs::read_to_string(path).map_err(|source| MinterCliError::ConfigLoadFailure {
            id: id.to_string(),
            path: path.to_path_buf(),
            source,
        })?;

        let mut loaded: Config =
            toml::from_str(&raw).map_err(|source| MinterCliError::MalformedConfig {
                path: path.to_path_buf(),
                source,
            })?;
        loaded.save_path = Some(path.to_path_buf());
        debug!("loaded config file from {}", path.display());
        Ok(loaded)
    }
}

pub(crate) fn try_load_current_config(id: &str) -> Result<Config, MinterCliError> {
    Config::read_from_path(id, default_config_filepath(id)?)
}
