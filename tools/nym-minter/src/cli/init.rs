// Copyright 2024 - Nym Technologies SA <contact@nymtech.net>
// SPDX-License-Identifier: Apache-2.0

use crate::config::{default_config_filepath, Config, DEFAULT_MINTER_ID};
use crate::error::MinterCliError;
use crate::output::OutputFormat;
use nym_minter_chain::ContractArtifact;
use nym_minter_storage::PersistentBackend;
use serde::Serialize;
use std::fmt::{Display, Formatter};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{info, trace};
use url::Url;

#[derive(clap::Args, Debug)]
pub(crate) struct Args {
    /// Id of the minter instance to create.
    #[arg(long, env = "NYM_MINTER_ID", default_value = DEFAULT_MINTER_ID)]
    id: String,

    /// JSON-RPC endpoint of the EVM node.
    /// default: Conflux eSpace mainnet
    #[arg(long)]
    rpc_url: Option<Url>,

    /// Chain id of the network treated as mainnet.
    #[arg(long)]
    mainnet_chain_id: Option<u64>,

    /// Chain id of the network treated as testnet.
    #[arg(long)]
    testnet_chain_id: Option<u64>,

    /// Path to the compiled contract artifact used for deployments.
    #[arg(long)]
    artifact: Option<PathBuf>,

    /// Custom location of the minter database.
    #[arg(long)]
    database_path: Option<PathBuf>,

    /// Overwrite an existing configuration.
    #[arg(long)]
    force: bool,

    #[arg(short, long, default_value_t = OutputFormat::default())]
    output: OutputFormat,
}

impl Args {
    fn override_config(&self, config: &mut Config) {
        if let Some(rpc_url) = &self.rpc_url {
            config.chain.rpc_url = rpc_url.clone();
        }
        if let Some(mainnet_chain_id) = self.mainnet_chain_id {
            config.chain.mainnet_chain_id = mainnet_chain_id;
        }
        if let Some(testnet_chain_id) = self.testnet_chain_id {
            config.chain.testnet_chain_id = testnet_chain_id;
        }
        if let Some(artifact) = &self.artifact {
            config.chain.artifact_path = Some(artifact.clone());
        }
        if let Some(database_path) = &self.database_path {
            config.storage.database_path = database_path.clone();
        }
    }
}

#[derive(Debug, Serialize)]
struct InitResults {
    id: String,
    config_path: PathBuf,
    database_path: PathBuf,
    artifact: Option<String>,
}

impl Display for InitResults {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "initialised minter '{}'", self.id)?;
        writeln!(f, "config: {}", self.config_path.display())?;
        write!(f, "database: {}", self.database_path.display())?;
        if let Some(artifact) = &self.artifact {
            write!(f, "\ncontract artifact: {artifact}")?;
        }
        Ok(())
    }
}

fn init_path(path: &Path) -> Result<(), MinterCliError> {
    trace!("initialising {}", path.display());
    fs::create_dir_all(path).map_err(|source| MinterCliError::PathInitFailure {
        path: path.to_path_buf(),
        source,
    })
}

pub(crate) async fn execute(args: Args) -> Result<(), MinterCliError> {
    let config_path = default_config_filepath(&args.id)?;
    if config_path.exists() && !args.force {
        return Err(MinterCliError::AlreadyInitialised {
            id: args.id,
            path: config_path,
        });
    }

    let mut config = Config::new(&args.id)?;
    args.override_config(&mut config);

    // fail early rather than on the first deployment
    let artifact = config
        .artifact_path()
        .map(ContractArtifact::load)
        .transpose()?
        .map(|artifact| artifact.name().to_string());

    if let Some(data_dir) = config.database_path().parent() {
        init_path(data_dir)?;
    }
    // creates the database and applies the migrations
    PersistentBackend::init(config.database_path()).await?;

    config.save_to_path(&config_path)?;
    info!("minter '{}' has been initialised", args.id);

    args.output.to_stdout(&InitResults {
        id: args.id.clone(),
        config_path,
        database_path: config.database_path().to_path_buf(),
        artifact,
    });
    Ok(())
}
