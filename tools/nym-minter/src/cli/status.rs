// Copyright 2024 - Nym Technologies SA <contact@nymtech.net>
// SPDX-License-Identifier: Apache-2.0

use crate::cli::helpers::{CommonArgs, MinterContext};
use crate::error::MinterCliError;
use nym_minter_chain::ChainClient;
use nym_minter_storage::Metadata;
use nym_minter_workflow::{Session, Stage};
use serde::Serialize;
use std::fmt::{Display, Formatter};
use tracing::warn;

#[derive(clap::Args, Debug)]
pub(crate) struct Args {
    #[command(flatten)]
    common: CommonArgs,
}

#[derive(Debug, Serialize)]
struct StatusResults {
    id: String,
    wallet: String,
    accepted_networks: String,
    deployments_enabled: bool,
    stage: Stage,
    selected_contract: Option<String>,
    stored_contracts: usize,
    metadata: Metadata,
}

impl Display for StatusResults {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "minter: {}", self.id)?;
        writeln!(f, "wallet: {}", self.wallet)?;
        writeln!(f, "accepted networks: {}", self.accepted_networks)?;
        writeln!(f, "deployments enabled: {}", self.deployments_enabled)?;
        writeln!(f, "stage: {}", self.stage)?;
        writeln!(
            f,
            "selected contract: {}",
            self.selected_contract.as_deref().unwrap_or("none")
        )?;
        writeln!(f, "stored contracts: {}", self.stored_contracts)?;
        write!(
            f,
            "metadata: '{}' - '{}' (count: {})",
            self.metadata.name, self.metadata.description, self.metadata.count
        )
    }
}

pub(crate) async fn execute(args: Args) -> Result<(), MinterCliError> {
    let context = MinterContext::load(&args.common).await?;

    let wallet = match context.chain.wallet_state().await {
        Ok(wallet) => wallet.to_string(),
        Err(err) => {
            warn!("failed to query the wallet: {err}");
            "unavailable".to_string()
        }
    };
    let session = Session::resume(context.store.load_session().await?);

    args.common.output.to_stdout(&StatusResults {
        id: context.config.minter.id.clone(),
        wallet,
        accepted_networks: context.config.accepted_networks().to_string(),
        deployments_enabled: context.config.artifact_path().is_some(),
        stage: session.stage(),
        selected_contract: session.selected_contract().map(ToString::to_string),
        stored_contracts: session.stored_contracts().len(),
        metadata: session.metadata().clone(),
    });
    Ok(())
}
