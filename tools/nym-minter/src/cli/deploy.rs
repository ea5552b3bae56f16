// Copyright 2024 - Nym Technologies SA <contact@nymtech.net>
// SPDX-License-Identifier: Apache-2.0

use crate::cli::helpers::{CommonArgs, MinterContext};
use crate::error::MinterCliError;
use nym_minter_workflow::WorkflowCommand;
use serde::Serialize;
use std::fmt::{Display, Formatter};

#[derive(clap::Args, Debug)]
pub(crate) struct Args {
    #[command(flatten)]
    common: CommonArgs,

    /// Name of the new NFT contract.
    #[arg(long)]
    name: String,

    /// Token symbol of the new NFT contract.
    #[arg(long)]
    symbol: String,
}

#[derive(Debug, Serialize)]
struct DeployResults {
    address: Option<String>,
    name: String,
    token_symbol: String,
}

impl Display for DeployResults {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match &self.address {
            Some(address) => write!(
                f,
                "deployed '{}' ({}) at {address}",
                self.name, self.token_symbol
            ),
            None => write!(f, "'{}' has not been deployed", self.name),
        }
    }
}

pub(crate) async fn execute(args: Args) -> Result<(), MinterCliError> {
    let context = MinterContext::load(&args.common).await?;
    let workflow = context.start_workflow(args.common.output).await?;

    let submitted = workflow
        .send_all([
            WorkflowCommand::OpenContractStage,
            WorkflowCommand::ChooseDeployNew,
            WorkflowCommand::SetContractName(args.name.clone()),
            WorkflowCommand::SetTokenSymbol(args.symbol.clone()),
            WorkflowCommand::SubmitDeploy,
        ])
        .await;
    let settled = workflow.handle.settle().await;
    workflow.finish().await?;
    submitted?;

    let address = settled?;
    args.common.output.to_stdout(&DeployResults {
        address: address.map(|address| address.to_checksum(None)),
        name: args.name,
        token_symbol: args.symbol,
    });
    Ok(())
}
