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

    /// Address of the contract to import.
    /// If omitted, the previously selected contract is checked again.
    #[arg(conflicts_with = "stored")]
    address: Option<String>,

    /// Import a contract deployed earlier, by its position in `contracts`.
    #[arg(long)]
    stored: Option<usize>,
}

#[derive(Debug, Serialize)]
struct ImportResults {
    address: Option<String>,
}

impl Display for ImportResults {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match &self.address {
            Some(address) => write!(f, "{address} is now used for minting"),
            None => write!(f, "no contract has been imported"),
        }
    }
}

pub(crate) async fn execute(args: Args) -> Result<(), MinterCliError> {
    let context = MinterContext::load(&args.common).await?;
    let workflow = context.start_workflow(args.common.output).await?;

    let mut commands = vec![
        WorkflowCommand::OpenContractStage,
        WorkflowCommand::ChooseImportExisting,
    ];
    match (args.address, args.stored) {
        (_, Some(index)) => commands.push(WorkflowCommand::SelectStoredContract(index)),
        (Some(address), None) => commands.push(WorkflowCommand::SetImportAddress(address)),
        // the form is prefilled with the cached address
        (None, None) => {}
    }
    commands.push(WorkflowCommand::SubmitImport);

    let submitted = workflow.send_all(commands).await;
    let settled = workflow.handle.settle().await;
    let session = workflow.finish().await?;
    submitted?;

    let imported = settled?.and(session.selected_contract().map(ToString::to_string));
    args.common.output.to_stdout(&ImportResults { address: imported });
    Ok(())
}
