// Copyright 2024 - Nym Technologies SA <contact@nymtech.net>
// SPDX-License-Identifier: Apache-2.0

use crate::session::ImageRecord;

/// User (or downstream collaborator) triggers understood by the controller.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WorkflowCommand {
    OpenContractStage,
    ChooseDeployNew,
    ChooseImportExisting,

    SetContractName(String),
    SetTokenSymbol(String),
    SetImportAddress(String),

    /// Fills the import form with the address of a previously deployed contract.
    SelectStoredContract(usize),

    SubmitDeploy,
    SubmitImport,

    /// Returns from either form to the contract stage menu.
    /// Does not abort a submission that is already in flight.
    Cancel,

    SetMetadataName(String),
    SetMetadataDescription(String),

    /// Raw user input, parsed by the controller.
    SetMetadataCount(String),

    SetImages(Vec<ImageRecord>),

    Proceed,
    PingCompleted,
    AssignCompleted,
}

impl WorkflowCommand {
    pub fn name(&self) -> &'static str {
        match self {
            WorkflowCommand::OpenContractStage => "open contract stage",
            WorkflowCommand::ChooseDeployNew => "choose deploy new",
            WorkflowCommand::ChooseImportExisting => "choose import existing",
            WorkflowCommand::SetContractName(_) => "set contract name",
            WorkflowCommand::SetTokenSymbol(_) => "set token symbol",
            WorkflowCommand::SetImportAddress(_) => "set import address",
            WorkflowCommand::SelectStoredContract(_) => "select stored contract",
            WorkflowCommand::SubmitDeploy => "submit deploy",
            WorkflowCommand::SubmitImport => "submit import",
            WorkflowCommand::Cancel => "cancel",
            WorkflowCommand::SetMetadataName(_) => "set metadata name",
            WorkflowCommand::SetMetadataDescription(_) => "set metadata description",
            WorkflowCommand::SetMetadataCount(_) => "set metadata count",
            WorkflowCommand::SetImages(_) => "set images",
            WorkflowCommand::Proceed => "proceed",
            WorkflowCommand::PingCompleted => "ping completed",
            WorkflowCommand::AssignCompleted => "assign completed",
        }
    }
}
