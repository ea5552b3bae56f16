// Copyright 2024 - Nym Technologies SA <contact@nymtech.net>
// SPDX-License-Identifier: Apache-2.0

use crate::error::MinterCliError;
use clap::{Parser, Subcommand};

mod contracts;
mod deploy;
mod helpers;
mod import;
mod init;
mod metadata;
mod status;

#[derive(Parser, Debug)]
#[command(author = "Nymtech", version, about)]
pub(crate) struct Cli {
    #[command(subcommand)]
    command: Commands,
}

impl Cli {
    pub(crate) async fn execute(self) -> Result<(), MinterCliError> {
        match self.command {
            Commands::Init(args) => init::execute(args).await,
            Commands::Deploy(args) => deploy::execute(args).await,
            Commands::Import(args) => import::execute(args).await,
            Commands::Metadata(args) => metadata::execute(args).await,
            Commands::Contracts(args) => contracts::execute(args).await,
            Commands::Status(args) => status::execute(args).await,
        }
    }
}

#[derive(Subcommand, Debug)]
pub(crate) enum Commands {
    /// Initialise a minter instance: its config file and database.
    Init(init::Args),

    /// Deploy a new NFT contract and select it for minting.
    Deploy(deploy::Args),

    /// Check that an existing contract can be minted with and select it.
    Import(import::Args),

    /// Edit the metadata shared by every NFT of the batch.
    Metadata(metadata::Args),

    /// List the contracts deployed so far.
    Contracts(contracts::Args),

    /// Show the wallet and the persisted session.
    Status(status::Args),
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn verify_cli() {
        Cli::command().debug_assert();
    }

    #[test]
    fn count_requires_an_image() {
        let res = Cli::try_parse_from(["nym-minter", "metadata", "--count", "3"]);
        assert!(res.is_err());

        let res = Cli::try_parse_from([
            "nym-minter",
            "metadata",
            "--count",
            "3",
            "--image",
            "cat.png",
        ]);
        assert!(res.is_ok());
    }

    #[test]
    fn import_address_and_stored_index_are_exclusive() {
        let res = Cli::try_parse_from([
            "nym-minter",
            "import",
            "0x5FbDB2315678afecb367f032d93F642f64180aa3",
            "--stored",
            "0",
        ]);
        assert!(res.is_err());
    }
}
