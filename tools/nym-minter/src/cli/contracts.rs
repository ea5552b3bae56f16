// Copyright 2024 - Nym Technologies SA <contact@nymtech.net>
// SPDX-License-Identifier: Apache-2.0

use crate::config::{try_load_current_config, DEFAULT_MINTER_ID};
use crate::error::MinterCliError;
use crate::output::OutputFormat;
use comfy_table::Table;
use nym_minter_storage::{ContractRegistryEntry, PersistentBackend, RegistryStore};
use serde::Serialize;
use std::fmt::{Display, Formatter};
use std::sync::Arc;

#[derive(clap::Args, Debug)]
pub(crate) struct Args {
    /// Id of the minter instance to use.
    #[arg(long, env = "NYM_MINTER_ID", default_value = DEFAULT_MINTER_ID)]
    id: String,

    #[arg(short, long, default_value_t = OutputFormat::default())]
    output: OutputFormat,
}

#[derive(Debug, Serialize)]
struct StoredContracts {
    selected: Option<String>,
    contracts: Vec<ContractRegistryEntry>,
}

impl Display for StoredContracts {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        if self.contracts.is_empty() {
            return write!(f, "no contracts have been deployed yet");
        }

        let mut table = Table::new();
        table.set_header(vec!["#", "Name", "Symbol", "Address", "Selected"]);
        for (index, entry) in self.contracts.iter().enumerate() {
            let selected = self
                .selected
                .as_deref()
                .is_some_and(|selected| entry.has_address(selected));
            table.add_row(vec![
                index.to_string(),
                entry.name.clone(),
                entry.token_symbol.clone(),
                entry.address.clone(),
                if selected { "*" } else { "" }.to_string(),
            ]);
        }
        write!(f, "{table}")
    }
}

pub(crate) async fn execute(args: Args) -> Result<(), MinterCliError> {
    let config = try_load_current_config(&args.id)?;
    let backend = PersistentBackend::init(config.database_path()).await?;
    let session = RegistryStore::new(Arc::new(backend)).load_session().await?;

    args.output.to_stdout(&StoredContracts {
        selected: session.contract_address,
        contracts: session.stored_contracts,
    });
    Ok(())
}
