// Copyright 2024 - Nym Technologies SA <contact@nymtech.net>
// SPDX-License-Identifier: Apache-2.0

use crate::error::ChainClientError;
use alloy::json_abi::JsonAbi;
use alloy::primitives::Bytes;
use serde::Deserialize;
use std::fs;
use std::path::Path;
use tracing::debug;

/// Compiled NFT contract, as emitted by hardhat/foundry (`{ "abi": [...], "bytecode": "0x..." }`).
#[derive(Debug, Clone, Deserialize)]
pub struct ContractArtifact {
    #[serde(default, rename = "contractName")]
    pub contract_name: Option<String>,

    pub abi: JsonAbi,

    pub bytecode: Bytes,
}

impl ContractArtifact {
    pub fn from_json(raw: &str) -> Result<Self, ChainClientError> {
        let artifact: ContractArtifact = serde_json::from_str(raw)?;
        artifact.ensure_name_symbol_constructor()?;
        Ok(artifact)
    }

    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, ChainClientError> {
        let path = path.as_ref();
        debug!("loading contract artifact from {}", path.display());

        let raw = fs::read_to_string(path).map_err(|source| {
            ChainClientError::ArtifactLoadFailure {
                path: path.to_path_buf(),
                source,
            }
        })?;
        Self::from_json(&raw)
    }

    pub fn name(&self) -> &str {
        self.contract_name.as_deref().unwrap_or("unnamed contract")
    }

    // deployments always pass exactly (name, tokenSymbol)
    fn ensure_name_symbol_constructor(&self) -> Result<(), ChainClientError> {
        let inputs: Vec<&str> = self
            .abi
            .constructor
            .as_ref()
            .map(|constructor| constructor.inputs.iter().map(|p| p.ty.as_str()).collect())
            .unwrap_or_default();

        if inputs != ["string", "string"] {
            return Err(ChainClientError::UnexpectedConstructor {
                found: inputs.join(", "),
            });
        }
        Ok(())
    }
}
