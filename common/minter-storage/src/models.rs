// Copyright 2024 - Nym Technologies SA <contact@nymtech.net>
// SPDX-License-Identifier: Apache-2.0

use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};

/// Logical keys of the registry key space.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StoreKey {
    /// The shared per-batch [`Metadata`] record.
    Metadata,

    /// The last contract address selected for minting.
    ContractAddress,

    /// Ordered sequence of [`ContractRegistryEntry`].
    StoredContracts,
}

impl StoreKey {
    pub const fn as_str(&self) -> &'static str {
        match self {
            StoreKey::Metadata => "metadata",
            StoreKey::ContractAddress => "contractAddress",
            StoreKey::StoredContracts => "storedContracts",
        }
    }
}

impl Display for StoreKey {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A contract the user has deployed through the minter.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContractRegistryEntry {
    pub address: String,
    pub name: String,
    pub token_symbol: String,
}

impl ContractRegistryEntry {
    pub fn new(
        address: impl Into<String>,
        name: impl Into<String>,
        token_symbol: impl Into<String>,
    ) -> Self {
        ContractRegistryEntry {
            address: address.into(),
            name: name.into(),
            token_symbol: token_symbol.into(),
        }
    }

    /// Addresses are compared without regard to their checksum casing.
    pub fn has_address(&self, address: &str) -> bool {
        self.address.eq_ignore_ascii_case(address)
    }
}

impl Display for ContractRegistryEntry {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} | {} | {}", self.name, self.token_symbol, self.address)
    }
}

/// Shared metadata template applied to every NFT of the batch.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Metadata {
    pub name: String,
    pub description: String,
    pub count: u32,
}

/// Everything the store knows about a previous session.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PersistedSession {
    pub metadata: Option<Metadata>,
    pub contract_address: Option<String>,
    pub stored_contracts: Vec<ContractRegistryEntry>,
}

/// Appends `entry` unless the registry already holds its address.
/// Returns whether the registry changed.
pub fn append_unique(
    registry: &mut Vec<ContractRegistryEntry>,
    entry: ContractRegistryEntry,
) -> bool {
    if registry.iter().any(|known| known.has_address(&entry.address)) {
        return false;
    }
    registry.push(entry);
    true
}
