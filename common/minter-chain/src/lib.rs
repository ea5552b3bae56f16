// Copyright 2024 - Nym Technologies SA <contact@nymtech.net>
// SPDX-License-Identifier: Apache-2.0

pub mod address;
pub mod artifact;
pub mod client;
pub mod error;
pub mod evm;
pub mod executor;
pub mod network;
pub mod validator;

#[cfg(any(test, feature = "testing"))]
pub mod testing;

pub use address::{is_valid_address, parse_contract_address};
pub use alloy::primitives::Address;
pub use artifact::ContractArtifact;
pub use client::{ChainClient, WalletState};
pub use error::{AddressError, ChainClientError, DeployError};
pub use evm::EvmClient;
pub use executor::DeploymentExecutor;
pub use network::AcceptedNetworks;
pub use validator::{
    minter_role, Admissibility, ContractValidator, InadmissibleReason, MINTER_ROLE_NAME,
};
