// Copyright 2024 - Nym Technologies SA <contact@nymtech.net>
// SPDX-License-Identifier: Apache-2.0

use crate::artifact::ContractArtifact;
use crate::error::ChainClientError;
use alloy::primitives::{Address, Bytes, B256};
use async_trait::async_trait;
use serde::Serialize;
use std::fmt::{Display, Formatter};
use std::sync::Arc;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum WalletState {
    Disconnected,
    Connected { account: Address, chain_id: u64 },
}

impl WalletState {
    pub fn is_connected(&self) -> bool {
        matches!(self, WalletState::Connected { .. })
    }

    pub fn account(&self) -> Option<Address> {
        match self {
            WalletState::Connected { account, .. } => Some(*account),
            WalletState::Disconnected => None,
        }
    }

    pub fn chain_id(&self) -> Option<u64> {
        match self {
            WalletState::Connected { chain_id, .. } => Some(*chain_id),
            WalletState::Disconnected => None,
        }
    }
}

impl Display for WalletState {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            WalletState::Disconnected => write!(f, "disconnected"),
            WalletState::Connected { account, chain_id } => {
                write!(f, "{account} on chain {chain_id}")
            }
        }
    }
}

/// Everything the minter needs from a blockchain node and its wallet.
#[async_trait]
pub trait ChainClient: Send + Sync {
    /// Reports the connected account and the chain it is on.
    async fn wallet_state(&self) -> Result<WalletState, ChainClientError>;

    /// Submits a contract-creation transaction and waits for its receipt.
    /// `constructor_args` are appended to the artifact bytecode as is.
    async fn deploy_contract(
        &self,
        artifact: &ContractArtifact,
        constructor_args: Bytes,
    ) -> Result<Address, ChainClientError>;

    /// Read-only `hasRole(role, account)` call against `contract`.
    async fn has_role(
        &self,
        contract: Address,
        role: B256,
        account: Address,
    ) -> Result<bool, ChainClientError>;
}

#[async_trait]
impl<C> ChainClient for Arc<C>
where
    C: ChainClient + ?Sized,
{
    async fn wallet_state(&self) -> Result<WalletState, ChainClientError> {
        (**self).wallet_state().await
    }

    async fn deploy_contract(
        &self,
        artifact: &ContractArtifact,
        constructor_args: Bytes,
    ) -> Result<Address, ChainClientError> {
        (**self).deploy_contract(artifact, constructor_args).await
    }

    async fn has_role(
        &self,
        contract: Address,
        role: B256,
        account: Address,
    ) -> Result<bool, ChainClientError> {
        (**self).has_role(contract, role, account).await
    }
}
