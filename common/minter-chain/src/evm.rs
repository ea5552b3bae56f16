// Copyright 2024 - Nym Technologies SA <contact@nymtech.net>
// SPDX-License-Identifier: Apache-2.0

use crate::artifact::ContractArtifact;
use crate::client::{ChainClient, WalletState};
use crate::error::ChainClientError;
use alloy::network::{EthereumWallet, TransactionBuilder};
use alloy::primitives::{Address, Bytes, B256};
use alloy::providers::{DynProvider, Provider, ProviderBuilder};
use alloy::rpc::types::TransactionRequest;
use alloy::signers::local::PrivateKeySigner;
use alloy::sol;
use async_trait::async_trait;
use std::str::FromStr;
use tracing::{debug, info, instrument};
use url::Url;

sol! {
    #[sol(rpc)]
    interface IAccessControl {
        function hasRole(bytes32 role, address account) external view returns (bool);
    }
}

/// JSON-RPC client for EVM chains. Without a signer it can only perform
/// read-only calls and reports the wallet as disconnected.
pub struct EvmClient {
    rpc_url: Url,
    provider: DynProvider,
    account: Option<Address>,
}

impl EvmClient {
    pub fn new(rpc_url: Url, signer: Option<PrivateKeySigner>) -> Self {
        let (provider, account) = match signer {
            Some(signer) => {
                let account = signer.address();
                let provider = ProviderBuilder::new()
                    .wallet(EthereumWallet::from(signer))
                    .connect_http(rpc_url.clone())
                    .erased();
                (provider, Some(account))
            }
            None => {
                let provider = ProviderBuilder::new()
                    .connect_http(rpc_url.clone())
                    .erased();
                (provider, None)
            }
        };

        EvmClient {
            rpc_url,
            provider,
            account,
        }
    }

    pub fn new_with_private_key(
        rpc_url: Url,
        private_key: Option<&str>,
    ) -> Result<Self, ChainClientError> {
        let signer = private_key
            .map(|key| PrivateKeySigner::from_str(key.trim()))
            .transpose()?;
        Ok(Self::new(rpc_url, signer))
    }

    pub fn rpc_url(&self) -> &Url {
        &self.rpc_url
    }
}

#[async_trait]
impl ChainClient for EvmClient {
    async fn wallet_state(&self) -> Result<WalletState, ChainClientError> {
        let Some(account) = self.account else {
            return Ok(WalletState::Disconnected);
        };
        let chain_id = self.provider.get_chain_id().await?;
        Ok(WalletState::Connected { account, chain_id })
    }

    #[instrument(skip_all, fields(contract = artifact.name()))]
    async fn deploy_contract(
        &self,
        artifact: &ContractArtifact,
        constructor_args: Bytes,
    ) -> Result<Address, ChainClientError> {
        let account = self.account.ok_or(ChainClientError::WalletNotConnected)?;

        let mut code = artifact.bytecode.to_vec();
        code.extend_from_slice(&constructor_args);

        let tx = TransactionRequest::default()
            .with_from(account)
            .with_deploy_code(Bytes::from(code));

        let pending = self.provider.send_transaction(tx).await?;
        let tx_hash = *pending.tx_hash();
        info!("submitted deployment transaction {tx_hash}");

        let receipt = pending.get_receipt().await?;
        if !receipt.status() {
            return Err(ChainClientError::TransactionReverted { tx_hash });
        }

        let address = receipt
            .contract_address
            .ok_or(ChainClientError::MissingContractAddress { tx_hash })?;
        debug!("transaction {tx_hash} created contract {address}");
        Ok(address)
    }

    #[instrument(skip(self))]
    async fn has_role(
        &self,
        contract: Address,
        role: B256,
        account: Address,
    ) -> Result<bool, ChainClientError> {
        let contract = IAccessControl::new(contract, self.provider.clone());
        Ok(contract.hasRole(role, account).call().await?)
    }
}
