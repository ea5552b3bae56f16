// Copyright 2024 - Nym Technologies SA <contact@nymtech.net>
// SPDX-License-Identifier: Apache-2.0

use crate::artifact::ContractArtifact;
use crate::client::{ChainClient, WalletState};
use crate::error::{ChainClientError, DeployError};
use crate::network::AcceptedNetworks;
use alloy::primitives::Address;
use alloy::sol_types::SolValue;
use std::sync::Arc;
use tracing::{info, instrument};

/// Deploys fresh NFT contracts. A failed deployment is never retried here.
#[derive(Debug, Clone, Default)]
pub struct DeploymentExecutor {
    networks: AcceptedNetworks,
    artifact: Option<Arc<ContractArtifact>>,
}

impl DeploymentExecutor {
    pub fn new(networks: AcceptedNetworks) -> Self {
        DeploymentExecutor {
            networks,
            artifact: None,
        }
    }

    #[must_use]
    pub fn with_artifact(mut self, artifact: ContractArtifact) -> Self {
        self.artifact = Some(Arc::new(artifact));
        self
    }

    pub fn networks(&self) -> AcceptedNetworks {
        self.networks
    }

    /// Every check that can be made without touching the chain.
    pub fn check_preconditions(
        &self,
        name: &str,
        token_symbol: &str,
        wallet: &WalletState,
    ) -> Result<(), DeployError> {
        if name.is_empty() || token_symbol.is_empty() {
            return Err(DeployError::ValidationFailed);
        }

        let WalletState::Connected { chain_id, .. } = wallet else {
            return Err(DeployError::WalletNotConnected);
        };

        if !self.networks.contains(*chain_id) {
            return Err(DeployError::WrongNetwork {
                chain_id: *chain_id,
                accepted: self.networks,
            });
        }
        Ok(())
    }

    #[instrument(skip(self, client, wallet))]
    pub async fn deploy<C>(
        &self,
        client: &C,
        name: &str,
        token_symbol: &str,
        wallet: &WalletState,
    ) -> Result<Address, DeployError>
    where
        C: ChainClient + ?Sized,
    {
        self.check_preconditions(name, token_symbol, wallet)?;

        let artifact = self
            .artifact
            .as_deref()
            .ok_or(DeployError::SubmissionFailed {
                source: ChainClientError::ArtifactUnavailable,
            })?;

        let constructor_args = (name.to_string(), token_symbol.to_string()).abi_encode_params();
        info!("deploying {} as '{name}' ({token_symbol})", artifact.name());

        client
            .deploy_contract(artifact, constructor_args.into())
            .await
            .map_err(|source| DeployError::SubmissionFailed { source })
    }
}
