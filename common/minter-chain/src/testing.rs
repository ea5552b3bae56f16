// Copyright 2024 - Nym Technologies SA <contact@nymtech.net>
// SPDX-License-Identifier: Apache-2.0

//! In-memory chain client used by the tests of this and the dependent crates.

use crate::artifact::ContractArtifact;
use crate::client::{ChainClient, WalletState};
use crate::error::ChainClientError;
use alloy::json_abi::{Constructor, JsonAbi, Param, StateMutability};
use alloy::primitives::{Address, Bytes, B256};
use alloy::sol_types::SolValue;
use alloy::transports::TransportErrorKind;
use async_trait::async_trait;
use parking_lot::Mutex;
use std::sync::Arc;
use tokio::sync::Notify;

fn string_param(name: &str) -> Param {
    Param {
        ty: "string".to_string(),
        name: name.to_string(),
        components: Vec::new(),
        internal_type: None,
    }
}

pub fn test_artifact() -> ContractArtifact {
    ContractArtifact {
        contract_name: Some("MinterNFT".to_string()),
        abi: JsonAbi {
            constructor: Some(Constructor {
                inputs: vec![string_param("name"), string_param("symbol")],
                state_mutability: StateMutability::NonPayable,
            }),
            ..Default::default()
        },
        bytecode: Bytes::from_static(&[0x60, 0x80, 0x60, 0x40, 0x52]),
    }
}

#[derive(Default)]
struct MockChainState {
    wallet: Option<WalletState>,
    wallet_query_failure: bool,

    // `None` makes the call itself fail
    role_response: Option<bool>,
    role_check_calls: usize,

    deploy_failure: bool,
    deploy_calls: usize,
    deployed: Vec<Address>,
    last_constructor_args: Option<Bytes>,
    deploy_gate: Option<Arc<Notify>>,
}

#[derive(Clone)]
pub struct MockChainClient {
    state: Arc<Mutex<MockChainState>>,
}

impl Default for MockChainClient {
    fn default() -> Self {
        MockChainClient::new()
    }
}

impl MockChainClient {
    pub fn new() -> Self {
        MockChainClient {
            state: Arc::new(Mutex::new(MockChainState {
                role_response: Some(true),
                ..Default::default()
            })),
        }
    }

    /// Connects the wallet and returns the state it will report.
    pub fn connect(&self, account: Address, chain_id: u64) -> WalletState {
        let wallet = WalletState::Connected { account, chain_id };
        self.state.lock().wallet = Some(wallet);
        wallet
    }

    pub fn disconnect(&self) {
        self.state.lock().wallet = None;
    }

    pub fn set_wallet_query_failure(&self, fail: bool) {
        self.state.lock().wallet_query_failure = fail;
    }

    pub fn set_role_response(&self, response: Option<bool>) {
        self.state.lock().role_response = response;
    }

    pub fn set_deploy_failure(&self, fail: bool) {
        self.state.lock().deploy_failure = fail;
    }

    /// Makes every subsequent deployment wait until the returned gate is notified.
    pub fn hold_deployments(&self) -> Arc<Notify> {
        let gate = Arc::new(Notify::new());
        self.state.lock().deploy_gate = Some(Arc::clone(&gate));
        gate
    }

    pub fn deploy_calls(&self) -> usize {
        self.state.lock().deploy_calls
    }

    pub fn role_check_calls(&self) -> usize {
        self.state.lock().role_check_calls
    }

    pub fn deployed(&self) -> Vec<Address> {
        self.state.lock().deployed.clone()
    }

    pub fn last_constructor_args(&self) -> Option<Bytes> {
        self.state.lock().last_constructor_args.clone()
    }

    /// `(name, symbol)` of the last deployment, if its arguments decode.
    pub fn last_name_and_symbol(&self) -> Option<(String, String)> {
        let args = self.last_constructor_args()?;
        <(String, String)>::abi_decode_params(&args).ok()
    }
}

#[async_trait]
impl ChainClient for MockChainClient {
    async fn wallet_state(&self) -> Result<WalletState, ChainClientError> {
        let state = self.state.lock();
        if state.wallet_query_failure {
            return Err(TransportErrorKind::custom_str("wallet is unreachable").into());
        }
        Ok(state.wallet.unwrap_or(WalletState::Disconnected))
    }

    async fn deploy_contract(
        &self,
        _artifact: &ContractArtifact,
        constructor_args: Bytes,
    ) -> Result<Address, ChainClientError> {
        let gate = {
            let mut state = self.state.lock();
            state.deploy_calls += 1;
            state.last_constructor_args = Some(constructor_args);
            state.deploy_gate.clone()
        };

        if let Some(gate) = gate {
            gate.notified().await;
        }

        let mut state = self.state.lock();
        if state.deploy_failure {
            return Err(ChainClientError::TransactionReverted {
                tx_hash: B256::with_last_byte(state.deploy_calls as u8),
            });
        }

        let address = Address::with_last_byte(0xC0 + state.deployed.len() as u8);
        state.deployed.push(address);
        Ok(address)
    }

    async fn has_role(
        &self,
        _contract: Address,
        _role: B256,
        _account: Address,
    ) -> Result<bool, ChainClientError> {
        let mut state = self.state.lock();
        state.role_check_calls += 1;
        state
            .role_response
            .ok_or_else(|| TransportErrorKind::custom_str("execution reverted").into())
    }
}
