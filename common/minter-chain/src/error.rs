// Copyright 2024 - Nym Technologies SA <contact@nymtech.net>
// SPDX-License-Identifier: Apache-2.0

use crate::network::AcceptedNetworks;
use alloy::primitives::B256;
use alloy::providers::PendingTransactionError;
use alloy::transports::TransportError;
use std::io;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ChainClientError {
    #[error("no wallet is connected")]
    WalletNotConnected,

    #[error("the rpc request has failed: {source}")]
    RpcFailure {
        #[from]
        source: TransportError,
    },

    #[error("failed to obtain the transaction receipt: {source}")]
    PendingTransactionFailure {
        #[from]
        source: PendingTransactionError,
    },

    #[error("the contract call has failed: {source}")]
    ContractCallFailure {
        #[from]
        source: alloy::contract::Error,
    },

    #[error("transaction {tx_hash} has been reverted")]
    TransactionReverted { tx_hash: B256 },

    #[error("the receipt of transaction {tx_hash} does not contain a contract address")]
    MissingContractAddress { tx_hash: B256 },

    #[error("no contract artifact has been provided for deployments")]
    ArtifactUnavailable,

    #[error("failed to load contract artifact from '{}': {source}", path.display())]
    ArtifactLoadFailure {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("the contract artifact is malformed: {source}")]
    MalformedArtifact {
        #[from]
        source: serde_json::Error,
    },

    #[error("the contract constructor must accept (string name, string symbol), found ({found})")]
    UnexpectedConstructor { found: String },

    #[error("the provided private key is malformed: {source}")]
    MalformedPrivateKey {
        #[from]
        source: alloy::signers::local::LocalSignerError,
    },
}

#[derive(Debug, Error)]
pub enum DeployError {
    #[error("both the contract name and its token symbol must be provided")]
    ValidationFailed,

    #[error("no wallet is connected")]
    WalletNotConnected,

    #[error("chain {chain_id} is not supported. expected {accepted}")]
    WrongNetwork {
        chain_id: u64,
        accepted: AcceptedNetworks,
    },

    #[error("failed to submit the contract deployment: {source}")]
    SubmissionFailed {
        #[source]
        source: ChainClientError,
    },
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AddressError {
    #[error("'{address}' is not a 0x-prefixed 20-byte hex address")]
    Malformed { address: String },

    #[error("'{address}' has an invalid checksum")]
    InvalidChecksum { address: String },
}
