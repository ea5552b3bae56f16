// Copyright 2024 - Nym Technologies SA <contact@nymtech.net>
// SPDX-License-Identifier: Apache-2.0

use crate::client::{ChainClient, WalletState};
use alloy::primitives::{keccak256, Address, B256};
use serde::Serialize;
use std::fmt::{Display, Formatter};
use tracing::{debug, instrument, warn};

pub const MINTER_ROLE_NAME: &str = "MINTER_ROLE";

/// `keccak256("MINTER_ROLE")`, the OpenZeppelin `AccessControl` role required for minting.
pub fn minter_role() -> B256 {
    keccak256(MINTER_ROLE_NAME.as_bytes())
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum InadmissibleReason {
    CallFailed,
    NotAuthorized,
}

impl Display for InadmissibleReason {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            InadmissibleReason::CallFailed => write!(f, "call failed"),
            InadmissibleReason::NotAuthorized => write!(f, "not authorized"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Admissibility {
    Admissible,
    Inadmissible(InadmissibleReason),
}

impl Admissibility {
    pub fn is_admissible(&self) -> bool {
        matches!(self, Admissibility::Admissible)
    }
}

/// Decides whether an existing contract can be used for minting.
#[derive(Debug, Clone, Copy)]
pub struct ContractValidator {
    role: B256,
}

impl Default for ContractValidator {
    fn default() -> Self {
        ContractValidator {
            role: minter_role(),
        }
    }
}

impl ContractValidator {
    pub fn new(role: B256) -> Self {
        ContractValidator { role }
    }

    pub fn role(&self) -> B256 {
        self.role
    }

    /// Without a connected wallet there is nothing to check against, so the
    /// contract is accepted as is.
    #[instrument(skip(self, client))]
    pub async fn validate<C>(
        &self,
        client: &C,
        address: Address,
        wallet: &WalletState,
    ) -> Admissibility
    where
        C: ChainClient + ?Sized,
    {
        let WalletState::Connected { account, .. } = wallet else {
            warn!("no wallet is connected - accepting {address} without checking its roles");
            return Admissibility::Admissible;
        };

        match client.has_role(address, self.role, *account).await {
            Ok(true) => {
                debug!("{account} holds the required role on {address}");
                Admissibility::Admissible
            }
            Ok(false) => Admissibility::Inadmissible(InadmissibleReason::NotAuthorized),
            Err(err) => {
                warn!("failed to check the roles of {account} on {address}: {err}");
                Admissibility::Inadmissible(InadmissibleReason::CallFailed)
            }
        }
    }
}
