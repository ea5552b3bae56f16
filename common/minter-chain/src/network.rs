// Copyright 2024 - Nym Technologies SA <contact@nymtech.net>
// SPDX-License-Identifier: Apache-2.0

use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};

pub const ESPACE_MAINNET_CHAIN_ID: u64 = 1030;
pub const ESPACE_TESTNET_CHAIN_ID: u64 = 71;

pub const ESPACE_MAINNET_RPC_URL: &str = "https://evm.confluxrpc.com";
pub const ESPACE_TESTNET_RPC_URL: &str = "https://evmtestnet.confluxrpc.com";

/// The pair of chains contracts may be deployed to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AcceptedNetworks {
    pub mainnet_chain_id: u64,
    pub testnet_chain_id: u64,
}

impl Default for AcceptedNetworks {
    fn default() -> Self {
        AcceptedNetworks {
            mainnet_chain_id: ESPACE_MAINNET_CHAIN_ID,
            testnet_chain_id: ESPACE_TESTNET_CHAIN_ID,
        }
    }
}

impl AcceptedNetworks {
    pub fn new(mainnet_chain_id: u64, testnet_chain_id: u64) -> Self {
        AcceptedNetworks {
            mainnet_chain_id,
            testnet_chain_id,
        }
    }

    pub fn contains(&self, chain_id: u64) -> bool {
        chain_id == self.mainnet_chain_id || chain_id == self.testnet_chain_id
    }
}

impl Display for AcceptedNetworks {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} (mainnet) or {} (testnet)",
            self.mainnet_chain_id, self.testnet_chain_id
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_the_configured_pair_is_accepted() {
        let networks = AcceptedNetworks::default();
        assert!(networks.contains(1030));
        assert!(networks.contains(71));
        assert!(!networks.contains(1));
        assert!(!networks.contains(1029));

        let custom = AcceptedNetworks::new(1, 11155111);
        assert!(custom.contains(11155111));
        assert!(!custom.contains(71));
    }
}
