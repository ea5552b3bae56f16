// Copyright 2024 - Nym Technologies SA <contact@nymtech.net>
// SPDX-License-Identifier: Apache-2.0

use crate::error::AddressError;
use alloy::primitives::Address;
use std::str::FromStr;

/// Checks the shape of a user-provided contract address.
///
/// Surrounding whitespace is ignored. All-lowercase and all-uppercase hex is
/// accepted as is, mixed case must carry a valid EIP-55 checksum.
pub fn parse_contract_address(raw: &str) -> Result<Address, AddressError> {
    let trimmed = raw.trim();
    let malformed = || AddressError::Malformed {
        address: trimmed.to_string(),
    };

    let hex = trimmed.strip_prefix("0x").ok_or_else(malformed)?;
    if hex.len() != 40 || !hex.chars().all(|c| c.is_ascii_hexdigit()) {
        return Err(malformed());
    }

    let has_lower = hex.chars().any(|c| c.is_ascii_lowercase());
    let has_upper = hex.chars().any(|c| c.is_ascii_uppercase());
    if has_lower && has_upper {
        return Address::parse_checksummed(trimmed, None).map_err(|_| {
            AddressError::InvalidChecksum {
                address: trimmed.to_string(),
            }
        });
    }

    Address::from_str(trimmed).map_err(|_| malformed())
}

pub fn is_valid_address(raw: &str) -> bool {
    parse_contract_address(raw).is_ok()
}
