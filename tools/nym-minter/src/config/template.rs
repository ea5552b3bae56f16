// Copyright 2024 - Nym Technologies SA <contact@nymtech.net>
// SPDX-License-Identifier: Apache-2.0

// While using normal toml marshalling would have been way simpler with less overhead,
// it's useful to have comments attached to the saved config file to explain behaviour of
// particular fields.
// Note: any changes to the template must be reflected in the appropriate structs.
pub(crate) const CONFIG_TEMPLATE: &str = r#"
# This is a TOML config file.
# For more information, see https://github.com/toml-lang/toml

##### main base minter config options #####

[minter]
# Human readable ID of this particular minter instance.
id = '{{ minter.id }}'

##### chain config options #####

[chain]
# JSON-RPC endpoint of the EVM node used for deployments and role checks.
rpc_url = '{{ chain.rpc_url }}'

# The only chain ids contracts can be deployed to.
mainnet_chain_id = {{ chain.mainnet_chain_id }}
testnet_chain_id = {{ chain.testnet_chain_id }}

# Path to the compiled contract artifact (a JSON file with `abi` and `bytecode`).
# Leave empty to disable deployments; imports keep working.
artifact_path = '{{ chain.artifact_path }}'

##### storage config options #####

[storage]
# Path to the database holding deployed contracts and the shared mint metadata.
database_path = '{{ storage.database_path }}'

##### logging configuration options #####

[logging]

"#;
