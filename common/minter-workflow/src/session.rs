// Copyright 2024 - Nym Technologies SA <contact@nymtech.net>
// SPDX-License-Identifier: Apache-2.0

use crate::stage::Stage;
use nym_minter_storage::{ContractRegistryEntry, Metadata, PersistedSession};
use serde::Serialize;

/// A single picture chosen for the batch, as handed over by the image picker.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ImageRecord {
    pub data_url: String,
    pub file_name: String,
}

impl ImageRecord {
    pub fn new(data_url: impl Into<String>, file_name: impl Into<String>) -> Self {
        ImageRecord {
            data_url: data_url.into(),
            file_name: file_name.into(),
        }
    }

    pub fn is_missing(&self) -> bool {
        self.data_url.is_empty()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct DeployForm {
    pub name: String,
    pub token_symbol: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ImportForm {
    pub address: String,
}

/// Everything the controller knows about the current minting session.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Session {
    pub(crate) stage: Stage,
    pub(crate) selected_contract: Option<String>,
    pub(crate) metadata: Metadata,
    pub(crate) images: Vec<ImageRecord>,
    pub(crate) stored_contracts: Vec<ContractRegistryEntry>,
    pub(crate) deploy_form: DeployForm,
    pub(crate) import_form: ImportForm,
    pub(crate) deploying: bool,
}

impl Session {
    /// Picks up where a previous session left off. The stage always restarts
    /// at `Configure`; the cached address prefills the import form.
    pub fn resume(persisted: PersistedSession) -> Self {
        let import_form = ImportForm {
            address: persisted.contract_address.clone().unwrap_or_default(),
        };

        Session {
            selected_contract: persisted.contract_address,
            metadata: persisted.metadata.unwrap_or_default(),
            stored_contracts: persisted.stored_contracts,
            import_form,
            ..Default::default()
        }
    }

    pub fn stage(&self) -> Stage {
        self.stage
    }

    pub fn selected_contract(&self) -> Option<&str> {
        self.selected_contract.as_deref()
    }

    pub fn metadata(&self) -> &Metadata {
        &self.metadata
    }

    pub fn images(&self) -> &[ImageRecord] {
        &self.images
    }

    pub fn stored_contracts(&self) -> &[ContractRegistryEntry] {
        &self.stored_contracts
    }

    pub fn deploy_form(&self) -> &DeployForm {
        &self.deploy_form
    }

    pub fn import_form(&self) -> &ImportForm {
        &self.import_form
    }

    pub fn is_deploying(&self) -> bool {
        self.deploying
    }

    /// The count field is only editable when exactly one image is selected.
    pub fn count_editable(&self) -> bool {
        self.images.len() == 1
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn resuming_prefills_the_import_form() {
        let persisted = PersistedSession {
            metadata: Some(Metadata {
                name: "Batch".to_string(),
                description: String::new(),
                count: 2,
            }),
            contract_address: Some("0x5FbDB2315678afecb367f032d93F642f64180aa3".to_string()),
            stored_contracts: vec![],
        };

        let session = Session::resume(persisted);
        assert_eq!(session.stage(), Stage::Configure);
        assert_eq!(
            session.import_form().address,
            "0x5FbDB2315678afecb367f032d93F642f64180aa3"
        );
        assert_eq!(session.selected_contract(), Some(session.import_form().address.as_str()));
        assert_eq!(session.metadata().count, 2);
        assert!(!session.is_deploying());
    }

    #[test]
    fn images_without_data_are_missing() {
        assert!(ImageRecord::new("", "cat.png").is_missing());
        assert!(!ImageRecord::new("data:image/png;base64,AAAA", "cat.png").is_missing());
    }
}
