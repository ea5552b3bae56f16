// Copyright 2024 - Nym Technologies SA <contact@nymtech.net>
// SPDX-License-Identifier: Apache-2.0

use serde::Serialize;
use std::fmt::{Display, Formatter};

/// Sub-states of the contract stage.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DeployStage {
    #[default]
    Idle,
    DeployForm,
    ImportForm,
}

impl Display for DeployStage {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            DeployStage::Idle => write!(f, "idle"),
            DeployStage::DeployForm => write!(f, "deploy form"),
            DeployStage::ImportForm => write!(f, "import form"),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Stage {
    #[default]
    Configure,
    Deploy(DeployStage),
    Ping,
    Assign,
    Confirm,
}

impl Stage {
    pub fn is_terminal(&self) -> bool {
        matches!(self, Stage::Confirm)
    }

    /// Stages that can only be entered with a selected contract.
    pub fn requires_contract(&self) -> bool {
        matches!(self, Stage::Ping | Stage::Assign | Stage::Confirm)
    }
}

impl Display for Stage {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Stage::Configure => write!(f, "configure"),
            Stage::Deploy(sub) => write!(f, "deploy ({sub})"),
            Stage::Ping => write!(f, "ping"),
            Stage::Assign => write!(f, "assign"),
            Stage::Confirm => write!(f, "confirm"),
        }
    }
}
