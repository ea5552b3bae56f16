// Copyright 2024 - Nym Technologies SA <contact@nymtech.net>
// SPDX-License-Identifier: Apache-2.0

use serde::Serialize;
use std::fmt::{Display, Formatter};
use tokio::sync::mpsc;
use tracing::trace;

pub const MISSING_NAME_OR_SYMBOL: &str = "Please enter a name and token symbol";
pub const CONNECT_WALLET: &str = "Please connect wallet";
pub const SWITCH_NETWORK: &str = "Please switch to a supported network";
pub const DEPLOYING_CONTRACT: &str = "Deploying contract...";
pub const CONTRACT_DEPLOYED: &str = "Contract deployed!";
pub const DEPLOYMENT_FAILED: &str = "An error occurred when deploying contract";
pub const MISSING_MINTER_ROLE: &str = "You do not have the MINTER_ROLE";
pub const INVALID_ADDRESS: &str = "Please enter a valid contract address";
pub const VALIDATING_CONTRACT: &str = "Checking contract permissions...";
pub const CONTRACT_IMPORTED: &str = "Contract imported!";
pub const VALIDATION_FAILED: &str = "An error occurred when checking the contract";
pub const WALLET_UNAVAILABLE: &str = "Could not reach the wallet";
pub const SAVE_FAILED: &str = "Failed to save your changes";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Severity {
    Info,
    Success,
    Error,
}

impl Display for Severity {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Severity::Info => write!(f, "info"),
            Severity::Success => write!(f, "success"),
            Severity::Error => write!(f, "error"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Notification {
    pub severity: Severity,
    pub message: String,
}

impl Display for Notification {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{}] {}", self.severity, self.message)
    }
}

pub type NotificationReceiver = mpsc::UnboundedReceiver<Notification>;

/// Sending side of the user-facing message channel.
/// Nobody listening is not an error.
#[derive(Debug, Clone)]
pub struct Notifier {
    sender: mpsc::UnboundedSender<Notification>,
}

impl Notifier {
    pub fn new() -> (Notifier, NotificationReceiver) {
        let (sender, receiver) = mpsc::unbounded_channel();
        (Notifier { sender }, receiver)
    }

    fn notify(&self, severity: Severity, message: impl Into<String>) {
        let notification = Notification {
            severity,
            message: message.into(),
        };
        if self.sender.send(notification).is_err() {
            trace!("notification receiver has been dropped");
        }
    }

    pub fn info(&self, message: impl Into<String>) {
        self.notify(Severity::Info, message)
    }

    pub fn success(&self, message: impl Into<String>) {
        self.notify(Severity::Success, message)
    }

    pub fn error(&self, message: impl Into<String>) {
        self.notify(Severity::Error, message)
    }
}
