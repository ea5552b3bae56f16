// Copyright 2024 - Nym Technologies SA <contact@nymtech.net>
// SPDX-License-Identifier: Apache-2.0

//! Contract deployment/import workflow of the NFT batch minter.
//!
//! The [`WorkflowController`] owns the [`Session`] and advances it through the
//! [`Stage`]s in response to [`WorkflowCommand`]s. Deployments go through the
//! chain's [`DeploymentExecutor`](nym_minter_chain::DeploymentExecutor), imports
//! through its [`ContractValidator`](nym_minter_chain::ContractValidator), and
//! every resulting change is written to the registry store.

pub mod command;
pub mod controller;
pub mod error;
pub mod handle;
pub mod notification;
pub mod session;
pub mod stage;

pub use command::WorkflowCommand;
pub use controller::WorkflowController;
pub use error::{ErrorCategory, WorkflowError};
pub use handle::WorkflowHandle;
pub use notification::{Notification, NotificationReceiver, Notifier, Severity};
pub use session::{DeployForm, ImageRecord, ImportForm, Session};
pub use stage::{DeployStage, Stage};
