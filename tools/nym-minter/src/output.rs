// Copyright 2024 - Nym Technologies SA <contact@nymtech.net>
// SPDX-License-Identifier: Apache-2.0

use clap::ValueEnum;
use serde::Serialize;
use std::fmt::{Display, Formatter};

#[derive(Debug, Default, Copy, Clone, PartialEq, Eq, ValueEnum)]
pub(crate) enum OutputFormat {
    #[default]
    Text,
    Json,
}

impl Display for OutputFormat {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            OutputFormat::Text => write!(f, "text"),
            OutputFormat::Json => write!(f, "json"),
        }
    }
}

impl OutputFormat {
    pub(crate) fn is_json(&self) -> bool {
        matches!(self, OutputFormat::Json)
    }

    pub(crate) fn format<T: Serialize + ToString>(&self, data: &T) -> String {
        match self {
            OutputFormat::Text => data.to_string(),
            OutputFormat::Json => serde_json::to_string_pretty(data)
                .unwrap_or_else(|err| format!("could not serialise the output: {err}")),
        }
    }

    pub(crate) fn to_stdout<T: Serialize + ToString>(&self, data: &T) {
        println!("{}", self.format(data))
    }
}
