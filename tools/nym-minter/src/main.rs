// Copyright 2024 - Nym Technologies SA <contact@nymtech.net>
// SPDX-License-Identifier: Apache-2.0

use clap::Parser;

mod cli;
mod config;
mod error;
mod logging;
mod output;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = cli::Cli::parse();
    logging::setup_tracing_logger();

    args.execute().await?;
    Ok(())
}
