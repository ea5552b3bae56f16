// Copyright 2024 - Nym Technologies SA <contact@nymtech.net>
// SPDX-License-Identifier: Apache-2.0

use crate::cli::helpers::{CommonArgs, MinterContext};
use crate::error::MinterCliError;
use nym_minter_workflow::{ImageRecord, Session, WorkflowCommand};
use serde::Serialize;
use std::fmt::{Display, Formatter};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::warn;
use url::Url;

#[derive(clap::Args, Debug)]
pub(crate) struct Args {
    #[command(flatten)]
    common: CommonArgs,

    /// Name shared by every NFT of the batch.
    #[arg(long)]
    name: Option<String>,

    /// Description shared by every NFT of the batch.
    #[arg(long)]
    description: Option<String>,

    /// Number of copies to mint. Can only be set when exactly one image is provided.
    #[arg(long, requires = "image")]
    count: Option<String>,

    /// Image to include in the batch. Can be repeated.
    #[arg(long)]
    image: Vec<PathBuf>,
}

#[derive(Debug, Serialize)]
struct MetadataResults {
    name: String,
    description: String,
    count: u32,
    images: Vec<ImageRecord>,
}

impl From<Session> for MetadataResults {
    fn from(session: Session) -> Self {
        let metadata = session.metadata().clone();
        MetadataResults {
            name: metadata.name,
            description: metadata.description,
            count: metadata.count,
            images: session.images().to_vec(),
        }
    }
}

impl Display for MetadataResults {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "name: {}", self.name)?;
        writeln!(f, "description: {}", self.description)?;
        write!(f, "count: {}", self.count)?;
        for image in &self.images {
            if image.is_missing() {
                write!(f, "\nimage: {} (missing)", image.file_name)?;
            } else {
                write!(f, "\nimage: {}", image.file_name)?;
            }
        }
        Ok(())
    }
}

fn image_record(path: &Path) -> ImageRecord {
    let file_name = path
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string());

    let data_url = fs::canonicalize(path)
        .ok()
        .and_then(|absolute| Url::from_file_path(absolute).ok())
        .map(String::from)
        .unwrap_or_else(|| {
            warn!("could not read {}", path.display());
            String::new()
        });

    ImageRecord::new(data_url, file_name)
}

pub(crate) async fn execute(args: Args) -> Result<(), MinterCliError> {
    let context = MinterContext::load(&args.common).await?;
    let workflow = context.start_workflow(args.common.output).await?;

    let mut commands = Vec::new();
    if !args.image.is_empty() {
        let images = args.image.iter().map(|path| image_record(path)).collect();
        commands.push(WorkflowCommand::SetImages(images));
    }
    if let Some(name) = args.name {
        commands.push(WorkflowCommand::SetMetadataName(name));
    }
    if let Some(description) = args.description {
        commands.push(WorkflowCommand::SetMetadataDescription(description));
    }
    if let Some(count) = args.count {
        commands.push(WorkflowCommand::SetMetadataCount(count));
    }

    let edited = workflow.send_all(commands).await;
    let session = workflow.finish().await?;
    edited?;

    args.common
        .output
        .to_stdout(&MetadataResults::from(session));
    Ok(())
}
