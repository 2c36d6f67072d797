//! Document download command.

use std::path::{Path, PathBuf};
use std::time::Duration;

use console::style;
use futures::TryStreamExt;
use indicatif::{ProgressBar, ProgressStyle};
use tokio::io::AsyncWriteExt;

use crate::config::Settings;
use crate::services::fetch_document;
use crate::session::SessionBuilder;
use crate::utils::format_size;

/// Download a document's content stream to a local file.
pub async fn cmd_download(
    settings: &Settings,
    document_id: &str,
    output: Option<&Path>,
) -> anyhow::Result<()> {
    let session = SessionBuilder::new(settings.clone()).create_session().await?;
    let mut content = fetch_document(&session, document_id).await?;

    let target: PathBuf = match output {
        Some(path) => path.to_path_buf(),
        None => PathBuf::from(&content.filename),
    };

    let pb = match content.length {
        Some(length) => {
            let pb = ProgressBar::new(length);
            pb.set_style(
                ProgressStyle::default_bar()
                    .template("  [{bar:40.cyan/dim}] {bytes}/{total_bytes} ({bytes_per_sec})")
                    .unwrap()
                    .progress_chars("=>-"),
            );
            pb
        }
        None => {
            let pb = ProgressBar::new_spinner();
            pb.set_style(
                ProgressStyle::default_spinner()
                    .template("{spinner:.green} {bytes} ({bytes_per_sec})")
                    .unwrap(),
            );
            pb
        }
    };
    pb.enable_steady_tick(Duration::from_millis(100));

    let mut file = tokio::fs::File::create(&target).await?;
    let mut written: u64 = 0;
    while let Some(chunk) = content.stream.try_next().await? {
        file.write_all(&chunk).await?;
        written += chunk.len() as u64;
        pb.set_position(written);
    }
    file.flush().await?;
    pb.finish_and_clear();

    println!(
        "{} Saved {} ({}) to {}",
        style("✓").green(),
        content.name,
        format_size(written),
        target.display()
    );

    Ok(())
}
