//! JSON hand-off file for the print renderer.
//!
//! One file per day, named after the local date. A second run on the same day
//! replaces the earlier file.

use crate::models::Digest;
use std::error::Error;
use std::path::{Path, PathBuf};
use tokio::fs;
use tracing::{error, info, instrument};

/// Write a [`Digest`] to `{output_dir}/{local_date}.json`.
///
/// The directory is created if needed.
///
/// # Returns
///
/// The path of the written file.
#[instrument(level = "info", skip_all, fields(output_dir = %output_dir.display()))]
pub async fn write_digest(digest: &Digest, output_dir: &Path) -> Result<PathBuf, Box<dyn Error>> {
    let json = serde_json::to_string_pretty(digest)?;

    if let Err(e) = fs::create_dir_all(output_dir).await {
        error!(error = %e, "Failed to create output dir");
        return Err(e.into());
    }

    let output_json_filename = output_dir.join(format!("{}.json", digest.local_date));
    info!(path = %output_json_filename.display(), "Writing JSON");
    fs::write(&output_json_filename, json).await?;
    info!(
        path = %output_json_filename.display(),
        articles = digest.articles.len(),
        "Wrote digest JSON"
    );

    Ok(output_json_filename)
}
