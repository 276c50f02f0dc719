//! # Guardian Digest
//!
//! Builds a small daily digest from The Guardian: one top story per requested
//! section, with article bodies cleaned up for print.
//!
//! ## Usage
//!
//! ```sh
//! GUARDIAN_API_KEY=... guardian_digest --sections "world|commentisfree|lifeandstyle" --hours-back 12
//! ```
//!
//! ## Architecture
//!
//! The application follows a pipeline architecture:
//! 1. **Fetching**: One content API search over all requested sections
//! 2. **Normalizing**: Flatten each result, strip links and figures, drop live blogs
//! 3. **Selecting**: First (most relevant) article per section, in request order
//! 4. **Output**: Write the digest JSON for the print renderer

use chrono::Local;
use clap::Parser;
use std::error::Error;
use tracing::{debug, error, info, instrument};
use tracing_subscriber::{EnvFilter, fmt as tfmt};

mod api;
mod cli;
mod digest;
mod error;
mod models;
mod outputs;
mod sanitize;
mod scrapers;
mod selection;
mod utils;

use api::GuardianClient;
use cli::Cli;
use models::Digest;
use outputs::json;
use utils::{ensure_writable_dir, expand_home, load_dotenv};

#[tokio::main]
#[instrument]
async fn main() -> Result<(), Box<dyn Error>> {
    // --- Tracing init ---
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tfmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_file(false)
        .with_line_number(false)
        .with_timer(tracing_subscriber::fmt::time::UtcTime::rfc_3339())
        .init();

    let start_time = std::time::Instant::now();
    info!("guardian_digest starting up");

    // Values from a local .env feed clap's env fallbacks (GUARDIAN_API_KEY, ...)
    load_dotenv(None);

    let args = Cli::parse();
    debug!(sections = %args.sections, hours_back = args.hours_back, output_dir = %args.output_dir, "Parsed CLI arguments");

    // Early check: output dir must exist and be writable before any fetching
    let output_dir = expand_home(&args.output_dir);
    if let Err(e) = ensure_writable_dir(&output_dir).await {
        error!(
            path = %output_dir.display(),
            error = %e,
            "Output directory is not writable (fix perms or choose a different path)"
        );
        return Err(e);
    }

    println!("Fetching daily news: {}", Local::now());

    let client = GuardianClient::new(args.api_config())?;
    let articles = match digest::get_guardian_news(&client, &args.sections, args.hours_back).await {
        Ok(articles) => articles,
        Err(e) => {
            error!(error = %e, "Digest run failed");
            return Err(e.into());
        }
    };
    println!("Fetched {} news items from The Guardian", articles.len());

    let now = Local::now();
    let digest = Digest {
        local_date: now.date_naive().to_string(),
        local_time: now.time().format("%H:%M:%S").to_string(),
        sections: args.sections.sections().to_vec(),
        articles,
    };
    match json::write_digest(&digest, &output_dir).await {
        Ok(path) => info!(path = %path.display(), "Digest written"),
        Err(e) => {
            error!(error = %e, "Failed to write digest JSON");
            return Err(e);
        }
    }

    let elapsed = start_time.elapsed();
    info!(
        ?elapsed,
        secs = elapsed.as_secs(),
        millis = elapsed.subsec_millis(),
        "Execution complete"
    );

    Ok(())
}
