//! Command-line interface definitions for Guardian Digest.
//!
//! Every option has a default matching the daily print run, so the binary
//! can be started with no arguments. The API key and endpoint can also come
//! from the environment.

use crate::api::{ApiConfig, GUARDIAN_SEARCH_URL};
use crate::models::SectionFilter;
use clap::Parser;
use std::time::Duration;

/// Command-line arguments for the Guardian Digest application.
///
/// # Examples
///
/// ```sh
/// # Daily defaults, key from the environment
/// GUARDIAN_API_KEY=... guardian_digest
///
/// # Different sections and a one-day window
/// guardian_digest --sections "world|sport" --hours-back 24
/// ```
#[derive(Parser, Debug)]
#[command(author, version, about)]
pub struct Cli {
    /// Pipe-separated section IDs; one top article is picked per section
    #[arg(short, long, default_value = "world|commentisfree|lifeandstyle")]
    pub sections: SectionFilter,

    /// Maximum age in hours of an article to be considered
    #[arg(long, default_value_t = 12)]
    pub hours_back: u32,

    /// Guardian content API key
    #[arg(long, env = "GUARDIAN_API_KEY", hide_env_values = true)]
    pub api_key: Option<String>,

    /// Search endpoint of the content API
    #[arg(long, env = "GUARDIAN_API_URL", default_value = GUARDIAN_SEARCH_URL)]
    pub api_url: String,

    /// Request timeout in seconds (no timeout when unset)
    #[arg(long)]
    pub timeout_secs: Option<u64>,

    /// Directory the digest JSON is written to
    #[arg(short, long, env = "DIGEST_OUTPUT_DIR", default_value = "~/daily_print")]
    pub output_dir: String,
}

impl Cli {
    /// Content API settings taken from the parsed arguments.
    pub fn api_config(&self) -> ApiConfig {
        ApiConfig {
            api_key: self.api_key.clone(),
            endpoint: self.api_url.clone(),
            timeout: self.timeout_secs.map(Duration::from_secs),
        }
    }
}
