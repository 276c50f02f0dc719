//! Error types for the digest pipeline.
//!
//! Two tiers exist:
//! - [`DigestError`]: fatal to a run. Fetch failures, missing sections and
//!   configuration problems abort the pipeline with no partial output.
//! - [`ProcessingError`]: scoped to a single article during normalization.
//!   These are logged and the article is skipped; they never leave the
//!   normalizer.

use reqwest::StatusCode;
use thiserror::Error;

/// A failure that aborts the whole run.
#[derive(Debug, Error)]
pub enum DigestError {
    /// Transport failure, non-success HTTP status, or an undecodable body.
    #[error("content API request failed: {source}")]
    Fetch {
        /// HTTP status of the response, when one was received.
        status: Option<StatusCode>,
        /// The underlying client error, with the request URL stripped.
        #[source]
        source: reqwest::Error,
    },

    /// A requested section has no article after normalization.
    #[error("no article found for section `{section}`")]
    NoMatch {
        /// The section identifier that could not be matched.
        section: String,
    },

    /// Required configuration is missing or unusable.
    #[error("configuration error: {0}")]
    Configuration(String),
}

/// The request URL carries the API key, so it is dropped from the error.
impl From<reqwest::Error> for DigestError {
    fn from(source: reqwest::Error) -> Self {
        DigestError::Fetch {
            status: source.status(),
            source: source.without_url(),
        }
    }
}

/// A failure confined to one raw article.
#[derive(Debug, Error)]
pub enum ProcessingError {
    /// The result object does not have the expected shape.
    #[error("malformed article: {0}")]
    Malformed(#[from] serde_json::Error),

    /// `wordcount` was present but not a non-negative integer.
    #[error("invalid wordcount `{0}`")]
    InvalidWordcount(String),
}
