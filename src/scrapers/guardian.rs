//! Guardian search result normalizer.
//!
//! Turns the raw `response.results` array into [`Article`]s in relevance
//! order. Each result is handled on its own: one that cannot be decoded is
//! logged and skipped, the rest of the batch goes on. Live blogs are dropped
//! at the end.

use crate::error::ProcessingError;
use crate::models::{Article, RawArticle, SearchResponse};
use crate::utils::truncate_for_log;
use serde::Deserialize;
use serde_json::Value;
use tracing::{debug, info, instrument, warn};

/// Title used in diagnostics when a result has no `webTitle`.
const UNKNOWN_TITLE: &str = "Unknown";

/// Output of [`process_articles`].
#[derive(Debug, Default)]
pub struct Normalized {
    /// Articles in API relevance order, live blogs removed.
    pub articles: Vec<Article>,
    /// Results that were skipped, with their title and the failure.
    pub skipped: Vec<SkippedArticle>,
}

/// A result that failed normalization.
#[derive(Debug)]
pub struct SkippedArticle {
    pub title: String,
    pub error: ProcessingError,
}

/// Normalize every search result in `api_response`.
///
/// Per-result failures end up in [`Normalized::skipped`]; they are never
/// returned as an error. Articles whose title contains `"as it happened"`
/// are filtered out after conversion, keeping the order of the rest.
#[instrument(level = "info", skip_all, fields(results = api_response.response.results.len()))]
pub fn process_articles(api_response: &SearchResponse) -> Normalized {
    let mut normalized = Normalized::default();

    for news_item in &api_response.response.results {
        match process_article(news_item) {
            Ok(article) => normalized.articles.push(article),
            Err(error) => {
                let title = news_item
                    .get("webTitle")
                    .and_then(Value::as_str)
                    .unwrap_or(UNKNOWN_TITLE)
                    .to_string();
                let skipped = SkippedArticle { title, error };
                warn!(
                    title = %truncate_for_log(&skipped.title, 120),
                    error = %skipped.error,
                    "Error processing article; skipping"
                );
                normalized.skipped.push(skipped);
            }
        }
    }

    let before = normalized.articles.len();
    normalized.articles.retain(|story| !story.is_live_blog());
    let live_blogs = before - normalized.articles.len();

    info!(
        kept = normalized.articles.len(),
        skipped = normalized.skipped.len(),
        live_blogs,
        "Processed Guardian articles"
    );
    normalized
}

fn process_article(news_item: &Value) -> Result<Article, ProcessingError> {
    let raw = RawArticle::deserialize(news_item)?;
    let article = Article::from_raw(raw)?;
    debug!(section = %article.section_id, title = %article.title, "Normalized article");
    Ok(article)
}
