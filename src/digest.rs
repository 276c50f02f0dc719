//! End-to-end digest pipeline: fetch, normalize, select.

use crate::api::{ContentSearch, SearchQuery};
use crate::error::DigestError;
use crate::models::{Article, SectionFilter};
use crate::scrapers::guardian::process_articles;
use crate::selection::select_section_highlights;
use chrono::Local;
use tracing::{info, instrument};

/// Fetch everything published in `section_filter` over the last `hours_back`
/// hours, clean it up, and return the top article of each section.
///
/// Stages run strictly in sequence and the first error ends the run.
#[instrument(level = "info", skip(api, section_filter), fields(sections = %section_filter))]
pub async fn get_guardian_news<S: ContentSearch>(
    api: &S,
    section_filter: &SectionFilter,
    hours_back: u32,
) -> Result<Vec<Article>, DigestError> {
    let query = SearchQuery::new(section_filter.clone(), hours_back, Local::now())?;
    info!(from_date = %query.from_date, "Searching Guardian sections");

    let api_response = api.search(&query).await?;
    let normalized = process_articles(&api_response);
    let articles = select_section_highlights(&normalized.articles, section_filter)?;

    info!(
        fetched = api_response.response.results.len(),
        skipped = normalized.skipped.len(),
        selected = articles.len(),
        "Digest assembled"
    );
    Ok(articles)
}
