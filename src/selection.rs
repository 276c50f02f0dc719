//! Top-article selection.
//!
//! Results come back in editorial relevance order, so the first article seen
//! for a section is that section's top story.

use crate::error::DigestError;
use crate::models::{Article, SectionFilter};
use std::collections::HashMap;
use tracing::{info, instrument};

/// Pick the top article of each requested section.
///
/// One pass over `news_items` records the first article per section id; the
/// requested sections are then looked up in request order. The result has one
/// entry per requested section and follows request order, not relevance order.
///
/// # Errors
///
/// [`DigestError::NoMatch`] for the first requested section that has no
/// article. Nothing is returned for the other sections in that case.
#[instrument(level = "info", skip_all, fields(articles = news_items.len(), sections = %section_filter))]
pub fn select_section_highlights(
    news_items: &[Article],
    section_filter: &SectionFilter,
) -> Result<Vec<Article>, DigestError> {
    let mut first_by_section: HashMap<&str, &Article> = HashMap::new();
    for story in news_items {
        first_by_section
            .entry(story.section_id.as_str())
            .or_insert(story);
    }

    let top_articles = section_filter
        .sections()
        .iter()
        .map(|section| {
            first_by_section
                .get(section.as_str())
                .map(|&article| article.clone())
                .ok_or_else(|| DigestError::NoMatch {
                    section: section.clone(),
                })
        })
        .collect::<Result<Vec<_>, _>>()?;

    info!(selected = top_articles.len(), "Selected top article per section");
    Ok(top_articles)
}
