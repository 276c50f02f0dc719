//! Data models for the Guardian search payload and the digest built from it.
//!
//! - [`SearchResponse`]: the decoded API envelope; results stay raw JSON so a
//!   single malformed result can be skipped without failing the batch
//! - [`RawArticle`]: one search result as the API sends it
//! - [`Article`]: the flat, always-complete record the rest of the crate uses
//! - [`SectionFilter`]: the ordered list of requested section identifiers
//! - [`Digest`]: the exported selection for a single run

use crate::error::ProcessingError;
use crate::sanitize::clean_article_html;
use itertools::Itertools;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;
use std::str::FromStr;

/// Top-level body returned by `GET /search`.
#[derive(Debug, Default, Deserialize)]
pub struct SearchResponse {
    /// The `response` object wrapping the results.
    pub response: SearchResults,
}

/// The `response` object of a search payload.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct SearchResults {
    /// `"ok"` on success.
    pub status: String,
    /// Total number of matching articles upstream (not just this page).
    pub total: u64,
    /// Search results in relevance order, left undecoded.
    pub results: Vec<Value>,
}

/// A single search result as defined by the content API.
///
/// Every field is optional on the wire and `null` is treated like absence.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RawArticle {
    pub section_id: Option<String>,
    pub section_name: Option<String>,
    pub web_publication_date: Option<String>,
    pub web_title: Option<String>,
    pub fields: Option<RawFields>,
}

/// The `fields` projection requested through `show-fields`.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RawFields {
    pub trail_text: Option<String>,
    pub byline: Option<String>,
    pub body: Option<String>,
    pub thumbnail: Option<String>,
    pub wordcount: Option<RawWordcount>,
}

/// `wordcount` arrives as a string (`"1234"`) but a bare number is accepted too.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub enum RawWordcount {
    Number(u32),
    Text(String),
}

impl RawWordcount {
    fn parse(self) -> Result<Option<u32>, ProcessingError> {
        match self {
            RawWordcount::Number(n) => Ok(Some(n)),
            RawWordcount::Text(s) if s.trim().is_empty() => Ok(None),
            RawWordcount::Text(s) => s
                .trim()
                .parse()
                .map(Some)
                .map_err(|_| ProcessingError::InvalidWordcount(s)),
        }
    }
}

/// A normalized article.
///
/// Absent string fields are empty strings and an absent word count is `None`,
/// so the record shape is always complete. `main_text` has been through
/// [`clean_article_html`]: no links, no figures.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct Article {
    pub section_id: String,
    pub section_name: String,
    /// ISO-8601 publication timestamp as sent by the API.
    pub date_published: String,
    pub title: String,
    pub subheading: String,
    pub author: String,
    pub main_text: String,
    /// Thumbnail URL or empty.
    pub thumbnail: String,
    pub wordcount: Option<u32>,
}

impl Article {
    /// Build an article from a raw result, defaulting every missing field and
    /// sanitizing the body.
    ///
    /// # Errors
    ///
    /// Returns [`ProcessingError::InvalidWordcount`] when the word count is
    /// present but not numeric.
    pub fn from_raw(raw: RawArticle) -> Result<Self, ProcessingError> {
        let fields = raw.fields.unwrap_or_default();
        let wordcount = match fields.wordcount {
            Some(wc) => wc.parse()?,
            None => None,
        };
        let body = fields.body.unwrap_or_default();

        Ok(Article {
            section_id: raw.section_id.unwrap_or_default(),
            section_name: raw.section_name.unwrap_or_default(),
            date_published: raw.web_publication_date.unwrap_or_default(),
            title: raw.web_title.unwrap_or_default(),
            subheading: fields.trail_text.unwrap_or_default(),
            author: fields.byline.unwrap_or_default(),
            main_text: clean_article_html(&body),
            thumbnail: fields.thumbnail.unwrap_or_default(),
            wordcount,
        })
    }

    /// Live blogs carry "as it happened" in their title and are not digest material.
    pub fn is_live_blog(&self) -> bool {
        self.title.contains("as it happened")
    }
}

/// Ordered section identifiers, parsed from a pipe-delimited list such as
/// `world|commentisfree|lifeandstyle`.
///
/// Segments are trimmed and empty ones dropped. Duplicates are kept.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SectionFilter(Vec<String>);

impl SectionFilter {
    /// Requested sections in request order.
    pub fn sections(&self) -> &[String] {
        &self.0
    }

    /// The value of the API's `section` query parameter.
    pub fn to_query(&self) -> String {
        self.0.iter().join("|")
    }
}

impl FromStr for SectionFilter {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let sections: Vec<String> = s
            .split('|')
            .map(str::trim)
            .filter(|section| !section.is_empty())
            .map(str::to_string)
            .collect();
        if sections.is_empty() {
            return Err(format!("section filter `{s}` names no sections"));
        }
        Ok(SectionFilter(sections))
    }
}

impl fmt::Display for SectionFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_query())
    }
}

/// One run's selection, as written to disk for the renderer.
#[derive(Debug, Deserialize, Serialize)]
pub struct Digest {
    /// The date of the run in `YYYY-MM-DD` format.
    pub local_date: String,
    /// The local time of the run.
    pub local_time: String,
    /// Requested sections, in request order.
    pub sections: Vec<String>,
    /// One article per requested section, in the same order.
    pub articles: Vec<Article>,
}
