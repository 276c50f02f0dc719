//! Content sources for the digest.
//!
//! Each source module turns one provider's raw payload into [`Article`]s in
//! the provider's own ranking order.
//!
//! | Source | Module | Method | Notes |
//! |--------|--------|--------|-------|
//! | The Guardian | [`guardian`] | Content API `/search` | Requires API key; bodies are HTML |
//!
//! [`Article`]: crate::models::Article

pub mod guardian;
