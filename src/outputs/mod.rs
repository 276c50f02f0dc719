//! Output generation for the selected articles.
//!
//! # Submodules
//!
//! - [`json`]: Writes the run's [`Digest`](crate::models::Digest) for the renderer
//!
//! # Output Structure
//!
//! ```text
//! output_dir/
//! ├── 2025-05-05.json
//! └── 2025-05-06.json
//! ```

pub mod json;
