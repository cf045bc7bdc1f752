//! Output generation and input loading for JSON files.
//!
//! # Submodules
//!
//! - [`json`]: Writes scrape reports and reads stories and labeled corpora

pub mod json;
