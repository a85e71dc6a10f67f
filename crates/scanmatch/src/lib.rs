//! # scanmatch
//!
//! Front end for the scanmatch engine:
//! - **config**: option layering (file, environment, command line)
//! - **render**: text and JSON report output
//! - **error**: Common error type
//! - **tracing**: Logging setup
//!
//! ## Usage
//!
//! ```rust,no_run
//! use scanmatch::config::{self, Overrides};
//! use scanmatch::render::{render, Format};
//! use scanmatch_core::SearchEngine;
//!
//! # fn main() -> scanmatch::Result<()> {
//! let options = config::resolve(None, &Overrides::default())?;
//! let report = SearchEngine::new(options)?.run_batch("Invoice numbr: 123456", &["number"])?;
//! print!("{}", render(&report, Format::Text)?);
//! # Ok(())
//! # }
//! ```

pub mod config;
pub mod error;
pub mod render;
pub mod tracing;

pub use error::{Error, Result};
