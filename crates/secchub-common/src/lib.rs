//! SecHub Common Library
#![deny(clippy::unwrap_used, clippy::expect_used)]
//!
//! Shared error handling and logging for the SecHub workspace.
//!
//! # Overview
//!
//! - **Error Handling**: [`SecchubError`] and the [`Result`] alias
//! - **Logging**: environment-driven `tracing` subscriber setup
//!
//! # Example
//!
//! ```no_run
//! use secchub_common::logging::{init_logging, LogConfig};
//!
//! fn main() -> anyhow::Result<()> {
//!     let config = LogConfig::from_env()?;
//!     let _guard = init_logging(&config)?;
//!     tracing::info!("Application started");
//!     Ok(())
//! }
//! ```

pub mod error;
pub mod logging;

// Re-export commonly used types
pub use error::{Result, SecchubError};
