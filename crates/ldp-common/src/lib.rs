//! LDP Common Library
//!
//! Shared infrastructure for the LDP workspace members:
//!
//! - **Logging**: tracing subscriber configuration and initialization
//! - **Fs**: small filesystem and filename helpers
//!
//! # Example
//!
//! ```no_run
//! use ldp_common::logging::{init_logging, LogConfig};
//!
//! fn main() -> anyhow::Result<()> {
//!     let config = LogConfig::from_env()?;
//!     init_logging(&config)?;
//!     Ok(())
//! }
//! ```

pub mod fs;
pub mod logging;
