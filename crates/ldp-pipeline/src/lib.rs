//! LDP Pipeline Library
//!
//! Batch ingestion of landing-directory flat files into PostgreSQL.
//!
//! # Architecture
//!
//! - **config**: environment-sourced, immutable run configuration
//! - **discovery**: glob-matched, deterministically sorted file lists
//! - **table**: loosely-typed tabular data at the ingestion boundary
//! - **ingest**: CSV and JSON-array parsers producing tables
//! - **validate**: shallow structural checks against named schemas
//! - **transform**: per-entity normalisation into typed records
//! - **loader**: batched, per-file-atomic PostgreSQL inserts plus the
//!   processed-file ledger
//! - **orchestrator**: the ingest → validate → transform → load loop with
//!   per-file failure isolation
//!
//! # Example
//!
//! ```no_run
//! use ldp_pipeline::{PipelineConfig, PipelineOrchestrator};
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let config = PipelineConfig::load()?;
//!     let mut orchestrator = PipelineOrchestrator::new(config);
//!     let summary = orchestrator.run().await?;
//!     std::process::exit(summary.exit_code());
//! }
//! ```

pub mod config;
pub mod discovery;
pub mod error;
pub mod ingest;
pub mod loader;
pub mod models;
pub mod orchestrator;
pub mod table;
pub mod transform;
pub mod validate;

pub use config::{PipelineConfig, Timezone};
pub use discovery::{DiscoveredFiles, EntityKind, FileDiscovery, FileRecord};
pub use error::{PipelineError, Result};
pub use ingest::FileIngestor;
pub use loader::DatabaseLoader;
pub use models::{Customer, Transaction};
pub use orchestrator::{FileOutcome, PipelineOrchestrator, RunSummary};
pub use table::{Table, Value};
pub use transform::Transformer;
pub use validate::{Schema, SchemaValidator};
