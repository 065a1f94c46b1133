//! Error taxonomy for the ingestion pipeline
//!
//! The orchestrator treats every variant except [`PipelineError::UnknownSchema`]
//! as a per-file failure: counted, logged, and skipped past. `UnknownSchema`
//! is a programming error and propagates to the run boundary. A validation
//! returning `false` is not an error at all — it is a skip signal.

use std::path::PathBuf;
use thiserror::Error;

/// Boxed cause for failures whose underlying error type varies by format
type Cause = Box<dyn std::error::Error + Send + Sync>;

/// Result type alias for pipeline operations
pub type Result<T> = std::result::Result<T, PipelineError>;

/// Main error type for the ingestion pipeline
#[derive(Error, Debug)]
pub enum PipelineError {
    #[error("ingestion failed for {}: {source}", path.display())]
    Ingestion {
        path: PathBuf,
        #[source]
        source: Cause,
    },

    #[error("unknown schema: {0}")]
    UnknownSchema(String),

    #[error("column '{column}' not found in {entity} table")]
    MissingColumn {
        entity: &'static str,
        column: &'static str,
    },

    #[error("file discovery failed: {0}")]
    Discovery(#[source] Cause),

    #[error("failed to connect to database: {0}")]
    Connection(#[source] sqlx::Error),

    #[error("not connected to database")]
    NotConnected,

    #[error("failed to load {table}: {source}")]
    Load {
        table: &'static str,
        #[source]
        source: sqlx::Error,
    },

    #[error("failed to append to processed log: {0}")]
    ProcessedLog(#[from] std::io::Error),
}

impl PipelineError {
    /// Build an ingestion failure carrying the file path and underlying cause.
    pub fn ingestion(path: impl Into<PathBuf>, source: impl Into<Cause>) -> Self {
        PipelineError::Ingestion {
            path: path.into(),
            source: source.into(),
        }
    }
}
