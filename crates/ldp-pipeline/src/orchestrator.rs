//! Pipeline orchestration
//!
//! Drives discovery → ingest → validate → transform → load for every
//! discovered file, transactions fully before customers, each group in name
//! order. One file's failure never aborts the run: per-file errors are
//! counted and the loop moves on. Three outcomes are kept distinct:
//!
//! - **loaded** — the file's rows were committed and the ledger appended;
//! - **skipped** — validation returned false (warn, separate counter);
//! - **error** — ingest/transform/load failed (error counter).
//!
//! [`PipelineError::UnknownSchema`] is the exception to the isolation rule:
//! it is a programming error and aborts the run. The database connection is
//! always closed, however the file loop exits.

use tracing::{error, info, warn};

use crate::config::PipelineConfig;
use crate::discovery::{DiscoveredFiles, EntityKind, FileDiscovery, FileRecord};
use crate::error::{PipelineError, Result};
use crate::ingest::FileIngestor;
use crate::loader::DatabaseLoader;
use crate::transform::Transformer;
use crate::validate::SchemaValidator;

/// Outcome of one file's trip through the pipeline
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileOutcome {
    /// Rows committed and ledger appended
    Loaded(u64),
    /// Validation returned false; nothing was written
    Skipped,
}

/// Totals for one pipeline run
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RunSummary {
    pub rows_loaded: u64,
    pub files_loaded: usize,
    pub files_skipped: usize,
    pub errors: usize,
}

impl RunSummary {
    /// True when no file raised a per-file error (skips do not count).
    pub fn is_success(&self) -> bool {
        self.errors == 0
    }

    /// Process exit status for external tooling: 0 on success, 1 otherwise.
    pub fn exit_code(&self) -> i32 {
        if self.is_success() {
            0
        } else {
            1
        }
    }

    /// One-line human summary.
    pub fn summary(&self) -> String {
        format!(
            "{} rows loaded from {} files ({} skipped, {} errors)",
            self.rows_loaded, self.files_loaded, self.files_skipped, self.errors
        )
    }
}

/// Drives the full ingestion pipeline over one batch of discovered files
pub struct PipelineOrchestrator {
    config: PipelineConfig,
    discovery: FileDiscovery,
    ingestor: FileIngestor,
    validator: SchemaValidator,
    transformer: Transformer,
    loader: DatabaseLoader,
}

impl PipelineOrchestrator {
    pub fn new(config: PipelineConfig) -> Self {
        let discovery = FileDiscovery::new(&config);
        let validator = SchemaValidator::new(&config);
        let loader = DatabaseLoader::new(&config);

        Self {
            config,
            discovery,
            ingestor: FileIngestor::new(),
            validator,
            transformer: Transformer::new(),
            loader,
        }
    }

    /// Execute the full ingestion pipeline.
    ///
    /// Connection failures and `UnknownSchema` abort the run; everything else
    /// is contained per file. The connection is closed before returning,
    /// whatever happened.
    pub async fn run(&mut self) -> Result<RunSummary> {
        info!("Starting ingestion pipeline");
        info!("Landing directory: {}", self.config.landing_dir.display());

        let files = self.discovery.discover()?;

        let result = self.process_all(&files).await;
        self.loader.close().await;
        let summary = result?;

        info!(
            "Pipeline complete: {} rows loaded, {} errors",
            summary.rows_loaded, summary.errors
        );
        if summary.errors > 0 {
            warn!("Pipeline finished with {} error(s)", summary.errors);
        }

        Ok(summary)
    }

    async fn process_all(&mut self, files: &DiscoveredFiles) -> Result<RunSummary> {
        let mut summary = RunSummary::default();

        self.loader.connect().await?;

        // Transactions fully before customers; each list is already sorted.
        for record in &files.transactions {
            self.process_file(record, &mut summary).await?;
        }
        for record in &files.customers {
            self.process_file(record, &mut summary).await?;
        }

        Ok(summary)
    }

    /// Run one file through the pipeline and fold its outcome into the
    /// summary. Only `UnknownSchema` escapes as `Err`.
    async fn process_file(&self, record: &FileRecord, summary: &mut RunSummary) -> Result<()> {
        match self.process_one(record).await {
            Ok(FileOutcome::Loaded(count)) => {
                summary.rows_loaded += count;
                summary.files_loaded += 1;
                info!("✓ Loaded {} ({} rows)", record.file_name, count);
            },
            Ok(FileOutcome::Skipped) => {
                summary.files_skipped += 1;
                warn!("Skipping {}: validation failed", record.file_name);
            },
            Err(e @ PipelineError::UnknownSchema(_)) => return Err(e),
            Err(e) => {
                summary.errors += 1;
                error!(error = %e, "Failed to process {}. Check file format.", record.file_name);
            },
        }
        Ok(())
    }

    async fn process_one(&self, record: &FileRecord) -> Result<FileOutcome> {
        match record.entity {
            EntityKind::Transactions => {
                let table = self.ingestor.ingest_csv(&record.path)?;
                if !self.validator.validate(&table, record.entity.schema_name())? {
                    return Ok(FileOutcome::Skipped);
                }
                let records = self.transformer.transform_transactions(&table)?;
                let count = self
                    .loader
                    .load_transactions(&records, &record.file_name)
                    .await?;
                Ok(FileOutcome::Loaded(count))
            },
            EntityKind::Customers => {
                let table = self.ingestor.ingest_json(&record.path)?;
                if !self.validator.validate(&table, record.entity.schema_name())? {
                    return Ok(FileOutcome::Skipped);
                }
                let records = self.transformer.transform_customers(&table)?;
                let count = self
                    .loader
                    .load_customers(&records, &record.file_name)
                    .await?;
                Ok(FileOutcome::Loaded(count))
            },
        }
    }
}
