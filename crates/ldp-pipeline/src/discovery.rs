//! Landing-directory file discovery
//!
//! Matches the configured glob patterns against the landing directory and
//! returns one deterministically ordered list per entity type. The rest of
//! the pipeline trusts these lists as-is.

use std::path::PathBuf;
use tracing::{info, warn};

use crate::config::PipelineConfig;
use crate::error::{PipelineError, Result};

/// Kind of entity a landing file carries
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntityKind {
    Transactions,
    Customers,
}

impl EntityKind {
    /// Name of the schema this entity validates against.
    pub fn schema_name(&self) -> &'static str {
        match self {
            EntityKind::Transactions => "transactions",
            EntityKind::Customers => "customers",
        }
    }
}

impl std::fmt::Display for EntityKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.schema_name())
    }
}

/// A discovered landing file, created once and never mutated
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileRecord {
    pub path: PathBuf,
    pub file_name: String,
    pub entity: EntityKind,
    /// 8-digit date stamp from names like `transactions_20240115.csv`
    pub file_date: Option<String>,
}

/// Discovery result, one sorted list per entity type
#[derive(Debug, Clone, Default)]
pub struct DiscoveredFiles {
    pub transactions: Vec<FileRecord>,
    pub customers: Vec<FileRecord>,
}

impl DiscoveredFiles {
    pub fn total(&self) -> usize {
        self.transactions.len() + self.customers.len()
    }
}

/// Lists landing-directory entries matching the configured patterns
pub struct FileDiscovery {
    landing_dir: PathBuf,
    transaction_pattern: String,
    customer_pattern: String,
}

impl FileDiscovery {
    pub fn new(config: &PipelineConfig) -> Self {
        Self {
            landing_dir: config.landing_dir.clone(),
            transaction_pattern: config.transaction_pattern.clone(),
            customer_pattern: config.customer_pattern.clone(),
        }
    }

    /// Find all data files in the landing directory.
    pub fn discover(&self) -> Result<DiscoveredFiles> {
        let transactions =
            self.list_files(&self.transaction_pattern, EntityKind::Transactions)?;
        let customers = self.list_files(&self.customer_pattern, EntityKind::Customers)?;

        info!(
            "Discovered {} transaction files, {} customer files",
            transactions.len(),
            customers.len()
        );

        Ok(DiscoveredFiles {
            transactions,
            customers,
        })
    }

    /// List files matching a glob pattern, sorted by file name.
    fn list_files(&self, pattern: &str, entity: EntityKind) -> Result<Vec<FileRecord>> {
        if !self.landing_dir.exists() {
            warn!("Landing directory does not exist: {}", self.landing_dir.display());
            return Ok(Vec::new());
        }

        let full_pattern = self.landing_dir.join(pattern);
        let full_pattern = full_pattern.to_string_lossy();

        let mut records = Vec::new();
        let paths =
            glob::glob(&full_pattern).map_err(|e| PipelineError::Discovery(Box::new(e)))?;

        for entry in paths {
            let path = entry.map_err(|e| PipelineError::Discovery(Box::new(e)))?;
            if path.is_file() {
                records.push(file_record(path, entity));
            }
        }

        records.sort_by(|a, b| a.file_name.cmp(&b.file_name));

        info!(
            "Found {} files matching '{}' in {}",
            records.len(),
            pattern,
            self.landing_dir.display()
        );

        Ok(records)
    }
}

fn file_record(path: PathBuf, entity: EntityKind) -> FileRecord {
    let file_name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    let file_date = ldp_common::fs::file_date(&path);

    FileRecord {
        path,
        file_name,
        entity,
        file_date,
    }
}
