//! Schema validation
//!
//! Structural checks applied to a freshly ingested [`Table`] before it enters
//! the transformation layer. Validation is intentionally shallow: it checks
//! column count, non-emptiness, and primary-key completeness, never column
//! names or per-cell types — the transformer handles those through coercion.
//!
//! Data-quality problems return `Ok(false)` (a skip signal). An unregistered
//! schema name is a programming error and returns
//! [`PipelineError::UnknownSchema`], which must propagate.

use std::collections::HashMap;
use tracing::{error, info, warn};

use crate::config::PipelineConfig;
use crate::error::{PipelineError, Result};
use crate::table::Table;

/// A named, fixed expectation for a table's column set
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Schema {
    pub name: String,
    /// Exact expected ordered column list; the first column is the implicit
    /// primary key.
    pub columns: Vec<String>,
}

/// Validates tables against registered schemas
pub struct SchemaValidator {
    schemas: HashMap<String, Schema>,
}

impl SchemaValidator {
    /// Register the `transactions` and `customers` schemas from config.
    pub fn new(config: &PipelineConfig) -> Self {
        let mut schemas = HashMap::new();
        for (name, columns) in [
            ("transactions", &config.transaction_columns),
            ("customers", &config.customer_columns),
        ] {
            schemas.insert(
                name.to_string(),
                Schema {
                    name: name.to_string(),
                    columns: columns.clone(),
                },
            );
        }
        Self { schemas }
    }

    fn schema(&self, schema_name: &str) -> Result<&Schema> {
        self.schemas
            .get(schema_name)
            .ok_or_else(|| PipelineError::UnknownSchema(schema_name.to_string()))
    }

    /// Validate a table against a named schema.
    ///
    /// Returns `Ok(false)` for data-quality problems (logged with the precise
    /// reason), `Ok(true)` when the table passes, and `UnknownSchema` for an
    /// unregistered name.
    pub fn validate(&self, table: &Table, schema_name: &str) -> Result<bool> {
        let schema = self.schema(schema_name)?;

        info!(
            "Validating '{}' schema ({} rows)",
            schema_name,
            table.row_count()
        );

        if table.column_count() != schema.columns.len() {
            error!(
                "Column count mismatch for '{}': expected {}, got {}",
                schema_name,
                schema.columns.len(),
                table.column_count()
            );
            return Ok(false);
        }

        if table.is_empty() {
            warn!("Table is empty for schema '{}'", schema_name);
            return Ok(false);
        }

        // Primary key is the table's first column; count matched above so it
        // lines up with the schema's first declared column.
        let pk_column = &table.columns()[0];
        let null_count = table.rows().iter().filter(|row| row[0].is_null()).count();
        if null_count > 0 {
            warn!(
                "Found {} null values in primary key column '{}'",
                null_count, pk_column
            );
            return Ok(false);
        }

        info!("Validation passed for '{}'", schema_name);
        Ok(true)
    }

    /// Expected column names for a schema.
    pub fn schema_columns(&self, schema_name: &str) -> Result<&[String]> {
        Ok(&self.schema(schema_name)?.columns)
    }
}
