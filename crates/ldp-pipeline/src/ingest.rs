//! File ingestion
//!
//! Parses a single landing file into a [`Table`]. CSV carries transactions,
//! JSON (top-level array of objects) carries customers. Any I/O or parse
//! failure becomes [`PipelineError::Ingestion`] carrying the file path and
//! underlying cause; the orchestrator treats that as a per-file failure.
//!
//! Reading is the only side effect — files are never renamed or deleted here.

use std::path::Path;
use tracing::info;

use crate::error::{PipelineError, Result};
use crate::table::{Table, Value};

/// Reads and parses data files from the landing directory
#[derive(Debug, Default)]
pub struct FileIngestor;

impl FileIngestor {
    pub fn new() -> Self {
        Self
    }

    /// Read a CSV file into a [`Table`].
    ///
    /// The first record is the header defining column names; every following
    /// record is one row. Ragged records are a parse failure.
    pub fn ingest_csv(&self, path: &Path) -> Result<Table> {
        info!("Ingesting CSV: {}", display_name(path));

        let mut reader =
            csv::Reader::from_path(path).map_err(|e| PipelineError::ingestion(path, e))?;

        let columns: Vec<String> = reader
            .headers()
            .map_err(|e| PipelineError::ingestion(path, e))?
            .iter()
            .map(str::to_string)
            .collect();

        let mut table = Table::new(columns);
        for record in reader.records() {
            let record = record.map_err(|e| PipelineError::ingestion(path, e))?;
            table.push_row(record.iter().map(infer_cell).collect());
        }

        info!("Read {} rows from {}", table.row_count(), display_name(path));
        Ok(table)
    }

    /// Read a JSON array file into a [`Table`].
    ///
    /// The file must hold a top-level array of objects. The union of keys
    /// across all elements becomes the column set; keys missing from an
    /// element become null cells.
    pub fn ingest_json(&self, path: &Path) -> Result<Table> {
        info!("Ingesting JSON: {}", display_name(path));

        let bytes = std::fs::read(path).map_err(|e| PipelineError::ingestion(path, e))?;
        let data: serde_json::Value = serde_json::from_slice(&bytes)
            .map_err(|e| PipelineError::ingestion(path, anyhow::anyhow!("Invalid JSON: {}", e)))?;

        let serde_json::Value::Array(items) = data else {
            return Err(PipelineError::ingestion(
                path,
                anyhow::anyhow!("Expected JSON array, got {}", json_type_name(&data)),
            ));
        };

        let mut objects = Vec::with_capacity(items.len());
        for (index, item) in items.iter().enumerate() {
            let object = item.as_object().ok_or_else(|| {
                PipelineError::ingestion(
                    path,
                    anyhow::anyhow!(
                        "Array element {} is not an object ({})",
                        index,
                        json_type_name(item)
                    ),
                )
            })?;
            objects.push(object);
        }

        // Union of keys across all elements, in first-seen order.
        let mut columns: Vec<String> = Vec::new();
        for object in &objects {
            for key in object.keys() {
                if !columns.iter().any(|c| c == key) {
                    columns.push(key.clone());
                }
            }
        }

        let mut table = Table::new(columns);
        for object in &objects {
            let row: Vec<Value> = table
                .columns()
                .iter()
                .map(|column| object.get(column).map(json_cell).unwrap_or(Value::Null))
                .collect();
            table.push_row(row);
        }

        info!("Read {} rows from {}", table.row_count(), display_name(path));
        Ok(table)
    }
}

/// Infer a cell value from raw CSV text: empty cells are null, numeric text
/// becomes a number, everything else stays a raw string.
fn infer_cell(raw: &str) -> Value {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Value::Null;
    }
    match trimmed.parse::<f64>() {
        Ok(n) if n.is_finite() => Value::Number(n),
        _ => Value::Str(raw.to_string()),
    }
}

fn json_cell(value: &serde_json::Value) -> Value {
    match value {
        serde_json::Value::Null => Value::Null,
        serde_json::Value::Bool(b) => Value::Bool(*b),
        serde_json::Value::Number(n) => n.as_f64().map(Value::Number).unwrap_or(Value::Null),
        serde_json::Value::String(s) => Value::Str(s.clone()),
        // Nested structures are kept as their JSON text.
        other => Value::Str(other.to_string()),
    }
}

fn json_type_name(value: &serde_json::Value) -> &'static str {
    match value {
        serde_json::Value::Null => "null",
        serde_json::Value::Bool(_) => "bool",
        serde_json::Value::Number(_) => "number",
        serde_json::Value::String(_) => "string",
        serde_json::Value::Array(_) => "array",
        serde_json::Value::Object(_) => "object",
    }
}

fn display_name(path: &Path) -> std::borrow::Cow<'_, str> {
    path.file_name()
        .map(|n| n.to_string_lossy())
        .unwrap_or_else(|| path.to_string_lossy())
}
