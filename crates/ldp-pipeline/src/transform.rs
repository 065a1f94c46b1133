//! Data transformation
//!
//! Converts a loosely-typed [`Table`] into typed records, applying the
//! per-entity normalisation rules on the way:
//!
//! - **Transactions**: parse dates, coerce amounts, standardise status and
//!   payment method, then drop every row whose `transaction_id`,
//!   `merchant_id`, or `amount` is null. This drop step is the pipeline's
//!   principal data-quality gate.
//! - **Customers**: parse `created_at`, trim names and email, upper-case the
//!   country code. No drop step — the asymmetry with transactions is
//!   deliberate.
//!
//! Per-cell coercion never fails: a value that cannot be parsed becomes null
//! and either survives (customers, non-critical transaction fields) or takes
//! its row with it (critical transaction fields). The input table is never
//! mutated.

use chrono::NaiveDateTime;
use tracing::{info, warn};

use crate::error::{PipelineError, Result};
use crate::models::{Customer, Transaction};
use crate::table::{Table, Value};

/// Applies per-entity normalisation to ingested tables
#[derive(Debug, Default)]
pub struct Transformer;

impl Transformer {
    pub fn new() -> Self {
        Self
    }

    /// Transform raw transaction rows into [`Transaction`] records.
    ///
    /// Rows with a null critical field after coercion are dropped and
    /// counted; everything else is preserved in order.
    pub fn transform_transactions(&self, table: &Table) -> Result<Vec<Transaction>> {
        info!("Transforming {} transaction rows", table.row_count());

        let transaction_id = require_column(table, "transactions", "transaction_id")?;
        let merchant_id = require_column(table, "transactions", "merchant_id")?;
        let customer_id = require_column(table, "transactions", "customer_id")?;
        let amount = require_column(table, "transactions", "amount")?;
        let transaction_date = require_column(table, "transactions", "transaction_date")?;
        let status = require_column(table, "transactions", "status")?;
        let payment_method = require_column(table, "transactions", "payment_method")?;

        let mut records = Vec::with_capacity(table.row_count());
        let mut dropped = 0usize;

        for row in table.rows() {
            let id = string_value(&row[transaction_id]);
            let merchant = string_value(&row[merchant_id]);
            let amount = numeric_value(&row[amount]);

            let (Some(id), Some(merchant), Some(amount)) = (id, merchant, amount) else {
                dropped += 1;
                continue;
            };

            records.push(Transaction {
                transaction_id: id,
                merchant_id: merchant,
                customer_id: string_value(&row[customer_id]),
                amount,
                transaction_date: date_value(&row[transaction_date]),
                status: lower_trimmed(&row[status]),
                payment_method: lower_trimmed(&row[payment_method]),
            });
        }

        if dropped > 0 {
            warn!("Dropped {} rows with null critical fields", dropped);
        }
        info!("Transformation complete: {} rows", records.len());

        Ok(records)
    }

    /// Transform raw customer rows into [`Customer`] records.
    ///
    /// Best-effort with no filtering: unparseable or missing cells become
    /// `None`, never a dropped row.
    pub fn transform_customers(&self, table: &Table) -> Result<Vec<Customer>> {
        info!("Transforming {} customer rows", table.row_count());

        let customer_id = require_column(table, "customers", "customer_id")?;
        let merchant_id = require_column(table, "customers", "merchant_id")?;
        let email = require_column(table, "customers", "email")?;
        let first_name = require_column(table, "customers", "first_name")?;
        let last_name = require_column(table, "customers", "last_name")?;
        let country = require_column(table, "customers", "country")?;
        let created_at = require_column(table, "customers", "created_at")?;

        let records = table
            .rows()
            .iter()
            .map(|row| Customer {
                customer_id: string_value(&row[customer_id]),
                merchant_id: string_value(&row[merchant_id]),
                email: trimmed(&row[email]),
                first_name: trimmed(&row[first_name]),
                last_name: trimmed(&row[last_name]),
                country: upper_trimmed(&row[country]),
                created_at: date_value(&row[created_at]),
            })
            .collect::<Vec<_>>();

        info!("Transformation complete: {} rows", records.len());

        Ok(records)
    }
}

fn require_column(table: &Table, entity: &'static str, column: &'static str) -> Result<usize> {
    table
        .column_index(column)
        .ok_or(PipelineError::MissingColumn { entity, column })
}

/// Identifier-style cells: strings pass through, numbers and booleans render
/// to text, nulls stay null.
fn string_value(value: &Value) -> Option<String> {
    match value {
        Value::Str(s) => Some(s.clone()),
        Value::Number(n) => Some(format_number(*n)),
        Value::Bool(b) => Some(b.to_string()),
        Value::DateTime(dt) => Some(dt.to_string()),
        Value::Null => None,
    }
}

/// Numeric coercion: numbers pass through, numeric text parses, everything
/// else is null.
fn numeric_value(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => Some(*n),
        Value::Str(s) => s.trim().parse::<f64>().ok().filter(|n| n.is_finite()),
        _ => None,
    }
}

/// Best-effort date coercion; unparseable values are null.
fn date_value(value: &Value) -> Option<NaiveDateTime> {
    match value {
        Value::DateTime(dt) => Some(*dt),
        Value::Str(s) => parse_datetime(s.trim()),
        _ => None,
    }
}

fn parse_datetime(s: &str) -> Option<NaiveDateTime> {
    if let Ok(dt) = chrono::DateTime::parse_from_rfc3339(s) {
        return Some(dt.naive_utc());
    }
    for format in ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"] {
        if let Ok(dt) = NaiveDateTime::parse_from_str(s, format) {
            return Some(dt);
        }
    }
    chrono::NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
}

fn trimmed(value: &Value) -> Option<String> {
    value.as_str().map(|s| s.trim().to_string())
}

fn lower_trimmed(value: &Value) -> Option<String> {
    value.as_str().map(|s| s.trim().to_lowercase())
}

fn upper_trimmed(value: &Value) -> Option<String> {
    value.as_str().map(|s| s.trim().to_uppercase())
}

fn format_number(n: f64) -> String {
    if n.fract() == 0.0 && n.abs() < 1e15 {
        format!("{}", n as i64)
    } else {
        n.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const TRANSACTION_COLUMNS: [&str; 7] = [
        "transaction_id",
        "merchant_id",
        "customer_id",
        "amount",
        "transaction_date",
        "status",
        "payment_method",
    ];

    const CUSTOMER_COLUMNS: [&str; 7] = [
        "customer_id",
        "merchant_id",
        "email",
        "first_name",
        "last_name",
        "country",
        "created_at",
    ];

    fn str_value(s: &str) -> Value {
        Value::Str(s.to_string())
    }

    fn transactions_table(rows: Vec<Vec<Value>>) -> Table {
        let mut table = Table::new(TRANSACTION_COLUMNS.map(String::from).to_vec());
        for row in rows {
            table.push_row(row);
        }
        table
    }

    fn transaction_row(id: &str, amount: Value) -> Vec<Value> {
        vec![
            str_value(id),
            str_value("m_001"),
            str_value("c_001"),
            amount,
            str_value("2024-01-15T10:23:00"),
            str_value("completed"),
            str_value("card"),
        ]
    }

    fn customers_table(rows: Vec<Vec<Value>>) -> Table {
        let mut table = Table::new(CUSTOMER_COLUMNS.map(String::from).to_vec());
        for row in rows {
            table.push_row(row);
        }
        table
    }

    #[test]
    fn test_dates_parsed() {
        let table = transactions_table(vec![transaction_row("txn_001", Value::Number(50.0))]);
        let records = Transformer::new().transform_transactions(&table).unwrap();

        let date = records[0].transaction_date.unwrap();
        assert_eq!(date.to_string(), "2024-01-15 10:23:00");
    }

    #[test]
    fn test_unparseable_date_becomes_null_not_error() {
        let mut row = transaction_row("txn_001", Value::Number(50.0));
        row[4] = str_value("not-a-date");
        let table = transactions_table(vec![row]);

        let records = Transformer::new().transform_transactions(&table).unwrap();
        assert_eq!(records.len(), 1);
        assert!(records[0].transaction_date.is_none());
    }

    #[test]
    fn test_string_amount_coerced() {
        let table = transactions_table(vec![transaction_row("txn_001", str_value("49.99"))]);
        let records = Transformer::new().transform_transactions(&table).unwrap();
        assert_eq!(records[0].amount, 49.99);
    }

    #[test]
    fn test_status_and_payment_method_standardised() {
        let mut row = transaction_row("txn_001", Value::Number(50.0));
        row[5] = str_value("  Completed  ");
        row[6] = str_value("Card");
        let table = transactions_table(vec![row]);

        let records = Transformer::new().transform_transactions(&table).unwrap();
        assert_eq!(records[0].status.as_deref(), Some("completed"));
        assert_eq!(records[0].payment_method.as_deref(), Some("card"));
    }

    #[test]
    fn test_null_amount_dropped() {
        let table = transactions_table(vec![
            transaction_row("txn_001", Value::Number(50.0)),
            transaction_row("txn_002", Value::Null),
        ]);

        let records = Transformer::new().transform_transactions(&table).unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].transaction_id, "txn_001");
    }

    #[test]
    fn test_non_coercible_amount_dropped() {
        let table = transactions_table(vec![
            transaction_row("txn_001", str_value("fifty")),
            transaction_row("txn_002", Value::Number(25.5)),
        ]);

        let records = Transformer::new().transform_transactions(&table).unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].transaction_id, "txn_002");
    }

    #[test]
    fn test_null_merchant_dropped() {
        let mut row = transaction_row("txn_001", Value::Number(50.0));
        row[1] = Value::Null;
        let table = transactions_table(vec![row, transaction_row("txn_002", Value::Number(1.0))]);

        let records = Transformer::new().transform_transactions(&table).unwrap();
        assert_eq!(records.len(), 1);
    }

    #[test]
    fn test_five_valid_rows_all_survive() {
        let rows = (1..=5)
            .map(|i| transaction_row(&format!("txn_{:03}", i), Value::Number(i as f64 * 10.0)))
            .collect();
        let table = transactions_table(rows);

        let records = Transformer::new().transform_transactions(&table).unwrap();
        assert_eq!(records.len(), 5);
        assert!(records.iter().all(|r| r.transaction_date.is_some()));
    }

    #[test]
    fn test_numeric_transaction_id_rendered_as_text() {
        let mut row = transaction_row("ignored", Value::Number(50.0));
        row[0] = Value::Number(12345.0);
        let table = transactions_table(vec![row]);

        let records = Transformer::new().transform_transactions(&table).unwrap();
        assert_eq!(records[0].transaction_id, "12345");
    }

    #[test]
    fn test_missing_column_is_error() {
        let mut table = Table::new(
            ["transaction_id", "merchant_id", "amount"]
                .map(String::from)
                .to_vec(),
        );
        table.push_row(vec![
            str_value("txn_001"),
            str_value("m_001"),
            Value::Number(10.0),
        ]);

        let err = Transformer::new().transform_transactions(&table).unwrap_err();
        assert!(matches!(
            err,
            PipelineError::MissingColumn {
                entity: "transactions",
                ..
            }
        ));
    }

    #[test]
    fn test_input_table_unchanged() {
        let table = transactions_table(vec![transaction_row("txn_001", Value::Null)]);
        let before = table.clone();
        let _ = Transformer::new().transform_transactions(&table).unwrap();
        assert_eq!(table, before);
    }

    #[test]
    fn test_customer_dates_parsed() {
        let table = customers_table(vec![vec![
            str_value("c_001"),
            str_value("m_001"),
            str_value("alice@example.com"),
            str_value("Alice"),
            str_value("Smith"),
            str_value("GB"),
            str_value("2024-01-01"),
        ]]);

        let records = Transformer::new().transform_customers(&table).unwrap();
        let created = records[0].created_at.unwrap();
        assert_eq!(created.to_string(), "2024-01-01 00:00:00");
    }

    #[test]
    fn test_customer_country_uppercased() {
        let table = customers_table(vec![vec![
            str_value("c_001"),
            str_value("m_001"),
            str_value("test@example.com"),
            str_value("Alice"),
            str_value("Smith"),
            str_value("  gb  "),
            str_value("2024-01-01"),
        ]]);

        let records = Transformer::new().transform_customers(&table).unwrap();
        assert_eq!(records[0].country.as_deref(), Some("GB"));
    }

    #[test]
    fn test_customer_bad_date_kept_as_null() {
        // No critical-field drop rule for customers
        let table = customers_table(vec![vec![
            str_value("c_001"),
            str_value("m_001"),
            str_value("  bob@example.com "),
            str_value(" Bob "),
            Value::Null,
            Value::Null,
            str_value("last tuesday"),
        ]]);

        let records = Transformer::new().transform_customers(&table).unwrap();
        assert_eq!(records.len(), 1);
        assert!(records[0].created_at.is_none());
        assert_eq!(records[0].email.as_deref(), Some("bob@example.com"));
        assert_eq!(records[0].first_name.as_deref(), Some("Bob"));
        assert!(records[0].last_name.is_none());
        assert!(records[0].country.is_none());
    }

    #[test]
    fn test_parse_datetime_formats() {
        for input in [
            "2024-01-15T10:23:00",
            "2024-01-15 10:23:00",
            "2024-01-15T10:23:00Z",
            "2024-01-15T10:23:00.500",
            "2024-01-15",
        ] {
            assert!(parse_datetime(input).is_some(), "failed to parse {input}");
        }
        assert!(parse_datetime("15/01/2024").is_none());
        assert!(parse_datetime("").is_none());
    }
}
