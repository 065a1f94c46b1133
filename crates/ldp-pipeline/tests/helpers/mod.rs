//! Shared fixtures for the pipeline test suite
#![allow(dead_code)]

use std::fs;
use std::path::{Path, PathBuf};

use ldp_pipeline::{PipelineConfig, Table, Value};

/// A valid 5-row transaction CSV matching the expected schema.
pub const SAMPLE_TRANSACTIONS_CSV: &str = "\
transaction_id,merchant_id,customer_id,amount,transaction_date,status,payment_method
txn_001,m_001,c_001,49.99,2024-01-15T10:23:00,completed,card
txn_002,m_002,c_002,150.00,2024-01-15T14:05:30,completed,bank_transfer
txn_003,m_001,c_003,25.50,2024-01-15T09:12:00,pending,card
txn_004,m_003,c_004,399.99,2024-01-15T16:45:00,completed,wallet
txn_005,m_002,c_005,12.00,2024-01-15T11:30:00,failed,card
";

/// A valid 3-row customer JSON array matching the expected schema.
pub const SAMPLE_CUSTOMERS_JSON: &str = r#"[
    {"customer_id": "c_001", "merchant_id": "m_001", "email": "alice@example.com",
     "first_name": "Alice", "last_name": "Smith", "country": "GB", "created_at": "2024-01-01"},
    {"customer_id": "c_002", "merchant_id": "m_001", "email": "bob@example.com",
     "first_name": "Bob", "last_name": "Jones", "country": "DE", "created_at": "2024-01-05"},
    {"customer_id": "c_003", "merchant_id": "m_002", "email": "charlie@example.com",
     "first_name": "Charlie", "last_name": "Brown", "country": "FR", "created_at": "2024-01-10"}
]"#;

/// Write a landing file and return its path.
pub fn write_landing_file(dir: &Path, name: &str, contents: &str) -> PathBuf {
    let path = dir.join(name);
    fs::write(&path, contents).unwrap();
    path
}

/// Config pointed at a temp landing directory and processed log.
pub fn test_config(landing_dir: &Path, processed_log: &Path) -> PipelineConfig {
    let mut config = PipelineConfig {
        landing_dir: landing_dir.to_path_buf(),
        processed_log: processed_log.to_path_buf(),
        ..PipelineConfig::default()
    };
    if let Ok(url) = std::env::var("DATABASE_URL") {
        config.database.url = url;
    }
    config
}

/// A valid in-memory transaction table, mirroring the sample CSV.
pub fn sample_transactions_table() -> Table {
    let mut table = Table::new(
        [
            "transaction_id",
            "merchant_id",
            "customer_id",
            "amount",
            "transaction_date",
            "status",
            "payment_method",
        ]
        .map(String::from)
        .to_vec(),
    );
    let rows = [
        ("txn_001", "m_001", "c_001", 49.99, "2024-01-15T10:23:00", "completed", "card"),
        ("txn_002", "m_002", "c_002", 150.00, "2024-01-15T14:05:30", "completed", "bank_transfer"),
        ("txn_003", "m_001", "c_003", 25.50, "2024-01-15T09:12:00", "pending", "card"),
        ("txn_004", "m_003", "c_004", 399.99, "2024-01-15T16:45:00", "completed", "wallet"),
        ("txn_005", "m_002", "c_005", 12.00, "2024-01-15T11:30:00", "failed", "card"),
    ];
    for (id, merchant, customer, amount, date, status, method) in rows {
        table.push_row(vec![
            Value::Str(id.to_string()),
            Value::Str(merchant.to_string()),
            Value::Str(customer.to_string()),
            Value::Number(amount),
            Value::Str(date.to_string()),
            Value::Str(status.to_string()),
            Value::Str(method.to_string()),
        ]);
    }
    table
}
