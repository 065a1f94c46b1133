//! Database loader
//!
//! Writes transformed records into PostgreSQL. One connection pool per run,
//! one transaction per file: every batch of a file commits atomically or not
//! at all. A successfully committed file is appended to the processed-file
//! ledger; a rolled-back one is not.
//!
//! Insertion column order is fixed here, independent of whatever column order
//! the source file carried.

use chrono::{Local, Utc};
use sqlx::postgres::PgPoolOptions;
use sqlx::PgPool;
use std::io::Write;
use std::path::PathBuf;
use std::time::Duration;
use tracing::{debug, info, warn};

use crate::config::{PipelineConfig, Timezone};
use crate::error::{PipelineError, Result};
use crate::models::{Customer, Transaction};

/// Insertion order for the `transactions` table
pub const TRANSACTION_INSERT_COLUMNS: [&str; 7] = [
    "transaction_id",
    "merchant_id",
    "customer_id",
    "amount",
    "transaction_date",
    "status",
    "payment_method",
];

/// Insertion order for the `customers` table
pub const CUSTOMER_INSERT_COLUMNS: [&str; 7] = [
    "customer_id",
    "merchant_id",
    "email",
    "first_name",
    "last_name",
    "country",
    "created_at",
];

/// Loads typed records into PostgreSQL and tracks processed files
pub struct DatabaseLoader {
    database_url: String,
    max_connections: u32,
    connect_timeout: Duration,
    batch_size: usize,
    processed_log: PathBuf,
    timezone: Timezone,
    pool: Option<PgPool>,
}

impl DatabaseLoader {
    pub fn new(config: &PipelineConfig) -> Self {
        Self {
            database_url: config.database.url.clone(),
            max_connections: config.database.max_connections,
            connect_timeout: Duration::from_secs(config.database.connect_timeout_secs),
            batch_size: config.batch_size,
            processed_log: config.processed_log.clone(),
            timezone: config.timezone,
            pool: None,
        }
    }

    /// Establish the connection pool for this run.
    pub async fn connect(&mut self) -> Result<()> {
        let pool = PgPoolOptions::new()
            .max_connections(self.max_connections)
            .acquire_timeout(self.connect_timeout)
            .connect(&self.database_url)
            .await
            .map_err(PipelineError::Connection)?;

        info!("Connected to database");
        self.pool = Some(pool);
        Ok(())
    }

    /// Close the connection pool. Idempotent; safe when `connect` never ran.
    pub async fn close(&mut self) {
        if let Some(pool) = self.pool.take() {
            pool.close().await;
            info!("Database connection closed");
        }
    }

    fn pool(&self) -> Result<&PgPool> {
        self.pool.as_ref().ok_or(PipelineError::NotConnected)
    }

    /// Insert transaction records, commit, and record the source file.
    ///
    /// Returns the number of rows inserted.
    pub async fn load_transactions(
        &self,
        records: &[Transaction],
        source_file: &str,
    ) -> Result<u64> {
        let pool = self.pool()?;
        info!("Loading {} transactions from {}", records.len(), source_file);

        let load = |e| PipelineError::Load {
            table: "transactions",
            source: e,
        };

        let mut tx = pool.begin().await.map_err(load)?;

        for chunk in records.chunks(self.batch_size) {
            let mut builder = sqlx::QueryBuilder::new(format!(
                "INSERT INTO transactions ({}) ",
                TRANSACTION_INSERT_COLUMNS.join(", ")
            ));

            builder.push_values(chunk, |mut b, record| {
                b.push_bind(&record.transaction_id)
                    .push_bind(&record.merchant_id)
                    .push_bind(record.customer_id.as_deref())
                    .push_bind(record.amount)
                    .push_bind(record.transaction_date)
                    .push_bind(record.status.as_deref())
                    .push_bind(record.payment_method.as_deref());
            });

            if let Err(e) = builder.build().execute(&mut *tx).await {
                rollback(tx, "transactions").await;
                return Err(load(e));
            }
        }

        tx.commit().await.map_err(load)?;
        self.log_processed(source_file)?;

        info!("Successfully loaded {} transactions", records.len());
        Ok(records.len() as u64)
    }

    /// Insert customer records, commit, and record the source file.
    ///
    /// Returns the number of rows inserted.
    pub async fn load_customers(&self, records: &[Customer], source_file: &str) -> Result<u64> {
        let pool = self.pool()?;
        info!("Loading {} customers from {}", records.len(), source_file);

        let load = |e| PipelineError::Load {
            table: "customers",
            source: e,
        };

        let mut tx = pool.begin().await.map_err(load)?;

        for chunk in records.chunks(self.batch_size) {
            let mut builder = sqlx::QueryBuilder::new(format!(
                "INSERT INTO customers ({}) ",
                CUSTOMER_INSERT_COLUMNS.join(", ")
            ));

            builder.push_values(chunk, |mut b, record| {
                b.push_bind(record.customer_id.as_deref())
                    .push_bind(record.merchant_id.as_deref())
                    .push_bind(record.email.as_deref())
                    .push_bind(record.first_name.as_deref())
                    .push_bind(record.last_name.as_deref())
                    .push_bind(record.country.as_deref())
                    .push_bind(record.created_at);
            });

            if let Err(e) = builder.build().execute(&mut *tx).await {
                rollback(tx, "customers").await;
                return Err(load(e));
            }
        }

        tx.commit().await.map_err(load)?;
        self.log_processed(source_file)?;

        info!("Successfully loaded {} customers", records.len());
        Ok(records.len() as u64)
    }

    /// Row count of a target table (used by the CLI `verify` command).
    pub async fn table_count(&self, table: &'static str) -> Result<i64> {
        let pool = self.pool()?;
        let sql = format!("SELECT COUNT(*) FROM {}", table);
        let count: i64 = sqlx::query_scalar(&sql)
            .fetch_one(pool)
            .await
            .map_err(|e| PipelineError::Load { table, source: e })?;
        Ok(count)
    }

    /// Append one processed-file ledger line: `<ISO-8601 timestamp>,<file name>`.
    fn log_processed(&self, file_name: &str) -> Result<()> {
        if let Some(parent) = self.processed_log.parent() {
            if !parent.as_os_str().is_empty() {
                ldp_common::fs::ensure_dir(parent)?;
            }
        }

        let timestamp = match self.timezone {
            Timezone::Utc => Utc::now().to_rfc3339(),
            Timezone::Local => Local::now().to_rfc3339(),
        };

        let mut file = std::fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.processed_log)?;
        writeln!(file, "{},{}", timestamp, file_name)?;

        debug!("Logged processed file: {}", file_name);
        Ok(())
    }
}

async fn rollback(tx: sqlx::Transaction<'_, sqlx::Postgres>, table: &str) {
    if let Err(e) = tx.rollback().await {
        warn!("Rollback failed for {}: {}", table, e);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_insert_orders_are_fixed() {
        assert_eq!(TRANSACTION_INSERT_COLUMNS[0], "transaction_id");
        assert_eq!(TRANSACTION_INSERT_COLUMNS[6], "payment_method");
        assert_eq!(CUSTOMER_INSERT_COLUMNS[0], "customer_id");
        assert_eq!(CUSTOMER_INSERT_COLUMNS[6], "created_at");
    }

    #[tokio::test]
    async fn test_load_requires_connection() {
        let loader = DatabaseLoader::new(&PipelineConfig::default());
        let err = loader.load_transactions(&[], "transactions_20240115.csv").await;
        assert!(matches!(err.unwrap_err(), PipelineError::NotConnected));

        let err = loader.load_customers(&[], "customers_20240115.json").await;
        assert!(matches!(err.unwrap_err(), PipelineError::NotConnected));
    }

    #[tokio::test]
    async fn test_close_is_idempotent_without_connect() {
        let mut loader = DatabaseLoader::new(&PipelineConfig::default());
        loader.close().await;
        loader.close().await;
    }
}
