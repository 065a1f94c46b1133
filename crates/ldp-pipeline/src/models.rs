//! Typed records past the transformation boundary
//!
//! Once a table has been transformed, rows become these fixed-schema structs.
//! `Transaction` encodes the critical-field guarantee in its types: the
//! fields whose null value drops a row during transformation are not
//! `Option`. Customers have no drop rule, so every field stays optional.

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

/// A normalised payment transaction ready for loading
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Transaction {
    pub transaction_id: String,
    pub merchant_id: String,
    pub customer_id: Option<String>,
    pub amount: f64,
    /// Parsed event time; unparseable source values stay `None` rather than
    /// dropping the row.
    pub transaction_date: Option<NaiveDateTime>,
    /// Lower-cased, trimmed status
    pub status: Option<String>,
    /// Lower-cased, trimmed payment method
    pub payment_method: Option<String>,
}

/// A normalised customer record ready for loading
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Customer {
    pub customer_id: Option<String>,
    pub merchant_id: Option<String>,
    pub email: Option<String>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    /// Upper-cased, trimmed ISO country code
    pub country: Option<String>,
    pub created_at: Option<NaiveDateTime>,
}
