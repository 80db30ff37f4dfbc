use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

pub mod coerce;

/// A stored account record
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Account {
    /// Store-assigned identifier
    #[serde(rename = "_id")]
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// Current balance, may be negative
    #[serde(default, serialize_with = "coerce::serialize_number", skip_serializing_if = "Option::is_none")]
    pub balance: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
}

/// Account fields as sent by clients on create and update.
///
/// Every field is optional. On update only the fields present are written.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AccountFields {
    #[serde(default, deserialize_with = "coerce::lenient_string", skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, deserialize_with = "coerce::lenient_f64", skip_serializing_if = "Option::is_none")]
    pub balance: Option<f64>,
    #[serde(default, deserialize_with = "coerce::lenient_string", skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
}

/// A stored transfer record. `from` and `to` are free text and are not
/// checked against existing accounts.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Transaction {
    #[serde(rename = "_id")]
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub from: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub to: Option<String>,
    #[serde(default, serialize_with = "coerce::serialize_number", skip_serializing_if = "Option::is_none")]
    pub amount: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date: Option<DateTime<Utc>>,
}

/// Transaction fields as sent by clients on create and update
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TransactionFields {
    #[serde(default, deserialize_with = "coerce::lenient_string", skip_serializing_if = "Option::is_none")]
    pub from: Option<String>,
    #[serde(default, deserialize_with = "coerce::lenient_string", skip_serializing_if = "Option::is_none")]
    pub to: Option<String>,
    #[serde(default, deserialize_with = "coerce::lenient_f64", skip_serializing_if = "Option::is_none")]
    pub amount: Option<f64>,
    #[serde(default, deserialize_with = "coerce::lenient_date", skip_serializing_if = "Option::is_none")]
    pub date: Option<DateTime<Utc>>,
}

/// Body returned after a successful delete
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DeleteResponse {
    pub message: String,
}

/// Body returned for every error response
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub status: u16,
    pub message: String,
}
