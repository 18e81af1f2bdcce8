use chrono::{DateTime, Utc};
use mongodb::bson::oid::ObjectId;
use serde::{Deserialize, Serialize};
use serde_json::Value;

pub type UserId = String;

pub const DEFAULT_USER_ID: &str = "demo_user";

/// A single expense as it is stored in the `expenses` collection.
#[derive(Clone, Debug, PartialEq, Deserialize, Serialize)]
pub struct ExpenseRecord {
    #[serde(rename = "_id")]
    pub id: ObjectId,
    pub user_id: UserId,
    pub amount: f64,
    pub category: String,
    #[serde(with = "bson::serde_helpers::chrono_datetime_as_bson_datetime")]
    pub timestamp: DateTime<Utc>,
}

/// Validated input for a write; the store assigns `id` and `timestamp`.
#[derive(Clone, Debug, PartialEq)]
pub struct NewExpense {
    pub user_id: UserId,
    pub amount: f64,
    pub category: String,
}

/// The part of an expense that goes into a tip prompt.
///
/// Fields are optional so that documents written by other clients, with a field
/// missing or of another type, still show up (as `null`) instead of failing the read.
#[derive(Clone, Debug, PartialEq, Deserialize, Serialize)]
pub struct ExpenseSummary {
    pub amount: Option<f64>,
    pub category: Option<String>,
}

// Clients send loosely typed JSON, so amount and category are checked by hand.
#[derive(Debug, Default, Deserialize)]
pub struct AddExpenseRequest {
    pub user_id: Option<UserId>,
    pub amount: Option<Value>,
    pub category: Option<Value>,
}

#[derive(Debug, Deserialize, Serialize)]
pub struct StatusResponse {
    pub status: String,
}

#[derive(Debug, Deserialize, Serialize)]
pub struct ExpenseCreated {
    pub status: String,
    pub expense_id: String,
}

#[derive(Debug, Deserialize, Serialize)]
pub struct TipResponse {
    pub tip: String,
}
