//! Job record: the root of a user's work tree.

use super::ids::{RecordId, UserId};
use serde::{Deserialize, Serialize};

/// One customer job. Categories, pictures and receipts hang off `id`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Job {
    #[serde(rename = "_id")]
    pub id: Option<RecordId>,
    /// Owning user. Stamped from the store identity on create and update.
    #[serde(default)]
    pub user_id: UserId,
    pub code: String,
    pub name: String,
    pub status: Option<String>,
    /// Unix epoch milliseconds.
    pub start_date: Option<i64>,
    /// Unix epoch milliseconds.
    pub planned_finish: Option<i64>,
    pub bid_price: Option<f64>,
    pub longitude: Option<f64>,
    pub latitude: Option<f64>,
}

impl Job {
    pub fn new(code: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: None,
            user_id: 0,
            code: code.into(),
            name: name.into(),
            status: None,
            start_date: None,
            planned_finish: None,
            bid_price: None,
            longitude: None,
            latitude: None,
        }
    }
}
