//! Category record: a cost grouping inside one job.

use super::ids::RecordId;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Category {
    #[serde(rename = "_id")]
    pub id: Option<RecordId>,
    pub job_id: RecordId,
    pub code: String,
    pub name: String,
    /// Unix epoch milliseconds.
    pub start_date: Option<i64>,
    pub est_price: Option<f64>,
    pub status: Option<String>,
}

impl Category {
    pub fn new(job_id: RecordId, code: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: None,
            job_id,
            code: code.into(),
            name: name.into(),
            start_date: None,
            est_price: None,
            status: None,
        }
    }
}
