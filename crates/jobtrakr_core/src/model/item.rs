//! Item record: a priced line inside one category.

use super::ids::RecordId;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Item {
    #[serde(rename = "_id")]
    pub id: Option<RecordId>,
    pub category_id: RecordId,
    pub code: String,
    pub name: String,
    pub est_price: Option<f64>,
    pub status: Option<String>,
}

impl Item {
    pub fn new(category_id: RecordId, code: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: None,
            category_id,
            code: code.into(),
            name: name.into(),
            est_price: None,
            status: None,
        }
    }
}
