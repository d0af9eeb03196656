//! Receipt record captured against a job, optionally tied to a category/item.

use super::ids::{DeviceId, RecordId, UserId};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReceiptBucket {
    #[serde(rename = "_id")]
    pub id: Option<RecordId>,
    pub job_id: Option<RecordId>,
    /// Stamped from the store identity on create and update.
    pub user_id: Option<UserId>,
    /// Stamped from the store identity on create and update.
    pub device_id: Option<DeviceId>,
    pub amount: Option<f64>,
    pub vendor: Option<String>,
    pub description: Option<String>,
    pub notes: Option<String>,
    pub category_id: Option<RecordId>,
    pub item_id: Option<RecordId>,
    pub asset_id: Option<String>,
    pub album_id: Option<String>,
    pub picture_uri: Option<String>,
}

impl ReceiptBucket {
    pub fn new(job_id: Option<RecordId>) -> Self {
        Self {
            id: None,
            job_id,
            user_id: None,
            device_id: None,
            amount: None,
            vendor: None,
            description: None,
            notes: None,
            category_id: None,
            item_id: None,
            asset_id: None,
            album_id: None,
            picture_uri: None,
        }
    }
}
