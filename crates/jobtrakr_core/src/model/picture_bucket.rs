//! Picture reference record.
//!
//! Only media-library references are stored here. The image bytes live in the
//! platform media library and are never touched by core.

use super::ids::{DeviceId, RecordId, UserId};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PictureBucket {
    #[serde(rename = "_id")]
    pub id: Option<RecordId>,
    /// Owning job. `None` until the picture is filed under a job.
    pub job_id: Option<RecordId>,
    /// Stamped from the store identity on create and update.
    pub user_id: Option<UserId>,
    /// Stamped from the store identity on create and update.
    pub device_id: Option<DeviceId>,
    pub album_id: Option<String>,
    pub asset_id: Option<String>,
    /// Unix epoch milliseconds.
    pub date_added: Option<i64>,
    pub longitude: Option<f64>,
    pub latitude: Option<f64>,
    /// Unix epoch milliseconds.
    pub picture_date: Option<i64>,
}

impl PictureBucket {
    pub fn new(job_id: Option<RecordId>, asset_id: impl Into<String>) -> Self {
        Self {
            id: None,
            job_id,
            user_id: None,
            device_id: None,
            album_id: None,
            asset_id: Some(asset_id.into()),
            date_added: None,
            longitude: None,
            latitude: None,
            picture_date: None,
        }
    }
}
