//! Schema descriptors for the five JobTrakr tables.
//!
//! Column names match the tables already deployed on devices, so existing
//! databases keep working after an upgrade. Older app versions wrote NULL
//! into `Code` and the name columns; those read back as empty strings.

use crate::db::Identity;
use crate::model::category::Category;
use crate::model::ids::RecordId;
use crate::model::item::Item;
use crate::model::job::Job;
use crate::model::picture_bucket::PictureBucket;
use crate::model::receipt_bucket::ReceiptBucket;
use crate::repo::entity_repo::EntityRepository;
use crate::repo::schema::{id_value, opt_id_value, Column, EntitySchema};
use rusqlite::types::Value;
use rusqlite::Row;

fn text_or_empty(row: &Row<'_>, column: &str) -> rusqlite::Result<String> {
    Ok(row.get::<_, Option<String>>(column)?.unwrap_or_default())
}

pub type JobRepository<'db> = EntityRepository<'db, JobSchema>;
pub type CategoryRepository<'db> = EntityRepository<'db, CategorySchema>;
pub type ItemRepository<'db> = EntityRepository<'db, ItemSchema>;
pub type PictureBucketRepository<'db> = EntityRepository<'db, PictureBucketSchema>;
pub type ReceiptBucketRepository<'db> = EntityRepository<'db, ReceiptBucketSchema>;

pub struct JobSchema;

impl EntitySchema for JobSchema {
    type Record = Job;

    const TABLE: &'static str = "jobs";
    const PARENT_COLUMN: &'static str = "UserId";
    const COLUMNS: &'static [Column] = &[
        Column::new("UserId", "INTEGER"),
        Column::new("Code", "TEXT"),
        Column::new("Name", "TEXT"),
        Column::new("JobStatus", "TEXT"),
        Column::new("StartDate", "INTEGER"),
        Column::new("PlannedFinish", "INTEGER"),
        Column::new("BidPrice", "REAL"),
        Column::new("Longitude", "REAL"),
        Column::new("Latitude", "REAL"),
    ];

    fn record_id(record: &Job) -> Option<RecordId> {
        record.id
    }

    fn assign_id(record: &mut Job, id: RecordId) {
        record.id = Some(id);
    }

    fn stamp(record: &mut Job, identity: Identity) {
        record.user_id = identity.user_id;
    }

    fn bind_values(record: &Job) -> Vec<Value> {
        vec![
            Value::Integer(record.user_id),
            Value::Text(record.code.clone()),
            Value::Text(record.name.clone()),
            Value::from(record.status.clone()),
            Value::from(record.start_date),
            Value::from(record.planned_finish),
            Value::from(record.bid_price),
            Value::from(record.longitude),
            Value::from(record.latitude),
        ]
    }

    fn decode_row(row: &Row<'_>) -> rusqlite::Result<Job> {
        Ok(Job {
            id: Some(row.get("_id")?),
            user_id: row.get("UserId")?,
            code: text_or_empty(row, "Code")?,
            name: text_or_empty(row, "Name")?,
            status: row.get("JobStatus")?,
            start_date: row.get("StartDate")?,
            planned_finish: row.get("PlannedFinish")?,
            bid_price: row.get("BidPrice")?,
            longitude: row.get("Longitude")?,
            latitude: row.get("Latitude")?,
        })
    }
}

pub struct CategorySchema;

impl EntitySchema for CategorySchema {
    type Record = Category;

    const TABLE: &'static str = "categories";
    const PARENT_COLUMN: &'static str = "JobId";
    const COLUMNS: &'static [Column] = &[
        Column::new("JobId", "INTEGER"),
        Column::new("Code", "TEXT"),
        Column::new("CategoryName", "TEXT"),
        Column::new("StartDate", "INTEGER"),
        Column::new("EstPrice", "REAL"),
        Column::new("CategoryStatus", "TEXT"),
    ];

    fn record_id(record: &Category) -> Option<RecordId> {
        record.id
    }

    fn assign_id(record: &mut Category, id: RecordId) {
        record.id = Some(id);
    }

    fn bind_values(record: &Category) -> Vec<Value> {
        vec![
            id_value(record.job_id),
            Value::Text(record.code.clone()),
            Value::Text(record.name.clone()),
            Value::from(record.start_date),
            Value::from(record.est_price),
            Value::from(record.status.clone()),
        ]
    }

    fn decode_row(row: &Row<'_>) -> rusqlite::Result<Category> {
        Ok(Category {
            id: Some(row.get("_id")?),
            job_id: row.get("JobId")?,
            code: text_or_empty(row, "Code")?,
            name: text_or_empty(row, "CategoryName")?,
            start_date: row.get("StartDate")?,
            est_price: row.get("EstPrice")?,
            status: row.get("CategoryStatus")?,
        })
    }
}

pub struct ItemSchema;

impl EntitySchema for ItemSchema {
    type Record = Item;

    const TABLE: &'static str = "items";
    const PARENT_COLUMN: &'static str = "CategoryId";
    const COLUMNS: &'static [Column] = &[
        Column::new("CategoryId", "INTEGER"),
        Column::new("Code", "TEXT"),
        Column::new("ItemName", "TEXT"),
        Column::new("EstPrice", "REAL"),
        Column::new("ItemStatus", "TEXT"),
    ];

    fn record_id(record: &Item) -> Option<RecordId> {
        record.id
    }

    fn assign_id(record: &mut Item, id: RecordId) {
        record.id = Some(id);
    }

    fn bind_values(record: &Item) -> Vec<Value> {
        vec![
            id_value(record.category_id),
            Value::Text(record.code.clone()),
            Value::Text(record.name.clone()),
            Value::from(record.est_price),
            Value::from(record.status.clone()),
        ]
    }

    fn decode_row(row: &Row<'_>) -> rusqlite::Result<Item> {
        Ok(Item {
            id: Some(row.get("_id")?),
            category_id: row.get("CategoryId")?,
            code: text_or_empty(row, "Code")?,
            name: text_or_empty(row, "ItemName")?,
            est_price: row.get("EstPrice")?,
            status: row.get("ItemStatus")?,
        })
    }
}

pub struct PictureBucketSchema;

impl EntitySchema for PictureBucketSchema {
    type Record = PictureBucket;

    const TABLE: &'static str = "picturebucket";
    const PARENT_COLUMN: &'static str = "JobId";
    const COLUMNS: &'static [Column] = &[
        Column::new("JobId", "INTEGER"),
        Column::new("UserId", "INTEGER"),
        Column::new("DeviceId", "INTEGER"),
        Column::new("AlbumId", "TEXT"),
        Column::new("AssetId", "TEXT"),
        Column::new("DateAdded", "INTEGER"),
        Column::new("Longitude", "REAL"),
        Column::new("Latitude", "REAL"),
        Column::new("PictureDate", "INTEGER"),
    ];

    fn record_id(record: &PictureBucket) -> Option<RecordId> {
        record.id
    }

    fn assign_id(record: &mut PictureBucket, id: RecordId) {
        record.id = Some(id);
    }

    fn stamp(record: &mut PictureBucket, identity: Identity) {
        record.user_id = Some(identity.user_id);
        record.device_id = Some(identity.device_id);
    }

    fn bind_values(record: &PictureBucket) -> Vec<Value> {
        vec![
            opt_id_value(record.job_id),
            Value::from(record.user_id),
            Value::from(record.device_id),
            Value::from(record.album_id.clone()),
            Value::from(record.asset_id.clone()),
            Value::from(record.date_added),
            Value::from(record.longitude),
            Value::from(record.latitude),
            Value::from(record.picture_date),
        ]
    }

    fn decode_row(row: &Row<'_>) -> rusqlite::Result<PictureBucket> {
        Ok(PictureBucket {
            id: Some(row.get("_id")?),
            job_id: row.get("JobId")?,
            user_id: row.get("UserId")?,
            device_id: row.get("DeviceId")?,
            album_id: row.get("AlbumId")?,
            asset_id: row.get("AssetId")?,
            date_added: row.get("DateAdded")?,
            longitude: row.get("Longitude")?,
            latitude: row.get("Latitude")?,
            picture_date: row.get("PictureDate")?,
        })
    }
}

pub struct ReceiptBucketSchema;

impl EntitySchema for ReceiptBucketSchema {
    type Record = ReceiptBucket;

    const TABLE: &'static str = "receiptbucket";
    const PARENT_COLUMN: &'static str = "JobId";
    const COLUMNS: &'static [Column] = &[
        Column::new("JobId", "INTEGER"),
        Column::new("UserId", "INTEGER"),
        Column::new("DeviceId", "INTEGER"),
        Column::new("Amount", "REAL"),
        Column::new("Vendor", "TEXT"),
        Column::new("Description", "TEXT"),
        Column::new("Notes", "TEXT"),
        Column::new("CategoryId", "INTEGER"),
        Column::new("ItemId", "INTEGER"),
        Column::new("AssetId", "TEXT"),
        Column::new("AlbumId", "TEXT"),
        Column::new("PictureUri", "TEXT"),
    ];

    fn record_id(record: &ReceiptBucket) -> Option<RecordId> {
        record.id
    }

    fn assign_id(record: &mut ReceiptBucket, id: RecordId) {
        record.id = Some(id);
    }

    fn stamp(record: &mut ReceiptBucket, identity: Identity) {
        record.user_id = Some(identity.user_id);
        record.device_id = Some(identity.device_id);
    }

    fn bind_values(record: &ReceiptBucket) -> Vec<Value> {
        vec![
            opt_id_value(record.job_id),
            Value::from(record.user_id),
            Value::from(record.device_id),
            Value::from(record.amount),
            Value::from(record.vendor.clone()),
            Value::from(record.description.clone()),
            Value::from(record.notes.clone()),
            opt_id_value(record.category_id),
            opt_id_value(record.item_id),
            Value::from(record.asset_id.clone()),
            Value::from(record.album_id.clone()),
            Value::from(record.picture_uri.clone()),
        ]
    }

    fn decode_row(row: &Row<'_>) -> rusqlite::Result<ReceiptBucket> {
        Ok(ReceiptBucket {
            id: Some(row.get("_id")?),
            job_id: row.get("JobId")?,
            user_id: row.get("UserId")?,
            device_id: row.get("DeviceId")?,
            amount: row.get("Amount")?,
            vendor: row.get("Vendor")?,
            description: row.get("Description")?,
            notes: row.get("Notes")?,
            category_id: row.get("CategoryId")?,
            item_id: row.get("ItemId")?,
            asset_id: row.get("AssetId")?,
            album_id: row.get("AlbumId")?,
            picture_uri: row.get("PictureUri")?,
        })
    }
}
