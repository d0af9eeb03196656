//! FFI use-case API for Flutter-facing calls.
//!
//! # Responsibility
//! - Expose store operations to Dart via FRB using the `Success`,
//!   `NoChanges`, `Error` status strings.
//! - Keep the per-process store configuration (directory + identity).
//!
//! # Invariants
//! - Exported functions must not panic across FFI boundary.
//! - One store handle per process, opened lazily and guarded by a mutex, so
//!   calls from different threads never use the connection at once.
//! - Listed rows are JSON objects using the core model field names.

use jobtrakr_core::{
    core_version as core_version_inner, init_logging as init_logging_inner, ping as ping_inner,
    Category, DbStatus, Identity, Item, Job, JobTrakrDb, PictureBucket, ReceiptBucket, RecordId,
    StoreConfig,
};
use log::warn;
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::path::PathBuf;
use std::sync::{Mutex, OnceLock};

const STORE_DIR_ENV: &str = "JOBTRAKR_DB_DIR";
const STORE_DIR_FALLBACK: &str = "jobtrakr";
static STORE_CONFIG: OnceLock<StoreConfig> = OnceLock::new();
static STORE_HANDLE: Mutex<Option<JobTrakrDb>> = Mutex::new(None);

/// Minimal health-check API for FRB smoke integration.
#[flutter_rust_bridge::frb(sync)]
pub fn ping() -> String {
    ping_inner().to_owned()
}

/// Expose core crate version through FFI.
#[flutter_rust_bridge::frb(sync)]
pub fn core_version() -> String {
    core_version_inner().to_owned()
}

/// Initializes Rust core logging once per process.
///
/// Returns empty string on success and an error message on failure.
#[flutter_rust_bridge::frb(sync)]
pub fn init_logging(level: String, log_dir: String) -> String {
    match init_logging_inner(level.as_str(), log_dir.as_str()) {
        Ok(()) => String::new(),
        Err(err) => err,
    }
}

/// Binds the store to a directory and the signed-in user/device.
///
/// An empty `db_dir` falls back to `$JOBTRAKR_DB_DIR`, then to a temp
/// directory. Calling again with the same values is a no-op; different values
/// are rejected. Returns empty string on success.
#[flutter_rust_bridge::frb(sync)]
pub fn configure_store(db_dir: String, user_id: i64, device_id: i64) -> String {
    let config = StoreConfig::new(
        resolve_store_dir(db_dir.trim()),
        Identity::new(user_id, device_id),
    );
    let active = STORE_CONFIG.get_or_init(|| config.clone());
    if *active == config {
        String::new()
    } else {
        format!(
            "store already configured at `{}` for user {}; refusing to switch",
            active.db_path.display(),
            active.identity.user_id
        )
    }
}

/// Status envelope for create/update/delete calls.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoreActionResponse {
    /// One of `Success|NoChanges|Error`.
    pub status: String,
    /// Assigned id for successful creates.
    pub id: Option<i64>,
}

impl StoreActionResponse {
    fn from_status(status: DbStatus) -> Self {
        Self {
            status: status.as_str().to_string(),
            id: None,
        }
    }

    fn from_create((status, id): (DbStatus, Option<RecordId>)) -> Self {
        Self {
            status: status.as_str().to_string(),
            id: id.map(RecordId::get),
        }
    }
}

/// Status envelope for list calls.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoreListResponse {
    pub status: String,
    /// One JSON object per row.
    pub rows: Vec<String>,
}

/// Entity table addressed by delete/list calls.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntityKind {
    Job,
    Category,
    Item,
    Picture,
    Receipt,
}

/// Inserts the JSON-encoded record of `kind` under a freshly reserved id.
///
/// `record_json` uses the listed row shape; `_id` and owner fields are
/// ignored and filled by the store. Malformed JSON reports `Error`.
#[flutter_rust_bridge::frb(sync)]
pub fn create_record(kind: EntityKind, record_json: String) -> StoreActionResponse {
    let json = record_json.as_str();
    match kind {
        EntityKind::Job => create_from_json(kind, json, |db, job: &mut Job| db.jobs().create(job)),
        EntityKind::Category => create_from_json(kind, json, |db, category: &mut Category| {
            db.categories().create(category)
        }),
        EntityKind::Item => {
            create_from_json(kind, json, |db, item: &mut Item| db.items().create(item))
        }
        EntityKind::Picture => create_from_json(kind, json, |db, picture: &mut PictureBucket| {
            db.pictures().create(picture)
        }),
        EntityKind::Receipt => create_from_json(kind, json, |db, receipt: &mut ReceiptBucket| {
            db.receipts().create(receipt)
        }),
    }
}

/// Rewrites the row keyed by the record's `_id` with every field of
/// `record_json`.
///
/// A record without `_id` or malformed JSON reports `Error`; an unknown id
/// reports `NoChanges`.
#[flutter_rust_bridge::frb(sync)]
pub fn update_record(kind: EntityKind, record_json: String) -> StoreActionResponse {
    let json = record_json.as_str();
    let status = match kind {
        EntityKind::Job => update_from_json(kind, json, |db, job: &Job| db.jobs().update(job)),
        EntityKind::Category => update_from_json(kind, json, |db, category: &Category| {
            db.categories().update(category)
        }),
        EntityKind::Item => update_from_json(kind, json, |db, item: &Item| db.items().update(item)),
        EntityKind::Picture => update_from_json(kind, json, |db, picture: &PictureBucket| {
            db.pictures().update(picture)
        }),
        EntityKind::Receipt => update_from_json(kind, json, |db, receipt: &ReceiptBucket| {
            db.receipts().update(receipt)
        }),
    };
    StoreActionResponse::from_status(status)
}

fn create_from_json<T: DeserializeOwned>(
    kind: EntityKind,
    json: &str,
    create: impl FnOnce(&JobTrakrDb, &mut T) -> (DbStatus, Option<RecordId>),
) -> StoreActionResponse {
    let Some(mut record) = parse_record::<T>(kind, json) else {
        return StoreActionResponse::from_status(DbStatus::Error);
    };
    with_store(|db| StoreActionResponse::from_create(create(db, &mut record)))
}

fn update_from_json<T: DeserializeOwned>(
    kind: EntityKind,
    json: &str,
    update: impl FnOnce(&JobTrakrDb, &T) -> DbStatus,
) -> DbStatus {
    let Some(record) = parse_record::<T>(kind, json) else {
        return DbStatus::Error;
    };
    with_store(|db| update(db, &record))
}

fn parse_record<T: DeserializeOwned>(kind: EntityKind, json: &str) -> Option<T> {
    match serde_json::from_str(json) {
        Ok(record) => Some(record),
        Err(err) => {
            // Only the position is logged; the message can echo field values.
            warn!(
                "event=parse_record module=ffi status=error error_code=invalid_record_json kind={kind:?} line={} column={}",
                err.line(),
                err.column()
            );
            None
        }
    }
}

/// Files a picture or receipt under another job.
///
/// Only `Picture` and `Receipt` kinds are accepted; others report `Error`.
#[flutter_rust_bridge::frb(sync)]
pub fn move_to_job(kind: EntityKind, id: i64, job_id: i64) -> StoreActionResponse {
    let (id, job_id) = (RecordId::new(id), RecordId::new(job_id));
    let status = with_store(|db| match kind {
        EntityKind::Picture => db.pictures().update_parent(id, job_id),
        EntityKind::Receipt => db.receipts().update_parent(id, job_id),
        other => {
            warn!("event=move_to_job module=ffi status=error error_code=unsupported_kind kind={other:?}");
            DbStatus::Error
        }
    });
    StoreActionResponse::from_status(status)
}

#[flutter_rust_bridge::frb(sync)]
pub fn delete_record(kind: EntityKind, id: i64) -> StoreActionResponse {
    let id = RecordId::new(id);
    let status = with_store(|db| match kind {
        EntityKind::Job => db.jobs().delete(id),
        EntityKind::Category => db.categories().delete(id),
        EntityKind::Item => db.items().delete(id),
        EntityKind::Picture => db.pictures().delete(id),
        EntityKind::Receipt => db.receipts().delete(id),
    });
    StoreActionResponse::from_status(status)
}

/// Lists rows owned by `parent_id`.
///
/// Parent meaning follows the kind: user id for jobs, job id for categories,
/// pictures and receipts, category id for items.
#[flutter_rust_bridge::frb(sync)]
pub fn list_records(kind: EntityKind, parent_id: i64) -> StoreListResponse {
    let parent = RecordId::new(parent_id);
    with_store(|db| match kind {
        EntityKind::Job => list_with(|out| db.jobs().fetch_all(parent, out)),
        EntityKind::Category => list_with(|out| db.categories().fetch_all(parent, out)),
        EntityKind::Item => list_with(|out| db.items().fetch_all(parent, out)),
        EntityKind::Picture => list_with(|out| db.pictures().fetch_all(parent, out)),
        EntityKind::Receipt => list_with(|out| db.receipts().fetch_all(parent, out)),
    })
}

fn list_with<T: Serialize>(fetch: impl FnOnce(&mut Vec<T>) -> DbStatus) -> StoreListResponse {
    let mut records = Vec::new();
    let status = fetch(&mut records);
    let rows = records
        .iter()
        .filter_map(|record| serde_json::to_string(record).ok())
        .collect::<Vec<_>>();
    let status = if rows.len() == records.len() {
        status
    } else {
        DbStatus::Error
    };
    StoreListResponse {
        status: status.as_str().to_string(),
        rows,
    }
}

fn resolve_store_dir(requested: &str) -> PathBuf {
    if !requested.is_empty() {
        return PathBuf::from(requested);
    }
    if let Ok(raw) = std::env::var(STORE_DIR_ENV) {
        let trimmed = raw.trim();
        if !trimmed.is_empty() {
            return PathBuf::from(trimmed);
        }
    }
    std::env::temp_dir().join(STORE_DIR_FALLBACK)
}

/// Runs `f` against the process-wide store handle, opening it on first use.
///
/// An unconfigured or unopenable store behaves like a closed handle: the
/// operation runs against it and reports `Error`. A failed open is retried on
/// the next call.
fn with_store<T>(f: impl FnOnce(&JobTrakrDb) -> T) -> T {
    let Some(config) = STORE_CONFIG.get() else {
        warn!("event=store_open module=ffi status=error error_code=store_not_configured");
        return f(&JobTrakrDb::unopened(Identity::new(0, 0)));
    };

    let mut guard = STORE_HANDLE.lock().unwrap_or_else(|err| err.into_inner());
    if guard.is_none() {
        match JobTrakrDb::open(config) {
            Ok(db) => *guard = Some(db),
            Err(err) => {
                warn!("event=store_open module=ffi status=error error_code=store_open_failed error={err}");
                return f(&JobTrakrDb::unopened(config.identity));
            }
        }
    }
    match guard.as_ref() {
        Some(db) => f(db),
        None => f(&JobTrakrDb::unopened(config.identity)),
    }
}
