//! Store handle owning the SQLite connection and the caller identity.
//!
//! # Responsibility
//! - Open a per-user database file (or in-memory database) and make sure
//!   every entity table exists.
//! - Hand out entity repositories that borrow the connection.
//! - Close or delete the database on request.
//!
//! # Invariants
//! - After `close`, every repository operation reports `DbStatus::Error`.
//! - The handle keeps no cached id state; the counter lives in SQLite.

use super::open::{open_db, open_db_in_memory};
use super::{DbError, DbResult};
use crate::model::ids::{DeviceId, UserId};
use crate::repo::entities::{
    CategoryRepository, ItemRepository, JobRepository, PictureBucketRepository,
    ReceiptBucketRepository,
};
use crate::repo::status::DbStatus;
use log::{error, info};
use rusqlite::Connection;
use std::path::{Path, PathBuf};

const DB_FILE_PREFIX: &str = "jobtrakr";

/// Namespace supplied by the device/user identity provider.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Identity {
    pub user_id: UserId,
    pub device_id: DeviceId,
}

impl Identity {
    pub fn new(user_id: UserId, device_id: DeviceId) -> Self {
        Self { user_id, device_id }
    }
}

/// Where and for whom a store is opened.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoreConfig {
    pub db_path: PathBuf,
    pub identity: Identity,
}

impl StoreConfig {
    /// Places the user's database file inside `db_dir`.
    pub fn new(db_dir: impl AsRef<Path>, identity: Identity) -> Self {
        Self {
            db_path: db_dir
                .as_ref()
                .join(database_file_name(identity.user_id)),
            identity,
        }
    }
}

/// File name of the database owned by `user_id`.
pub fn database_file_name(user_id: UserId) -> String {
    format!("{DB_FILE_PREFIX}_{user_id}.db")
}

/// Open JobTrakr database plus the identity its writes are stamped with.
pub struct JobTrakrDb {
    conn: Option<Connection>,
    identity: Identity,
    path: Option<PathBuf>,
}

impl JobTrakrDb {
    /// Opens (creating if needed) the database described by `config`.
    pub fn open(config: &StoreConfig) -> DbResult<Self> {
        if let Some(parent) = config.db_path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let conn = open_db(&config.db_path)?;
        Ok(Self::with_connection(
            conn,
            config.identity,
            Some(config.db_path.clone()),
        ))
    }

    /// Handle with no connection. Every operation on it reports `Error`.
    pub fn unopened(identity: Identity) -> Self {
        Self {
            conn: None,
            identity,
            path: None,
        }
    }

    pub fn open_in_memory(identity: Identity) -> DbResult<Self> {
        let conn = open_db_in_memory()?;
        Ok(Self::with_connection(conn, identity, None))
    }

    fn with_connection(conn: Connection, identity: Identity, path: Option<PathBuf>) -> Self {
        let db = Self {
            conn: Some(conn),
            identity,
            path,
        };
        db.create_tables();
        db
    }

    /// Issues the idempotent table creation for all five entities.
    pub fn create_tables(&self) -> DbStatus {
        let statuses = [
            self.jobs().create_table(),
            self.categories().create_table(),
            self.items().create_table(),
            self.pictures().create_table(),
            self.receipts().create_table(),
        ];
        if statuses.contains(&DbStatus::Error) {
            DbStatus::Error
        } else {
            DbStatus::Success
        }
    }

    pub fn is_open(&self) -> bool {
        self.conn.is_some()
    }

    /// Underlying connection, or `None` once closed.
    pub fn connection(&self) -> Option<&Connection> {
        self.conn.as_ref()
    }

    pub fn identity(&self) -> Identity {
        self.identity
    }

    /// Database file path; `None` for in-memory stores.
    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    /// Releases the connection. Closing twice is a no-op.
    ///
    /// When SQLite refuses to close, the connection is kept open and the error
    /// is returned.
    pub fn close(&mut self) -> DbResult<()> {
        let Some(conn) = self.conn.take() else {
            return Ok(());
        };
        match conn.close() {
            Ok(()) => {
                info!(
                    "event=db_close module=db status=ok user_id={}",
                    self.identity.user_id
                );
                Ok(())
            }
            Err((conn, err)) => {
                error!(
                    "event=db_close module=db status=error user_id={} error={}",
                    self.identity.user_id, err
                );
                self.conn = Some(conn);
                Err(DbError::Sqlite(err))
            }
        }
    }

    /// Closes the store and removes its database file.
    pub fn delete_database(mut self) -> DbResult<()> {
        self.close()?;
        let Some(path) = self.path.take() else {
            return Ok(());
        };
        match std::fs::remove_file(&path) {
            Ok(()) => {}
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => {}
            Err(err) => return Err(err.into()),
        }
        info!(
            "event=db_delete module=db status=ok user_id={}",
            self.identity.user_id
        );
        Ok(())
    }

    pub fn jobs(&self) -> JobRepository<'_> {
        JobRepository::new(self)
    }

    pub fn categories(&self) -> CategoryRepository<'_> {
        CategoryRepository::new(self)
    }

    pub fn items(&self) -> ItemRepository<'_> {
        ItemRepository::new(self)
    }

    pub fn pictures(&self) -> PictureBucketRepository<'_> {
        PictureBucketRepository::new(self)
    }

    pub fn receipts(&self) -> ReceiptBucketRepository<'_> {
        ReceiptBucketRepository::new(self)
    }
}
