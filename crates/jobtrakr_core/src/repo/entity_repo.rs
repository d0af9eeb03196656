//! Generic CRUD harness over one entity table.
//!
//! # Responsibility
//! - Provide create/update/delete/fetch for any `EntitySchema`.
//! - Route every mutation through `TransactionalWriter`.
//!
//! # Invariants
//! - Operations never return a storage error; they log it and report
//!   `DbStatus::Error`.
//! - A closed store short-circuits to `DbStatus::Error` before any
//!   transaction is opened.
//! - Deleting a parent never touches its children.

use crate::db::{DbError, JobTrakrDb};
use crate::model::ids::RecordId;
use crate::repo::error::{RepoError, RepoResult};
use crate::repo::schema::{
    create_table_sql, delete_sql, id_value, insert_sql, select_by_parent_sql, update_parent_sql,
    update_sql, EntitySchema,
};
use crate::repo::status::DbStatus;
use crate::repo::writer::{TransactionalWriter, WriteKind};
use log::{debug, error, warn};
use rusqlite::Connection;
use std::marker::PhantomData;

/// Repository for the table described by `S`, borrowing an open store.
pub struct EntityRepository<'db, S: EntitySchema> {
    db: &'db JobTrakrDb,
    schema: PhantomData<S>,
}

impl<'db, S: EntitySchema> EntityRepository<'db, S> {
    pub fn new(db: &'db JobTrakrDb) -> Self {
        Self {
            db,
            schema: PhantomData,
        }
    }

    /// Creates the table when missing. Runs outside a transaction.
    ///
    /// DDL failures are logged but still report `Success`; schema text is
    /// static. Only a closed store reports `Error`.
    pub fn create_table(&self) -> DbStatus {
        let Some(conn) = self.connection("create_table") else {
            return DbStatus::Error;
        };
        if let Err(err) = conn.execute_batch(&create_table_sql::<S>()) {
            warn!(
                "event=create_table module=repo status=error table={} error={}",
                S::TABLE,
                err
            );
        }
        DbStatus::Success
    }

    /// Inserts `record` under a freshly reserved id.
    ///
    /// On success the id (and any identity-stamped owner fields) are written
    /// back into `record`. On failure `record` is left untouched.
    pub fn create(&self, record: &mut S::Record) -> (DbStatus, Option<RecordId>) {
        let Some(conn) = self.connection("create") else {
            return (DbStatus::Error, None);
        };

        let identity = self.db.identity();
        let mut staged = record.clone();
        S::stamp(&mut staged, identity);

        let sql = insert_sql::<S>();
        let (status, id) = TransactionalWriter::new(conn).insert_with_reserved_id(
            S::TABLE,
            identity.user_id,
            &sql,
            |id| {
                let mut values = Vec::with_capacity(S::COLUMNS.len() + 1);
                values.push(id_value(id));
                values.extend(S::bind_values(&staged));
                values
            },
        );

        if let (DbStatus::Success, Some(id)) = (status, id) {
            S::assign_id(&mut staged, id);
            *record = staged;
        }
        (status, id)
    }

    /// Rewrites every data column of the row keyed by `record`'s id.
    ///
    /// Owner fields are re-stamped from the store identity, so a record built
    /// without them never moves the row out of its owner's list.
    pub fn update(&self, record: &S::Record) -> DbStatus {
        let Some(conn) = self.connection("update") else {
            return DbStatus::Error;
        };
        let Some(id) = S::record_id(record) else {
            let err = RepoError::MissingId(S::TABLE);
            error!(
                "event=db_write module=repo status=error op=update table={} error_code={} error={}",
                S::TABLE,
                err.code(),
                err
            );
            return DbStatus::Error;
        };

        let mut staged = record.clone();
        S::stamp(&mut staged, self.db.identity());
        let mut values = S::bind_values(&staged);
        values.push(id_value(id));
        TransactionalWriter::new(conn).execute(WriteKind::Update, S::TABLE, &update_sql::<S>(), values)
    }

    /// Re-points the row to another parent, leaving other columns alone.
    pub fn update_parent(&self, id: RecordId, parent_id: RecordId) -> DbStatus {
        let Some(conn) = self.connection("update_parent") else {
            return DbStatus::Error;
        };
        TransactionalWriter::new(conn).execute(
            WriteKind::Update,
            S::TABLE,
            &update_parent_sql::<S>(),
            vec![id_value(parent_id), id_value(id)],
        )
    }

    pub fn delete(&self, id: RecordId) -> DbStatus {
        let Some(conn) = self.connection("delete") else {
            return DbStatus::Error;
        };
        TransactionalWriter::new(conn).execute(
            WriteKind::Delete,
            S::TABLE,
            &delete_sql::<S>(),
            vec![id_value(id)],
        )
    }

    /// Appends every row owned by `parent_id` to `out`.
    ///
    /// Existing contents of `out` are kept. An empty match is `Success`; on
    /// `Error` nothing is appended.
    pub fn fetch_all(&self, parent_id: RecordId, out: &mut Vec<S::Record>) -> DbStatus {
        let Some(conn) = self.connection("fetch_all") else {
            return DbStatus::Error;
        };

        match fetch_by_parent::<S>(conn, parent_id) {
            Ok(rows) => {
                debug!(
                    "event=fetch_all module=repo status=ok table={} rows={}",
                    S::TABLE,
                    rows.len()
                );
                out.extend(rows);
                DbStatus::Success
            }
            Err(err) => {
                error!(
                    "event=fetch_all module=repo status=error table={} error_code={} error={}",
                    S::TABLE,
                    err.code(),
                    err
                );
                DbStatus::Error
            }
        }
    }

    fn connection(&self, op: &'static str) -> Option<&'db Connection> {
        let conn = self.db.connection();
        if conn.is_none() {
            let err = RepoError::Db(DbError::NotOpen);
            error!(
                "event={op} module=repo status=error table={} error_code={} error={}",
                S::TABLE,
                err.code(),
                err
            );
        }
        conn
    }
}

fn fetch_by_parent<S: EntitySchema>(
    conn: &Connection,
    parent_id: RecordId,
) -> RepoResult<Vec<S::Record>> {
    let sql = select_by_parent_sql::<S>();
    TransactionalWriter::new(conn).run_read(|tx| {
        let mut stmt = tx.prepare(&sql)?;
        let rows = stmt
            .query_map([parent_id], |row| S::decode_row(row))?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
    })
}
