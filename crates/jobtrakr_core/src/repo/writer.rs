//! Transaction-scoped write contract shared by every entity repository.
//!
//! # Responsibility
//! - Run each mutation inside one `BEGIN EXCLUSIVE` transaction.
//! - Reserve the record id inside the same transaction as its insert.
//! - Classify outcomes into `DbStatus`.
//!
//! # Invariants
//! - A body that returns `Err` is never committed; dropping the transaction
//!   rolls back the reservation together with any partial write.
//! - Prepared statements are owned by the statement helper and released
//!   before the transaction body returns, on every path.
//! - Nothing is retried.

use crate::model::ids::{RecordId, UserId};
use crate::repo::error::{RepoError, RepoResult};
use crate::repo::id_allocator;
use crate::repo::status::DbStatus;
use log::{debug, error};
use rusqlite::types::Value;
use rusqlite::{params_from_iter, Connection, Transaction, TransactionBehavior};
use std::time::Instant;

/// Kind of mutation, used for outcome classification and log lines.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WriteKind {
    Insert,
    Update,
    Delete,
}

impl WriteKind {
    fn as_str(self) -> &'static str {
        match self {
            Self::Insert => "insert",
            Self::Update => "update",
            Self::Delete => "delete",
        }
    }
}

/// Executes single statements under the store's single-writer discipline.
pub struct TransactionalWriter<'conn> {
    conn: &'conn Connection,
}

impl<'conn> TransactionalWriter<'conn> {
    pub fn new(conn: &'conn Connection) -> Self {
        Self { conn }
    }

    /// Runs `body` inside an exclusive transaction and commits on `Ok`.
    pub fn run_exclusive<T>(
        &self,
        body: impl FnOnce(&Transaction<'_>) -> RepoResult<T>,
    ) -> RepoResult<T> {
        let tx = Transaction::new_unchecked(self.conn, TransactionBehavior::Exclusive)?;
        let value = body(&tx)?;
        tx.commit()?;
        Ok(value)
    }

    /// Runs a read-only `body` inside a deferred transaction.
    pub fn run_read<T>(
        &self,
        body: impl FnOnce(&Transaction<'_>) -> RepoResult<T>,
    ) -> RepoResult<T> {
        let tx = Transaction::new_unchecked(self.conn, TransactionBehavior::Deferred)?;
        let value = body(&tx)?;
        tx.commit()?;
        Ok(value)
    }

    /// Reserves an id for `user_id` and inserts the row built by `bind`.
    ///
    /// `bind` receives the reserved id and returns values in statement order.
    /// Returns the committed id, or `None` with `DbStatus::Error`.
    pub fn insert_with_reserved_id(
        &self,
        table: &'static str,
        user_id: UserId,
        sql: &str,
        bind: impl FnOnce(RecordId) -> Vec<Value>,
    ) -> (DbStatus, Option<RecordId>) {
        let started_at = Instant::now();
        let outcome = self.run_exclusive(|tx| {
            let id = id_allocator::reserve(tx, user_id)?;
            execute_statement(tx, sql, bind(id))?;
            Ok(id)
        });

        match outcome {
            Ok(id) => {
                log_outcome(WriteKind::Insert, table, DbStatus::Success, started_at);
                debug!("event=db_write module=repo op=insert table={table} id={id}");
                (DbStatus::Success, Some(id))
            }
            Err(err) => {
                log_failure(WriteKind::Insert, table, &err, started_at);
                (DbStatus::Error, None)
            }
        }
    }

    /// Executes one update or delete and classifies it by affected rows.
    pub fn execute(
        &self,
        kind: WriteKind,
        table: &'static str,
        sql: &str,
        values: Vec<Value>,
    ) -> DbStatus {
        let started_at = Instant::now();
        match self.run_exclusive(|tx| execute_statement(tx, sql, values)) {
            Ok(changed) => {
                let status = classify(kind, changed);
                log_outcome(kind, table, status, started_at);
                status
            }
            Err(err) => {
                log_failure(kind, table, &err, started_at);
                DbStatus::Error
            }
        }
    }
}

/// Prepares, executes and finalizes one statement.
///
/// The statement is dropped on the error paths and finalized explicitly on
/// the success path, so finalize failures surface as errors too.
fn execute_statement(tx: &Transaction<'_>, sql: &str, values: Vec<Value>) -> RepoResult<usize> {
    let mut stmt = tx.prepare(sql)?;
    let changed = stmt.execute(params_from_iter(values))?;
    stmt.finalize()?;
    Ok(changed)
}

fn classify(kind: WriteKind, changed: usize) -> DbStatus {
    match kind {
        WriteKind::Insert => DbStatus::Success,
        WriteKind::Update | WriteKind::Delete => DbStatus::from_changes(changed),
    }
}

fn log_outcome(kind: WriteKind, table: &str, status: DbStatus, started_at: Instant) {
    let label = match status {
        DbStatus::Success => "ok",
        DbStatus::NoChanges => "no_changes",
        DbStatus::Error => "error",
    };
    debug!(
        "event=db_write module=repo status={label} op={} table={table} duration_ms={}",
        kind.as_str(),
        started_at.elapsed().as_millis()
    );
}

fn log_failure(kind: WriteKind, table: &str, err: &RepoError, started_at: Instant) {
    error!(
        "event=db_write module=repo status=error op={} table={table} duration_ms={} error_code={} error={}",
        kind.as_str(),
        started_at.elapsed().as_millis(),
        err.code(),
        err
    );
}

#[cfg(test)]
mod tests {
    use super::{TransactionalWriter, WriteKind};
    use crate::db::open_db_in_memory;
    use crate::repo::error::RepoError;
    use crate::repo::id_allocator::peek_next;
    use crate::repo::status::DbStatus;
    use rusqlite::types::Value;

    fn conn_with_table() -> rusqlite::Connection {
        let conn = open_db_in_memory().unwrap();
        conn.execute_batch("CREATE TABLE t (_id INTEGER PRIMARY KEY, label TEXT NOT NULL);")
            .unwrap();
        conn
    }

    #[test]
    fn insert_reserves_and_commits_together() {
        let conn = conn_with_table();
        let writer = TransactionalWriter::new(&conn);

        let (status, id) =
            writer.insert_with_reserved_id("t", 11, "INSERT INTO t (_id, label) VALUES (?1, ?2);", |id| {
                vec![Value::Text(id.to_string()), Value::Text("a".to_string())]
            });

        assert_eq!(status, DbStatus::Success);
        assert_eq!(id.map(|id| id.get()), Some(1));
        assert_eq!(peek_next(&conn, 11).unwrap(), Some(2));
    }

    #[test]
    fn failed_insert_rolls_back_reservation() {
        let conn = conn_with_table();
        let writer = TransactionalWriter::new(&conn);

        let (status, id) =
            writer.insert_with_reserved_id("t", 11, "INSERT INTO t (_id, label) VALUES (?1, ?2);", |id| {
                vec![Value::Text(id.to_string()), Value::Null]
            });

        assert_eq!(status, DbStatus::Error);
        assert!(id.is_none());
        assert_eq!(peek_next(&conn, 11).unwrap(), None);
    }

    #[test]
    fn update_and_delete_classify_by_affected_rows() {
        let conn = conn_with_table();
        conn.execute("INSERT INTO t (_id, label) VALUES (5, 'x');", [])
            .unwrap();
        let writer = TransactionalWriter::new(&conn);

        let missing = writer.execute(
            WriteKind::Update,
            "t",
            "UPDATE t SET label = ?1 WHERE _id = ?2;",
            vec![Value::Text("y".to_string()), Value::Text("99".to_string())],
        );
        let updated = writer.execute(
            WriteKind::Update,
            "t",
            "UPDATE t SET label = ?1 WHERE _id = ?2;",
            vec![Value::Text("y".to_string()), Value::Text("5".to_string())],
        );
        let deleted = writer.execute(
            WriteKind::Delete,
            "t",
            "DELETE FROM t WHERE _id = ?1;",
            vec![Value::Text("5".to_string())],
        );

        assert_eq!(missing, DbStatus::NoChanges);
        assert_eq!(updated, DbStatus::Success);
        assert_eq!(deleted, DbStatus::Success);
    }

    #[test]
    fn malformed_statement_is_an_error() {
        let conn = conn_with_table();
        let writer = TransactionalWriter::new(&conn);

        let status = writer.execute(WriteKind::Delete, "t", "DELETE FROM nowhere;", Vec::new());
        assert_eq!(status, DbStatus::Error);
    }

    #[test]
    fn run_exclusive_does_not_commit_failed_body() {
        let conn = conn_with_table();
        let writer = TransactionalWriter::new(&conn);

        let result: Result<(), RepoError> = writer.run_exclusive(|tx| {
            tx.execute("INSERT INTO t (_id, label) VALUES (1, 'kept?');", [])?;
            Err(RepoError::MissingId("t"))
        });

        assert!(result.is_err());
        let count: i64 = conn
            .query_row("SELECT COUNT(*) FROM t;", [], |row| row.get(0))
            .unwrap();
        assert_eq!(count, 0);
    }
}
