//! Per-user identifier allocation.
//!
//! # Responsibility
//! - Hand out record identifiers that are unique across every entity table of
//!   one user.
//! - Persist the high-water mark so a restart never reissues an identifier.
//!
//! # Invariants
//! - `reserve` only accepts an open `Transaction`; the dependent insert must
//!   run in that same transaction so a failed write rolls the reservation back.
//! - `next_id` never decreases and is never cached in memory.
//! - A reservation is never retried here.

use crate::model::ids::{RecordId, UserId};
use log::{debug, error};
use rusqlite::{params, Connection, OptionalExtension, Transaction};
use std::error::Error;
use std::fmt::{Display, Formatter};

/// First identifier handed out for a fresh user namespace.
pub const FIRST_RECORD_ID: i64 = 1;

pub type AllocResult<T> = Result<T, AllocError>;

#[derive(Debug)]
pub enum AllocError {
    Sqlite(rusqlite::Error),
    /// Persisted counter failed the non-negative precondition.
    CorruptCounter { user_id: UserId, next_id: i64 },
    /// Counter reached `i64::MAX`.
    Exhausted(UserId),
}

impl Display for AllocError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Sqlite(err) => write!(f, "{err}"),
            Self::CorruptCounter { user_id, next_id } => write!(
                f,
                "id counter for user {user_id} holds unusable value {next_id}"
            ),
            Self::Exhausted(user_id) => write!(f, "id counter for user {user_id} is exhausted"),
        }
    }
}

impl Error for AllocError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Sqlite(err) => Some(err),
            Self::CorruptCounter { .. } | Self::Exhausted(_) => None,
        }
    }
}

impl From<rusqlite::Error> for AllocError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Sqlite(value)
    }
}

/// Precondition every dependent insert relies on: only non-negative
/// reservations may be written.
pub fn is_usable_reservation(value: i64) -> bool {
    value >= 0
}

/// Reserves the next identifier for `user_id` inside `tx`.
///
/// Creates the counter row on first use, returns its current value and
/// persists the value plus one.
///
/// # Errors
/// - `Sqlite` when the counter row cannot be read or written.
/// - `CorruptCounter` when the stored value fails `is_usable_reservation`.
/// - `Exhausted` when advancing would overflow.
pub fn reserve(tx: &Transaction<'_>, user_id: UserId) -> AllocResult<RecordId> {
    tx.execute(
        "INSERT OR IGNORE INTO user_counters (user_id, next_id) VALUES (?1, ?2);",
        params![user_id, FIRST_RECORD_ID],
    )?;

    let next_id: i64 = tx.query_row(
        "SELECT next_id FROM user_counters WHERE user_id = ?1;",
        [user_id],
        |row| row.get(0),
    )?;

    if !is_usable_reservation(next_id) {
        error!(
            "event=id_reserve module=repo status=error user_id={} error_code=counter_corrupt next_id={}",
            user_id, next_id
        );
        return Err(AllocError::CorruptCounter { user_id, next_id });
    }

    let advanced = next_id
        .checked_add(1)
        .ok_or(AllocError::Exhausted(user_id))?;

    tx.execute(
        "UPDATE user_counters SET next_id = ?2 WHERE user_id = ?1;",
        params![user_id, advanced],
    )?;

    debug!(
        "event=id_reserve module=repo status=ok user_id={} id={}",
        user_id, next_id
    );
    Ok(RecordId::new(next_id))
}

/// Reads the persisted high-water mark without reserving.
///
/// Returns `None` when the user has never allocated.
pub fn peek_next(conn: &Connection, user_id: UserId) -> AllocResult<Option<i64>> {
    let next_id = conn
        .query_row(
            "SELECT next_id FROM user_counters WHERE user_id = ?1;",
            [user_id],
            |row| row.get(0),
        )
        .optional()?;
    Ok(next_id)
}

#[cfg(test)]
mod tests {
    use super::{is_usable_reservation, peek_next, reserve, AllocError};
    use crate::db::open_db_in_memory;
    use rusqlite::{Transaction, TransactionBehavior};

    #[test]
    fn precondition_rejects_negative_values() {
        assert!(is_usable_reservation(0));
        assert!(is_usable_reservation(1));
        assert!(!is_usable_reservation(-1));
    }

    #[test]
    fn first_reservation_starts_at_one_and_advances() {
        let conn = open_db_in_memory().unwrap();
        let tx = Transaction::new_unchecked(&conn, TransactionBehavior::Exclusive).unwrap();
        assert_eq!(reserve(&tx, 7).unwrap().get(), 1);
        assert_eq!(reserve(&tx, 7).unwrap().get(), 2);
        tx.commit().unwrap();

        assert_eq!(peek_next(&conn, 7).unwrap(), Some(3));
    }

    #[test]
    fn users_have_independent_counters() {
        let conn = open_db_in_memory().unwrap();
        let tx = Transaction::new_unchecked(&conn, TransactionBehavior::Exclusive).unwrap();
        assert_eq!(reserve(&tx, 1).unwrap().get(), 1);
        assert_eq!(reserve(&tx, 2).unwrap().get(), 1);
        assert_eq!(reserve(&tx, 1).unwrap().get(), 2);
        tx.commit().unwrap();
    }

    #[test]
    fn rolled_back_reservation_is_not_persisted() {
        let conn = open_db_in_memory().unwrap();
        {
            let tx = Transaction::new_unchecked(&conn, TransactionBehavior::Exclusive).unwrap();
            reserve(&tx, 9).unwrap();
        }
        assert_eq!(peek_next(&conn, 9).unwrap(), None);
    }

    #[test]
    fn corrupt_counter_is_reported_not_reused() {
        let conn = open_db_in_memory().unwrap();
        conn.execute(
            "INSERT INTO user_counters (user_id, next_id) VALUES (5, -4);",
            [],
        )
        .unwrap();

        let tx = Transaction::new_unchecked(&conn, TransactionBehavior::Exclusive).unwrap();
        let err = reserve(&tx, 5).unwrap_err();
        assert!(matches!(
            err,
            AllocError::CorruptCounter {
                user_id: 5,
                next_id: -4
            }
        ));
    }

    #[test]
    fn exhausted_counter_is_an_error() {
        let conn = open_db_in_memory().unwrap();
        conn.execute(
            "INSERT INTO user_counters (user_id, next_id) VALUES (3, ?1);",
            [i64::MAX],
        )
        .unwrap();

        let tx = Transaction::new_unchecked(&conn, TransactionBehavior::Exclusive).unwrap();
        assert!(matches!(reserve(&tx, 3), Err(AllocError::Exhausted(3))));
    }
}
