//! Internal error taxonomy for repository writes and reads.
//!
//! These errors stay inside the repository layer. Public operations log them
//! and collapse them into `DbStatus::Error`.

use crate::db::DbError;
use crate::repo::id_allocator::AllocError;
use std::error::Error;
use std::fmt::{Display, Formatter};

pub type RepoResult<T> = Result<T, RepoError>;

#[derive(Debug)]
pub enum RepoError {
    /// Storage engine failure, including a closed handle.
    Db(DbError),
    /// Identifier reservation failed; no dependent row was written.
    Alloc(AllocError),
    /// Update was requested for a record that was never created.
    MissingId(&'static str),
}

impl RepoError {
    /// Stable short code used in log lines.
    pub fn code(&self) -> &'static str {
        match self {
            Self::Db(DbError::NotOpen) => "db_not_open",
            Self::Db(_) => "db_failed",
            Self::Alloc(_) => "id_alloc_failed",
            Self::MissingId(_) => "missing_record_id",
        }
    }
}

impl Display for RepoError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Db(err) => write!(f, "{err}"),
            Self::Alloc(err) => write!(f, "{err}"),
            Self::MissingId(table) => write!(f, "{table} record has no id assigned"),
        }
    }
}

impl Error for RepoError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Db(err) => Some(err),
            Self::Alloc(err) => Some(err),
            Self::MissingId(_) => None,
        }
    }
}

impl From<DbError> for RepoError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

impl From<AllocError> for RepoError {
    fn from(value: AllocError) -> Self {
        Self::Alloc(value)
    }
}

impl From<rusqlite::Error> for RepoError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Db(DbError::Sqlite(value))
    }
}
