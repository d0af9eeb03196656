//! Identifier types shared by every entity table.
//!
//! Identifiers are 64-bit integers at the API boundary and travel to SQLite as
//! text. Reading accepts either storage class, because `INTEGER` column
//! affinity converts well-formed text back into an integer on write.

use rusqlite::types::{FromSql, FromSqlError, FromSqlResult, ToSql, ToSqlOutput, ValueRef};
use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};
use std::num::ParseIntError;
use std::str::FromStr;

/// User namespace key. Identifiers are unique within one user.
pub type UserId = i64;

/// Device key recorded on media-backed records.
pub type DeviceId = i64;

/// Allocator-assigned record identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RecordId(i64);

impl RecordId {
    pub const fn new(value: i64) -> Self {
        Self(value)
    }

    pub const fn get(self) -> i64 {
        self.0
    }
}

impl Display for RecordId {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for RecordId {
    type Err = ParseIntError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        value.parse::<i64>().map(Self)
    }
}

impl From<i64> for RecordId {
    fn from(value: i64) -> Self {
        Self(value)
    }
}

impl From<RecordId> for i64 {
    fn from(value: RecordId) -> Self {
        value.0
    }
}

impl ToSql for RecordId {
    fn to_sql(&self) -> rusqlite::Result<ToSqlOutput<'_>> {
        Ok(ToSqlOutput::from(self.0.to_string()))
    }
}

impl FromSql for RecordId {
    fn column_result(value: ValueRef<'_>) -> FromSqlResult<Self> {
        match value {
            ValueRef::Integer(raw) => Ok(Self(raw)),
            ValueRef::Text(bytes) => {
                let text =
                    std::str::from_utf8(bytes).map_err(|err| FromSqlError::Other(Box::new(err)))?;
                text.parse::<Self>()
                    .map_err(|err| FromSqlError::Other(Box::new(err)))
            }
            _ => Err(FromSqlError::InvalidType),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::RecordId;
    use rusqlite::types::{FromSql, ToSql, ToSqlOutput, Value, ValueRef};

    #[test]
    fn binds_as_text() {
        let id = RecordId::new(i64::MAX);
        match id.to_sql().unwrap() {
            ToSqlOutput::Owned(Value::Text(text)) => assert_eq!(text, "9223372036854775807"),
            other => panic!("unexpected sql output: {other:?}"),
        }
    }

    #[test]
    fn reads_integer_and_text_storage() {
        let from_int = RecordId::column_result(ValueRef::Integer(42)).unwrap();
        let from_text = RecordId::column_result(ValueRef::Text(b"9223372036854775807")).unwrap();
        assert_eq!(from_int, RecordId::new(42));
        assert_eq!(from_text.get(), i64::MAX);
    }

    #[test]
    fn rejects_non_numeric_text_and_reals() {
        assert!(RecordId::column_result(ValueRef::Text(b"12abc")).is_err());
        assert!(RecordId::column_result(ValueRef::Real(1.5)).is_err());
    }
}
