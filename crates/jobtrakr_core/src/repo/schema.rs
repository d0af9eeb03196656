//! Schema descriptors consumed by the generic entity repository.
//!
//! A descriptor names the table, its parent key column, the data columns in
//! bind order, and the row decoder. SQL text for every operation is derived
//! from it, so no entity carries hand-written CRUD statements.

use crate::db::Identity;
use crate::model::ids::RecordId;
use rusqlite::types::Value;
use rusqlite::Row;

/// Primary key column shared by every entity table.
pub const ID_COLUMN: &str = "_id";

/// One data column of an entity table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Column {
    pub name: &'static str,
    /// SQLite declared type, which drives column affinity.
    pub sql_type: &'static str,
}

impl Column {
    pub const fn new(name: &'static str, sql_type: &'static str) -> Self {
        Self { name, sql_type }
    }
}

/// Static description of one entity table and its record mapping.
pub trait EntitySchema {
    type Record: Clone;

    const TABLE: &'static str;
    /// Foreign key column `fetch_all` filters on. Must appear in `COLUMNS`.
    const PARENT_COLUMN: &'static str;
    /// Data columns in bind order, excluding `_id`.
    const COLUMNS: &'static [Column];

    fn record_id(record: &Self::Record) -> Option<RecordId>;

    fn assign_id(record: &mut Self::Record, id: RecordId);

    /// Fills owner fields from the store identity before insert and update.
    fn stamp(_record: &mut Self::Record, _identity: Identity) {}

    /// Values for `COLUMNS`, same order and length.
    fn bind_values(record: &Self::Record) -> Vec<Value>;

    fn decode_row(row: &Row<'_>) -> rusqlite::Result<Self::Record>;
}

/// Binds an identifier as text, the storage boundary format for ids.
pub fn id_value(id: RecordId) -> Value {
    Value::Text(id.to_string())
}

pub fn opt_id_value(id: Option<RecordId>) -> Value {
    id.map_or(Value::Null, id_value)
}

pub fn create_table_sql<S: EntitySchema>() -> String {
    let columns = S::COLUMNS
        .iter()
        .map(|column| format!("{} {}", column.name, column.sql_type))
        .collect::<Vec<_>>()
        .join(", ");
    format!(
        "CREATE TABLE IF NOT EXISTS {} ({ID_COLUMN} INTEGER PRIMARY KEY, {columns});",
        S::TABLE
    )
}

pub fn insert_sql<S: EntitySchema>() -> String {
    let names = S::COLUMNS
        .iter()
        .map(|column| column.name)
        .collect::<Vec<_>>()
        .join(", ");
    let placeholders = (1..=S::COLUMNS.len() + 1)
        .map(|index| format!("?{index}"))
        .collect::<Vec<_>>()
        .join(", ");
    format!(
        "INSERT INTO {} ({ID_COLUMN}, {names}) VALUES ({placeholders});",
        S::TABLE
    )
}

/// `UPDATE` keyed by `_id`, which binds last.
pub fn update_sql<S: EntitySchema>() -> String {
    let assignments = S::COLUMNS
        .iter()
        .enumerate()
        .map(|(index, column)| format!("{} = ?{}", column.name, index + 1))
        .collect::<Vec<_>>()
        .join(", ");
    format!(
        "UPDATE {} SET {assignments} WHERE {ID_COLUMN} = ?{};",
        S::TABLE,
        S::COLUMNS.len() + 1
    )
}

pub fn update_parent_sql<S: EntitySchema>() -> String {
    format!(
        "UPDATE {} SET {} = ?1 WHERE {ID_COLUMN} = ?2;",
        S::TABLE,
        S::PARENT_COLUMN
    )
}

pub fn delete_sql<S: EntitySchema>() -> String {
    format!("DELETE FROM {} WHERE {ID_COLUMN} = ?1;", S::TABLE)
}

pub fn select_by_parent_sql<S: EntitySchema>() -> String {
    let names = S::COLUMNS
        .iter()
        .map(|column| column.name)
        .collect::<Vec<_>>()
        .join(", ");
    format!(
        "SELECT {ID_COLUMN}, {names} FROM {} WHERE {} = ?1 ORDER BY {ID_COLUMN} ASC;",
        S::TABLE,
        S::PARENT_COLUMN
    )
}
