//! Field-service domain records persisted by the local store.
//!
//! # Responsibility
//! - Define the caller-owned record shapes for every entity table.
//! - Define the identifier types shared across tables.
//!
//! # Invariants
//! - Every record identifier is allocated from its user's counter, so an id is
//!   unique across all entity tables of that user.
//! - A record's `id` is `None` until a create has committed.

pub mod category;
pub mod ids;
pub mod item;
pub mod job;
pub mod picture_bucket;
pub mod receipt_bucket;
