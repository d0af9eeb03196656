//! Repository layer: id allocation, transactional writes and the generic
//! entity harness.
//!
//! # Responsibility
//! - Reserve per-user identifiers atomically with the rows that use them.
//! - Run every mutation inside one exclusive transaction.
//! - Collapse storage outcomes into the `DbStatus` vocabulary.
//!
//! # Invariants
//! - No storage error escapes a public repository operation.
//! - Ids are unique across all entity tables of one user.

pub mod entities;
pub mod entity_repo;
pub mod error;
pub mod id_allocator;
pub mod schema;
pub mod status;
pub mod writer;
