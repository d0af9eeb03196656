//! Core local data layer for the JobTrakr field-service app.
//! Owns the SQLite store, per-user id allocation and entity CRUD.

pub mod db;
pub mod logging;
pub mod model;
pub mod repo;

pub use db::{Identity, JobTrakrDb, StoreConfig};
pub use logging::{default_log_level, init_logging, logging_status};
pub use model::category::Category;
pub use model::ids::{DeviceId, RecordId, UserId};
pub use model::item::Item;
pub use model::job::Job;
pub use model::picture_bucket::PictureBucket;
pub use model::receipt_bucket::ReceiptBucket;
pub use repo::entities::{
    CategoryRepository, ItemRepository, JobRepository, PictureBucketRepository,
    ReceiptBucketRepository,
};
pub use repo::entity_repo::EntityRepository;
pub use repo::status::DbStatus;

/// Minimal health-check API for early integration.
pub fn ping() -> &'static str {
    "pong"
}

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

#[cfg(test)]
mod tests {
    use super::{core_version, ping};

    #[test]
    fn ping_returns_pong() {
        assert_eq!(ping(), "pong");
    }

    #[test]
    fn version_is_not_empty() {
        assert!(!core_version().is_empty());
    }
}
