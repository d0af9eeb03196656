//! CLI smoke entry point.
//!
//! # Responsibility
//! - Verify `jobtrakr_core` linkage without the Flutter/FFI runtime.
//! - Run one create/fetch cycle against an in-memory store and print the
//!   resulting statuses.

use jobtrakr_core::{Category, DbStatus, Identity, Item, JobTrakrDb, RecordId};
use std::process::ExitCode;

fn main() -> ExitCode {
    println!("jobtrakr_core ping={}", jobtrakr_core::ping());
    println!("jobtrakr_core version={}", jobtrakr_core::core_version());

    let db = match JobTrakrDb::open_in_memory(Identity::new(1, 1)) {
        Ok(db) => db,
        Err(err) => {
            eprintln!("store open failed: {err}");
            return ExitCode::FAILURE;
        }
    };

    let mut category = Category::new(RecordId::new(1), "C1", "Smoke category");
    let (status, category_id) = db.categories().create(&mut category);
    println!("create category status={status} id={category_id:?}");
    let Some(category_id) = category_id else {
        return ExitCode::FAILURE;
    };

    let mut item = Item::new(category_id, "I1", "Smoke item");
    let (status, item_id) = db.items().create(&mut item);
    println!("create item status={status} id={item_id:?}");

    let mut items = Vec::new();
    let status = db.items().fetch_all(category_id, &mut items);
    println!("fetch items status={status} count={}", items.len());

    if status == DbStatus::Success && items.len() == 1 {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    }
}
