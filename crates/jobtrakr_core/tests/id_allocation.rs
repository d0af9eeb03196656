use jobtrakr_core::{
    Category, DbStatus, Identity, Item, Job, JobTrakrDb, PictureBucket, ReceiptBucket, RecordId,
    StoreConfig,
};
use std::collections::HashSet;
use std::thread;

fn counter_value(db: &JobTrakrDb, user_id: i64) -> Option<i64> {
    jobtrakr_core::repo::id_allocator::peek_next(db.connection().unwrap(), user_id).unwrap()
}

fn row_count(db: &JobTrakrDb, table: &str) -> i64 {
    db.connection()
        .unwrap()
        .query_row(&format!("SELECT COUNT(*) FROM {table};"), [], |row| {
            row.get(0)
        })
        .unwrap()
}

#[test]
fn serialized_creates_across_tables_never_repeat_an_id() {
    let db = JobTrakrDb::open_in_memory(Identity::new(42, 1)).unwrap();
    let mut seen = HashSet::new();

    for round in 0..20 {
        let parent = RecordId::new(round);
        let ids = [
            db.jobs().create(&mut Job::new("J", "job")).1,
            db.categories()
                .create(&mut Category::new(parent, "C", "cat"))
                .1,
            db.items().create(&mut Item::new(parent, "I", "item")).1,
            db.pictures()
                .create(&mut PictureBucket::new(Some(parent), "asset"))
                .1,
            db.receipts().create(&mut ReceiptBucket::new(Some(parent))).1,
        ];
        for id in ids {
            let id = id.expect("create should assign an id");
            assert!(seen.insert(id), "id {id} was issued twice");
        }
    }

    assert_eq!(seen.len(), 100);
    assert_eq!(counter_value(&db, 42), Some(101));
}

#[test]
fn failed_insert_rolls_back_reservation_and_later_creates_stay_unique() {
    let db = JobTrakrDb::open_in_memory(Identity::new(42, 1)).unwrap();
    db.connection()
        .unwrap()
        .execute_batch(
            "CREATE TEMP TRIGGER reject_boom BEFORE INSERT ON items
             WHEN NEW.Code = 'boom'
             BEGIN
                SELECT RAISE(ABORT, 'rejected by test trigger');
             END;",
        )
        .unwrap();

    let mut first = Item::new(RecordId::new(1), "ok", "first");
    assert_eq!(db.items().create(&mut first).0, DbStatus::Success);
    assert_eq!(counter_value(&db, 42), Some(2));

    let mut rejected = Item::new(RecordId::new(1), "boom", "rejected");
    let (status, id) = db.items().create(&mut rejected);
    assert_eq!(status, DbStatus::Error);
    assert_eq!(id, None);
    assert_eq!(rejected.id, None);
    assert_eq!(counter_value(&db, 42), Some(2));
    assert_eq!(row_count(&db, "items"), 1);

    let mut second = Item::new(RecordId::new(1), "ok", "second");
    let (status, id) = db.items().create(&mut second);
    assert_eq!(status, DbStatus::Success);
    assert_ne!(id, first.id);
}

#[test]
fn corrupt_counter_blocks_the_dependent_insert() {
    let db = JobTrakrDb::open_in_memory(Identity::new(42, 1)).unwrap();
    db.connection()
        .unwrap()
        .execute(
            "INSERT INTO user_counters (user_id, next_id) VALUES (42, -1);",
            [],
        )
        .unwrap();

    let mut category = Category::new(RecordId::new(1), "C", "cat");
    assert_eq!(db.categories().create(&mut category), (DbStatus::Error, None));
    assert_eq!(row_count(&db, "categories"), 0);
    assert_eq!(counter_value(&db, 42), Some(-1));
}

#[test]
fn counters_are_scoped_per_user() {
    let db_a = JobTrakrDb::open_in_memory(Identity::new(1, 1)).unwrap();
    let db_b = JobTrakrDb::open_in_memory(Identity::new(2, 1)).unwrap();

    let (_, a) = db_a.jobs().create(&mut Job::new("A", "a"));
    let (_, b) = db_b.jobs().create(&mut Job::new("B", "b"));
    assert_eq!(a, Some(RecordId::new(1)));
    assert_eq!(b, Some(RecordId::new(1)));
}

#[test]
fn high_water_mark_survives_reopen() {
    let dir = tempfile::tempdir().unwrap();
    let config = StoreConfig::new(dir.path(), Identity::new(42, 1));

    let mut db = JobTrakrDb::open(&config).unwrap();
    for _ in 0..3 {
        db.jobs().create(&mut Job::new("J", "job"));
    }
    db.close().unwrap();

    let db = JobTrakrDb::open(&config).unwrap();
    let (status, id) = db.jobs().create(&mut Job::new("J", "after restart"));
    assert_eq!(status, DbStatus::Success);
    assert_eq!(id, Some(RecordId::new(4)));
}

#[test]
fn concurrent_handles_on_one_file_are_serialized() {
    let dir = tempfile::tempdir().unwrap();
    let config = StoreConfig::new(dir.path(), Identity::new(42, 1));
    JobTrakrDb::open(&config).unwrap();

    let workers = (0..4)
        .map(|worker| {
            let config = config.clone();
            thread::spawn(move || {
                let db = JobTrakrDb::open(&config).unwrap();
                (0..15)
                    .map(|n| {
                        let mut item = Item::new(RecordId::new(worker), "I", format!("{n}"));
                        let (status, id) = db.items().create(&mut item);
                        assert_eq!(status, DbStatus::Success);
                        id.unwrap()
                    })
                    .collect::<Vec<_>>()
            })
        })
        .collect::<Vec<_>>();

    let mut seen = HashSet::new();
    for worker in workers {
        for id in worker.join().unwrap() {
            assert!(seen.insert(id), "id {id} was issued twice");
        }
    }
    assert_eq!(seen.len(), 60);
}
