use braindump_core::{
    default_categories, CaptureOptions, CaptureService, CategoryRemoval, CoreConfig, ItemCommand,
    KeyValueStore, ManualClock, MemoryKvStore, ServiceError, Status, StoreChange, CATEGORIES_KEY,
    ITEMS_KEY,
};
use std::cell::RefCell;
use std::rc::Rc;

fn open_memory(start_ms: i64) -> CaptureService<MemoryKvStore> {
    CaptureService::open_with(
        MemoryKvStore::new(),
        CaptureOptions::default(),
        Box::new(ManualClock::new(start_ms)),
    )
}

#[test]
fn mutations_write_through_and_reload() {
    let mut service = open_memory(1_000);
    let item = service.add_item("book dentist", "health").unwrap().unwrap();
    service
        .patch_item(&item.id, &[ItemCommand::SetStatus(Some(Status::Done))])
        .unwrap();
    service.add_category("Garden").unwrap().unwrap();

    let kv = service.close().unwrap();
    assert!(kv.get(ITEMS_KEY).unwrap().is_some());
    assert!(kv.get(CATEGORIES_KEY).unwrap().is_some());

    let reopened = CaptureService::open(kv);
    assert_eq!(reopened.items().len(), 1);
    assert_eq!(reopened.items()[0].status, Some(Status::Done));
    assert!(reopened.store().category("garden").is_some());
}

#[test]
fn no_op_mutations_do_not_write() {
    let mut service = open_memory(0);
    assert!(service.add_item("   ", "career").unwrap().is_none());
    assert!(!service.remove_item("missing").unwrap());

    assert!(service.kv().is_empty());
}

#[test]
fn blank_bulk_capture_writes_nothing() {
    let mut service = open_memory(0);
    assert!(service.add_items_bulk("\n  \r\n", "career").unwrap().is_empty());
    assert!(service.kv().is_empty());
}

#[test]
fn failed_write_keeps_in_memory_change() {
    let mut kv = MemoryKvStore::new();
    kv.set_read_only(true);
    let mut service = CaptureService::open_with(
        kv,
        CaptureOptions::default(),
        Box::new(ManualClock::new(0)),
    );

    let err = service.add_item("survives", "career").unwrap_err();
    assert!(matches!(err, ServiceError::Persist(_)));
    assert_eq!(service.items().len(), 1);
}

#[test]
fn session_keeps_stored_items_with_unknown_values_after_next_write() {
    let mut kv = MemoryKvStore::new();
    let stored = serde_json::json!([
        { "id": "keep", "text": "keep me", "categoryId": "career", "createdAt": 10 },
        { "id": "odd", "text": "parked", "categoryId": "career", "createdAt": 11, "status": "archived" }
    ]);
    kv.set(ITEMS_KEY, &stored.to_string()).unwrap();

    let mut service = CaptureService::open_with(
        kv,
        CaptureOptions::default(),
        Box::new(ManualClock::new(1_000)),
    );
    assert_eq!(service.items().len(), 2);
    service.add_item("new", "career").unwrap();

    let reopened = CaptureService::open(service.close().unwrap());
    assert_eq!(reopened.items().len(), 3);
    assert!(reopened.item("keep").is_some());
    assert!(reopened.item("odd").is_some());
}

#[test]
fn clear_all_reseeds_defaults_by_policy() {
    let mut service = open_memory(0);
    service.add_item("x", "career").unwrap();
    service.add_category("Garden").unwrap();

    service.clear_all().unwrap();
    assert!(service.items().is_empty());
    assert_eq!(service.categories(), default_categories().as_slice());

    let mut bare = CaptureService::open_with(
        MemoryKvStore::new(),
        CaptureOptions {
            reseed_categories_on_clear: false,
        },
        Box::new(ManualClock::new(0)),
    );
    bare.clear_all().unwrap();
    assert!(bare.categories().is_empty());
}

#[test]
fn remove_category_flow_rehomes_and_persists() {
    let mut service = open_memory(0);
    let item = service.add_item("ask for raise", "career").unwrap().unwrap();

    assert_eq!(
        service.remove_category("career", false).unwrap(),
        CategoryRemoval::NeedsConfirmation { item_count: 1 }
    );
    assert!(matches!(
        service.remove_category("career", true).unwrap(),
        CategoryRemoval::Removed { rehomed: 1, .. }
    ));

    let reopened = CaptureService::open(service.close().unwrap());
    assert_eq!(reopened.item(&item.id).unwrap().category_id, "social");
    assert!(reopened.store().category("career").is_none());
}

#[test]
fn export_import_round_trip_replaces_store() {
    let mut source = open_memory(1_700_000_000_000);
    source.add_items_bulk("one\ntwo\n", "finance").unwrap();
    source.add_category("Garden").unwrap();
    let exported = source.export_json().unwrap();

    let mut target = open_memory(0);
    target.add_item("will be replaced", "career").unwrap();
    let summary = target.import_json(&exported).unwrap();

    assert_eq!(summary.items, 2);
    assert_eq!(summary.categories, 6);
    assert_eq!(target.items(), source.items());
    assert_eq!(target.categories(), source.categories());
}

#[test]
fn failed_import_leaves_state_untouched_and_silent() {
    let mut service = open_memory(0);
    service.add_item("keep me", "career").unwrap();
    let before = service.items().to_vec();

    let changes = Rc::new(RefCell::new(Vec::<StoreChange>::new()));
    let sink = Rc::clone(&changes);
    service.subscribe(move |change| sink.borrow_mut().push(change));

    let err = service
        .import_json(r#"{"items": "not-an-array", "categories": []}"#)
        .unwrap_err();
    assert!(matches!(err, ServiceError::Import(_)));
    assert_eq!(service.items(), before.as_slice());
    assert!(changes.borrow().is_empty());
}

#[test]
fn export_to_dir_and_import_from_path() {
    let dir = tempfile::tempdir().unwrap();
    let mut source = open_memory(1_700_000_000_000);
    source.add_item("walk", "health").unwrap();

    let path = source.export_to_dir(dir.path()).unwrap();
    assert_eq!(path.file_name().unwrap(), "braindump-2023-11-14.json");

    let mut target = open_memory(0);
    target.import_from_path(&path).unwrap();
    assert_eq!(target.items(), source.items());

    let missing = target.import_from_path(&dir.path().join("nope.json"));
    assert!(matches!(missing, Err(ServiceError::Io { .. })));
}

#[test]
fn internal_write_through_listener_cannot_be_removed() {
    let mut service = open_memory(0);
    let id = service.subscribe(|_| {});
    assert!(service.unsubscribe(id));
    assert_eq!(service.store().listener_count(), 1);
}

#[test]
fn sqlite_session_persists_across_reopen() {
    let dir = tempfile::tempdir().unwrap();
    let config = CoreConfig::new(dir.path().join("data")).unwrap();

    let mut service = CaptureService::open_sqlite(&config).unwrap();
    service.add_items_bulk("alpha\nbeta", "career").unwrap();
    service.close().unwrap();

    let reopened = CaptureService::open_sqlite(&config).unwrap();
    let texts: Vec<&str> = reopened.items().iter().map(|item| item.text.as_str()).collect();
    assert_eq!(texts, vec!["beta", "alpha"]);
    assert_eq!(reopened.categories(), default_categories().as_slice());
}
