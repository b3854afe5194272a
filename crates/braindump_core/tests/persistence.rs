use braindump_core::db::open_db_in_memory;
use braindump_core::persist::{load_categories, load_items, save_categories, save_items};
use braindump_core::{
    default_categories, load_snapshot, parse_import, Category, ExportDocument, ImportError, Item,
    KeyValueStore, MemoryKvStore, Priority, SqliteKvStore, Status, Term, CATEGORIES_KEY,
    ITEMS_KEY,
};
use serde_json::{json, Value};

fn sample_items() -> Vec<Item> {
    let mut first = Item::with_id("i-1", "file taxes", "finance", 1_000).unwrap();
    first.term = Some(Term::Short);
    first.priority = Some(Priority::new(4));
    first.status = Some(Status::InProgress);
    let second = Item::with_id("i-2", "call grandma", "social", 900).unwrap();
    vec![first, second]
}

#[test]
fn empty_store_loads_empty_items_and_default_categories() {
    let kv = MemoryKvStore::new();
    let snapshot = load_snapshot(&kv);

    assert!(snapshot.items.is_empty());
    assert_eq!(snapshot.categories, default_categories());
}

#[test]
fn corrupt_snapshots_fall_back_independently() {
    let mut kv = MemoryKvStore::new();
    kv.set(ITEMS_KEY, "{not json").unwrap();
    kv.set(CATEGORIES_KEY, r#"[{"id":"hobbies","label":"Hobbies"}]"#)
        .unwrap();

    assert!(load_items(&kv).is_empty());
    assert_eq!(
        load_categories(&kv),
        vec![Category {
            id: "hobbies".to_string(),
            label: "Hobbies".to_string(),
        }]
    );

    kv.set(ITEMS_KEY, "[]").unwrap();
    kv.set(CATEGORIES_KEY, r#"{"id":"not-a-list"}"#).unwrap();
    assert_eq!(load_categories(&kv), default_categories());
}

#[test]
fn snapshots_round_trip_through_sqlite() {
    let mut kv = SqliteKvStore::new(open_db_in_memory().unwrap());
    let items = sample_items();
    let mut categories = default_categories();
    categories.push(Category::from_label("Side Projects").unwrap());

    save_items(&mut kv, &items).unwrap();
    save_categories(&mut kv, &categories).unwrap();

    let snapshot = load_snapshot(&kv);
    assert_eq!(snapshot.items, items);
    assert_eq!(snapshot.categories, categories);
}

#[test]
fn saved_items_use_the_documented_wire_shape() {
    let mut kv = MemoryKvStore::new();
    save_items(&mut kv, &sample_items()).unwrap();

    let raw: Value = serde_json::from_str(&kv.get(ITEMS_KEY).unwrap().unwrap()).unwrap();
    assert_eq!(
        raw[0],
        json!({
            "id": "i-1",
            "text": "file taxes",
            "categoryId": "finance",
            "createdAt": 1_000,
            "term": "short",
            "priority": 4,
            "status": "in_progress"
        })
    );
    assert!(raw[1].get("term").is_none());
}

#[test]
fn export_then_import_restores_equal_state() {
    let items = sample_items();
    let categories = default_categories();
    let exported = ExportDocument::new(&items, &categories, 1_700_000_000_000)
        .to_json()
        .unwrap();

    let document: Value = serde_json::from_str(&exported).unwrap();
    assert_eq!(document["exportedAt"], "2023-11-14T22:13:20.000Z");

    let imported = parse_import(&exported).unwrap();
    assert_eq!(imported.items, items);
    assert_eq!(imported.categories, categories);
}

#[test]
fn import_rejects_non_array_items() {
    let err = parse_import(r#"{"items": "not-an-array", "categories": []}"#).unwrap_err();
    assert!(matches!(err, ImportError::Shape { field: "items" }));
    assert!(err.to_string().contains("items"));
}

#[test]
fn import_requires_both_fields() {
    let err = parse_import(r#"{"items": []}"#).unwrap_err();
    assert!(matches!(err, ImportError::Shape { field: "categories" }));
}

#[test]
fn import_rejects_invalid_json_and_non_objects() {
    assert!(matches!(parse_import("{").unwrap_err(), ImportError::Parse(_)));
    assert!(matches!(parse_import("[]").unwrap_err(), ImportError::NotAnObject));
}

#[test]
fn unknown_field_values_do_not_discard_stored_items() {
    let mut kv = MemoryKvStore::new();
    let stored = json!([
        { "id": "keep", "text": "keep me", "categoryId": "career", "createdAt": 10 },
        { "id": "odd", "text": "archived one", "categoryId": "career", "createdAt": 11,
          "status": "archived", "term": "someday" },
        { "id": "bare", "text": "no timestamp" },
        42
    ]);
    kv.set(ITEMS_KEY, &stored.to_string()).unwrap();

    let items = load_items(&kv);
    let ids: Vec<&str> = items.iter().map(|item| item.id.as_str()).collect();
    assert_eq!(ids, vec!["keep", "odd", "bare"]);
    assert_eq!(items[1].status, None);
    assert_eq!(items[1].term, None);
    assert_eq!(items[2].created_at, 0);
    assert_eq!(items[2].category_id, "");
}

#[test]
fn import_accepts_elements_without_per_item_validation() {
    let input = json!({
        "items": [
            { "id": "ok", "text": "fine", "categoryId": "career", "createdAt": 1 },
            { "id": "archived", "text": "old", "categoryId": "career", "status": "archived" },
            { "text": "no id", "priority": "high" },
            42
        ],
        "categories": [{ "id": "career", "label": "Career" }, "broken"]
    })
    .to_string();

    let snapshot = parse_import(&input).unwrap();
    assert_eq!(snapshot.items.len(), 3);
    assert_eq!(snapshot.items[1].status, None);
    assert_eq!(snapshot.items[1].created_at, 0);
    assert!(!snapshot.items[2].id.is_empty());
    assert_eq!(snapshot.items[2].priority, None);
    assert_eq!(snapshot.categories.len(), 1);
}

#[test]
fn import_ignores_exported_at_and_unknown_keys() {
    let input = json!({
        "items": [],
        "categories": [{ "id": "career", "label": "Career", "color": "red" }],
        "exportedAt": 12345,
        "version": 7
    })
    .to_string();

    let snapshot = parse_import(&input).unwrap();
    assert!(snapshot.items.is_empty());
    assert_eq!(snapshot.categories.len(), 1);
}
