use chrono::NaiveDate;
use gamedex_catalog::store::CatalogStore;
use gamedex_catalog::{CatalogError, GameRecord, JsonFileStore};

fn sample() -> GameRecord {
    GameRecord {
        name: "speed racer".to_string(),
        link: "http://x/y".to_string(),
        description: "a racing game".to_string(),
        categories: vec!["racing".to_string(), "action".to_string()],
        downloads: 3,
        last_downloaded: NaiveDate::from_ymd_opt(2026, 8, 20),
    }
}

#[test]
fn missing_file_is_empty_catalog() {
    let dir = tempfile::tempdir().unwrap();
    let store = JsonFileStore::open(dir.path().join("catalog.json")).unwrap();
    assert!(store.load().unwrap().is_empty());
}

#[test]
fn save_then_reopen_round_trips() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("catalog.json");

    let store = JsonFileStore::open(&path).unwrap();
    store.save_all(&[sample()]).unwrap();

    let reopened = JsonFileStore::open(&path).unwrap();
    assert_eq!(reopened.load().unwrap(), vec![sample()]);
}

#[test]
fn file_uses_spec_field_names() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("catalog.json");
    let store = JsonFileStore::open(&path).unwrap();
    store.save_all(&[sample()]).unwrap();

    let raw = std::fs::read_to_string(&path).unwrap();
    assert!(raw.contains("\"category\""));
    assert!(raw.contains("\"last_downloaded\": \"2026-08-20\""));
    assert!(!raw.contains("\"categories\""));
}

#[test]
fn never_downloaded_serializes_as_empty_string() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("catalog.json");
    let store = JsonFileStore::open(&path).unwrap();

    let mut record = sample();
    record.downloads = 0;
    record.last_downloaded = None;
    store.save_all(&[record]).unwrap();

    let raw = std::fs::read_to_string(&path).unwrap();
    assert!(raw.contains("\"last_downloaded\": \"\""));

    let reopened = JsonFileStore::open(&path).unwrap();
    assert!(reopened.load().unwrap()[0].last_downloaded.is_none());
}

#[test]
fn insert_appends_in_order() {
    let dir = tempfile::tempdir().unwrap();
    let store = JsonFileStore::open(dir.path().join("catalog.json")).unwrap();

    let first = sample();
    let mut second = sample();
    second.name = "tetris".to_string();
    store.insert(&first).unwrap();
    store.insert(&second).unwrap();

    let names: Vec<_> = store.load().unwrap().into_iter().map(|r| r.name).collect();
    assert_eq!(names, vec!["speed racer", "tetris"]);
}

#[test]
fn search_methods_match_service_semantics() {
    let dir = tempfile::tempdir().unwrap();
    let store = JsonFileStore::open(dir.path().join("catalog.json")).unwrap();
    store.insert(&sample()).unwrap();

    assert_eq!(store.find_by_name_contains("SPEED").unwrap().len(), 1);
    assert!(store.find_by_name_contains("zombie").unwrap().is_empty());
    assert_eq!(store.find_by_category("Racing").unwrap().len(), 1);
    assert!(store.find_by_category("rac").unwrap().is_empty());
}

#[test]
fn malformed_file_is_a_parse_error() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("catalog.json");
    std::fs::write(&path, "{ not json").unwrap();

    let err = JsonFileStore::open(&path).unwrap_err();
    assert!(matches!(err, CatalogError::Parse { .. }));
}

#[test]
fn no_temp_file_left_behind() {
    let dir = tempfile::tempdir().unwrap();
    let store = JsonFileStore::open(dir.path().join("catalog.json")).unwrap();
    store.save_all(&[sample()]).unwrap();

    let leftovers: Vec<_> = std::fs::read_dir(dir.path())
        .unwrap()
        .filter_map(|e| e.ok())
        .filter(|e| e.path().extension().is_some_and(|ext| ext == "tmp"))
        .collect();
    assert!(leftovers.is_empty());
}
