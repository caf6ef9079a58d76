use super::test_db;
use crate::DbError;

#[test]
fn test_entry_crud() {
    let db = test_db();
    db.set_entry("key1", "value1").unwrap();
    assert_eq!(db.get_entry("key1").unwrap(), Some("value1".into()));

    db.set_entry("key1", "value2").unwrap();
    assert_eq!(db.get_entry("key1").unwrap(), Some("value2".into()));

    db.delete_entry("key1").unwrap();
    assert_eq!(db.get_entry("key1").unwrap(), None);
}

#[test]
fn test_missing_entry_is_none_not_error() {
    let db = test_db();
    assert!(matches!(db.get_entry("never-written"), Ok(None)));
}

#[test]
fn test_empty_key_rejected() {
    let db = test_db();
    assert!(matches!(db.set_entry("", "x"), Err(DbError::InvalidData(_))));
}

#[test]
fn test_list_and_purge_by_prefix() {
    let db = test_db();
    db.set_entry("emote-cache:v1", "old").unwrap();
    db.set_entry("emote-cache:v2", "new").unwrap();
    db.set_entry("recent-emotes", "[]").unwrap();

    assert_eq!(
        db.list_entry_keys("emote-cache:").unwrap(),
        vec!["emote-cache:v1", "emote-cache:v2"]
    );

    let removed = db
        .purge_entries_with_prefix("emote-cache:", "emote-cache:v2")
        .unwrap();
    assert_eq!(removed, 1);
    assert_eq!(db.list_entry_keys("emote-cache:").unwrap(), vec!["emote-cache:v2"]);
    assert_eq!(db.get_entry("recent-emotes").unwrap(), Some("[]".into()));
}

#[test]
fn test_prefix_is_literal() {
    let db = test_db();
    db.set_entry("a%b", "1").unwrap();
    db.set_entry("axb", "2").unwrap();
    assert_eq!(db.list_entry_keys("a%").unwrap(), vec!["a%b"]);
}
