use super::*;
use crate::util::storage::MemoryStorage;

const KEY: &str = "cms_session";
const LEGACY: &str = "token";

// =============================================================
// access_token
// =============================================================

#[test]
fn access_token_missing_blob_is_none() {
    let storage = MemoryStorage::new();
    assert_eq!(access_token(&storage, KEY), None);
}

#[test]
fn access_token_reads_nested_token() {
    let storage = MemoryStorage::new();
    storage.set_item(KEY, r#"{"user":null,"token":"abc","refreshToken":null}"#).unwrap();
    assert_eq!(access_token(&storage, KEY).as_deref(), Some("abc"));
}

#[test]
fn access_token_ignores_legacy_key() {
    let storage = MemoryStorage::new();
    storage.set_item(LEGACY, "legacy").unwrap();
    assert_eq!(access_token(&storage, KEY), None);
}

#[test]
fn access_token_corrupt_blob_is_none() {
    let storage = MemoryStorage::new();
    storage.set_item(KEY, "{{{").unwrap();
    assert_eq!(access_token(&storage, KEY), None);
}

#[test]
fn access_token_empty_string_is_none() {
    let storage = MemoryStorage::new();
    storage.set_item(KEY, r#"{"token":""}"#).unwrap();
    assert_eq!(access_token(&storage, KEY), None);
}

// =============================================================
// migrate_legacy_token
// =============================================================

#[test]
fn migrate_without_legacy_key_is_noop() {
    let storage = MemoryStorage::new();
    assert_eq!(migrate_legacy_token(&storage, KEY, LEGACY), Ok(false));
    assert!(storage.is_empty());
}

#[test]
fn migrate_moves_legacy_token_into_blob() {
    let storage = MemoryStorage::new();
    storage.set_item(LEGACY, "legacy-token").unwrap();

    assert_eq!(migrate_legacy_token(&storage, KEY, LEGACY), Ok(true));
    assert_eq!(storage.get_item(LEGACY), None);
    assert_eq!(access_token(&storage, KEY).as_deref(), Some("legacy-token"));
}

#[test]
fn migrate_strips_json_quotes_from_legacy_value() {
    let storage = MemoryStorage::new();
    storage.set_item(LEGACY, "\"quoted\"").unwrap();

    assert_eq!(migrate_legacy_token(&storage, KEY, LEGACY), Ok(true));
    assert_eq!(access_token(&storage, KEY).as_deref(), Some("quoted"));
}

#[test]
fn migrate_keeps_existing_blob_token() {
    let storage = MemoryStorage::new();
    storage.set_item(KEY, r#"{"token":"current"}"#).unwrap();
    storage.set_item(LEGACY, "stale").unwrap();

    assert_eq!(migrate_legacy_token(&storage, KEY, LEGACY), Ok(false));
    assert_eq!(storage.get_item(LEGACY), None);
    assert_eq!(access_token(&storage, KEY).as_deref(), Some("current"));
}

#[test]
fn migrate_preserves_user_in_existing_blob() {
    let storage = MemoryStorage::new();
    storage
        .set_item(
            KEY,
            r#"{"user":{"id":"1","email":"a@b.test","name":"A","role":"USER"},"token":null}"#,
        )
        .unwrap();
    storage.set_item(LEGACY, "legacy").unwrap();

    assert_eq!(migrate_legacy_token(&storage, KEY, LEGACY), Ok(true));
    let session = Session::from_blob(&storage.get_item(KEY).unwrap()).unwrap();
    assert_eq!(session.user.unwrap().id, "1");
    assert_eq!(session.access_token.as_deref(), Some("legacy"));
}
