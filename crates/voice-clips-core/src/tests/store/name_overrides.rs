use crate::{ClipError, FileRef, NameOverrideStore};

use std::fs;

/// WHAT: Stored names survive a reload
/// WHY: Renames must persist across launches
#[test]
fn given_name_set_when_reloading_store_then_name_present() {
    // Given: A store with one name
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("names.toml");
    let file = FileRef::new("/recordings/recording_20240101120000.wav");
    let store = NameOverrideStore::load(&path).unwrap();
    store.set_name(&file, "Morning walk").unwrap();

    // When: Loading the file again
    let reloaded = NameOverrideStore::load(&path).unwrap();

    // Then: The name is there
    assert_eq!(reloaded.get_name(&file), Some("Morning walk".to_string()));
}

/// WHAT: Missing names fall back to the default
/// WHY: Files from before the store existed still need a label
#[test]
fn given_no_name_when_reading_with_default_then_default_returned() {
    let store = NameOverrideStore::in_memory();
    let file = FileRef::new("/recordings/a.wav");

    assert_eq!(store.get_name(&file), None);
    assert_eq!(store.name_or(&file, "Unnamed"), "Unnamed");
}

/// WHAT: The counter starts at 1, increments and persists
/// WHY: Default names must not repeat across launches
#[test]
fn given_fresh_store_when_advancing_counter_then_sequence_persists() {
    // Given: A fresh store on disk
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("names.toml");
    let store = NameOverrideStore::load(&path).unwrap();

    // When: Advancing twice and reloading
    assert_eq!(store.next_counter().unwrap(), 1);
    assert_eq!(store.next_counter().unwrap(), 2);
    let reloaded = NameOverrideStore::load(&path).unwrap();

    // Then: The next value continues the sequence
    assert_eq!(reloaded.current_counter(), 2);
    assert_eq!(reloaded.next_counter().unwrap(), 3);
}

/// WHAT: Removing an absent name succeeds
/// WHY: Delete cleans up names without checking first
#[test]
fn given_absent_name_when_removing_then_ok() {
    let store = NameOverrideStore::in_memory();
    let file = FileRef::new("/recordings/a.wav");

    store.remove(&file).unwrap();
    store.set_name(&file, "A").unwrap();
    store.remove(&file).unwrap();

    assert_eq!(store.get_name(&file), None);
}

/// WHAT: A corrupt store file is reported, not silently emptied
/// WHY: Overwriting it would lose every saved name
#[test]
fn given_corrupt_file_when_loading_then_store_error() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("names.toml");
    fs::write(&path, "next_recording_number = [").unwrap();

    let result = NameOverrideStore::load(&path);

    assert!(matches!(result, Err(ClipError::StoreError { .. })));
}

/// WHAT: A failed write leaves the in-memory view unchanged
/// WHY: Memory and disk must agree on every stored name
#[test]
fn given_unwritable_location_when_setting_name_then_error_and_state_unchanged() {
    // Given: A store whose parent path is a regular file
    let dir = tempfile::tempdir().unwrap();
    let blocker = dir.path().join("blocker");
    fs::write(&blocker, "file, not a directory").unwrap();
    let store = NameOverrideStore::load(&blocker.join("names.toml")).unwrap();
    let file = FileRef::new("/recordings/a.wav");

    // When: Setting a name and advancing the counter
    let set = store.set_name(&file, "A");
    let counter = store.next_counter();

    // Then: Both fail and nothing changed
    assert!(matches!(set, Err(ClipError::StoreError { .. })));
    assert!(counter.is_err());
    assert_eq!(store.get_name(&file), None);
    assert_eq!(store.current_counter(), 0);
}
