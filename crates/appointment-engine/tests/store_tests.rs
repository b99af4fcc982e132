//! Tests for the in-memory store and the JSON-file store lifecycle.

use std::fs;
use std::path::PathBuf;

use appointment_engine::file_store::{with_file_store, FileStore};
use appointment_engine::model::{
    AppointmentDraft, AppointmentId, ContactId, Customer, CustomerDraft, CustomerId, DivisionId,
    UserId,
};
use appointment_engine::{AppointmentStore, Dataset, DirectoryStore, MemoryStore, StoreError};
use chrono::{NaiveDate, NaiveDateTime};
use tempfile::TempDir;

fn at(day: u32, hour: u32) -> NaiveDateTime {
    NaiveDate::from_ymd_opt(2026, 4, day)
        .unwrap()
        .and_hms_opt(hour, 0, 0)
        .unwrap()
}

fn draft(customer: i64, contact: i64, start: NaiveDateTime) -> AppointmentDraft {
    AppointmentDraft {
        customer_id: CustomerId(customer),
        contact_id: ContactId(contact),
        contact_name: "Li Lee".to_string(),
        user_id: UserId(2),
        title: "Review".to_string(),
        description: "Quarterly review".to_string(),
        appointment_type: "De-Briefing".to_string(),
        location: "Montreal".to_string(),
        start,
        end: start + chrono::Duration::hours(1),
    }
}

/// A dataset path inside a fresh directory that is removed when the
/// returned guard drops.
fn scratch_path(name: &str) -> (TempDir, PathBuf) {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join(format!("{}.json", name));
    (dir, path)
}

// ── MemoryStore ─────────────────────────────────────────────────────────────

#[test]
fn ids_continue_after_highest_existing() {
    let mut seeded = MemoryStore::new();
    seeded.insert(draft(1, 1, at(1, 9))).unwrap();
    seeded.insert(draft(1, 1, at(2, 9))).unwrap();
    let mut data = seeded.into_dataset();
    data.appointments.retain(|a| a.id == AppointmentId(2));

    let mut store = MemoryStore::from_dataset(data);
    let next = store.insert(draft(1, 1, at(3, 9))).unwrap();

    assert_eq!(next.id, AppointmentId(3));
}

#[test]
fn list_by_contact_is_ordered_by_start() {
    let mut store = MemoryStore::new();
    store.insert(draft(1, 7, at(9, 9))).unwrap();
    store.insert(draft(1, 8, at(1, 9))).unwrap();
    store.insert(draft(1, 7, at(3, 9))).unwrap();

    let starts: Vec<NaiveDateTime> = store
        .list_by_contact(ContactId(7))
        .unwrap()
        .into_iter()
        .map(|a| a.start)
        .collect();

    assert_eq!(starts, vec![at(3, 9), at(9, 9)]);
}

#[test]
fn list_by_customer_filters() {
    let mut store = MemoryStore::new();
    store.insert(draft(1, 1, at(1, 9))).unwrap();
    store.insert(draft(2, 1, at(2, 9))).unwrap();

    let found = store.list_by_customer(CustomerId(2)).unwrap();

    assert_eq!(found.len(), 1);
    assert_eq!(found[0].customer_id, CustomerId(2));
}

#[test]
fn update_of_missing_id_is_not_found() {
    let mut store = MemoryStore::new();
    let ghost = draft(1, 1, at(1, 9)).with_id(AppointmentId(99));

    let err = store.update(&ghost).unwrap_err();

    assert!(matches!(
        err,
        StoreError::NotFound {
            entity: "appointment",
            id: 99
        }
    ));
}

#[test]
fn delete_missing_id_returns_none() {
    let mut store = MemoryStore::new();
    assert_eq!(store.delete(AppointmentId(1)).unwrap(), None);
}

fn customer_draft(name: &str) -> CustomerDraft {
    CustomerDraft {
        name: name.to_string(),
        address: "1 Downton Rd".to_string(),
        postal_code: "SW1".to_string(),
        phone: "555-0104".to_string(),
        division_id: DivisionId(101),
    }
}

fn lady_mary() -> Customer {
    customer_draft("Lady Mary").with_id(CustomerId(4))
}

#[test]
fn delete_customer_reports_existence() {
    let mut store = MemoryStore::from_dataset(Dataset {
        customers: vec![lady_mary()],
        ..Dataset::default()
    });

    assert!(store.delete_customer(CustomerId(4)).unwrap());
    assert!(!store.delete_customer(CustomerId(4)).unwrap());
}

#[test]
fn customer_ids_continue_after_highest_existing() {
    let mut store = MemoryStore::from_dataset(Dataset {
        customers: vec![lady_mary()],
        ..Dataset::default()
    });

    let added = store.insert_customer(customer_draft("Ada Lane")).unwrap();

    assert_eq!(added.id, CustomerId(5));
    assert_eq!(store.customers().unwrap().len(), 2);
}

#[test]
fn update_customer_replaces_record() {
    let mut store = MemoryStore::from_dataset(Dataset {
        customers: vec![lady_mary()],
        ..Dataset::default()
    });
    let mut edited = lady_mary();
    edited.phone = "555-0199".to_string();

    store.update_customer(&edited).unwrap();

    assert_eq!(store.customers().unwrap(), vec![edited]);
}

#[test]
fn update_of_missing_customer_is_not_found() {
    let mut store = MemoryStore::new();

    let err = store.update_customer(&lady_mary()).unwrap_err();

    assert!(matches!(
        err,
        StoreError::NotFound {
            entity: "customer",
            id: 4
        }
    ));
}

// ── FileStore ───────────────────────────────────────────────────────────────

#[test]
fn missing_file_opens_empty() {
    let (_dir, path) = scratch_path("missing");

    let store = FileStore::open(&path).unwrap();

    assert!(store.list().unwrap().is_empty());
    assert_eq!(store.path(), path.as_path());
}

#[test]
fn close_without_changes_writes_nothing() {
    let (_dir, path) = scratch_path("clean");

    FileStore::open(&path).unwrap().close().unwrap();

    assert!(!path.exists());
}

#[test]
fn close_persists_changes() {
    let (_dir, path) = scratch_path("persist");

    let mut store = FileStore::open(&path).unwrap();
    let created = store.insert(draft(1, 1, at(1, 9))).unwrap();
    store.close().unwrap();

    let reopened = FileStore::open(&path).unwrap();
    assert_eq!(reopened.list().unwrap(), vec![created]);
    assert!(!path.with_extension("json.tmp").exists());
}

#[test]
fn with_file_store_discards_changes_on_error() {
    let (_dir, path) = scratch_path("rollback");

    let result: Result<(), StoreError> = with_file_store(&path, |store| {
        store.insert(draft(1, 1, at(1, 9)))?;
        Err(StoreError::NotFound {
            entity: "customer",
            id: 1,
        })
    });

    assert!(result.is_err());
    assert!(!path.exists(), "failed unit of work must not be written");
}

#[test]
fn with_file_store_commits_on_success() {
    let (_dir, path) = scratch_path("commit");

    let id = with_file_store(&path, |store| -> Result<AppointmentId, StoreError> {
        Ok(store.insert(draft(1, 1, at(1, 9)))?.id)
    })
    .unwrap();

    let reopened = FileStore::open(&path).unwrap();
    assert!(reopened.get(id).unwrap().is_some());
}

#[test]
fn malformed_file_is_a_json_error() {
    let (_dir, path) = scratch_path("malformed");
    fs::write(&path, "{ not json").unwrap();

    let err = FileStore::open(&path).unwrap_err();

    assert!(matches!(err, StoreError::Json(_)));
}

#[test]
fn dataset_tables_default_when_absent() {
    let (_dir, path) = scratch_path("partial");
    fs::write(&path, r#"{ "contacts": [ { "id": 1, "name": "Anika Costa", "email": "acoste@company.com" } ] }"#)
        .unwrap();

    let store = FileStore::open(&path).unwrap();

    assert_eq!(store.contacts().unwrap().len(), 1);
    assert!(store.list().unwrap().is_empty());
}

#[test]
fn inserted_customer_survives_reopen() {
    let (_dir, path) = scratch_path("customer");

    let added = with_file_store(&path, |store| store.insert_customer(customer_draft("Ada Lane")))
        .unwrap();

    let reopened = FileStore::open(&path).unwrap();
    assert_eq!(reopened.customers().unwrap(), vec![added]);
}
