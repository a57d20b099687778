use studio_booking::db::{Database, DbOptions};
use studio_booking::models::{AppointmentStatus, ContactStatus, NewAppointment, NewContact};
use tempfile::tempdir;

fn new_appointment(name: &str) -> NewAppointment {
    NewAppointment {
        name: name.to_string(),
        email: format!("{}@example.com", name.to_lowercase()),
        phone: "555-0100".to_string(),
        service: "Personal Training".to_string(),
        preferred_date: Some("2026-11-02".to_string()),
        preferred_time: Some("09:00".to_string()),
        message: String::new(),
    }
}

fn new_contact(name: &str) -> NewContact {
    NewContact {
        name: name.to_string(),
        email: "someone@example.com".to_string(),
        phone: None,
        service: None,
        message: "Do you have evening classes?".to_string(),
    }
}

#[test]
fn test_database_creation_and_initialization() {
    let temp_dir = tempdir().expect("Failed to create temp directory");
    let db_path = temp_dir.path().join("nested").join("studio.db");
    let db_url = format!("sqlite://{}", db_path.display());

    let db = Database::open(&db_url, DbOptions::default()).expect("Failed to create database");

    assert!(db_path.exists());
    db.ping().expect("Ping failed");
    let _conn = db.get_connection().expect("Failed to get database connection");
}

#[test]
fn test_services_seeded_once() {
    let temp_dir = tempdir().unwrap();
    let db_url = format!("sqlite:{}", temp_dir.path().join("studio.db").display());

    let first = Database::open(&db_url, DbOptions::default()).unwrap();
    assert_eq!(first.list_services().unwrap().len(), 4);
    drop(first);

    // Reopening must not duplicate the catalogue
    let second = Database::open(&db_url, DbOptions::default()).unwrap();
    let services = second.list_services().unwrap();
    assert_eq!(services.len(), 4);
    assert_eq!(services[0].name, "Personal Training");
    assert!(!services[0].features.is_empty());
}

#[test]
fn test_appointments_persist_across_reopen() {
    let temp_dir = tempdir().unwrap();
    let db_url = format!("sqlite:{}", temp_dir.path().join("studio.db").display());

    let created = {
        let db = Database::open(&db_url, DbOptions::default()).unwrap();
        db.insert_appointment(new_appointment("Jane")).unwrap()
    };

    let db = Database::open(&db_url, DbOptions::default()).unwrap();
    let stored = db.get_appointment(created.id).unwrap().expect("appointment missing");
    assert_eq!(stored.name, "Jane");
    assert_eq!(stored.email, "jane@example.com");
    assert_eq!(stored.status, AppointmentStatus::Pending);
    assert_eq!(stored.preferred_time.as_deref(), Some("09:00"));
}

#[test]
fn test_list_appointments_newest_first_with_limit() {
    let db = Database::open("sqlite::memory:", DbOptions::default()).unwrap();

    db.insert_appointment(new_appointment("First")).unwrap();
    let second = db.insert_appointment(new_appointment("Second")).unwrap();

    let all = db.list_appointments(None).unwrap();
    assert_eq!(all.len(), 2);
    assert_eq!(all[0].name, "Second");

    let limited = db.list_appointments(Some(1)).unwrap();
    assert_eq!(limited.len(), 1);
    assert_eq!(limited[0].id, second.id);
}

#[test]
fn test_update_status() {
    let db = Database::open("sqlite::memory:", DbOptions::default()).unwrap();
    let created = db.insert_appointment(new_appointment("Jane")).unwrap();

    let updated = db
        .update_appointment_status(created.id, AppointmentStatus::Confirmed)
        .unwrap()
        .expect("appointment missing");
    assert_eq!(updated.status, AppointmentStatus::Confirmed);
    assert!(updated.updated_at >= created.updated_at);

    let missing = db
        .update_appointment_status(created.id + 100, AppointmentStatus::Cancelled)
        .unwrap();
    assert!(missing.is_none());
    assert_eq!(db.stats().unwrap().appointments, 1);
}

#[test]
fn test_contacts_and_stats() {
    let db = Database::open("sqlite::memory:", DbOptions::default()).unwrap();

    db.insert_contact(new_contact("Sam")).unwrap();
    db.insert_contact(new_contact("Alex")).unwrap();

    let contacts = db.list_contacts(None).unwrap();
    assert_eq!(contacts.len(), 2);
    assert_eq!(contacts[0].name, "Alex");
    assert_eq!(contacts[0].status, ContactStatus::New);
    assert!(contacts[0].phone.is_none());

    let stats = db.stats().unwrap();
    assert_eq!(stats.appointments, 0);
    assert_eq!(stats.contacts, 2);
}

#[test]
fn test_open_fails_when_parent_is_a_file() {
    let blocker = tempfile::NamedTempFile::new().unwrap();
    let db_url = format!("sqlite:{}", blocker.path().join("studio.db").display());

    assert!(Database::open(&db_url, DbOptions::default()).is_err());
}
