//! Unit tests for validation.rs module

use proptest::prelude::*;
use studio_booking::error::AppError;
use studio_booking::models::{
    AppointmentRequest, AppointmentStatus, ContactRequest, DEFAULT_SERVICE,
};
use studio_booking::validation::InputValidator;

fn appointment(name: &str, email: &str, phone: &str) -> AppointmentRequest {
    AppointmentRequest {
        name: Some(name.to_string()),
        email: Some(email.to_string()),
        phone: Some(phone.to_string()),
        ..AppointmentRequest::default()
    }
}

fn contact(name: &str, email: &str, message: &str) -> ContactRequest {
    ContactRequest {
        name: Some(name.to_string()),
        email: Some(email.to_string()),
        message: Some(message.to_string()),
        ..ContactRequest::default()
    }
}

#[test]
fn test_appointment_normalizes_email_and_service() {
    let new =
        InputValidator::validate_appointment(appointment("Jane", "JANE@X.COM", "555-1")).unwrap();

    assert_eq!(new.name, "Jane");
    assert_eq!(new.email, "jane@x.com");
    assert_eq!(new.phone, "555-1");
    assert_eq!(new.service, DEFAULT_SERVICE);
    assert_eq!(new.message, "");
    assert!(new.preferred_date.is_none());
}

#[test]
fn test_appointment_trims_fields() {
    let mut request = appointment("  Jane Doe ", " jane@example.com ", " 555-0100 ");
    request.service = Some("  Group Classes ".to_string());
    request.date = Some("2026-11-02".to_string());
    request.time = Some("  ".to_string());

    let new = InputValidator::validate_appointment(request).unwrap();
    assert_eq!(new.name, "Jane Doe");
    assert_eq!(new.email, "jane@example.com");
    assert_eq!(new.service, "Group Classes");
    assert_eq!(new.preferred_date.as_deref(), Some("2026-11-02"));
    assert!(new.preferred_time.is_none());
}

#[test]
fn test_appointment_missing_phone() {
    let mut request = appointment("Jane", "jane@example.com", "");
    let err = InputValidator::validate_appointment(request.clone()).unwrap_err();
    assert_eq!(err.to_string(), "Name, email, and phone are required");

    request.phone = None;
    assert!(InputValidator::validate_appointment(request).is_err());
}

#[test]
fn test_appointment_blank_service_defaults() {
    let mut request = appointment("Jane", "jane@example.com", "555");
    request.service = Some("   ".to_string());
    let new = InputValidator::validate_appointment(request).unwrap();
    assert_eq!(new.service, DEFAULT_SERVICE);
}

#[test]
fn test_contact_requires_message() {
    let err = InputValidator::validate_contact(contact("Sam", "sam@example.com", "")).unwrap_err();
    assert!(matches!(err, AppError::Validation(_)));
    assert_eq!(err.to_string(), "Name, email, and message are required");
}

#[test]
fn test_contact_optional_fields() {
    let mut request = contact("Sam", "Sam@Example.com", " Hello there ");
    request.phone = Some(String::new());
    request.service = Some("Rehabilitation".to_string());

    let new = InputValidator::validate_contact(request).unwrap();
    assert_eq!(new.email, "sam@example.com");
    assert_eq!(new.message, "Hello there");
    assert!(new.phone.is_none());
    assert_eq!(new.service.as_deref(), Some("Rehabilitation"));
}

#[test]
fn test_status_known_values() {
    assert_eq!(
        InputValidator::validate_status(Some("confirmed")).unwrap(),
        AppointmentStatus::Confirmed
    );
    assert_eq!(
        InputValidator::validate_status(Some(" completed ")).unwrap(),
        AppointmentStatus::Completed
    );
}

#[test]
fn test_status_unknown_value() {
    let err = InputValidator::validate_status(Some("archived")).unwrap_err();
    assert!(matches!(err, AppError::InvalidStatus(_)));
    assert!(err.to_string().contains("archived"));
}

#[test]
fn test_status_missing() {
    assert!(matches!(
        InputValidator::validate_status(None),
        Err(AppError::InvalidStatus(_))
    ));
}

#[test]
fn test_validate_name_too_long() {
    let long_name = "a".repeat(101);
    assert!(InputValidator::validate_name(&long_name).is_err());
    assert!(InputValidator::validate_name(&"a".repeat(100)).is_ok());
}

#[test]
fn test_validate_name_with_newline() {
    assert!(InputValidator::validate_name("Jane\nDoe").is_err());
}

#[test]
fn test_normalize_email_rejects_bad_shapes() {
    assert!(InputValidator::normalize_email("no-at-sign").is_err());
    assert!(InputValidator::normalize_email("a@b@c.com").is_err());
    assert!(InputValidator::normalize_email("@example.com").is_err());
    assert!(InputValidator::normalize_email("jane@localhost").is_err());
}

#[test]
fn test_sanitize_text_strips_control_chars() {
    assert_eq!(InputValidator::sanitize_text(" Hi\u{0}there\u{7} "), "Hithere");
    assert_eq!(InputValidator::sanitize_text("line\nbreak"), "line\nbreak");
}

#[test]
fn test_validate_database_url() {
    assert!(InputValidator::validate_database_url("sqlite:data/studio.db").is_ok());
    assert!(InputValidator::validate_database_url("sqlite::memory:").is_ok());
    assert!(InputValidator::validate_database_url("").is_err());
    assert!(InputValidator::validate_database_url("postgres://localhost/db").is_err());
}

proptest! {
    #[test]
    fn prop_email_is_lowercased(
        local in "[A-Za-z][A-Za-z0-9]{0,15}",
        domain in "[A-Za-z]{1,10}\\.[A-Za-z]{2,4}",
    ) {
        let email = format!("{local}@{domain}");
        let new = InputValidator::validate_appointment(appointment("Jane", &email, "555")).unwrap();
        prop_assert_eq!(new.email, email.to_lowercase());
    }

    #[test]
    fn prop_status_accepts_only_known_values(raw in "[a-z]{1,12}") {
        let result = InputValidator::validate_status(Some(&raw));
        let known = AppointmentStatus::ALL.iter().any(|s| s.as_str() == raw);
        prop_assert_eq!(result.is_ok(), known);
    }

    #[test]
    fn prop_sanitize_is_idempotent(text in ".{0,64}") {
        let once = InputValidator::sanitize_text(&text);
        prop_assert_eq!(InputValidator::sanitize_text(&once), once.clone());
    }
}
