//! Metrics collection
//!
//! Counters are recorded through the `metrics` facade. Nothing is exported
//! unless the embedding process installs a recorder.

use metrics::counter;

/// Metric names used by the service
pub mod names {
    pub const APPOINTMENTS_CREATED: &str = "studio_appointments_created_total";
    pub const CONTACTS_CREATED: &str = "studio_contacts_created_total";
    pub const STATUS_UPDATES: &str = "studio_status_updates_total";
    pub const VALIDATION_FAILURES: &str = "studio_validation_failures_total";
    pub const STORAGE_FALLBACKS: &str = "studio_storage_fallbacks_total";
}

/// Record a stored appointment
pub fn record_appointment_created(backend: &'static str) {
    counter!(names::APPOINTMENTS_CREATED, "backend" => backend).increment(1);
}

/// Record a stored contact submission
pub fn record_contact_created(backend: &'static str) {
    counter!(names::CONTACTS_CREATED, "backend" => backend).increment(1);
}

/// Record a successful status change
pub fn record_status_update(backend: &'static str) {
    counter!(names::STATUS_UPDATES, "backend" => backend).increment(1);
}

/// Record a rejected submission; `entity` is `appointment`, `contact` or `status`
pub fn record_validation_failure(entity: &'static str) {
    counter!(names::VALIDATION_FAILURES, "entity" => entity).increment(1);
}

/// Record the switch from the durable store to memory
pub fn record_storage_fallback() {
    counter!(names::STORAGE_FALLBACKS).increment(1);
}
