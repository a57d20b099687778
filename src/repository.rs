//! Storage backends behind one async capability trait.
//!
//! [`SqliteRepository`] is the durable store; [`MemoryRepository`] is the
//! in-process fallback. Callers never pick between them directly, see
//! [`crate::service::BookingService`].

use std::sync::atomic::{AtomicI64, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::RwLock;
use tracing::debug;

use crate::catalog;
use crate::db::{Database, DbOptions};
use crate::error::StorageResult;
use crate::logging::OperationTimer;
use crate::models::{
    Appointment, AppointmentStatus, Contact, NewAppointment, NewContact, Service, StoreStats,
};

/// Operations every storage backend provides
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait Repository: Send + Sync {
    /// Short human-readable backend name for health output
    fn backend_name(&self) -> &'static str;

    async fn create_appointment(&self, new: NewAppointment) -> StorageResult<Appointment>;

    /// Newest first
    async fn list_appointments(&self, limit: Option<usize>) -> StorageResult<Vec<Appointment>>;

    /// `Ok(None)` when no appointment has this id
    async fn update_appointment_status(
        &self,
        id: i64,
        status: AppointmentStatus,
    ) -> StorageResult<Option<Appointment>>;

    async fn create_contact(&self, new: NewContact) -> StorageResult<Contact>;

    /// Newest first
    async fn list_contacts(&self, limit: Option<usize>) -> StorageResult<Vec<Contact>>;

    async fn list_services(&self) -> StorageResult<Vec<Service>>;

    async fn stats(&self) -> StorageResult<StoreStats>;
}

/// Durable store: SQLite through a pooled [`Database`]. Each call runs on
/// the blocking thread pool.
#[derive(Clone)]
pub struct SqliteRepository {
    db: Arc<Database>,
}

impl SqliteRepository {
    /// Open the database. Blocking work happens off the async executor.
    pub async fn connect(database_url: &str, options: DbOptions) -> StorageResult<Self> {
        let url = database_url.to_string();
        let db = tokio::task::spawn_blocking(move || Database::open(&url, options)).await??;
        Ok(Self { db: Arc::new(db) })
    }

    /// Wrap an already opened database
    #[must_use]
    pub fn from_database(db: Database) -> Self {
        Self { db: Arc::new(db) }
    }

    /// Check that a connection can still be checked out and queried
    pub async fn ping(&self) -> StorageResult<()> {
        self.run("ping", Database::ping).await
    }

    /// Run a blocking query off the executor, logging its duration at `debug`
    async fn run<T, F>(&self, operation: &'static str, op: F) -> StorageResult<T>
    where
        T: Send + 'static,
        F: FnOnce(&Database) -> StorageResult<T> + Send + 'static,
    {
        let _timer = OperationTimer::new(operation);
        let db = Arc::clone(&self.db);
        tokio::task::spawn_blocking(move || op(&db)).await?
    }
}

#[async_trait]
impl Repository for SqliteRepository {
    fn backend_name(&self) -> &'static str {
        "SQLite"
    }

    async fn create_appointment(&self, new: NewAppointment) -> StorageResult<Appointment> {
        self.run("create_appointment", move |db| db.insert_appointment(new)).await
    }

    async fn list_appointments(&self, limit: Option<usize>) -> StorageResult<Vec<Appointment>> {
        self.run("list_appointments", move |db| db.list_appointments(limit)).await
    }

    async fn update_appointment_status(
        &self,
        id: i64,
        status: AppointmentStatus,
    ) -> StorageResult<Option<Appointment>> {
        self.run("update_appointment_status", move |db| {
            db.update_appointment_status(id, status)
        })
        .await
    }

    async fn create_contact(&self, new: NewContact) -> StorageResult<Contact> {
        self.run("create_contact", move |db| db.insert_contact(new)).await
    }

    async fn list_contacts(&self, limit: Option<usize>) -> StorageResult<Vec<Contact>> {
        self.run("list_contacts", move |db| db.list_contacts(limit)).await
    }

    async fn list_services(&self) -> StorageResult<Vec<Service>> {
        self.run("list_services", Database::list_services).await
    }

    async fn stats(&self) -> StorageResult<StoreStats> {
        self.run("stats", Database::stats).await
    }
}

/// Fallback store: append-only lists held in process memory.
pub struct MemoryRepository {
    appointments: RwLock<Vec<Appointment>>,
    contacts: RwLock<Vec<Contact>>,
    services: Vec<Service>,
    next_appointment_id: AtomicI64,
    next_contact_id: AtomicI64,
}

impl Default for MemoryRepository {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryRepository {
    #[must_use]
    pub fn new() -> Self {
        Self {
            appointments: RwLock::new(Vec::new()),
            contacts: RwLock::new(Vec::new()),
            services: catalog::default_services(),
            next_appointment_id: AtomicI64::new(1),
            next_contact_id: AtomicI64::new(1),
        }
    }
}

fn newest_first<T: Clone>(items: &[T], limit: Option<usize>) -> Vec<T> {
    let take = limit.unwrap_or(items.len());
    items.iter().rev().take(take).cloned().collect()
}

#[async_trait]
impl Repository for MemoryRepository {
    fn backend_name(&self) -> &'static str {
        "In-Memory Storage"
    }

    async fn create_appointment(&self, new: NewAppointment) -> StorageResult<Appointment> {
        // Id is taken under the write lock so list order matches id order.
        let mut appointments = self.appointments.write().await;
        let id = self.next_appointment_id.fetch_add(1, Ordering::SeqCst);
        let appointment = new.into_appointment(id, Utc::now());
        appointments.push(appointment.clone());
        debug!(id, "Appointment kept in memory");
        Ok(appointment)
    }

    async fn list_appointments(&self, limit: Option<usize>) -> StorageResult<Vec<Appointment>> {
        Ok(newest_first(&self.appointments.read().await, limit))
    }

    async fn update_appointment_status(
        &self,
        id: i64,
        status: AppointmentStatus,
    ) -> StorageResult<Option<Appointment>> {
        let mut appointments = self.appointments.write().await;
        Ok(appointments.iter_mut().find(|a| a.id == id).map(|appointment| {
            appointment.status = status;
            appointment.updated_at = Utc::now();
            appointment.clone()
        }))
    }

    async fn create_contact(&self, new: NewContact) -> StorageResult<Contact> {
        let mut contacts = self.contacts.write().await;
        let id = self.next_contact_id.fetch_add(1, Ordering::SeqCst);
        let contact = new.into_contact(id, Utc::now());
        contacts.push(contact.clone());
        debug!(id, "Contact kept in memory");
        Ok(contact)
    }

    async fn list_contacts(&self, limit: Option<usize>) -> StorageResult<Vec<Contact>> {
        Ok(newest_first(&self.contacts.read().await, limit))
    }

    async fn list_services(&self) -> StorageResult<Vec<Service>> {
        Ok(self.services.clone())
    }

    async fn stats(&self) -> StorageResult<StoreStats> {
        Ok(StoreStats {
            appointments: self.appointments.read().await.len(),
            contacts: self.contacts.read().await.len(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::logging::capture::capture_debug;
    use crate::models::DEFAULT_SERVICE;

    fn new_appointment(name: &str) -> NewAppointment {
        NewAppointment {
            name: name.to_string(),
            email: "client@example.com".to_string(),
            phone: "555".to_string(),
            service: DEFAULT_SERVICE.to_string(),
            preferred_date: None,
            preferred_time: None,
            message: String::new(),
        }
    }

    #[test]
    fn test_newest_first() {
        assert_eq!(newest_first(&[1, 2, 3], None), vec![3, 2, 1]);
        assert_eq!(newest_first(&[1, 2, 3], Some(2)), vec![3, 2]);
        assert_eq!(newest_first(&[1, 2, 3], Some(10)), vec![3, 2, 1]);
        assert!(newest_first::<i32>(&[], Some(1)).is_empty());
    }

    #[tokio::test]
    async fn test_memory_ids_increase() {
        let repo = MemoryRepository::new();
        let a = repo.create_appointment(new_appointment("A")).await.unwrap();
        let b = repo.create_appointment(new_appointment("B")).await.unwrap();
        assert_eq!(a.id, 1);
        assert_eq!(b.id, 2);

        let listed = repo.list_appointments(Some(1)).await.unwrap();
        assert_eq!(listed[0].name, "B");
    }

    #[tokio::test]
    async fn test_memory_status_update() {
        let repo = MemoryRepository::new();
        let a = repo.create_appointment(new_appointment("A")).await.unwrap();

        let missing = repo
            .update_appointment_status(42, AppointmentStatus::Confirmed)
            .await
            .unwrap();
        assert!(missing.is_none());

        let updated = repo
            .update_appointment_status(a.id, AppointmentStatus::Cancelled)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(updated.status, AppointmentStatus::Cancelled);
        assert_eq!(repo.stats().await.unwrap().appointments, 1);
    }

    #[tokio::test]
    async fn test_sqlite_queries_log_timing() {
        let repo = SqliteRepository::connect("sqlite::memory:", DbOptions::default())
            .await
            .unwrap();

        let (logs, _guard) = capture_debug();
        repo.list_contacts(Some(5)).await.unwrap();

        let output = logs.contents();
        assert!(output.contains("operation=\"list_contacts\""));
        assert!(output.contains("duration_ms="));
    }

    #[tokio::test]
    async fn test_sqlite_repository_roundtrip() {
        let repo = SqliteRepository::connect("sqlite::memory:", DbOptions::default())
            .await
            .unwrap();
        repo.ping().await.unwrap();

        let created = repo.create_appointment(new_appointment("A")).await.unwrap();
        let listed = repo.list_appointments(None).await.unwrap();
        assert_eq!(listed.len(), 1);
        assert_eq!(listed[0].id, created.id);
        assert_eq!(listed[0].status, AppointmentStatus::Pending);
        assert_eq!(repo.list_services().await.unwrap().len(), 4);
    }
}
