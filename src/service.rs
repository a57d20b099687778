//! Booking service: validation plus the one place that decides which store
//! answers a call.
//!
//! The durable store is tried first while it is healthy. The first storage
//! error flips the service into degraded mode for the rest of the process,
//! and that call and every later one are served by the in-memory fallback.

use std::future::Future;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use serde::Serialize;
use tracing::{debug, error, info, warn};

use crate::config::{StorageBackend, StorageConfig};
use crate::error::{AppError, Result, StorageError};
use crate::metrics;
use crate::models::{
    Appointment, AppointmentRequest, Contact, ContactRequest, Service, StoreStats,
};
use crate::repository::{MemoryRepository, Repository, SqliteRepository};
use crate::validation::InputValidator;

/// Storage state reported by the health endpoint
#[derive(Debug, Clone, Serialize)]
pub struct StorageHealth {
    /// Human-readable status line
    pub status: String,
    /// Backend currently answering calls
    pub backend: &'static str,
    /// True once the durable store has been abandoned
    pub degraded: bool,
    /// Stored appointments in the active store
    pub appointments: usize,
    /// Stored contacts in the active store
    pub contacts: usize,
}

/// Validates requests and routes them to the durable store or the fallback
pub struct BookingService {
    primary: Option<Arc<dyn Repository>>,
    fallback: Arc<dyn Repository>,
    degraded: AtomicBool,
}

impl BookingService {
    /// Build a service over an optional durable store and a fallback
    #[must_use]
    pub fn new(primary: Option<Arc<dyn Repository>>, fallback: Arc<dyn Repository>) -> Self {
        Self {
            primary,
            fallback,
            degraded: AtomicBool::new(false),
        }
    }

    /// A service that only ever uses process memory
    #[must_use]
    pub fn in_memory() -> Self {
        Self::new(None, Arc::new(MemoryRepository::new()))
    }

    /// Select the store once at startup.
    ///
    /// For the SQLite backend the connection attempt is bounded by the
    /// configured timeout; if it fails the service starts degraded.
    pub async fn connect(config: &StorageConfig) -> Self {
        let fallback: Arc<dyn Repository> = Arc::new(MemoryRepository::new());

        match config.backend {
            StorageBackend::Memory => {
                info!("Storage: in-memory (configured)");
                Self::new(None, fallback)
            }
            StorageBackend::Sqlite => {
                let attempt = tokio::time::timeout(
                    config.connection_timeout(),
                    SqliteRepository::connect(&config.database_url, config.db_options()),
                )
                .await
                .unwrap_or(Err(StorageError::Timeout));

                match attempt {
                    Ok(repo) => {
                        info!(database_url = %config.database_url, "Storage: SQLite");
                        Self::new(Some(Arc::new(repo)), fallback)
                    }
                    Err(err) => {
                        warn!(
                            database_url = %config.database_url,
                            error = %err,
                            "Durable store unavailable; running on in-memory storage"
                        );
                        metrics::record_storage_fallback();
                        let service = Self::new(None, fallback);
                        service.degraded.store(true, Ordering::SeqCst);
                        service
                    }
                }
            }
        }
    }

    /// True once the durable store has been abandoned
    #[must_use]
    pub fn is_degraded(&self) -> bool {
        self.degraded.load(Ordering::SeqCst)
    }

    /// Name of the backend that will answer the next call
    #[must_use]
    pub fn active_backend(&self) -> &'static str {
        self.active_primary()
            .map_or_else(|| self.fallback.backend_name(), |primary| primary.backend_name())
    }

    fn active_primary(&self) -> Option<&Arc<dyn Repository>> {
        self.primary.as_ref().filter(|_| !self.is_degraded())
    }

    fn downgrade(&self, operation: &'static str, err: &StorageError) {
        if self.degraded.swap(true, Ordering::SeqCst) {
            debug!(operation, error = %err, "Durable store error after downgrade");
            return;
        }

        warn!(
            operation,
            error = %err,
            "Durable store failed; switching to in-memory storage for the rest of this process"
        );
        metrics::record_storage_fallback();
    }

    /// Run `op` on the active store, falling back to memory on a storage
    /// error. Returns the value and the name of the backend that produced it.
    async fn run<T, F, Fut>(&self, operation: &'static str, op: F) -> Result<(T, &'static str)>
    where
        F: Fn(Arc<dyn Repository>) -> Fut,
        Fut: Future<Output = std::result::Result<T, StorageError>>,
    {
        if let Some(primary) = self.active_primary() {
            match op(Arc::clone(primary)).await {
                Ok(value) => return Ok((value, primary.backend_name())),
                Err(err) => self.downgrade(operation, &err),
            }
        }

        let value = op(Arc::clone(&self.fallback)).await.map_err(|err| {
            error!(operation, error = %err, "Fallback store failed");
            AppError::from(err)
        })?;

        Ok((value, self.fallback.backend_name()))
    }

    /// Validate and store a booking request
    pub async fn create_appointment(&self, request: AppointmentRequest) -> Result<Appointment> {
        let new = InputValidator::validate_appointment(request).inspect_err(|_| {
            metrics::record_validation_failure("appointment");
        })?;

        let (appointment, backend) = self
            .run("create_appointment", |repo| {
                let new = new.clone();
                async move { repo.create_appointment(new).await }
            })
            .await?;

        metrics::record_appointment_created(backend);
        info!(id = appointment.id, name = %appointment.name, backend, "Appointment created");
        Ok(appointment)
    }

    /// Appointments newest first
    pub async fn list_appointments(&self, limit: Option<usize>) -> Result<Vec<Appointment>> {
        let (appointments, _) = self
            .run("list_appointments", |repo| async move {
                repo.list_appointments(limit).await
            })
            .await?;
        Ok(appointments)
    }

    /// Change an appointment's status. The status is checked before any
    /// storage access.
    pub async fn update_appointment_status(
        &self,
        id: i64,
        status: Option<&str>,
    ) -> Result<Appointment> {
        let status = InputValidator::validate_status(status).inspect_err(|_| {
            metrics::record_validation_failure("status");
        })?;

        let (updated, backend) = self
            .run("update_appointment_status", |repo| async move {
                repo.update_appointment_status(id, status).await
            })
            .await?;

        let appointment =
            updated.ok_or_else(|| AppError::NotFound(format!("Appointment {id} not found")))?;

        metrics::record_status_update(backend);
        info!(id, status = %status, backend, "Appointment status updated");
        Ok(appointment)
    }

    /// Validate and store a contact-form submission
    pub async fn create_contact(&self, request: ContactRequest) -> Result<Contact> {
        let new = InputValidator::validate_contact(request).inspect_err(|_| {
            metrics::record_validation_failure("contact");
        })?;

        let (contact, backend) = self
            .run("create_contact", |repo| {
                let new = new.clone();
                async move { repo.create_contact(new).await }
            })
            .await?;

        metrics::record_contact_created(backend);
        info!(id = contact.id, name = %contact.name, backend, "Contact saved");
        Ok(contact)
    }

    /// Contact submissions newest first
    pub async fn list_contacts(&self, limit: Option<usize>) -> Result<Vec<Contact>> {
        let (contacts, _) = self
            .run("list_contacts", |repo| async move {
                repo.list_contacts(limit).await
            })
            .await?;
        Ok(contacts)
    }

    /// The service catalogue
    pub async fn list_services(&self) -> Result<Vec<Service>> {
        let (services, _) = self
            .run("list_services", |repo| async move { repo.list_services().await })
            .await?;
        Ok(services)
    }

    /// Record counts for the active store
    pub async fn stats(&self) -> Result<StoreStats> {
        let (stats, _) = self
            .run("stats", |repo| async move { repo.stats().await })
            .await?;
        Ok(stats)
    }

    /// Storage summary for the health endpoint
    pub async fn health(&self) -> Result<StorageHealth> {
        let stats = self.stats().await?;
        let backend = self.active_backend();
        let degraded = self.is_degraded();

        let status = if degraded {
            format!("{backend} (fallback)")
        } else {
            backend.to_string()
        };

        Ok(StorageHealth {
            status,
            backend,
            degraded,
            appointments: stats.appointments,
            contacts: stats.contacts,
        })
    }
}
