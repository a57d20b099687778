use std::fs;
use std::path::Path;
use std::time::Duration;

use chrono::{DateTime, Utc};
use r2d2::Pool;
use r2d2_sqlite::SqliteConnectionManager;
use rusqlite::{params, types::Type, Connection, OptionalExtension, Row};
use tracing::{debug, info};

use crate::catalog;
use crate::error::StorageResult;
use crate::models::{
    Appointment, AppointmentStatus, Contact, ContactStatus, NewAppointment, NewContact, Service,
    StoreStats,
};
use crate::schema::{self, appointments, contacts, services};

/// Pool of SQLite connections
pub type DbPool = Pool<SqliteConnectionManager>;
/// A connection checked out of [`DbPool`]
pub type DbConnection = r2d2::PooledConnection<SqliteConnectionManager>;

/// Pool sizing and timeouts for [`Database::open`]
#[derive(Debug, Clone, Copy)]
pub struct DbOptions {
    /// Maximum pooled connections
    pub max_connections: u32,
    /// How long to wait for a connection before giving up
    pub connection_timeout: Duration,
}

impl Default for DbOptions {
    fn default() -> Self {
        Self {
            max_connections: 8,
            connection_timeout: Duration::from_secs(5),
        }
    }
}

/// Where a `sqlite:` URL points
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SqliteTarget {
    /// Private in-process database
    Memory,
    /// Database file on disk
    File(String),
}

impl SqliteTarget {
    /// Parse `sqlite:path`, `sqlite://path` or `sqlite::memory:`
    #[must_use]
    pub fn from_url(database_url: &str) -> Self {
        let rest = database_url
            .strip_prefix("sqlite://")
            .or_else(|| database_url.strip_prefix("sqlite:"))
            .unwrap_or(database_url);

        if rest.is_empty() || rest == ":memory:" {
            Self::Memory
        } else {
            Self::File(rest.to_string())
        }
    }
}

/// Synchronous SQLite access over a connection pool
pub struct Database {
    pool: DbPool,
}

impl Database {
    /// Open (creating if needed) the database behind `database_url`, run the
    /// schema and seed the service catalogue.
    pub fn open(database_url: &str, options: DbOptions) -> StorageResult<Self> {
        let target = SqliteTarget::from_url(database_url);

        let (manager, max_size) = match &target {
            // Every in-memory connection is its own database, so keep exactly one.
            SqliteTarget::Memory => (SqliteConnectionManager::memory(), 1),
            SqliteTarget::File(path) => {
                if let Some(parent) = Path::new(path).parent() {
                    if !parent.as_os_str().is_empty() {
                        fs::create_dir_all(parent)?;
                    }
                }
                (SqliteConnectionManager::file(path), options.max_connections.max(1))
            }
        };

        let manager = manager.with_init(|conn| conn.busy_timeout(Duration::from_secs(5)));

        let pool = Pool::builder()
            .max_size(max_size)
            .connection_timeout(options.connection_timeout)
            .build(manager)?;

        let db = Self { pool };
        db.run_migrations()?;

        info!(store = ?target, "SQLite store ready");
        Ok(db)
    }

    /// Get a connection from the pool
    pub fn get_connection(&self) -> StorageResult<DbConnection> {
        Ok(self.pool.get()?)
    }

    fn run_migrations(&self) -> StorageResult<()> {
        let conn = self.get_connection()?;
        conn.execute_batch(schema::CREATE_TABLES)?;
        Self::seed_services(&conn)?;
        Ok(())
    }

    fn seed_services(conn: &Connection) -> StorageResult<()> {
        let count: i64 = conn.query_row(
            &format!("SELECT COUNT(*) FROM {}", services::TABLE),
            [],
            |row| row.get(0),
        )?;

        if count > 0 {
            return Ok(());
        }

        let now = Utc::now();
        let mut stmt = conn.prepare(&format!(
            "INSERT INTO {} ({}, {}, {}, {}, {}, {}, {}) VALUES (?, ?, ?, ?, ?, ?, ?)",
            services::TABLE,
            services::NAME,
            services::DESCRIPTION,
            services::FEATURES,
            services::PRICE,
            services::DURATION,
            services::ACTIVE,
            services::CREATED_AT,
        ))?;

        for service in catalog::default_services() {
            let features = serde_json::to_string(&service.features)
                .map_err(|e| crate::error::StorageError::Corrupt(e.to_string()))?;
            stmt.execute(params![
                service.name,
                service.description,
                features,
                service.price,
                service.duration,
                service.active,
                now,
            ])?;
        }

        info!("Default services inserted");
        Ok(())
    }

    /// Cheap liveness query
    pub fn ping(&self) -> StorageResult<()> {
        let conn = self.get_connection()?;
        conn.query_row("SELECT 1", [], |row| row.get::<_, i64>(0))?;
        Ok(())
    }

    /// Insert an appointment and return the stored record
    pub fn insert_appointment(&self, new: NewAppointment) -> StorageResult<Appointment> {
        let conn = self.get_connection()?;
        let now = Utc::now();

        conn.execute(
            &format!(
                "INSERT INTO {} ({}, {}, {}, {}, {}, {}, {}, {}, {}, {}) \
                 VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?)",
                appointments::TABLE,
                appointments::NAME,
                appointments::EMAIL,
                appointments::PHONE,
                appointments::SERVICE,
                appointments::PREFERRED_DATE,
                appointments::PREFERRED_TIME,
                appointments::MESSAGE,
                appointments::STATUS,
                appointments::CREATED_AT,
                appointments::UPDATED_AT,
            ),
            params![
                new.name,
                new.email,
                new.phone,
                new.service,
                new.preferred_date,
                new.preferred_time,
                new.message,
                AppointmentStatus::default().as_str(),
                now,
                now,
            ],
        )?;

        let id = conn.last_insert_rowid();
        debug!(id, "Appointment row inserted");
        Ok(new.into_appointment(id, now))
    }

    /// Appointments newest first, optionally capped at `limit`
    pub fn list_appointments(&self, limit: Option<usize>) -> StorageResult<Vec<Appointment>> {
        let conn = self.get_connection()?;

        let mut stmt = conn.prepare(&format!(
            "SELECT * FROM {} ORDER BY {} DESC, {} DESC LIMIT ?",
            appointments::TABLE,
            appointments::CREATED_AT,
            appointments::ID,
        ))?;

        let rows = stmt.query_map(params![sql_limit(limit)], map_appointment)?;
        Ok(rows.collect::<Result<Vec<_>, _>>()?)
    }

    /// Look up one appointment
    pub fn get_appointment(&self, id: i64) -> StorageResult<Option<Appointment>> {
        let conn = self.get_connection()?;

        let appointment = conn
            .query_row(
                &format!(
                    "SELECT * FROM {} WHERE {} = ?",
                    appointments::TABLE,
                    appointments::ID
                ),
                params![id],
                map_appointment,
            )
            .optional()?;

        Ok(appointment)
    }

    /// Set an appointment's status. Returns `None` when the id is unknown.
    pub fn update_appointment_status(
        &self,
        id: i64,
        status: AppointmentStatus,
    ) -> StorageResult<Option<Appointment>> {
        let conn = self.get_connection()?;

        let changed = conn.execute(
            &format!(
                "UPDATE {} SET {} = ?, {} = ? WHERE {} = ?",
                appointments::TABLE,
                appointments::STATUS,
                appointments::UPDATED_AT,
                appointments::ID,
            ),
            params![status.as_str(), Utc::now(), id],
        )?;

        if changed == 0 {
            return Ok(None);
        }

        drop(conn);
        self.get_appointment(id)
    }

    /// Insert a contact submission and return the stored record
    pub fn insert_contact(&self, new: NewContact) -> StorageResult<Contact> {
        let conn = self.get_connection()?;
        let now = Utc::now();

        conn.execute(
            &format!(
                "INSERT INTO {} ({}, {}, {}, {}, {}, {}, {}) VALUES (?, ?, ?, ?, ?, ?, ?)",
                contacts::TABLE,
                contacts::NAME,
                contacts::EMAIL,
                contacts::PHONE,
                contacts::SERVICE,
                contacts::MESSAGE,
                contacts::STATUS,
                contacts::CREATED_AT,
            ),
            params![
                new.name,
                new.email,
                new.phone,
                new.service,
                new.message,
                ContactStatus::default().as_str(),
                now,
            ],
        )?;

        let id = conn.last_insert_rowid();
        debug!(id, "Contact row inserted");
        Ok(new.into_contact(id, now))
    }

    /// Contact submissions newest first, optionally capped at `limit`
    pub fn list_contacts(&self, limit: Option<usize>) -> StorageResult<Vec<Contact>> {
        let conn = self.get_connection()?;

        let mut stmt = conn.prepare(&format!(
            "SELECT * FROM {} ORDER BY {} DESC, {} DESC LIMIT ?",
            contacts::TABLE,
            contacts::CREATED_AT,
            contacts::ID,
        ))?;

        let rows = stmt.query_map(params![sql_limit(limit)], map_contact)?;
        Ok(rows.collect::<Result<Vec<_>, _>>()?)
    }

    /// Active catalogue entries in seed order
    pub fn list_services(&self) -> StorageResult<Vec<Service>> {
        let conn = self.get_connection()?;

        let mut stmt = conn.prepare(&format!(
            "SELECT * FROM {} WHERE {} = 1 ORDER BY {} ASC",
            services::TABLE,
            services::ACTIVE,
            services::ID,
        ))?;

        let rows = stmt.query_map([], map_service)?;
        Ok(rows.collect::<Result<Vec<_>, _>>()?)
    }

    /// Row counts for the health report
    pub fn stats(&self) -> StorageResult<StoreStats> {
        let conn = self.get_connection()?;

        let count = |table: &str| -> rusqlite::Result<usize> {
            let n: i64 = conn.query_row(&format!("SELECT COUNT(*) FROM {table}"), [], |row| {
                row.get(0)
            })?;
            Ok(usize::try_from(n).unwrap_or_default())
        };

        Ok(StoreStats {
            appointments: count(appointments::TABLE)?,
            contacts: count(contacts::TABLE)?,
        })
    }
}

/// SQLite treats a negative LIMIT as "no limit"
fn sql_limit(limit: Option<usize>) -> i64 {
    limit.map_or(-1, |n| i64::try_from(n).unwrap_or(i64::MAX))
}

fn conversion_error<E>(column: &str, err: E) -> rusqlite::Error
where
    E: std::error::Error + Send + Sync + 'static,
{
    debug!(column, error = %err, "Failed to convert stored value");
    rusqlite::Error::FromSqlConversionFailure(0, Type::Text, Box::new(err))
}

fn map_appointment(row: &Row) -> rusqlite::Result<Appointment> {
    let status: String = row.get(appointments::STATUS)?;
    let status = status
        .parse::<AppointmentStatus>()
        .map_err(|e| conversion_error(appointments::STATUS, e))?;

    Ok(Appointment {
        id: row.get(appointments::ID)?,
        name: row.get(appointments::NAME)?,
        email: row.get(appointments::EMAIL)?,
        phone: row.get(appointments::PHONE)?,
        service: row.get(appointments::SERVICE)?,
        preferred_date: row.get(appointments::PREFERRED_DATE)?,
        preferred_time: row.get(appointments::PREFERRED_TIME)?,
        message: row.get(appointments::MESSAGE)?,
        status,
        created_at: row.get::<_, DateTime<Utc>>(appointments::CREATED_AT)?,
        updated_at: row.get::<_, DateTime<Utc>>(appointments::UPDATED_AT)?,
    })
}

fn map_contact(row: &Row) -> rusqlite::Result<Contact> {
    let status: String = row.get(contacts::STATUS)?;
    let status = status
        .parse::<ContactStatus>()
        .map_err(|e| conversion_error(contacts::STATUS, e))?;

    Ok(Contact {
        id: row.get(contacts::ID)?,
        name: row.get(contacts::NAME)?,
        email: row.get(contacts::EMAIL)?,
        phone: row.get(contacts::PHONE)?,
        service: row.get(contacts::SERVICE)?,
        message: row.get(contacts::MESSAGE)?,
        status,
        created_at: row.get(contacts::CREATED_AT)?,
    })
}

fn map_service(row: &Row) -> rusqlite::Result<Service> {
    let features: Option<String> = row.get(services::FEATURES)?;
    let features = match features {
        Some(raw) => {
            serde_json::from_str(&raw).map_err(|e| conversion_error(services::FEATURES, e))?
        }
        None => Vec::new(),
    };

    Ok(Service {
        id: row.get(services::ID)?,
        name: row.get(services::NAME)?,
        description: row.get::<_, Option<String>>(services::DESCRIPTION)?.unwrap_or_default(),
        features,
        price: row.get::<_, Option<String>>(services::PRICE)?.unwrap_or_default(),
        duration: row.get::<_, Option<String>>(services::DURATION)?.unwrap_or_default(),
        active: row.get(services::ACTIVE)?,
    })
}
