//! Database schema definitions
//!
//! Table and column names used with rusqlite, plus the idempotent DDL run
//! when the durable store is opened.

/// Appointments table schema
pub mod appointments {
    /// Table name
    pub const TABLE: &str = "appointments";
    /// Primary key column
    pub const ID: &str = "id";
    /// Client name column
    pub const NAME: &str = "name";
    /// Client email column
    pub const EMAIL: &str = "email";
    /// Client phone column
    pub const PHONE: &str = "phone";
    /// Requested service column
    pub const SERVICE: &str = "service";
    /// Preferred date column
    pub const PREFERRED_DATE: &str = "preferred_date";
    /// Preferred time column
    pub const PREFERRED_TIME: &str = "preferred_time";
    /// Free-form note column
    pub const MESSAGE: &str = "message";
    /// Lifecycle status column
    pub const STATUS: &str = "status";
    /// Creation timestamp column
    pub const CREATED_AT: &str = "created_at";
    /// Last modification timestamp column
    pub const UPDATED_AT: &str = "updated_at";
}

/// Contacts table schema
pub mod contacts {
    /// Table name
    pub const TABLE: &str = "contacts";
    /// Primary key column
    pub const ID: &str = "id";
    /// Sender name column
    pub const NAME: &str = "name";
    /// Sender email column
    pub const EMAIL: &str = "email";
    /// Sender phone column
    pub const PHONE: &str = "phone";
    /// Service of interest column
    pub const SERVICE: &str = "service";
    /// Enquiry text column
    pub const MESSAGE: &str = "message";
    /// Handling status column
    pub const STATUS: &str = "status";
    /// Submission timestamp column
    pub const CREATED_AT: &str = "created_at";
}

/// Services table schema
pub mod services {
    /// Table name
    pub const TABLE: &str = "services";
    /// Primary key column
    pub const ID: &str = "id";
    /// Service name column
    pub const NAME: &str = "name";
    /// Description column
    pub const DESCRIPTION: &str = "description";
    /// JSON-encoded feature list column
    pub const FEATURES: &str = "features";
    /// Display price column
    pub const PRICE: &str = "price";
    /// Session length column
    pub const DURATION: &str = "duration";
    /// Whether the service is offered column
    pub const ACTIVE: &str = "active";
    /// Creation timestamp column
    pub const CREATED_AT: &str = "created_at";
}

pub(crate) const CREATE_TABLES: &str = "
CREATE TABLE IF NOT EXISTS appointments (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    name TEXT NOT NULL,
    email TEXT NOT NULL,
    phone TEXT NOT NULL,
    service TEXT NOT NULL DEFAULT 'General Consultation',
    preferred_date TEXT,
    preferred_time TEXT,
    message TEXT NOT NULL DEFAULT '',
    status TEXT NOT NULL DEFAULT 'pending',
    created_at TEXT NOT NULL,
    updated_at TEXT NOT NULL
);

CREATE TABLE IF NOT EXISTS contacts (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    name TEXT NOT NULL,
    email TEXT NOT NULL,
    phone TEXT,
    service TEXT,
    message TEXT NOT NULL,
    status TEXT NOT NULL DEFAULT 'new',
    created_at TEXT NOT NULL
);

CREATE TABLE IF NOT EXISTS services (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    name TEXT NOT NULL,
    description TEXT,
    features TEXT,
    price TEXT,
    duration TEXT,
    active INTEGER NOT NULL DEFAULT 1,
    created_at TEXT NOT NULL
);

CREATE INDEX IF NOT EXISTS idx_appointments_created_at ON appointments (created_at);
CREATE INDEX IF NOT EXISTS idx_contacts_created_at ON contacts (created_at);
";
