//! Data models for bookings and contact enquiries
//!
//! This module contains the records persisted by every storage backend,
//! the raw request payloads accepted over HTTP, and the validated insert
//! types that sit between the two.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Service name used when a booking does not pick one
pub const DEFAULT_SERVICE: &str = "General Consultation";

/// Booking lifecycle stage. Any status may be set to any other.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AppointmentStatus {
    /// Submitted, not yet reviewed
    #[default]
    Pending,
    /// Accepted by the studio
    Confirmed,
    /// Session took place
    Completed,
    /// Called off by either side
    Cancelled,
}

impl AppointmentStatus {
    /// Every accepted status value
    pub const ALL: [Self; 4] = [
        Self::Pending,
        Self::Confirmed,
        Self::Completed,
        Self::Cancelled,
    ];

    /// Wire and storage representation
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Confirmed => "confirmed",
            Self::Completed => "completed",
            Self::Cancelled => "cancelled",
        }
    }
}

impl fmt::Display for AppointmentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when parsing an unknown status string
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownStatus(pub String);

impl fmt::Display for UnknownStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown status '{}'", self.0)
    }
}

impl std::error::Error for UnknownStatus {}

impl FromStr for AppointmentStatus {
    type Err = UnknownStatus;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|status| status.as_str() == s)
            .ok_or_else(|| UnknownStatus(s.to_string()))
    }
}

/// Handling stage of a contact enquiry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ContactStatus {
    /// Not yet answered
    #[default]
    New,
    /// Studio replied
    Responded,
    /// Nothing more to do
    Closed,
}

impl ContactStatus {
    /// Wire and storage representation
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::New => "new",
            Self::Responded => "responded",
            Self::Closed => "closed",
        }
    }
}

impl FromStr for ContactStatus {
    type Err = UnknownStatus;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "new" => Ok(Self::New),
            "responded" => Ok(Self::Responded),
            "closed" => Ok(Self::Closed),
            other => Err(UnknownStatus(other.to_string())),
        }
    }
}

/// A stored appointment request
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Appointment {
    /// Store-generated identifier
    pub id: i64,
    /// Client name
    pub name: String,
    /// Client email, lower-cased
    pub email: String,
    /// Client phone number
    pub phone: String,
    /// Requested service
    pub service: String,
    /// Preferred date as entered by the client
    pub preferred_date: Option<String>,
    /// Preferred time as entered by the client
    pub preferred_time: Option<String>,
    /// Free-form note, empty when not given
    pub message: String,
    /// Booking lifecycle stage
    pub status: AppointmentStatus,
    /// Creation time
    pub created_at: DateTime<Utc>,
    /// Last modification time
    pub updated_at: DateTime<Utc>,
}

/// A stored contact-form submission
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Contact {
    /// Store-generated identifier
    pub id: i64,
    /// Sender name
    pub name: String,
    /// Sender email, lower-cased
    pub email: String,
    /// Sender phone number
    pub phone: Option<String>,
    /// Service the enquiry is about
    pub service: Option<String>,
    /// Enquiry text
    pub message: String,
    /// Handling stage
    pub status: ContactStatus,
    /// Submission time
    pub created_at: DateTime<Utc>,
}

/// A validated appointment ready to be stored
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewAppointment {
    /// Trimmed client name
    pub name: String,
    /// Lower-cased client email
    pub email: String,
    /// Trimmed phone number
    pub phone: String,
    /// Requested service, defaulted when blank
    pub service: String,
    /// Preferred date, `None` when blank
    pub preferred_date: Option<String>,
    /// Preferred time, `None` when blank
    pub preferred_time: Option<String>,
    /// Free-form note, empty when not given
    pub message: String,
}

impl NewAppointment {
    /// Materialize into a record with the given id and timestamp
    #[must_use]
    pub fn into_appointment(self, id: i64, now: DateTime<Utc>) -> Appointment {
        Appointment {
            id,
            name: self.name,
            email: self.email,
            phone: self.phone,
            service: self.service,
            preferred_date: self.preferred_date,
            preferred_time: self.preferred_time,
            message: self.message,
            status: AppointmentStatus::default(),
            created_at: now,
            updated_at: now,
        }
    }
}

/// A validated contact submission ready to be stored
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewContact {
    /// Trimmed sender name
    pub name: String,
    /// Lower-cased sender email
    pub email: String,
    /// Phone number, `None` when blank
    pub phone: Option<String>,
    /// Service the enquiry is about, `None` when blank
    pub service: Option<String>,
    /// Enquiry text
    pub message: String,
}

impl NewContact {
    /// Materialize into a record with the given id and timestamp
    #[must_use]
    pub fn into_contact(self, id: i64, now: DateTime<Utc>) -> Contact {
        Contact {
            id,
            name: self.name,
            email: self.email,
            phone: self.phone,
            service: self.service,
            message: self.message,
            status: ContactStatus::default(),
            created_at: now,
        }
    }
}

/// Raw booking form payload. Every field is optional so that missing
/// fields become validation errors rather than deserialization errors.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AppointmentRequest {
    /// Client name (required)
    pub name: Option<String>,
    /// Client email (required)
    pub email: Option<String>,
    /// Client phone (required)
    pub phone: Option<String>,
    /// Requested service
    pub service: Option<String>,
    /// Preferred date
    pub date: Option<String>,
    /// Preferred time
    pub time: Option<String>,
    /// Free-form note
    pub message: Option<String>,
}

/// Raw contact form payload
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ContactRequest {
    /// Sender name (required)
    pub name: Option<String>,
    /// Sender email (required)
    pub email: Option<String>,
    /// Sender phone
    pub phone: Option<String>,
    /// Service the enquiry is about
    pub service: Option<String>,
    /// Enquiry text (required)
    pub message: Option<String>,
}

/// Body of a status update call
#[derive(Debug, Clone, Default, Deserialize)]
pub struct StatusUpdateRequest {
    /// New status, one of [`AppointmentStatus::ALL`]
    pub status: Option<String>,
}

/// An entry in the studio's service catalogue
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Service {
    /// Catalogue identifier
    pub id: i64,
    /// Display name
    pub name: String,
    /// Short description
    pub description: String,
    /// Bullet points shown with the service
    pub features: Vec<String>,
    /// Price as displayed, e.g. "₹2000/session"
    pub price: String,
    /// Session length as displayed
    pub duration: String,
    /// Whether the service is offered
    pub active: bool,
}

/// Record counts reported by a backend
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct StoreStats {
    /// Stored appointments
    pub appointments: usize,
    /// Stored contact submissions
    pub contacts: usize,
}
