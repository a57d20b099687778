//! Studio Booking - appointment and contact backend
//!
//! An HTTP JSON service for a small studio's public website: clients book
//! appointments and send contact messages, staff review them through the
//! admin endpoints and dashboard.
//!
//! # Features
//!
//! - Appointment booking with a flat status lifecycle
//! - Contact-form intake
//! - SQLite durable store with a one-way fallback to process memory
//! - Bearer-token guard on the admin surface
//! - Layered configuration and structured logging

/// Admin HTML dashboard
pub mod admin;
/// Seed service catalogue
pub mod catalog;
/// Configuration management
pub mod config;
/// Database operations and connection pooling
pub mod db;
/// Error types
pub mod error;
/// Logging setup
pub mod logging;
/// Metrics collection
pub mod metrics;
/// Data models and structures
pub mod models;
/// Repository pattern for data access
pub mod repository;
/// HTTP handlers
pub mod routes;
/// Database schema definitions
pub mod schema;
/// Router, admin guard and server lifecycle
pub mod server;
/// Booking service with storage fallback
pub mod service;
/// Input validation and sanitization
pub mod validation;

// Re-export key components for easier access
pub use config::AppConfig;
pub use db::Database;
pub use error::{AppError, StorageError};
pub use models::{Appointment, AppointmentStatus, Contact, Service};
pub use repository::{MemoryRepository, Repository, SqliteRepository};
pub use server::{build_router, AppState};
pub use service::BookingService;
