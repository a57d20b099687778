use std::path::Path;
use std::time::Duration;

use anyhow::Result;
use config::{Config, Environment, File};
use serde::{Deserialize, Serialize};

use crate::db::DbOptions;
use crate::validation::InputValidator;

/// Application configuration structure
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// Listen address
    pub server: ServerConfig,
    /// Store selection and pool settings
    pub storage: StorageConfig,
    /// Log level, format and optional file
    pub logging: LoggingConfig,
    /// Admin surface settings
    pub admin: AdminConfig,
    /// Public business metadata
    pub business: BusinessInfo,
}

/// HTTP listener settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Bind address
    pub host: String,
    /// Listen port, overridden by `PORT`
    pub port: u16,
}

/// Which store the service tries first
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StorageBackend {
    /// SQLite durable store with in-memory fallback
    Sqlite,
    /// In-memory only
    Memory,
}

/// Storage backend and connection settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorageConfig {
    /// Store tried first
    pub backend: StorageBackend,
    /// SQLite URL, overridden by `DATABASE_URL`
    pub database_url: String,
    /// Pool size
    pub max_connections: u32,
    /// Startup connection and pool checkout bound, in seconds
    pub connection_timeout_secs: u64,
}

impl StorageConfig {
    /// Bound on the startup connection attempt
    #[must_use]
    pub const fn connection_timeout(&self) -> Duration {
        Duration::from_secs(self.connection_timeout_secs)
    }

    /// Pool options for the SQLite backend
    #[must_use]
    pub const fn db_options(&self) -> DbOptions {
        DbOptions {
            max_connections: self.max_connections,
            connection_timeout: self.connection_timeout(),
        }
    }
}

/// Logging settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Default filter when `RUST_LOG` is unset
    pub level: String,
    /// Daily-rolling JSON log file, if any
    pub file_path: Option<String>,
    /// Console format, "json" or "text"
    pub format: String,
}

/// Admin surface settings. With no token the admin routes are open.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AdminConfig {
    /// Bearer token for admin routes, overridden by `ADMIN_TOKEN`
    pub token: Option<String>,
}

/// Public business metadata served by `/api/info`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BusinessInfo {
    /// Business name
    pub name: String,
    /// One-line tagline
    pub tagline: String,
    /// Public phone number
    pub phone: String,
    /// Public email address
    pub email: String,
    /// Street address
    pub address: String,
    /// Opening hours
    pub hours: String,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            server: ServerConfig {
                host: "0.0.0.0".to_string(),
                port: 5000,
            },
            storage: StorageConfig {
                backend: StorageBackend::Sqlite,
                database_url: "sqlite:data/fitness_art.db".to_string(),
                max_connections: 8,
                connection_timeout_secs: 5,
            },
            logging: LoggingConfig {
                level: "info".to_string(),
                file_path: None,
                format: "text".to_string(),
            },
            admin: AdminConfig::default(),
            business: BusinessInfo {
                name: "Dr. Anand's Fitness Art".to_string(),
                tagline: "Fitness, Nutrition & Healing".to_string(),
                phone: "+91-99999-99999".to_string(),
                email: "info@dranandfitness.com".to_string(),
                address: "123 Fitness Street, Health City".to_string(),
                hours: "Mon-Fri: 5AM-10PM, Sat-Sun: 6AM-8PM".to_string(),
            },
        }
    }
}

impl AppConfig {
    /// Load configuration from multiple sources with precedence:
    /// defaults, `config/default.*`, `config/local.*`, the explicit file,
    /// `STUDIO_*` variables, then the conventional `DATABASE_URL`, `PORT`
    /// and `ADMIN_TOKEN` variables.
    pub fn load(explicit_file: Option<&Path>) -> Result<Self> {
        let mut builder = Config::builder()
            // Start with default values
            .add_source(Config::try_from(&Self::default())?)
            // Add config files if they exist
            .add_source(File::with_name("config/default").required(false))
            .add_source(File::with_name("config/local").required(false));

        if let Some(path) = explicit_file {
            builder = builder.add_source(File::from(path).required(true));
        }

        let config = builder
            // e.g. STUDIO_SERVER__PORT=8080
            .add_source(
                Environment::with_prefix("STUDIO")
                    .prefix_separator("_")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()
            .map_err(|e| anyhow::anyhow!("Failed to load configuration: {}", e))?;

        let mut app_config: Self = config
            .try_deserialize()
            .map_err(|e| anyhow::anyhow!("Failed to deserialize configuration: {}", e))?;

        app_config.apply_overrides(|key| std::env::var(key).ok())?;

        // Validate configuration
        app_config.validate()?;

        Ok(app_config)
    }

    /// Apply the conventional unprefixed variables through `lookup`
    pub fn apply_overrides<F>(&mut self, lookup: F) -> Result<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(url) = lookup("DATABASE_URL") {
            self.storage.database_url = url;
        }

        if let Some(port) = lookup("PORT") {
            self.server.port = port
                .trim()
                .parse()
                .map_err(|_| anyhow::anyhow!("PORT must be a valid u16, got '{port}'"))?;
        }

        if let Some(token) = lookup("ADMIN_TOKEN") {
            self.admin.token = Some(token);
        }

        Ok(())
    }

    /// Validate configuration values
    pub fn validate(&self) -> Result<()> {
        if self.server.port == 0 {
            return Err(anyhow::anyhow!("server.port must be greater than 0"));
        }

        // Validate storage config
        if self.storage.backend == StorageBackend::Sqlite {
            InputValidator::validate_database_url(&self.storage.database_url)
                .map_err(|e| anyhow::anyhow!("Invalid storage.database_url: {e}"))?;
        }
        if self.storage.max_connections == 0 {
            return Err(anyhow::anyhow!("max_connections must be greater than 0"));
        }
        if self.storage.connection_timeout_secs == 0 {
            return Err(anyhow::anyhow!("connection_timeout_secs must be greater than 0"));
        }

        // Validate logging config
        let valid_levels = ["trace", "debug", "info", "warn", "error"];
        if !valid_levels.contains(&self.logging.level.as_str()) {
            return Err(anyhow::anyhow!(
                "Invalid log level: {}. Must be one of: {:?}",
                self.logging.level,
                valid_levels
            ));
        }

        let valid_formats = ["text", "json"];
        if !valid_formats.contains(&self.logging.format.as_str()) {
            return Err(anyhow::anyhow!(
                "Invalid log format: {}. Must be one of: {:?}",
                self.logging.format,
                valid_formats
            ));
        }

        if let Some(token) = &self.admin.token {
            if token.trim().is_empty() {
                return Err(anyhow::anyhow!("admin.token cannot be empty when set"));
            }
        }

        Ok(())
    }

    /// Get log level from environment or config
    #[must_use]
    pub fn get_log_level(&self) -> String {
        std::env::var("RUST_LOG").unwrap_or_else(|_| self.logging.level.clone())
    }

    /// Socket address string to bind
    #[must_use]
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }
}
