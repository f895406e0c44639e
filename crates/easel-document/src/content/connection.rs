//! Connection content: a database connection definition
//!
//! Connections are validated locally before any save attempt; a failing
//! validation blocks the publish and never reaches the backend.

use crate::error::DocumentError;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// Supported database drivers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConnectionDriver {
    Postgres,
    Mysql,
    Sqlite,
    Bigquery,
}

impl ConnectionDriver {
    /// Whether this driver connects over the network (host required)
    #[inline]
    #[must_use]
    pub const fn is_networked(self) -> bool {
        matches!(self, Self::Postgres | Self::Mysql)
    }
}

/// Content payload of a connection document
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConnectionContent {
    /// Database driver
    pub driver: ConnectionDriver,
    /// Hostname for networked drivers
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub host: Option<String>,
    /// Port for networked drivers; `None` = driver default
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub port: Option<u16>,
    /// Database name, or file path for sqlite
    pub database: String,
    /// Login user for networked drivers
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,
    /// Driver-specific options, order-preserving
    #[serde(default, skip_serializing_if = "IndexMap::is_empty")]
    pub options: IndexMap<String, String>,
}

impl ConnectionContent {
    /// Typed validation before merge or save
    ///
    /// # Errors
    /// Returns a validation error for missing required fields
    pub fn validate(&self) -> Result<(), DocumentError> {
        if self.database.trim().is_empty() {
            return Err(DocumentError::validation("database must not be empty"));
        }
        if self.driver.is_networked() {
            match &self.host {
                Some(host) if !host.trim().is_empty() => {}
                _ => {
                    return Err(DocumentError::validation(format!(
                        "{:?} connections require a host",
                        self.driver
                    )
                    .to_lowercase()))
                }
            }
        }
        if self.port == Some(0) {
            return Err(DocumentError::validation("port must be non-zero"));
        }
        Ok(())
    }
}
