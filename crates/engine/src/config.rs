//! Backend configuration via `recordkeeper.toml`
//!
//! One file holds the connection target, history naming, and the archive
//! time zone. On first start a commented default file is written. To change
//! settings, edit the file and restart.

use std::path::{Path, PathBuf};
use std::time::Duration;

use recordkeeper_core::{
    ArchiveZone, ArchiveZoneError, ConnectOptions, Credentials, DEFAULT_TIME_ZONE,
    DEFAULT_ZONE_LABEL,
};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::history::DEFAULT_UNKNOWN_ACTOR;

/// Config file name looked up in the working directory.
pub const CONFIG_FILE_NAME: &str = "recordkeeper.toml";

/// Suffix appended to a collection name to get its history collection.
pub const DEFAULT_HISTORY_SUFFIX: &str = "_history";

/// Connection scheme that selects the in-process store
pub const MEMORY_SCHEME: &str = "memory";

/// Configuration errors
#[derive(Debug, Error)]
pub enum ConfigError {
    /// File could not be read
    #[error("failed to read config file '{}': {source}", path.display())]
    Read {
        /// Config path
        path: PathBuf,
        /// IO failure
        #[source]
        source: std::io::Error,
    },

    /// File is not valid TOML for this schema
    #[error("failed to parse config file '{}': {reason}", path.display())]
    Parse {
        /// Config path
        path: PathBuf,
        /// Parser message
        reason: String,
    },

    /// File could not be written
    #[error("failed to write config file '{}': {source}", path.display())]
    Write {
        /// Config path
        path: PathBuf,
        /// IO failure
        #[source]
        source: std::io::Error,
    },

    /// Config could not be rendered as TOML
    #[error("failed to serialize config: {0}")]
    Serialize(String),

    /// `max_pool_size` is zero
    #[error("connection.max_pool_size must be at least 1")]
    ZeroPoolSize,

    /// A required text setting is empty
    #[error("{field} cannot be empty")]
    EmptyField {
        /// Dotted setting name
        field: &'static str,
    },

    /// Archive zone settings are out of range
    #[error("invalid archive zone: {0}")]
    ArchiveZone(#[from] ArchiveZoneError),
}

/// `[connection]` section
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct ConnectionConfig {
    /// URI scheme (default: `mongodb+srv`)
    pub scheme: String,
    /// Cluster host name
    pub host: String,
    /// Database holding the record collections
    pub database: String,
    /// Pool upper bound (default: 10)
    pub max_pool_size: u32,
    /// Server selection timeout in milliseconds (default: 5000)
    pub server_selection_timeout_ms: u64,
    /// Socket timeout in milliseconds (default: 45000)
    pub socket_timeout_ms: u64,
}

impl Default for ConnectionConfig {
    fn default() -> Self {
        Self {
            scheme: "mongodb+srv".to_string(),
            host: "cluster.example.net".to_string(),
            database: "records".to_string(),
            max_pool_size: 10,
            server_selection_timeout_ms: 5000,
            socket_timeout_ms: 45000,
        }
    }
}

/// `[history]` section
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct HistoryConfig {
    /// Appended to a collection name when no history collection is given
    pub collection_suffix: String,
    /// Written to `archived_by` when the operator is unknown
    pub unknown_actor: String,
}

impl Default for HistoryConfig {
    fn default() -> Self {
        Self {
            collection_suffix: DEFAULT_HISTORY_SUFFIX.to_string(),
            unknown_actor: DEFAULT_UNKNOWN_ACTOR.to_string(),
        }
    }
}

/// `[archive]` section
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct ArchiveConfig {
    /// IANA zone for archival times (default: `Australia/Sydney`)
    pub time_zone: String,
    /// Fixed offset east of UTC in minutes; overrides `time_zone` when set
    #[serde(skip_serializing_if = "Option::is_none")]
    pub utc_offset_minutes: Option<i32>,
    /// Label appended to archival times (default: `AEST`)
    pub zone_label: String,
}

impl Default for ArchiveConfig {
    fn default() -> Self {
        Self {
            time_zone: DEFAULT_TIME_ZONE.to_string(),
            utc_offset_minutes: None,
            zone_label: DEFAULT_ZONE_LABEL.to_string(),
        }
    }
}

/// `[memory]` section: accounts for the in-process store
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct MemoryConfig {
    /// Accepted credential pairs
    pub accounts: Vec<Credentials>,
}

impl MemoryConfig {
    fn is_empty(&self) -> bool {
        self.accounts.is_empty()
    }
}

/// Backend configuration loaded from `recordkeeper.toml`.
///
/// # Example
///
/// ```toml
/// [connection]
/// host = "cluster0.example.net"
/// database = "inventory"
///
/// [archive]
/// time_zone = "Australia/Sydney"
/// zone_label = "AEST"
/// ```
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct EditorConfig {
    /// Connection target and pool settings
    #[serde(default)]
    pub connection: ConnectionConfig,
    /// History naming
    #[serde(default)]
    pub history: HistoryConfig,
    /// Archive time zone
    #[serde(default)]
    pub archive: ArchiveConfig,
    /// In-process store accounts
    #[serde(default, skip_serializing_if = "MemoryConfig::is_empty")]
    pub memory: MemoryConfig,
}

impl EditorConfig {
    /// Whether the connection targets the in-process store
    pub fn uses_memory_store(&self) -> bool {
        self.connection.scheme == MEMORY_SCHEME
    }

    /// Returns the default config file content with comments.
    pub fn default_toml() -> &'static str {
        r#"# recordkeeper configuration

[connection]
# Connection string is <scheme>://<user>:<password>@<host>/
# scheme = "memory" serves from the in-process store instead
scheme = "mongodb+srv"
host = "cluster.example.net"
database = "records"
max_pool_size = 10
server_selection_timeout_ms = 5000
socket_timeout_ms = 45000

[history]
# History collection used when a save names none: <collection><suffix>
collection_suffix = "_history"
# Written to archived_by when the operator is not known
unknown_actor = "unknown"

[archive]
# Archival times are rendered as wall-clock time in this zone
time_zone = "Australia/Sydney"
zone_label = "AEST"
# A fixed offset east of UTC, in minutes, overrides time_zone
# utc_offset_minutes = 600

# Accounts for the in-process store (scheme = "memory").
# [[memory.accounts]]
# username = "operator"
# password = "secret"
"#
    }

    /// Check settings that parsing alone cannot.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` for a zero pool size, an empty host or
    /// database, or an out-of-range archive zone.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.connection.max_pool_size == 0 {
            return Err(ConfigError::ZeroPoolSize);
        }
        if self.connection.host.is_empty() {
            return Err(ConfigError::EmptyField {
                field: "connection.host",
            });
        }
        if self.connection.database.is_empty() {
            return Err(ConfigError::EmptyField {
                field: "connection.database",
            });
        }
        self.archive_zone()?;
        Ok(())
    }

    /// Read and parse config from a file path.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read, parsed, or validated.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let config: EditorConfig = toml::from_str(&content).map_err(|e| ConfigError::Parse {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;
        config.validate()?;
        Ok(config)
    }

    /// Write the default config file if it does not already exist.
    ///
    /// Returns `Ok(())` whether the file was created or already existed.
    pub fn write_default_if_missing(path: &Path) -> Result<(), ConfigError> {
        if !path.exists() {
            std::fs::write(path, Self::default_toml()).map_err(|source| ConfigError::Write {
                path: path.to_path_buf(),
                source,
            })?;
        }
        Ok(())
    }

    /// Serialize this config to TOML and write it to the given path.
    pub fn write_to_file(&self, path: &Path) -> Result<(), ConfigError> {
        let content =
            toml::to_string_pretty(self).map_err(|e| ConfigError::Serialize(e.to_string()))?;
        std::fs::write(path, content).map_err(|source| ConfigError::Write {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Connection settings for a [`Connector`](recordkeeper_core::Connector)
    pub fn connect_options(&self) -> ConnectOptions {
        ConnectOptions {
            scheme: self.connection.scheme.clone(),
            host: self.connection.host.clone(),
            database: self.connection.database.clone(),
            max_pool_size: self.connection.max_pool_size,
            server_selection_timeout: Duration::from_millis(
                self.connection.server_selection_timeout_ms,
            ),
            socket_timeout: Duration::from_millis(self.connection.socket_timeout_ms),
        }
    }

    /// Zone used to render archival times
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::ArchiveZone` if the zone, offset or label is
    /// invalid.
    pub fn archive_zone(&self) -> Result<ArchiveZone, ConfigError> {
        let label = self.archive.zone_label.clone();
        let zone = match self.archive.utc_offset_minutes {
            Some(minutes) => ArchiveZone::fixed(minutes, label)?,
            None => ArchiveZone::named(&self.archive.time_zone, label)?,
        };
        Ok(zone)
    }

    /// History collection for `collection` when none is given
    pub fn history_collection_for(&self, collection: &str) -> String {
        format!("{}{}", collection, self.history.collection_suffix)
    }
}
