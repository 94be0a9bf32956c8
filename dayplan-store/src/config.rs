//! Store configuration.

use std::time::Duration;

use serde::{Deserialize, Serialize};

fn default_database_name() -> String {
    "dayplan".to_string()
}

fn default_pool_size() -> u32 {
    10
}

fn default_min_pool_size() -> u32 {
    1
}

fn default_connect_timeout_secs() -> u64 {
    10
}

fn default_server_selection_timeout_secs() -> u64 {
    10
}

fn default_slow_op_threshold_ms() -> u64 {
    500
}

/// Configuration for the MongoDB store.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct StoreConfig {
    /// MongoDB connection URI
    /// Example: "mongodb://localhost:27017"
    pub uri: String,

    /// Database name
    #[serde(default = "default_database_name")]
    pub database_name: String,

    /// Connection pool size
    #[serde(default = "default_pool_size")]
    pub pool_size: u32,

    /// Minimum connection pool size
    #[serde(default = "default_min_pool_size")]
    pub min_pool_size: u32,

    /// MongoDB connect timeout in seconds
    #[serde(default = "default_connect_timeout_secs")]
    pub connect_timeout_secs: u64,

    /// MongoDB server selection timeout in seconds
    #[serde(default = "default_server_selection_timeout_secs")]
    pub server_selection_timeout_secs: u64,

    /// Operations at or above this duration are reported as slow
    #[serde(default = "default_slow_op_threshold_ms")]
    pub slow_op_threshold_ms: u64,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            uri: String::new(),
            database_name: default_database_name(),
            pool_size: default_pool_size(),
            min_pool_size: default_min_pool_size(),
            connect_timeout_secs: default_connect_timeout_secs(),
            server_selection_timeout_secs: default_server_selection_timeout_secs(),
            slow_op_threshold_ms: default_slow_op_threshold_ms(),
        }
    }
}

impl StoreConfig {
    /// Creates a new config with the given MongoDB URI.
    pub fn new(uri: impl Into<String>) -> Self {
        Self { uri: uri.into(), ..Default::default() }
    }

    /// Sets the database name.
    pub fn with_database(mut self, name: impl Into<String>) -> Self {
        self.database_name = name.into();
        self
    }

    /// Returns true if the config is valid for connecting.
    pub fn is_valid(&self) -> bool {
        !self.uri.is_empty()
    }

    pub fn slow_op_threshold(&self) -> Duration {
        Duration::from_millis(self.slow_op_threshold_ms)
    }
}
