//! Configuration management for NetStack.
//!
//! All configuration is driven by environment variables.

use crate::types::AwsRegion;

/// Global configuration for NetStack.
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NetStackConfig {
    /// Default AWS region.
    pub default_region: AwsRegion,
    /// Log level.
    pub log_level: String,
    /// Whether parameter-store persistence is enabled.
    pub persistence: bool,
    /// Data directory for persisted state.
    pub data_dir: String,
}

impl Default for NetStackConfig {
    fn default() -> Self {
        Self {
            default_region: AwsRegion::default(),
            log_level: "info".to_owned(),
            persistence: false,
            data_dir: "/var/lib/netstack".to_owned(),
        }
    }
}

impl NetStackConfig {
    /// Load configuration from environment variables.
    #[must_use]
    pub fn from_env() -> Self {
        let mut config = Self::default();

        if let Ok(v) = std::env::var("DEFAULT_REGION") {
            config.default_region = AwsRegion::new(v);
        }
        if let Ok(v) = std::env::var("LOG_LEVEL") {
            config.log_level = v;
        }
        if let Ok(v) = std::env::var("PERSISTENCE") {
            config.persistence = v == "1" || v.eq_ignore_ascii_case("true");
        }
        if let Ok(v) = std::env::var("DATA_DIR") {
            config.data_dir = v;
        }

        config
    }
}
