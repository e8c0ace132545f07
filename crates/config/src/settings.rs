//! Main settings module

use config::{Config, Environment, File};
use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::constants::{env, persistence, ranking, scheduling, server};
use crate::ConfigError;

/// Runtime environment
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum RuntimeEnvironment {
    /// Development mode
    #[default]
    Development,
    /// Staging mode
    Staging,
    /// Production mode - warns when CORS origins are missing
    Production,
}

impl RuntimeEnvironment {
    pub fn is_production(&self) -> bool {
        matches!(self, Self::Production)
    }
}

/// Main application settings
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Settings {
    #[serde(default)]
    pub environment: RuntimeEnvironment,

    /// HTTP boundary
    #[serde(default)]
    pub server: ServerConfig,

    /// Backing store selection
    #[serde(default)]
    pub persistence: PersistenceConfig,

    /// KAM ranking defaults
    #[serde(default)]
    pub ranking: RankingConfig,

    /// Definition of the local day for the call queue
    #[serde(default)]
    pub scheduling: SchedulingConfig,

    #[serde(default)]
    pub observability: ObservabilityConfig,
}

/// Server configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// HTTP server host
    #[serde(default = "default_host")]
    pub host: String,

    /// HTTP server port
    #[serde(default = "default_port")]
    pub port: u16,

    /// Request timeout in seconds
    #[serde(default = "default_timeout")]
    pub timeout_seconds: u64,

    /// Enable CORS
    #[serde(default = "default_true")]
    pub cors_enabled: bool,

    /// CORS allowed origins; empty falls back to http://localhost:3000
    #[serde(default)]
    pub cors_origins: Vec<String>,
}

fn default_host() -> String {
    server::DEFAULT_HOST.to_string()
}
fn default_port() -> u16 {
    server::DEFAULT_PORT
}
fn default_timeout() -> u64 {
    server::DEFAULT_TIMEOUT_SECONDS
}
fn default_true() -> bool {
    true
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            timeout_seconds: default_timeout(),
            cors_enabled: default_true(),
            cors_origins: Vec::new(),
        }
    }
}

/// Persistence configuration for ScyllaDB
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PersistenceConfig {
    /// Enable ScyllaDB persistence (false = in-memory only)
    #[serde(default)]
    pub enabled: bool,

    /// ScyllaDB host addresses
    #[serde(default = "default_scylla_hosts")]
    pub scylla_hosts: Vec<String>,

    /// ScyllaDB keyspace name
    #[serde(default = "default_scylla_keyspace")]
    pub keyspace: String,

    /// ScyllaDB replication factor
    #[serde(default = "default_replication_factor")]
    pub replication_factor: u8,
}

fn default_scylla_hosts() -> Vec<String> {
    std::env::var(persistence::HOSTS_ENV)
        .map(|s| {
            s.split(',')
                .map(|h| h.trim().to_string())
                .filter(|h| !h.is_empty())
                .collect()
        })
        .unwrap_or_else(|_| vec![persistence::DEFAULT_SCYLLA_HOST.to_string()])
}

fn default_scylla_keyspace() -> String {
    std::env::var(persistence::KEYSPACE_ENV)
        .unwrap_or_else(|_| persistence::DEFAULT_KEYSPACE.to_string())
}

fn default_replication_factor() -> u8 {
    persistence::DEFAULT_REPLICATION_FACTOR
}

impl Default for PersistenceConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            scylla_hosts: default_scylla_hosts(),
            keyspace: default_scylla_keyspace(),
            replication_factor: default_replication_factor(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RankingConfig {
    /// Used by top/under-performing when the caller gives no count
    #[serde(default = "default_ranking_count")]
    pub default_count: usize,
}

fn default_ranking_count() -> usize {
    ranking::DEFAULT_COUNT
}

impl Default for RankingConfig {
    fn default() -> Self {
        Self {
            default_count: default_ranking_count(),
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SchedulingConfig {
    /// Offset from UTC, in minutes, that defines "today" for the call queue.
    /// Unset means the host's local offset at startup.
    #[serde(default)]
    pub utc_offset_minutes: Option<i32>,
}

/// Observability configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ObservabilityConfig {
    /// Log level
    #[serde(default = "default_log_level")]
    pub log_level: String,

    /// Enable JSON logging
    #[serde(default)]
    pub log_json: bool,

    /// Expose Prometheus metrics at /metrics
    #[serde(default = "default_true")]
    pub metrics_enabled: bool,
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
            log_json: false,
            metrics_enabled: true,
        }
    }
}

impl Settings {
    /// Validate settings
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.validate_server()?;
        self.validate_persistence()?;
        self.validate_ranking()?;
        self.validate_scheduling()?;
        Ok(())
    }

    fn validate_server(&self) -> Result<(), ConfigError> {
        let server = &self.server;

        if server.port == 0 {
            return Err(ConfigError::invalid("server.port", "Port cannot be 0"));
        }

        if server.timeout_seconds == 0 {
            return Err(ConfigError::invalid(
                "server.timeout_seconds",
                "Timeout must be at least 1 second",
            ));
        }

        if self.environment.is_production() && server.cors_enabled && server.cors_origins.is_empty()
        {
            tracing::warn!(
                "CORS is enabled in production but no origins are configured. \
                 Only http://localhost:3000 will be allowed."
            );
        }

        Ok(())
    }

    fn validate_persistence(&self) -> Result<(), ConfigError> {
        let persistence = &self.persistence;
        if !persistence.enabled {
            return Ok(());
        }

        if persistence.scylla_hosts.is_empty() {
            return Err(ConfigError::invalid(
                "persistence.scylla_hosts",
                "At least one host is required when persistence is enabled",
            ));
        }

        if persistence.replication_factor == 0 {
            return Err(ConfigError::invalid(
                "persistence.replication_factor",
                "Must be at least 1",
            ));
        }

        // The keyspace is interpolated into CQL statements
        let keyspace_ok = !persistence.keyspace.is_empty()
            && persistence
                .keyspace
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '_');
        if !keyspace_ok {
            return Err(ConfigError::invalid(
                "persistence.keyspace",
                format!(
                    "Must be non-empty and contain only letters, digits and '_', got {:?}",
                    persistence.keyspace
                ),
            ));
        }

        Ok(())
    }

    fn validate_ranking(&self) -> Result<(), ConfigError> {
        if self.ranking.default_count == 0 {
            return Err(ConfigError::invalid(
                "ranking.default_count",
                "Must be at least 1",
            ));
        }
        Ok(())
    }

    fn validate_scheduling(&self) -> Result<(), ConfigError> {
        if let Some(offset) = self.scheduling.utc_offset_minutes {
            let max = scheduling::MAX_UTC_OFFSET_MINUTES;
            if !(-max..=max).contains(&offset) {
                return Err(ConfigError::invalid(
                    "scheduling.utc_offset_minutes",
                    format!(
                        "Must be within +/-{} minutes, got {}",
                        scheduling::MAX_UTC_OFFSET_MINUTES,
                        offset
                    ),
                ));
            }
        }
        Ok(())
    }
}

/// Load settings from files and environment
///
/// Priority (highest to lowest):
/// 1. Environment variables (KAM_LEADS_ prefix)
/// 2. config/{env}.yaml (if env specified)
/// 3. config/default.yaml
pub fn load_settings(env: Option<&str>) -> Result<Settings, ConfigError> {
    load_settings_from(Path::new("config"), env)
}

/// Same as [`load_settings`], reading files from `dir` instead of `config/`
pub fn load_settings_from(dir: &Path, env_name: Option<&str>) -> Result<Settings, ConfigError> {
    let mut builder = Config::builder();

    builder = builder
        .add_source(File::with_name(&dir.join("default").to_string_lossy()).required(false));

    if let Some(env_name) = env_name {
        builder = builder
            .add_source(File::with_name(&dir.join(env_name).to_string_lossy()).required(false));
    }

    builder = builder.add_source(
        Environment::with_prefix(env::PREFIX)
            .separator("__")
            .list_separator(",")
            .with_list_parse_key("server.cors_origins")
            .with_list_parse_key("persistence.scylla_hosts")
            .try_parsing(true),
    );

    let config = builder.build()?;
    let settings: Settings = config.try_deserialize()?;

    settings.validate()?;

    tracing::debug!(
        environment = ?settings.environment,
        persistence = settings.persistence.enabled,
        "Settings loaded"
    );

    Ok(settings)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn test_default_settings() {
        let settings = Settings::default();
        assert_eq!(settings.server.port, 8080);
        assert_eq!(settings.server.timeout_seconds, 30);
        assert_eq!(settings.ranking.default_count, 3);
        assert!(!settings.persistence.enabled);
        assert!(settings.scheduling.utc_offset_minutes.is_none());
        assert!(settings.validate().is_ok());
    }

    #[test]
    fn test_server_validation() {
        let mut settings = Settings::default();

        settings.server.port = 0;
        assert!(settings.validate_server().is_err());
        settings.server.port = 8080;

        settings.server.timeout_seconds = 0;
        assert!(settings.validate_server().is_err());
        settings.server.timeout_seconds = 30;

        assert!(settings.validate_server().is_ok());
    }

    #[test]
    fn test_ranking_count_must_be_positive() {
        let mut settings = Settings::default();
        settings.ranking.default_count = 0;
        assert!(matches!(
            settings.validate(),
            Err(ConfigError::InvalidValue { ref field, .. }) if field == "ranking.default_count"
        ));
    }

    #[test]
    fn test_offset_bounds() {
        let mut settings = Settings::default();

        settings.scheduling.utc_offset_minutes = Some(330);
        assert!(settings.validate_scheduling().is_ok());

        settings.scheduling.utc_offset_minutes = Some(-18 * 60);
        assert!(settings.validate_scheduling().is_ok());

        settings.scheduling.utc_offset_minutes = Some(18 * 60 + 1);
        assert!(settings.validate_scheduling().is_err());

        for extreme in [i32::MIN, i32::MAX] {
            settings.scheduling.utc_offset_minutes = Some(extreme);
            assert!(settings.validate_scheduling().is_err());
        }
    }

    #[test]
    fn test_persistence_validation_only_when_enabled() {
        let mut settings = Settings::default();
        settings.persistence.keyspace = "kam-leads".to_string();
        assert!(settings.validate_persistence().is_ok());

        settings.persistence.enabled = true;
        assert!(settings.validate_persistence().is_err());

        settings.persistence.keyspace = "kam_leads".to_string();
        settings.persistence.scylla_hosts = vec!["10.0.0.5:9042".to_string()];
        assert!(settings.validate_persistence().is_ok());

        settings.persistence.replication_factor = 0;
        assert!(settings.validate_persistence().is_err());
    }

    #[test]
    fn test_load_from_files() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(
            dir.path().join("default.yaml"),
            "server:\n  port: 9000\nranking:\n  default_count: 5\n",
        )
        .unwrap();
        fs::write(
            dir.path().join("staging.yaml"),
            "environment: staging\nscheduling:\n  utc_offset_minutes: 330\n",
        )
        .unwrap();

        let settings = load_settings_from(dir.path(), Some("staging")).unwrap();
        assert_eq!(settings.server.port, 9000);
        assert_eq!(settings.ranking.default_count, 5);
        assert_eq!(settings.environment, RuntimeEnvironment::Staging);
        assert_eq!(settings.scheduling.utc_offset_minutes, Some(330));
        // Untouched sections keep their defaults
        assert_eq!(settings.server.timeout_seconds, 30);
    }

    #[test]
    fn test_load_rejects_invalid_file() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("default.yaml"), "ranking:\n  default_count: 0\n").unwrap();

        assert!(matches!(
            load_settings_from(dir.path(), None),
            Err(ConfigError::InvalidValue { .. })
        ));
    }

    #[test]
    fn test_missing_files_fall_back_to_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let settings = load_settings_from(dir.path(), Some("production")).unwrap();
        assert_eq!(settings.server.port, 8080);
    }

    #[test]
    fn test_shipped_config_files_load() {
        let dir = Path::new(env!("CARGO_MANIFEST_DIR")).join("../../config");

        let settings = load_settings_from(&dir, None).unwrap();
        assert!(!settings.persistence.enabled);
        assert_eq!(settings.server.cors_origins, vec!["http://localhost:3000"]);

        let production = load_settings_from(&dir, Some("production")).unwrap();
        assert!(production.environment.is_production());
        assert!(production.persistence.enabled);
        assert_eq!(production.persistence.replication_factor, 3);
    }

    #[test]
    fn test_settings_json_shape() {
        let json = serde_json::to_value(Settings::default()).unwrap();
        assert_eq!(json["environment"], "development");
        assert_eq!(json["ranking"]["default_count"], 3);
    }
}
