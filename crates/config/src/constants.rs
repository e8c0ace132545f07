//! Default values shared by settings, the store and the HTTP boundary

/// HTTP server defaults
pub mod server {
    pub const DEFAULT_HOST: &str = "0.0.0.0";
    pub const DEFAULT_PORT: u16 = 8080;
    pub const DEFAULT_TIMEOUT_SECONDS: u64 = 30;
}

/// ScyllaDB defaults
pub mod persistence {
    pub const DEFAULT_SCYLLA_HOST: &str = "127.0.0.1:9042";
    pub const DEFAULT_KEYSPACE: &str = "kam_leads";
    pub const DEFAULT_REPLICATION_FACTOR: u8 = 1;

    /// Read when `persistence.scylla_hosts` is not configured
    pub const HOSTS_ENV: &str = "SCYLLA_HOSTS";
    pub const KEYSPACE_ENV: &str = "SCYLLA_KEYSPACE";
}

/// Ranking defaults
pub mod ranking {
    /// Entries returned by top/under-performing when no count is given
    pub const DEFAULT_COUNT: usize = 3;
}

/// Call scheduling limits
pub mod scheduling {
    /// Largest UTC offset accepted for the local day, in minutes (18 hours)
    pub const MAX_UTC_OFFSET_MINUTES: i32 = 18 * 60;
}

/// Environment variable names
pub mod env {
    /// Prefix for setting overrides, e.g. `KAM_LEADS_SERVER__PORT`
    pub const PREFIX: &str = "KAM_LEADS";
    /// Selects the `config/{env}` overlay
    pub const ENVIRONMENT: &str = "KAM_LEADS_ENV";
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_offset_limit_is_eighteen_hours() {
        assert_eq!(scheduling::MAX_UTC_OFFSET_MINUTES, 1080);
    }

    #[test]
    fn test_env_override_prefix() {
        assert!(env::ENVIRONMENT.starts_with(env::PREFIX));
    }
}
