//! Application State
//!
//! Shared state across all handlers.

use chrono::{FixedOffset, Local, Offset};
use parking_lot::RwLock;
use std::sync::Arc;

use kam_leads_config::{load_settings, Settings};
use kam_leads_core::{Clock, Store, SystemClock};
use kam_leads_engine::{ContactBook, KamDirectory, LeadLifecycle, PerformanceEngine};
use kam_leads_persistence::InMemoryStore;

/// Application state
#[derive(Clone)]
pub struct AppState {
    /// Configuration wrapped in RwLock for hot-reload support
    pub config: Arc<RwLock<Settings>>,
    pub performance: Arc<PerformanceEngine>,
    pub leads: Arc<LeadLifecycle>,
    pub kams: Arc<KamDirectory>,
    pub contacts: Arc<ContactBook>,
    /// Environment name for config reload
    env: Option<String>,
}

impl AppState {
    /// In-memory store and the system clock
    pub fn new(config: Settings) -> Self {
        Self::with_store(config, Arc::new(InMemoryStore::new()), Arc::new(SystemClock))
    }

    /// Wire every engine to one backing store
    pub fn with_store<S: Store + 'static>(
        config: Settings,
        store: Arc<S>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        let day_offset = day_offset(config.scheduling.utc_offset_minutes);
        tracing::debug!(%day_offset, "Call queue day offset");

        Self {
            performance: Arc::new(PerformanceEngine::new(store.clone(), clock.clone())),
            leads: Arc::new(LeadLifecycle::new(
                store.clone(),
                store.clone(),
                clock.clone(),
                day_offset,
            )),
            kams: Arc::new(KamDirectory::new(store.clone(), store.clone(), clock.clone())),
            contacts: Arc::new(ContactBook::new(store.clone(), store, clock)),
            config: Arc::new(RwLock::new(config)),
            env: None,
        }
    }

    /// Set environment name for config reload
    pub fn with_env(mut self, env: Option<String>) -> Self {
        self.env = env;
        self
    }

    /// Reload configuration from files
    ///
    /// Engines are wired at startup, so the store and the day offset keep
    /// their original values; ranking defaults and log settings apply at once.
    pub fn reload_config(&self) -> Result<(), String> {
        let new_config = load_settings(self.env.as_deref())
            .map_err(|e| format!("Failed to reload config: {}", e))?;

        let mut config = self.config.write();
        *config = new_config;

        tracing::info!("Configuration reloaded successfully");
        Ok(())
    }

    /// Get a read guard to the current configuration
    pub fn get_config(&self) -> parking_lot::RwLockReadGuard<'_, Settings> {
        self.config.read()
    }
}

/// Configured offset, or the host's local offset when unset
fn day_offset(utc_offset_minutes: Option<i32>) -> FixedOffset {
    utc_offset_minutes
        .and_then(|minutes| FixedOffset::east_opt(minutes * 60))
        .unwrap_or_else(|| Local::now().offset().fix())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_configured_offset() {
        assert_eq!(day_offset(Some(330)).local_minus_utc(), 330 * 60);
        assert_eq!(day_offset(Some(-240)).local_minus_utc(), -240 * 60);
    }

    #[test]
    fn test_new_state_uses_settings() {
        let mut settings = Settings::default();
        settings.ranking.default_count = 5;
        let state = AppState::new(settings);
        assert_eq!(state.get_config().ranking.default_count, 5);
    }
}
