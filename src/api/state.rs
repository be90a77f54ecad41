//! Application state for the HRMS Engine API.

use std::sync::Arc;

use crate::config::{ConfigLoader, EngineConfig};

/// Shared application state.
///
/// Holds the loaded policies. Handlers only read from it; there is no
/// mutable shared state.
#[derive(Clone)]
pub struct AppState {
    config: Arc<ConfigLoader>,
}

impl AppState {
    /// Creates a new application state with the given configuration loader.
    pub fn new(config: ConfigLoader) -> Self {
        Self {
            config: Arc::new(config),
        }
    }

    /// Returns the loaded engine configuration.
    pub fn config(&self) -> &EngineConfig {
        self.config.config()
    }
}

impl Default for AppState {
    /// State with built-in default policies.
    fn default() -> Self {
        Self::new(ConfigLoader::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_app_state_is_clone() {
        fn assert_clone<T: Clone>() {}
        assert_clone::<AppState>();
    }

    #[test]
    fn test_default_state_uses_default_policies() {
        let state = AppState::default();
        assert_eq!(state.config(), &EngineConfig::default());
    }
}
