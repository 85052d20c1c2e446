use std::sync::Arc;
use std::time::Duration;

use crate::auth::{authenticate, build_allowed_key_set, AllowedClientKeys};
use crate::config::{AppConfig, ConfigError};
use crate::engine::MessageEngine;
use crate::error::MockError;
use crate::routing::dispatch::normalize_base_path;

/// Shared application state accessible to all handlers.
pub struct AppState {
    pub config: AppConfig,
    pub engine: MessageEngine,
    base_path: Arc<str>,
    allowed_client_keys: AllowedClientKeys,
}

impl AppState {
    #[must_use]
    pub fn new(config: AppConfig, engine: MessageEngine) -> Self {
        let allowed_client_keys = build_allowed_key_set(&config);
        let base_path = Arc::from(normalize_base_path(&config.server.base_path));
        Self {
            config,
            engine,
            base_path,
            allowed_client_keys,
        }
    }

    /// Build the catalog described by `config` and wrap it in a fresh engine.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Validation`] when a model entry is invalid.
    pub fn from_config(config: AppConfig) -> Result<Self, ConfigError> {
        let catalog = Arc::new(config.build_catalog()?);
        Ok(Self::new(config, MessageEngine::new(catalog)))
    }

    /// Normalized `server.base_path` (empty when unset).
    #[must_use]
    pub fn base_path(&self) -> Arc<str> {
        Arc::clone(&self.base_path)
    }

    #[must_use]
    pub fn auth_enabled(&self) -> bool {
        self.allowed_client_keys.is_enabled()
    }

    /// Pause between streamed events, if configured.
    #[must_use]
    pub fn stream_event_delay(&self) -> Option<Duration> {
        match self.config.server.stream_event_delay_ms {
            0 => None,
            ms => Some(Duration::from_millis(ms)),
        }
    }

    /// Authenticate a request using the prebuilt key index.
    ///
    /// # Errors
    ///
    /// Returns `MockError::Auth` when the API key is missing or invalid.
    pub fn authenticate(&self, headers: &http::HeaderMap) -> Result<(), MockError> {
        authenticate(headers, &self.allowed_client_keys)
    }
}
