use std::time::Duration;

/// Configuration for a [`crate::Picker`]
#[derive(Debug, Clone)]
pub struct PickerConfig {
    /// Timeout for establishing a WebSocket connection
    pub connect_timeout: Duration,
    /// Timeout for the discovery resource fetch
    pub request_timeout: Duration,
    /// Enable TCP_NODELAY on the connection socket
    pub nodelay: bool,
}

impl Default for PickerConfig {
    fn default() -> Self {
        Self {
            connect_timeout: Duration::from_secs(10),
            request_timeout: Duration::from_secs(10),
            nodelay: true,
        }
    }
}

impl PickerConfig {
    /// Create a new builder for configuration
    pub fn builder() -> PickerConfigBuilder {
        PickerConfigBuilder::default()
    }
}

/// Builder for PickerConfig
#[derive(Debug, Clone, Default)]
pub struct PickerConfigBuilder {
    config: PickerConfig,
}

impl PickerConfigBuilder {
    /// Set the WebSocket connect timeout
    pub fn connect_timeout(mut self, timeout: Duration) -> Self {
        self.config.connect_timeout = timeout;
        self
    }

    /// Set the discovery fetch timeout
    pub fn request_timeout(mut self, timeout: Duration) -> Self {
        self.config.request_timeout = timeout;
        self
    }

    /// Enable or disable TCP_NODELAY
    pub fn nodelay(mut self, enabled: bool) -> Self {
        self.config.nodelay = enabled;
        self
    }

    /// Build the configuration with validation.
    ///
    /// Returns an error for invalid configurations (e.g., zero timeouts).
    pub fn build(self) -> Result<PickerConfig, ConfigError> {
        if self.config.connect_timeout.is_zero() {
            return Err(ConfigError::InvalidTimeout(
                "connect_timeout cannot be zero".to_string(),
            ));
        }

        if self.config.request_timeout.is_zero() {
            return Err(ConfigError::InvalidTimeout(
                "request_timeout cannot be zero".to_string(),
            ));
        }

        Ok(self.config)
    }
}

/// Configuration validation errors
#[derive(Debug, Clone, thiserror::Error)]
pub enum ConfigError {
    /// Invalid timeout configuration
    #[error("Invalid timeout configuration: {0}")]
    InvalidTimeout(String),
}
