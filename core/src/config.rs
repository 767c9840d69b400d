//! Adapter-wide configuration.

use std::time::Duration;

/// Timeout applied when neither the caller nor the config sets one.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_millis(7000);

/// Compatibility switches and defaults shared by every sync call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AdapterConfig {
    /// Encode bodies as an HTML form (`model[...]` keys) instead of JSON.
    pub emulate_json: bool,
    /// Send PUT/DELETE as POST with an `X-HTTP-Method-Override` header.
    pub emulate_http: bool,
    /// Request timeout used when the caller does not pass one.
    pub default_timeout: Duration,
}

impl AdapterConfig {
    pub fn new() -> Self {
        Self {
            emulate_json: false,
            emulate_http: false,
            default_timeout: DEFAULT_TIMEOUT,
        }
    }

    /// Sets the form-encoding emulation flag.
    pub fn with_emulate_json(mut self, enabled: bool) -> Self {
        self.emulate_json = enabled;
        self
    }

    /// Sets the method-override emulation flag.
    pub fn with_emulate_http(mut self, enabled: bool) -> Self {
        self.emulate_http = enabled;
        self
    }

    /// Sets the default request timeout.
    pub fn with_default_timeout(mut self, timeout: Duration) -> Self {
        self.default_timeout = timeout;
        self
    }
}

impl Default for AdapterConfig {
    fn default() -> Self {
        Self::new()
    }
}
