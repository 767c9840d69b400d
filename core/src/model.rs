//! Model handles: the caller-side view of a persisted entity type.
//!
//! The adapter only ever reads a handle's configuration and URL, and writes
//! back the resolved identifier field. It never owns or copies model data.

use std::sync::{Arc, OnceLock};

use crate::types::ModelConfiguration;

/// Capability object supplied by the data-model layer.
pub trait ModelHandle: Send + Sync {
    /// Model name, used in diagnostics and as the registry key.
    fn name(&self) -> &str;

    fn config(&self) -> &ModelConfiguration;

    /// URL the model can produce on its own, used when neither the options
    /// nor the configuration carry one.
    fn url(&self) -> Option<String> {
        None
    }

    /// Record the identifier field the adapter resolved for this model.
    fn bind_identifier_field(&self, field: &str);
}

/// Stock `ModelHandle` backed by a shared configuration.
#[derive(Debug)]
pub struct Model {
    name: String,
    config: Arc<ModelConfiguration>,
    url: Option<String>,
    identifier_field: OnceLock<String>,
}

impl Model {
    pub fn new(name: impl Into<String>, config: impl Into<Arc<ModelConfiguration>>) -> Self {
        Self {
            name: name.into(),
            config: config.into(),
            url: None,
            identifier_field: OnceLock::new(),
        }
    }

    /// Sets the model's own fallback URL.
    pub fn with_url(mut self, url: impl Into<String>) -> Self {
        self.url = Some(url.into());
        self
    }

    /// Identifier field bound by the adapter, if any sync or registration
    /// has happened yet.
    pub fn identifier_field(&self) -> Option<&str> {
        self.identifier_field.get().map(String::as_str)
    }

    pub fn shared_config(&self) -> &Arc<ModelConfiguration> {
        &self.config
    }
}

impl ModelHandle for Model {
    fn name(&self) -> &str {
        &self.name
    }

    fn config(&self) -> &ModelConfiguration {
        &self.config
    }

    fn url(&self) -> Option<String> {
        self.url.clone().filter(|url| !url.is_empty())
    }

    fn bind_identifier_field(&self, field: &str) {
        // Configuration is immutable, so every bind carries the same value.
        let _ = self.identifier_field.set(field.to_string());
    }
}
