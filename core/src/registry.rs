//! Configuration Registry: per-model configuration and handles by name.
//!
//! # Design
//! Entries are insertion-only. The first registration for a name wins and
//! every later registration returns the cached `Arc`, so callers that define
//! the same model twice share one handle. Writes happen at model-definition
//! time; the steady state is read-only, which is why a `RwLock` is enough.

use std::collections::HashMap;
use std::sync::Arc;

use parking_lot::RwLock;
use tracing::debug;

use crate::model::ModelHandle;
use crate::types::ModelConfiguration;

/// Process-wide table of model configurations and handles.
#[derive(Default)]
pub struct ModelRegistry {
    configs: RwLock<HashMap<String, Arc<ModelConfiguration>>>,
    handles: RwLock<HashMap<String, Arc<dyn ModelHandle>>>,
}

impl ModelRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store `config` under `name`, or return the configuration already
    /// registered for it.
    pub fn register_config(&self, name: &str, config: ModelConfiguration) -> Arc<ModelConfiguration> {
        let mut configs = self.configs.write();
        if let Some(existing) = configs.get(name) {
            debug!(model = name, "model configuration already registered");
            return Arc::clone(existing);
        }
        let config = Arc::new(config);
        configs.insert(name.to_string(), Arc::clone(&config));
        debug!(model = name, "registered model configuration");
        config
    }

    /// Cache `handle` under `name` after binding its identifier field, or
    /// return the handle already cached for that name untouched.
    pub fn register_handle(&self, name: &str, handle: Arc<dyn ModelHandle>) -> Arc<dyn ModelHandle> {
        let mut handles = self.handles.write();
        if let Some(existing) = handles.get(name) {
            return Arc::clone(existing);
        }
        handle.bind_identifier_field(handle.config().identifier_field());
        handles.insert(name.to_string(), Arc::clone(&handle));
        debug!(
            model = name,
            identifier_field = handle.config().identifier_field(),
            "registered model handle"
        );
        handle
    }

    pub fn config(&self, name: &str) -> Option<Arc<ModelConfiguration>> {
        self.configs.read().get(name).cloned()
    }

    pub fn handle(&self, name: &str) -> Option<Arc<dyn ModelHandle>> {
        self.handles.read().get(name).cloned()
    }
}

impl std::fmt::Debug for ModelRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut configs: Vec<String> = self.configs.read().keys().cloned().collect();
        let mut handles: Vec<String> = self.handles.read().keys().cloned().collect();
        configs.sort();
        handles.sort();
        f.debug_struct("ModelRegistry")
            .field("configs", &configs)
            .field("handles", &handles)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Model;

    #[test]
    fn register_config_returns_stored_config() {
        let registry = ModelRegistry::new();
        let config = registry.register_config("book", ModelConfiguration::new().with_url("https://a"));
        assert_eq!(config.base_url(), Some("https://a"));
        assert!(Arc::ptr_eq(&registry.config("book").unwrap(), &config));
        assert!(registry.config("author").is_none());
    }

    #[test]
    fn first_config_registration_wins() {
        let registry = ModelRegistry::new();
        let first = registry.register_config("book", ModelConfiguration::new().with_url("https://a"));
        let second = registry.register_config("book", ModelConfiguration::new().with_url("https://b"));
        assert!(Arc::ptr_eq(&first, &second));
        assert_eq!(second.base_url(), Some("https://a"));
    }

    #[test]
    fn register_handle_is_idempotent() {
        let registry = ModelRegistry::new();
        let first: Arc<dyn ModelHandle> = Arc::new(Model::new("book", ModelConfiguration::new()));
        let cached = registry.register_handle("book", Arc::clone(&first));
        assert!(Arc::ptr_eq(&cached, &first));

        let other: Arc<dyn ModelHandle> = Arc::new(Model::new("book", ModelConfiguration::new()));
        let again = registry.register_handle("book", other);
        assert!(Arc::ptr_eq(&again, &first));
        let stored = registry.handle("book").unwrap();
        assert!(Arc::ptr_eq(&stored, &first));
    }

    #[test]
    fn register_handle_binds_identifier_field() {
        let registry = ModelRegistry::new();
        let model = Arc::new(Model::new("book", ModelConfiguration::new().with_id_attribute("isbn")));
        registry.register_handle("book", model.clone());
        assert_eq!(model.identifier_field(), Some("isbn"));

        let plain = Arc::new(Model::new("author", ModelConfiguration::new()));
        registry.register_handle("author", plain.clone());
        assert_eq!(plain.identifier_field(), Some("id"));
    }

    #[test]
    fn unknown_handle_lookup() {
        let registry = ModelRegistry::new();
        assert!(registry.handle("book").is_none());
        assert!(registry.config("book").is_none());
    }
}
