//! Sync Translator: CRUD intent plus model configuration in, HTTP request out.
//!
//! # Design
//! `SyncClient::build_request` is a pure translation that produces a fresh
//! `RequestDescription` per call; caller options are read, never mutated.
//! `sync` is `build_request` followed by one dispatch through the
//! `RequestExecutor`. Configuration errors (no URL, unknown model) are
//! returned as `Err` before anything touches the network, so a caller gets
//! either an error or exactly one `TransportOutcome`.
//!
//! Translation order matters for the legacy transforms: form emulation sets
//! its content type and the JSON default is only applied when form emulation
//! is off, so the form content type always reaches the wire.

use std::sync::Arc;

use serde_json::{Map, Value};
use tracing::{debug, error};

use crate::config::AdapterConfig;
use crate::error::{SyncError, SyncResult};
use crate::executor::{PendingRequest, RequestExecutor};
use crate::http::{
    insert_header, BeforeSend, BodyEncoding, Headers, HttpMethod, PreparedRequest, RequestDescription, CONTENT_TYPE,
    FORM_CONTENT_TYPE, JSON_CONTENT_TYPE, METHOD_OVERRIDE,
};
use crate::model::ModelHandle;
use crate::outcome::TransportOutcome;
use crate::registry::ModelRegistry;
use crate::transport::{Connectivity, Transport};
use crate::types::{Operation, SyncOptions};

/// Body field carrying the real method under combined emulation.
const METHOD_FIELD: &str = "_method";
/// Wrapper key for form-emulated bodies.
const MODEL_FIELD: &str = "model";

/// Translates sync calls into requests and dispatches them.
pub struct SyncClient<T, C> {
    config: AdapterConfig,
    registry: Arc<ModelRegistry>,
    executor: RequestExecutor<T, C>,
}

impl<T: Transport, C: Connectivity> SyncClient<T, C> {
    pub fn new(config: AdapterConfig, registry: Arc<ModelRegistry>, transport: T, connectivity: C) -> Self {
        Self {
            config,
            registry,
            executor: RequestExecutor::new(transport, connectivity),
        }
    }

    pub fn config(&self) -> &AdapterConfig {
        &self.config
    }

    pub fn registry(&self) -> &ModelRegistry {
        &self.registry
    }

    pub fn executor(&self) -> &RequestExecutor<T, C> {
        &self.executor
    }

    /// Build the request for `operation` on `model` without sending it.
    pub fn build_request(
        &self,
        operation: Operation,
        model: &dyn ModelHandle,
        options: &SyncOptions,
    ) -> SyncResult<RequestDescription> {
        let config = model.config();
        model.bind_identifier_field(config.identifier_field());

        let method = operation.method();

        let mut headers = Headers::new();
        for (name, value) in options.headers.iter().chain(&config.headers) {
            insert_header(&mut headers, name, value);
        }

        let url = options
            .url
            .clone()
            .filter(|url| !url.is_empty())
            .or_else(|| config.base_url().map(str::to_string))
            .or_else(|| model.url())
            .ok_or_else(|| {
                error!(model = model.name(), operation = %operation, "no base URL resolved, request not sent");
                SyncError::MissingUrl {
                    model: model.name().to_string(),
                }
            })?;

        let mut data = options.data.clone();
        let mut encoding = BodyEncoding::Json;
        if self.config.emulate_json {
            encoding = BodyEncoding::Form;
            insert_header(&mut headers, CONTENT_TYPE, FORM_CONTENT_TYPE);
            data = Some(wrap_model(data));
        }

        let mut wire_method = method;
        let mut before_send: Option<BeforeSend> = None;
        if self.config.emulate_http && matches!(method, HttpMethod::Put | HttpMethod::Delete) {
            if self.config.emulate_json {
                if let Some(body) = data.as_mut() {
                    insert_method_field(body, method);
                }
            }
            wire_method = HttpMethod::Post;
            before_send = Some(Arc::new(move |prepared: &mut PreparedRequest| {
                prepared.set_header(METHOD_OVERRIDE, method.as_str());
            }));
        }

        if encoding == BodyEncoding::Json {
            insert_header(&mut headers, CONTENT_TYPE, JSON_CONTENT_TYPE);
        }

        let request = RequestDescription {
            method: wire_method,
            url,
            headers,
            data,
            encoding,
            timeout: options.timeout.unwrap_or(self.config.default_timeout),
            before_send,
        };
        debug!(
            model = model.name(),
            operation = %operation,
            method = %request.method,
            url = %request.url,
            "built sync request"
        );
        Ok(request)
    }

    /// Translate and dispatch; the handle resolves to the transport outcome.
    pub fn sync(
        &self,
        operation: Operation,
        model: &dyn ModelHandle,
        options: &SyncOptions,
    ) -> SyncResult<PendingRequest> {
        let request = self.build_request(operation, model, options)?;
        Ok(self.executor.execute(request))
    }

    /// Translate and dispatch, delivering the outcome to `on_complete`.
    pub fn sync_with<F>(
        &self,
        operation: Operation,
        model: &dyn ModelHandle,
        options: &SyncOptions,
        on_complete: F,
    ) -> SyncResult<()>
    where
        F: FnOnce(TransportOutcome) + Send + 'static,
    {
        let request = self.build_request(operation, model, options)?;
        self.executor.dispatch(request, on_complete);
        Ok(())
    }

    /// `sync` against the handle registered under `name`.
    pub fn sync_named(&self, name: &str, operation: Operation, options: &SyncOptions) -> SyncResult<PendingRequest> {
        let model = self.registry.handle(name).ok_or_else(|| {
            error!(model = name, "sync requested for unregistered model");
            SyncError::UnknownModel(name.to_string())
        })?;
        self.sync(operation, model.as_ref(), options)
    }
}

impl<T, C> std::fmt::Debug for SyncClient<T, C> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SyncClient")
            .field("config", &self.config)
            .field("registry", &self.registry)
            .finish_non_exhaustive()
    }
}

fn wrap_model(data: Option<Value>) -> Value {
    let mut wrapper = Map::new();
    if let Some(data) = data {
        wrapper.insert(MODEL_FIELD.to_string(), data);
    }
    Value::Object(wrapper)
}

/// Put `_method` inside the wrapped model object, or at the top level when
/// there is no model object to carry it.
fn insert_method_field(body: &mut Value, method: HttpMethod) {
    let Value::Object(wrapper) = body else {
        return;
    };
    let field = Value::String(method.as_str().to_string());
    match wrapper.get_mut(MODEL_FIELD) {
        Some(Value::Object(model)) => {
            model.insert(METHOD_FIELD.to_string(), field);
        }
        _ => {
            wrapper.insert(METHOD_FIELD.to_string(), field);
        }
    }
}
