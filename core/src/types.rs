//! Configuration and option types handed in by the data-model layer.
//!
//! # Design
//! `ModelConfiguration` deserializes from the usual model definition JSON
//! (`URL`, `headers`, `adapter.idAttribute`) so model files can be loaded
//! as-is; unknown keys are ignored. `SyncOptions` enumerates every option the
//! translator reads; everything else a caller might carry stays on the
//! caller's side.

use std::fmt;
use std::str::FromStr;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::SyncError;
use crate::http::{Headers, HttpMethod};

/// Identifier attribute used when the model configuration names none.
pub const DEFAULT_IDENTIFIER_FIELD: &str = "id";

/// The four CRUD intents a data-model layer can ask for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operation {
    Create,
    Read,
    Update,
    Delete,
}

impl Operation {
    pub fn method(self) -> HttpMethod {
        match self {
            Operation::Create => HttpMethod::Post,
            Operation::Read => HttpMethod::Get,
            Operation::Update => HttpMethod::Put,
            Operation::Delete => HttpMethod::Delete,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Operation::Create => "create",
            Operation::Read => "read",
            Operation::Update => "update",
            Operation::Delete => "delete",
        }
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Operation {
    type Err = SyncError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "create" => Ok(Operation::Create),
            "read" => Ok(Operation::Read),
            "update" => Ok(Operation::Update),
            "delete" => Ok(Operation::Delete),
            other => Err(SyncError::UnmappedOperation(other.to_string())),
        }
    }
}

/// Adapter section of a model definition.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AdapterSettings {
    /// Adapter name the model was declared with (informational).
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,
    #[serde(rename = "idAttribute", default, skip_serializing_if = "Option::is_none")]
    pub id_attribute: Option<String>,
}

/// Per-model configuration, registered once when the model type is defined.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModelConfiguration {
    /// Base URL for the model's endpoint.
    #[serde(rename = "URL", default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    /// Headers added to every request for this model. They win over
    /// caller-supplied headers with the same name.
    #[serde(default, skip_serializing_if = "Headers::is_empty")]
    pub headers: Headers,
    #[serde(default)]
    pub adapter: AdapterSettings,
}

impl ModelConfiguration {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_url(mut self, url: impl Into<String>) -> Self {
        self.url = Some(url.into());
        self
    }

    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.insert(name.into(), value.into());
        self
    }

    pub fn with_id_attribute(mut self, field: impl Into<String>) -> Self {
        self.adapter.id_attribute = Some(field.into());
        self
    }

    /// Name of the unique-identity attribute, `"id"` unless configured.
    pub fn identifier_field(&self) -> &str {
        self.adapter
            .id_attribute
            .as_deref()
            .filter(|field| !field.is_empty())
            .unwrap_or(DEFAULT_IDENTIFIER_FIELD)
    }

    /// Configured base URL, ignoring empty strings.
    pub fn base_url(&self) -> Option<&str> {
        self.url.as_deref().filter(|url| !url.is_empty())
    }
}

/// Caller-supplied options for a single sync call.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SyncOptions {
    /// Explicit URL; wins over any configured URL.
    pub url: Option<String>,
    /// Request body.
    pub data: Option<Value>,
    /// Caller headers; model-configured headers override them.
    pub headers: Headers,
    /// Per-request timeout; the adapter default applies when absent.
    pub timeout: Option<Duration>,
}

impl SyncOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_url(mut self, url: impl Into<String>) -> Self {
        self.url = Some(url.into());
        self
    }

    pub fn with_data(mut self, data: Value) -> Self {
        self.data = Some(data);
        self
    }

    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.insert(name.into(), value.into());
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }
}
