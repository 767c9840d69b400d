//! HTTP request types shared by the translator and the executor.
//!
//! # Design
//! `RequestDescription` is the translator's output: a fresh value per sync
//! call, never cached or shared between calls. The executor turns it into a
//! `PreparedRequest`, the mutable transport handle that a `before_send` hook
//! may still touch before the body goes out.
//!
//! Header names are case-insensitive. `insert_header` drops every
//! case-variant of a name before inserting, so a later write always replaces
//! an earlier one and a name never appears twice on the wire.

use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use serde_json::Value;

/// Header map used on every request.
pub type Headers = BTreeMap<String, String>;

/// Insert `name: value`, replacing any existing header with the same name in
/// any letter case.
pub fn insert_header(headers: &mut Headers, name: &str, value: &str) {
    headers.retain(|existing, _| !existing.eq_ignore_ascii_case(name));
    headers.insert(name.to_string(), value.to_string());
}

/// Case-insensitive header lookup.
pub fn find_header<'a>(headers: &'a Headers, name: &str) -> Option<&'a str> {
    headers
        .iter()
        .find(|(existing, _)| existing.eq_ignore_ascii_case(name))
        .map(|(_, value)| value.as_str())
}

pub const CONTENT_TYPE: &str = "Content-Type";
pub const METHOD_OVERRIDE: &str = "X-HTTP-Method-Override";
pub const JSON_CONTENT_TYPE: &str = "application/json";
pub const FORM_CONTENT_TYPE: &str = "application/x-www-form-urlencoded";

/// HTTP method for a request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HttpMethod {
    Get,
    Post,
    Put,
    Delete,
}

impl HttpMethod {
    pub fn as_str(self) -> &'static str {
        match self {
            HttpMethod::Get => "GET",
            HttpMethod::Post => "POST",
            HttpMethod::Put => "PUT",
            HttpMethod::Delete => "DELETE",
        }
    }
}

impl fmt::Display for HttpMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// How `RequestDescription::data` is turned into bytes on the wire.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BodyEncoding {
    #[default]
    Json,
    /// Legacy form emulation: `application/x-www-form-urlencoded` with
    /// bracket-notation keys.
    Form,
}

/// Hook run against the transport handle right before the body is sent.
pub type BeforeSend = Arc<dyn Fn(&mut PreparedRequest) + Send + Sync>;

/// A fully resolved request, ready for the executor.
#[derive(Clone)]
pub struct RequestDescription {
    pub method: HttpMethod,
    pub url: String,
    pub headers: Headers,
    pub data: Option<Value>,
    pub encoding: BodyEncoding,
    pub timeout: Duration,
    pub before_send: Option<BeforeSend>,
}

impl RequestDescription {
    /// Open a transport handle for this request and apply its headers.
    ///
    /// The `before_send` hook is not run here; see `apply_before_send`.
    pub fn prepare(&self) -> PreparedRequest {
        let mut prepared = PreparedRequest::open(self.method, &self.url, self.timeout);
        for (name, value) in &self.headers {
            prepared.set_header(name, value);
        }
        prepared
    }

    /// Run the `before_send` hook, if any, against `prepared`.
    pub fn apply_before_send(&self, prepared: &mut PreparedRequest) {
        if let Some(hook) = &self.before_send {
            hook(prepared);
        }
    }

    pub fn header(&self, name: &str) -> Option<&str> {
        find_header(&self.headers, name)
    }
}

impl fmt::Debug for RequestDescription {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RequestDescription")
            .field("method", &self.method)
            .field("url", &self.url)
            .field("headers", &self.headers)
            .field("data", &self.data)
            .field("encoding", &self.encoding)
            .field("timeout", &self.timeout)
            .field("before_send", &self.before_send.is_some())
            .finish()
    }
}

/// The transport handle: an opened connection that has not been sent yet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PreparedRequest {
    pub method: HttpMethod,
    pub url: String,
    pub headers: Headers,
    pub timeout: Duration,
    pub body: Option<Vec<u8>>,
}

impl PreparedRequest {
    pub fn open(method: HttpMethod, url: &str, timeout: Duration) -> Self {
        Self {
            method,
            url: url.to_string(),
            headers: Headers::new(),
            timeout,
            body: None,
        }
    }

    pub fn set_header(&mut self, name: &str, value: &str) {
        insert_header(&mut self.headers, name, value);
    }

    pub fn header(&self, name: &str) -> Option<&str> {
        find_header(&self.headers, name)
    }
}

/// Raw response handed back by a `Transport`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransportResponse {
    pub status: u16,
    pub body: Vec<u8>,
}

impl TransportResponse {
    /// Body as text, or `None` when empty.
    pub fn text(&self) -> Option<String> {
        if self.body.is_empty() {
            None
        } else {
            Some(String::from_utf8_lossy(&self.body).into_owned())
        }
    }
}
