//! Transport and connectivity seams.
//!
//! # Design
//! The adapter never talks to a socket directly. A `Transport` takes a
//! `PreparedRequest` and returns the raw status and body; a `Connectivity`
//! answers "are we online right now". Both are traits so tests can count
//! calls and flip the network off, and so hosts can plug in their own HTTP
//! stack. `UreqTransport` is the default blocking implementation.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use thiserror::Error;

use crate::http::{Headers, HttpMethod, PreparedRequest, TransportResponse};

/// Failures raised by a transport before a response was received.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TransportFailure {
    #[error("request timed out")]
    Timeout,

    #[error("network error: {0}")]
    Network(String),
}

/// A network transport able to execute one prepared request.
///
/// Implementations return any HTTP status as data; status classification is
/// the executor's job. `send` may block: the executor always calls it off the
/// caller's thread.
pub trait Transport: Send + Sync + 'static {
    fn send(&self, request: PreparedRequest) -> Result<TransportResponse, TransportFailure>;
}

/// Process-wide online/offline state.
pub trait Connectivity: Send + Sync + 'static {
    fn is_online(&self) -> bool;
}

/// Connectivity that never reports offline.
#[derive(Debug, Clone, Copy, Default)]
pub struct AlwaysOnline;

impl Connectivity for AlwaysOnline {
    fn is_online(&self) -> bool {
        true
    }
}

/// Shared online flag, toggled by whatever watches the network.
#[derive(Debug, Clone)]
pub struct OnlineState {
    online: Arc<AtomicBool>,
}

impl OnlineState {
    pub fn new(online: bool) -> Self {
        Self {
            online: Arc::new(AtomicBool::new(online)),
        }
    }

    pub fn set_online(&self, online: bool) {
        self.online.store(online, Ordering::SeqCst);
    }
}

impl Default for OnlineState {
    fn default() -> Self {
        Self::new(true)
    }
}

impl Connectivity for OnlineState {
    fn is_online(&self) -> bool {
        self.online.load(Ordering::SeqCst)
    }
}

/// Blocking HTTP transport built on `ureq`.
///
/// Each request gets an agent configured with that request's timeout as the
/// global deadline. Status codes are returned as data rather than `Err`.
/// A body is sent for every method, GET and DELETE included.
#[derive(Debug, Clone, Copy, Default)]
pub struct UreqTransport;

impl UreqTransport {
    pub fn new() -> Self {
        Self
    }
}

impl Transport for UreqTransport {
    fn send(&self, request: PreparedRequest) -> Result<TransportResponse, TransportFailure> {
        let agent = ureq::Agent::config_builder()
            .http_status_as_error(false)
            .timeout_global(Some(request.timeout))
            .build()
            .new_agent();

        let url = request.url.as_str();
        let result = match (request.method, request.body) {
            (HttpMethod::Get, Some(body)) => with_headers(agent.get(url), &request.headers)
                .force_send_body()
                .send(&body[..]),
            (HttpMethod::Get, None) => with_headers(agent.get(url), &request.headers).call(),
            (HttpMethod::Delete, Some(body)) => with_headers(agent.delete(url), &request.headers)
                .force_send_body()
                .send(&body[..]),
            (HttpMethod::Delete, None) => with_headers(agent.delete(url), &request.headers).call(),
            (HttpMethod::Post, Some(body)) => with_headers(agent.post(url), &request.headers).send(&body[..]),
            (HttpMethod::Post, None) => with_headers(agent.post(url), &request.headers).send_empty(),
            (HttpMethod::Put, Some(body)) => with_headers(agent.put(url), &request.headers).send(&body[..]),
            (HttpMethod::Put, None) => with_headers(agent.put(url), &request.headers).send_empty(),
        };

        let mut response = result.map_err(map_ureq_error)?;
        let status = response.status().as_u16();
        let body = response.body_mut().read_to_vec().map_err(map_ureq_error)?;
        Ok(TransportResponse { status, body })
    }
}

fn with_headers<B>(mut builder: ureq::RequestBuilder<B>, headers: &Headers) -> ureq::RequestBuilder<B> {
    for (name, value) in headers {
        builder = builder.header(name.as_str(), value.as_str());
    }
    builder
}

fn map_ureq_error(err: ureq::Error) -> TransportFailure {
    match err {
        ureq::Error::Timeout(_) => TransportFailure::Timeout,
        other => TransportFailure::Network(other.to_string()),
    }
}
