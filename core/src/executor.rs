//! Request Executor: one network attempt per request, normalized outcome.
//!
//! # Design
//! The executor knows nothing about CRUD. It checks connectivity, opens a
//! transport handle from the `RequestDescription`, runs the `before_send`
//! hook, sends the encoded body, and folds whatever happens into a
//! `TransportOutcome`.
//!
//! Dispatch never blocks the caller. The transport call runs on a worker
//! thread and the outcome is delivered exactly once, either to a callback
//! (`dispatch`) or through a single-fire channel (`execute`). Overlapping
//! requests are independent and may complete in any order. The offline
//! short-circuit is the one synchronous path: its outcome is delivered
//! before `dispatch` returns.

use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;
use std::task::{Context, Poll};
use std::thread;

use tokio::sync::oneshot;
use tracing::{debug, error, warn};

use crate::encode::encode_body;
use crate::http::RequestDescription;
use crate::outcome::TransportOutcome;
use crate::transport::{Connectivity, Transport};

/// Executes resolved requests against a `Transport`.
pub struct RequestExecutor<T, C> {
    transport: Arc<T>,
    connectivity: Arc<C>,
}

impl<T: Transport, C: Connectivity> RequestExecutor<T, C> {
    pub fn new(transport: T, connectivity: C) -> Self {
        Self {
            transport: Arc::new(transport),
            connectivity: Arc::new(connectivity),
        }
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    pub fn connectivity(&self) -> &C {
        &self.connectivity
    }

    /// Run `request` off-thread and hand the outcome to `on_complete`.
    pub fn dispatch<F>(&self, request: RequestDescription, on_complete: F)
    where
        F: FnOnce(TransportOutcome) + Send + 'static,
    {
        if !self.connectivity.is_online() {
            warn!(method = %request.method, url = %request.url, "offline, request not sent");
            on_complete(TransportOutcome::Offline);
            return;
        }

        debug!(method = %request.method, url = %request.url, "dispatching request");
        let transport = Arc::clone(&self.transport);
        thread::spawn(move || on_complete(perform(transport.as_ref(), &request)));
    }

    /// Run `request` off-thread; the returned handle resolves to its outcome.
    pub fn execute(&self, request: RequestDescription) -> PendingRequest {
        let (tx, rx) = oneshot::channel();
        self.dispatch(request, move |outcome| {
            // The caller may have dropped the handle; nothing left to notify.
            let _ = tx.send(outcome);
        });
        PendingRequest { receiver: rx }
    }

    /// Run `request` on the current thread.
    #[cfg(test)]
    fn execute_blocking(&self, request: &RequestDescription) -> TransportOutcome {
        if !self.connectivity.is_online() {
            warn!(method = %request.method, url = %request.url, "offline, request not sent");
            return TransportOutcome::Offline;
        }
        perform(self.transport.as_ref(), request)
    }
}

impl<T, C> std::fmt::Debug for RequestExecutor<T, C> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RequestExecutor").finish_non_exhaustive()
    }
}

fn perform<T: Transport + ?Sized>(transport: &T, request: &RequestDescription) -> TransportOutcome {
    let mut prepared = request.prepare();
    request.apply_before_send(&mut prepared);

    if let Some(data) = &request.data {
        match encode_body(data, request.encoding) {
            Ok(body) => prepared.body = Some(body),
            Err(err) => {
                error!(url = %request.url, error = %err, "request body could not be encoded");
                return TransportOutcome::Failed {
                    code: None,
                    data: err.to_string(),
                    response_text: None,
                };
            }
        }
    }

    match transport.send(prepared) {
        Ok(response) if response.status >= 400 => {
            let response_text = response.text();
            error!(
                url = %request.url,
                code = response.status,
                response_text = response_text.as_deref().unwrap_or(""),
                "request failed"
            );
            TransportOutcome::Failed {
                code: Some(response.status),
                data: format!("HTTP {}", response.status),
                response_text,
            }
        }
        Ok(response) => {
            debug!(url = %request.url, code = response.status, "request completed");
            let response_text = response.text();
            let response_data = if response.body.is_empty() {
                None
            } else {
                Some(response.body)
            };
            TransportOutcome::Loaded {
                code: response.status,
                response_text,
                response_data,
            }
        }
        Err(failure) => {
            error!(url = %request.url, error = %failure, "request failed");
            TransportOutcome::Failed {
                code: None,
                data: failure.to_string(),
                response_text: None,
            }
        }
    }
}

/// Handle for an in-flight request.
///
/// Await it, or call `wait` from synchronous code. Dropping it does not
/// cancel the request.
#[derive(Debug)]
pub struct PendingRequest {
    receiver: oneshot::Receiver<TransportOutcome>,
}

impl PendingRequest {
    /// Block until the outcome arrives.
    ///
    /// Must not be called from inside an async runtime; await the handle
    /// there instead.
    pub fn wait(self) -> TransportOutcome {
        self.receiver.blocking_recv().unwrap_or_else(|_| worker_lost())
    }

    /// Outcome if it has already arrived. Once this returns `Some`, the
    /// handle is spent.
    pub fn try_outcome(&mut self) -> Option<TransportOutcome> {
        match self.receiver.try_recv() {
            Ok(outcome) => Some(outcome),
            Err(oneshot::error::TryRecvError::Empty) => None,
            Err(oneshot::error::TryRecvError::Closed) => Some(worker_lost()),
        }
    }
}

impl Future for PendingRequest {
    type Output = TransportOutcome;

    fn poll(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        Pin::new(&mut self.receiver)
            .poll(cx)
            .map(|received| received.unwrap_or_else(|_| worker_lost()))
    }
}

fn worker_lost() -> TransportOutcome {
    error!("request worker stopped before reporting an outcome");
    TransportOutcome::Failed {
        code: None,
        data: "request worker stopped before reporting an outcome".to_string(),
        response_text: None,
    }
}
