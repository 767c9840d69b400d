//! In-memory transport used by the unit tests.

use std::sync::Arc;

use parking_lot::Mutex;

use crate::http::{PreparedRequest, TransportResponse};
use crate::transport::{Transport, TransportFailure};

/// Records every request it is asked to send and answers with a canned reply.
#[derive(Clone)]
pub struct RecordingTransport {
    sent: Arc<Mutex<Vec<PreparedRequest>>>,
    reply: Arc<Mutex<Result<TransportResponse, TransportFailure>>>,
}

impl RecordingTransport {
    pub fn replying(status: u16, body: &str) -> Self {
        Self {
            sent: Arc::default(),
            reply: Arc::new(Mutex::new(Ok(TransportResponse {
                status,
                body: body.as_bytes().to_vec(),
            }))),
        }
    }

    pub fn failing(failure: TransportFailure) -> Self {
        Self {
            sent: Arc::default(),
            reply: Arc::new(Mutex::new(Err(failure))),
        }
    }

    pub fn calls(&self) -> usize {
        self.sent.lock().len()
    }

    pub fn sent(&self) -> Vec<PreparedRequest> {
        self.sent.lock().clone()
    }
}

impl Default for RecordingTransport {
    fn default() -> Self {
        Self::replying(200, "{}")
    }
}

impl Transport for RecordingTransport {
    fn send(&self, request: PreparedRequest) -> Result<TransportResponse, TransportFailure> {
        self.sent.lock().push(request);
        self.reply.lock().clone()
    }
}
