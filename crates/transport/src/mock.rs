//! MockTransport - scripted transport for tests
//!
//! Records every request and can be told to reject or raise for specific
//! recipients, or to take a fixed time per send.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use contracts::{ContractError, SendRequest, SendTransport, TransportReply};

use crate::validate::validate_request;

#[derive(Debug, Default)]
struct MockState {
    calls: Vec<SendRequest>,
    rejections: HashMap<String, String>,
    errors: HashMap<String, String>,
    latency: Duration,
}

/// Scripted in-memory transport; clones share state
#[derive(Debug, Clone, Default)]
pub struct MockTransport {
    state: Arc<Mutex<MockState>>,
}

impl MockTransport {
    /// Transport that accepts every valid request
    pub fn new() -> Self {
        Self::default()
    }

    /// Reply `success = false` with `reason` for `recipient`
    pub fn reject(self, recipient: &str, reason: &str) -> Self {
        self.lock()
            .rejections
            .insert(recipient.to_string(), reason.to_string());
        self
    }

    /// Raise a transport error for `recipient`
    pub fn raise(self, recipient: &str, message: &str) -> Self {
        self.lock()
            .errors
            .insert(recipient.to_string(), message.to_string());
        self
    }

    /// Make every send take `latency`
    pub fn with_latency(self, latency: Duration) -> Self {
        self.lock().latency = latency;
        self
    }

    /// All requests received so far, in invocation order
    pub fn calls(&self) -> Vec<SendRequest> {
        self.lock().calls.clone()
    }

    /// Recipients of all requests received so far
    pub fn recipients(&self) -> Vec<String> {
        self.lock()
            .calls
            .iter()
            .map(|r| r.recipient.to_string())
            .collect()
    }

    pub fn call_count(&self) -> usize {
        self.lock().calls.len()
    }

    fn lock(&self) -> MutexGuard<'_, MockState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl SendTransport for MockTransport {
    fn name(&self) -> &str {
        "mock"
    }

    async fn send(&self, request: &SendRequest) -> Result<TransportReply, ContractError> {
        let (latency, rejection, error) = {
            let mut state = self.lock();
            state.calls.push(request.clone());
            let key = request.recipient.as_str();
            (
                state.latency,
                state.rejections.get(key).cloned(),
                state.errors.get(key).cloned(),
            )
        };

        if !latency.is_zero() {
            tokio::time::sleep(latency).await;
        }

        if let Some(message) = error {
            return Err(ContractError::transport("mock", message));
        }
        if let Err(reason) = validate_request(request) {
            return Ok(TransportReply::rejected(reason));
        }
        if let Some(reason) = rejection {
            return Ok(TransportReply::rejected(reason));
        }
        Ok(TransportReply::delivered("Email sent successfully"))
    }
}
