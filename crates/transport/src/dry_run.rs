//! DryRunTransport - composes and logs messages without delivering them

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use contracts::{ContractError, SendRequest, SendTransport, TransportReply};
use tracing::{debug, info, instrument, warn};

use crate::compose::compose_message;
use crate::validate::validate_request;

/// Transport that only composes messages
#[derive(Debug, Clone, Default)]
pub struct DryRunTransport {
    composed: Arc<AtomicU64>,
}

impl DryRunTransport {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of messages composed so far
    pub fn composed_count(&self) -> u64 {
        self.composed.load(Ordering::Relaxed)
    }
}

impl SendTransport for DryRunTransport {
    fn name(&self) -> &str {
        "dry_run"
    }

    #[instrument(
        name = "dry_run_transport_send",
        skip(self, request),
        fields(recipient = %request.recipient)
    )]
    async fn send(&self, request: &SendRequest) -> Result<TransportReply, ContractError> {
        if let Err(reason) = validate_request(request) {
            warn!(reason = %reason, "Request rejected");
            return Ok(TransportReply::rejected(reason));
        }

        let message = compose_message(request);
        self.composed.fetch_add(1, Ordering::Relaxed);

        info!(bytes = message.len(), "Dry run: message composed, not delivered");
        debug!(message = %message, "Composed message");

        Ok(TransportReply::delivered("Dry run: message composed"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::validate::tests::sample_request;

    #[tokio::test]
    async fn test_dry_run_counts_valid_requests_only() {
        let transport = DryRunTransport::new();

        assert!(transport.send(&sample_request("a@x.com")).await.unwrap().success);
        assert!(!transport.send(&sample_request("bad")).await.unwrap().success);

        assert_eq!(transport.composed_count(), 1);
    }
}
