//! SendTransport trait - delivery interface invoked once per recipient

use crate::{ContractError, SendRequest, TransportReply};

/// Single-message delivery
///
/// Implementations validate the request themselves and answer invalid input
/// with a `success = false` reply carrying the reason. `Err` is reserved for
/// failures of the transport itself (network, process spawn, decoding).
#[trait_variant::make(SendTransport: Send)]
pub trait LocalSendTransport {
    /// Transport name (used for logging/metrics)
    fn name(&self) -> &str;

    /// Attempt delivery of one request
    ///
    /// # Errors
    /// Returns a transport error when delivery could not be attempted
    async fn send(&self, request: &SendRequest) -> Result<TransportReply, ContractError>;
}
