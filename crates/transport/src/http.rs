//! HttpTransport - POSTs each request as form fields to a mail endpoint
//!
//! The endpoint answers with `{"success": bool, "message": string}`; extra
//! fields are ignored.

use std::time::Duration;

use contracts::{ContractError, SendRequest, SendTransport, TransportReply};
use tracing::{debug, instrument, warn};

use crate::validate::validate_request;

/// Transport that hands requests to a remote form endpoint
#[derive(Debug, Clone)]
pub struct HttpTransport {
    name: String,
    client: reqwest::Client,
    endpoint: String,
    timeout: Duration,
}

impl HttpTransport {
    /// Create a new HttpTransport
    ///
    /// # Errors
    /// Returns a transport error if the HTTP client (TLS backend) cannot be built
    pub fn new(endpoint: impl Into<String>, timeout: Duration) -> Result<Self, ContractError> {
        let name = "http".to_string();
        let client = reqwest::Client::builder()
            .build()
            .map_err(|e| ContractError::transport(&name, format!("failed to build client: {e}")))?;
        Ok(Self {
            name,
            client,
            endpoint: endpoint.into(),
            timeout,
        })
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    async fn post(&self, request: &SendRequest) -> Result<TransportReply, ContractError> {
        let response = self
            .client
            .post(&self.endpoint)
            .timeout(self.timeout)
            .form(&form_fields(request))
            .send()
            .await
            .map_err(|e| ContractError::transport(&self.name, e.to_string()))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| ContractError::transport(&self.name, e.to_string()))?;

        match serde_json::from_str::<TransportReply>(&body) {
            Ok(reply) => Ok(reply),
            Err(_) if !status.is_success() => Err(ContractError::transport(
                &self.name,
                format!("endpoint returned HTTP {status}"),
            )),
            Err(e) => Err(ContractError::transport(
                &self.name,
                format!("invalid endpoint reply: {e}"),
            )),
        }
    }
}

/// Form fields in the endpoint's naming
pub fn form_fields(request: &SendRequest) -> Vec<(&'static str, String)> {
    vec![
        ("recipient", request.recipient.to_string()),
        ("fromName", request.from_name.clone()),
        ("fromEmail", request.from_email.clone()),
        ("replyTo", request.reply_to.clone()),
        ("subject", request.subject.clone()),
        ("mailType", request.body_encoding.as_str().to_string()),
        (
            "base64Encode",
            if request.base64 { "1" } else { "0" }.to_string(),
        ),
        ("emailBody", request.body.clone()),
    ]
}

impl SendTransport for HttpTransport {
    fn name(&self) -> &str {
        &self.name
    }

    #[instrument(
        name = "http_transport_send",
        skip(self, request),
        fields(transport = %self.name, recipient = %request.recipient)
    )]
    async fn send(&self, request: &SendRequest) -> Result<TransportReply, ContractError> {
        if let Err(reason) = validate_request(request) {
            warn!(reason = %reason, "Request rejected before POST");
            return Ok(TransportReply::rejected(reason));
        }

        debug!(endpoint = %self.endpoint, timeout_ms = self.timeout.as_millis() as u64, "Posting request");
        self.post(request).await
    }
}
