//! AnyTransport - transport selected from configuration

use std::time::Duration;

use contracts::{ContractError, SendRequest, SendTransport, TransportConfig, TransportReply};
use tracing::{info, instrument};

use crate::{DryRunTransport, HttpTransport, SendmailTransport};

/// One of the configurable transports
#[derive(Debug, Clone)]
pub enum AnyTransport {
    Http(HttpTransport),
    Sendmail(SendmailTransport),
    DryRun(DryRunTransport),
}

impl AnyTransport {
    /// Build the transport described by `config`
    #[instrument(name = "transport_from_config", skip(config), fields(kind = config.kind()))]
    pub fn from_config(config: &TransportConfig) -> Result<Self, ContractError> {
        let transport = match config {
            TransportConfig::Http {
                endpoint,
                timeout_ms,
            } => {
                if endpoint.trim().is_empty() {
                    return Err(ContractError::config_validation(
                        "transport.endpoint",
                        "endpoint cannot be empty",
                    ));
                }
                Self::Http(HttpTransport::new(
                    endpoint.clone(),
                    Duration::from_millis(*timeout_ms),
                )?)
            }
            TransportConfig::Sendmail { program, args } => {
                Self::Sendmail(SendmailTransport::new(program.clone(), args.clone()))
            }
            TransportConfig::DryRun => Self::DryRun(DryRunTransport::new()),
        };

        info!(transport = transport.name(), "Transport created");
        Ok(transport)
    }
}

impl SendTransport for AnyTransport {
    fn name(&self) -> &str {
        match self {
            Self::Http(t) => t.name(),
            Self::Sendmail(t) => t.name(),
            Self::DryRun(t) => t.name(),
        }
    }

    async fn send(&self, request: &SendRequest) -> Result<TransportReply, ContractError> {
        match self {
            Self::Http(t) => t.send(request).await,
            Self::Sendmail(t) => t.send(request).await,
            Self::DryRun(t) => t.send(request).await,
        }
    }
}
