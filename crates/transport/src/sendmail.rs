//! SendmailTransport - pipes composed messages to a local delivery agent

use std::path::{Path, PathBuf};
use std::process::Stdio;

use contracts::{ContractError, SendRequest, SendTransport, TransportReply};
use tokio::io::AsyncWriteExt;
use tokio::process::Command;
use tracing::{debug, instrument, warn};

use crate::compose::compose_message;
use crate::validate::validate_request;

/// Transport backed by a `sendmail -t -i` compatible program
#[derive(Debug, Clone)]
pub struct SendmailTransport {
    name: String,
    program: PathBuf,
    args: Vec<String>,
}

impl SendmailTransport {
    /// Create a new SendmailTransport
    pub fn new(program: impl Into<PathBuf>, args: Vec<String>) -> Self {
        Self {
            name: "sendmail".to_string(),
            program: program.into(),
            args,
        }
    }

    pub fn program(&self) -> &Path {
        &self.program
    }

    async fn pipe(&self, message: &str) -> Result<TransportReply, ContractError> {
        let mut child = Command::new(&self.program)
            .args(&self.args)
            .stdin(Stdio::piped())
            .stdout(Stdio::null())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .spawn()
            .map_err(|e| {
                ContractError::transport(
                    &self.name,
                    format!("failed to start '{}': {e}", self.program.display()),
                )
            })?;

        if let Some(mut stdin) = child.stdin.take() {
            if let Err(e) = stdin.write_all(message.as_bytes()).await {
                // the agent may exit before reading everything; its status decides
                if e.kind() != std::io::ErrorKind::BrokenPipe {
                    return Err(ContractError::transport(&self.name, e.to_string()));
                }
            }
        }

        let output = child
            .wait_with_output()
            .await
            .map_err(|e| ContractError::transport(&self.name, e.to_string()))?;

        if output.status.success() {
            Ok(TransportReply::delivered("Email sent successfully"))
        } else {
            let stderr = String::from_utf8_lossy(&output.stderr);
            let detail = stderr.trim();
            let message = if detail.is_empty() {
                format!("Failed to send email: sendmail exited with {}", output.status)
            } else {
                format!(
                    "Failed to send email: sendmail exited with {}: {detail}",
                    output.status
                )
            };
            Ok(TransportReply::rejected(message))
        }
    }
}

impl SendTransport for SendmailTransport {
    fn name(&self) -> &str {
        &self.name
    }

    #[instrument(
        name = "sendmail_transport_send",
        skip(self, request),
        fields(transport = %self.name, recipient = %request.recipient)
    )]
    async fn send(&self, request: &SendRequest) -> Result<TransportReply, ContractError> {
        if let Err(reason) = validate_request(request) {
            warn!(reason = %reason, "Request rejected before delivery");
            return Ok(TransportReply::rejected(reason));
        }

        let message = compose_message(request);
        debug!(bytes = message.len(), program = %self.program.display(), "Piping message");
        self.pipe(&message).await
    }
}

#[cfg(all(test, unix))]
mod tests {
    use super::*;
    use crate::validate::tests::sample_request;

    fn shell(script: &str) -> SendmailTransport {
        SendmailTransport::new("/bin/sh", vec!["-c".to_string(), script.to_string()])
    }

    #[tokio::test]
    async fn test_successful_delivery() {
        let transport = shell("cat > /dev/null");
        let reply = transport.send(&sample_request("a@x.com")).await.unwrap();
        assert!(reply.success, "{}", reply.message);
    }

    #[tokio::test]
    async fn test_non_zero_exit_is_rejection() {
        let transport = shell("cat > /dev/null; echo 'relay denied' >&2; exit 3");
        let reply = transport.send(&sample_request("a@x.com")).await.unwrap();
        assert!(!reply.success);
        assert!(reply.message.contains("relay denied"));
    }

    #[tokio::test]
    async fn test_missing_program_is_transport_error() {
        let transport = SendmailTransport::new("/nonexistent/sendmail", Vec::new());
        let err = transport.send(&sample_request("a@x.com")).await.unwrap_err();
        assert!(err.to_string().contains("failed to start"));
    }

    #[tokio::test]
    async fn test_invalid_request_not_piped() {
        let transport = SendmailTransport::new("/nonexistent/sendmail", Vec::new());
        let reply = transport.send(&sample_request("bad")).await.unwrap();
        assert!(!reply.success);
    }
}
