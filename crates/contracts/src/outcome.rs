//! Transport replies and per-item send outcomes

use serde::{Deserialize, Serialize};

use crate::{ContractError, Recipient};

/// Reply of a transport that processed a request
///
/// `success = false` is a handled failure (invalid input, rejected by the
/// relay); raised errors travel as `ContractError` instead.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransportReply {
    pub success: bool,
    pub message: String,
}

impl TransportReply {
    /// Successful delivery hand-off
    pub fn delivered(message: impl Into<String>) -> Self {
        Self {
            success: true,
            message: message.into(),
        }
    }

    /// Handled failure with a descriptive reason
    pub fn rejected(message: impl Into<String>) -> Self {
        Self {
            success: false,
            message: message.into(),
        }
    }
}

/// Outcome of one item as seen by the dispatch controller
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SendOutcome {
    pub recipient: Recipient,
    pub success: bool,
    pub error_detail: Option<String>,
    /// Set when the transport raised an error rather than replying
    #[serde(default)]
    pub raised: bool,
}

impl SendOutcome {
    /// Fold a transport result into an outcome; errors never escape
    pub fn from_result(recipient: Recipient, result: Result<TransportReply, ContractError>) -> Self {
        match result {
            Ok(reply) if reply.success => Self {
                recipient,
                success: true,
                error_detail: None,
                raised: false,
            },
            Ok(reply) => Self {
                recipient,
                success: false,
                error_detail: Some(reply.message),
                raised: false,
            },
            Err(e) => Self {
                recipient,
                success: false,
                error_detail: Some(e.to_string()),
                raised: true,
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_explicit_failure_keeps_message() {
        let outcome = SendOutcome::from_result(
            Recipient::new("a@x.com"),
            Ok(TransportReply::rejected("Invalid recipient email format")),
        );
        assert!(!outcome.success);
        assert!(!outcome.raised);
        assert_eq!(
            outcome.error_detail.as_deref(),
            Some("Invalid recipient email format")
        );
    }

    #[test]
    fn test_raised_error_becomes_failure() {
        let outcome = SendOutcome::from_result(
            Recipient::new("a@x.com"),
            Err(ContractError::transport("http", "timed out")),
        );
        assert!(!outcome.success);
        assert!(outcome.raised);
        assert!(outcome.error_detail.unwrap().contains("timed out"));
    }

    #[test]
    fn test_success_has_no_detail() {
        let outcome = SendOutcome::from_result(
            Recipient::new("a@x.com"),
            Ok(TransportReply::delivered("Email sent successfully")),
        );
        assert!(outcome.success);
        assert!(outcome.error_detail.is_none());
    }
}
