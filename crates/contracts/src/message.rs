//! Message template and per-recipient send request

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use validator::{Validate, ValidationError};

use crate::Recipient;

/// Body content type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BodyEncoding {
    /// text/plain
    Plain,
    /// text/html
    #[default]
    Html,
}

impl BodyEncoding {
    /// MIME content type of the body
    pub fn content_type(&self) -> &'static str {
        match self {
            Self::Plain => "text/plain",
            Self::Html => "text/html",
        }
    }

    /// Wire name used by form-based transports
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Plain => "plain",
            Self::Html => "html",
        }
    }
}

/// Message shared by every recipient of a batch
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Validate)]
pub struct MessageTemplate {
    /// Display name of the sender
    #[validate(custom(function = "not_blank", message = "From name is required"))]
    pub from_name: String,

    /// Sender address
    #[validate(email(message = "From email is missing or invalid"))]
    pub from_email: String,

    /// Reply-To address
    #[validate(email(message = "Reply-to email is missing or invalid"))]
    pub reply_to: String,

    #[validate(custom(function = "not_blank", message = "Subject is required"))]
    pub subject: String,

    #[serde(default)]
    pub body_encoding: BodyEncoding,

    /// Base64 transfer-encode the body (HTML bodies only)
    #[serde(default)]
    pub base64: bool,

    /// Message body; may be filled from `body_file` by the config loader
    #[serde(default)]
    #[validate(length(min = 1, message = "Email body is required"))]
    pub body: String,

    /// Body source file, resolved relative to the campaign file
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub body_file: Option<PathBuf>,
}

impl MessageTemplate {
    /// Assemble the request for one recipient
    pub fn request_for(&self, recipient: &Recipient) -> SendRequest {
        SendRequest {
            recipient: recipient.clone(),
            from_name: self.from_name.clone(),
            from_email: self.from_email.clone(),
            reply_to: self.reply_to.clone(),
            subject: self.subject.clone(),
            body_encoding: self.body_encoding,
            base64: self.base64,
            body: self.body.clone(),
        }
    }

    /// Flatten validation errors into one operator-facing sentence
    pub fn validation_message(&self) -> Option<String> {
        let errors = self.validate().err()?;
        let mut messages: Vec<String> = errors
            .field_errors()
            .into_iter()
            .flat_map(|(field, errs)| {
                errs.iter().map(move |e| match &e.message {
                    Some(m) => m.to_string(),
                    None => format!("{field} is invalid"),
                })
            })
            .collect();
        messages.sort();
        Some(messages.join("; "))
    }
}

// whitespace-only counts as missing, same as the transports' trim check
fn not_blank(value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        Err(ValidationError::new("blank"))
    } else {
        Ok(())
    }
}

/// One fully-formed send request handed to a transport
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SendRequest {
    pub recipient: Recipient,
    pub from_name: String,
    pub from_email: String,
    pub reply_to: String,
    pub subject: String,
    pub body_encoding: BodyEncoding,
    pub base64: bool,
    pub body: String,
}
