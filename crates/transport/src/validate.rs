//! Request validation shared by all transports

use contracts::SendRequest;
use validator::ValidateEmail;

/// Check required fields, then address syntax
///
/// Returns the first problem as an operator-facing reason.
pub fn validate_request(request: &SendRequest) -> Result<(), String> {
    let required = [
        (request.recipient.as_str(), "Recipient email is required"),
        (request.from_name.as_str(), "From name is required"),
        (request.from_email.as_str(), "From email is required"),
        (request.reply_to.as_str(), "Reply-to email is required"),
        (request.subject.as_str(), "Subject is required"),
    ];
    for (value, reason) in required {
        if value.trim().is_empty() {
            return Err(reason.to_string());
        }
    }
    // body is not trimmed: whitespace-only bodies are allowed
    if request.body.is_empty() {
        return Err("Email body is required".to_string());
    }

    let addresses = [
        (request.recipient.as_str(), "Invalid recipient email format"),
        (request.from_email.as_str(), "Invalid from email format"),
        (request.reply_to.as_str(), "Invalid reply-to email format"),
    ];
    for (value, reason) in addresses {
        if !value.trim().validate_email() {
            return Err(reason.to_string());
        }
    }

    Ok(())
}
