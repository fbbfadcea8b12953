//! RFC 5322 message composition for local delivery agents

use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use chrono::Utc;

use contracts::{BodyEncoding, SendRequest};

/// Value of the `X-Mailer` header
pub const X_MAILER: &str = concat!("bulk-mailer/", env!("CARGO_PKG_VERSION"));

/// Base64 line length per RFC 2045
const BASE64_LINE_LEN: usize = 76;

/// Compose a complete message (headers + body) with `\n` line endings
///
/// The body is base64 transfer-encoded only for HTML bodies with the base64
/// flag set; everything else is sent as 8bit.
pub fn compose_message(request: &SendRequest) -> String {
    let base64_body = request.base64 && request.body_encoding == BodyEncoding::Html;

    let mut headers = vec![
        format!("Date: {}", Utc::now().to_rfc2822()),
        format!(
            "From: {} <{}>",
            encode_header_value(&request.from_name),
            sanitize(&request.from_email)
        ),
        format!("To: {}", sanitize(&request.recipient)),
        format!("Reply-To: {}", sanitize(&request.reply_to)),
        format!("Subject: {}", encode_header_value(&request.subject)),
        "MIME-Version: 1.0".to_string(),
        format!(
            "Content-Type: {}; charset=UTF-8",
            request.body_encoding.content_type()
        ),
    ];

    if base64_body {
        headers.push("Content-Transfer-Encoding: base64".to_string());
    } else {
        headers.push("Content-Transfer-Encoding: 8bit".to_string());
    }
    headers.push(format!("X-Mailer: {X_MAILER}"));
    headers.push("X-Priority: 3".to_string());

    let body = if base64_body {
        wrap_base64(&STANDARD.encode(request.body.as_bytes()))
    } else {
        request.body.clone()
    };

    let mut message = headers.join("\n");
    message.push_str("\n\n");
    message.push_str(&body);
    if !message.ends_with('\n') {
        message.push('\n');
    }
    message
}

/// Header value with CR/LF stripped; non-ASCII values become RFC 2047 words
pub fn encode_header_value(value: &str) -> String {
    let clean = sanitize(value);
    if clean.is_ascii() {
        clean
    } else {
        format!("=?UTF-8?B?{}?=", STANDARD.encode(clean.as_bytes()))
    }
}

// header injection guard
fn sanitize(value: &str) -> String {
    value
        .chars()
        .filter(|c| *c != '\r' && *c != '\n')
        .collect::<String>()
        .trim()
        .to_string()
}

fn wrap_base64(encoded: &str) -> String {
    encoded
        .as_bytes()
        .chunks(BASE64_LINE_LEN)
        .map(|chunk| String::from_utf8_lossy(chunk).into_owned())
        .collect::<Vec<_>>()
        .join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::validate::tests::sample_request;

    #[test]
    fn test_html_message_headers() {
        let message = compose_message(&sample_request("a@x.com"));
        assert!(message.contains("From: Ops Team <ops@example.com>\n"));
        assert!(message.contains("To: a@x.com\n"));
        assert!(message.contains("Reply-To: reply@example.com\n"));
        assert!(message.contains("Content-Type: text/html; charset=UTF-8\n"));
        assert!(message.contains("X-Priority: 3\n"));
        assert!(message.ends_with("\n\n<p>Hello</p>\n"));
    }

    #[test]
    fn test_plain_body_ignores_base64_flag() {
        let mut request = sample_request("a@x.com");
        request.body_encoding = BodyEncoding::Plain;
        request.base64 = true;
        request.body = "hello".to_string();

        let message = compose_message(&request);
        assert!(message.contains("Content-Type: text/plain; charset=UTF-8\n"));
        assert!(message.contains("Content-Transfer-Encoding: 8bit\n"));
        assert!(message.ends_with("\n\nhello\n"));
    }

    #[test]
    fn test_base64_html_body() {
        let mut request = sample_request("a@x.com");
        request.base64 = true;
        request.body = "x".repeat(120);

        let message = compose_message(&request);
        assert!(message.contains("Content-Transfer-Encoding: base64\n"));

        let (_, body) = message.split_once("\n\n").unwrap();
        let lines: Vec<&str> = body.lines().collect();
        assert!(lines.len() > 1);
        assert!(lines.iter().all(|l| l.len() <= BASE64_LINE_LEN));

        let decoded = STANDARD.decode(lines.concat()).unwrap();
        assert_eq!(decoded, "x".repeat(120).as_bytes());
    }

    #[test]
    fn test_header_injection_stripped() {
        let mut request = sample_request("a@x.com");
        request.subject = "Hi\r\nBcc: victim@x.com".to_string();
        let message = compose_message(&request);
        assert!(message.contains("Subject: HiBcc: victim@x.com\n"));
        assert!(!message.contains("\nBcc:"));
    }

    #[test]
    fn test_non_ascii_subject_encoded() {
        assert_eq!(encode_header_value("Hello"), "Hello");
        let encoded = encode_header_value("Grüße");
        assert!(encoded.starts_with("=?UTF-8?B?"));
        assert!(encoded.ends_with("?="));
    }
}
