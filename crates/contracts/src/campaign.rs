//! CampaignConfig - Config Loader output
//!
//! Persisted snapshot of one mailing: message template, recipients,
//! dispatch pacing and transport selection.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

use crate::MessageTemplate;

/// Configuration version
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum ConfigVersion {
    #[default]
    V1,
}

/// Complete campaign description
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CampaignConfig {
    #[serde(default)]
    pub version: ConfigVersion,

    /// Message shared by all recipients
    pub message: MessageTemplate,

    /// Recipient sources
    #[serde(default)]
    pub recipients: RecipientsConfig,

    /// Loop pacing
    #[serde(default)]
    pub dispatch: DispatchSettings,

    /// Delivery transport
    #[serde(default)]
    pub transport: TransportConfig,
}

/// Recipient sources; `list` entries come first, then the file's lines
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RecipientsConfig {
    /// Inline recipients
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub list: Vec<String>,

    /// Multi-line recipient file, resolved relative to the campaign file
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub file: Option<PathBuf>,
}

/// Dispatch loop settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DispatchSettings {
    /// Pause between two sends (milliseconds)
    #[serde(default = "default_delay_ms")]
    pub delay_ms: u64,
}

impl DispatchSettings {
    pub fn delay(&self) -> Duration {
        Duration::from_millis(self.delay_ms)
    }
}

impl Default for DispatchSettings {
    fn default() -> Self {
        Self {
            delay_ms: default_delay_ms(),
        }
    }
}

fn default_delay_ms() -> u64 {
    500
}

/// Transport selection
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum TransportConfig {
    /// POST form fields to a mail endpoint returning `{success, message}`
    Http {
        endpoint: String,
        #[serde(default = "default_http_timeout_ms")]
        timeout_ms: u64,
    },
    /// Pipe composed messages to a sendmail-compatible program
    Sendmail {
        #[serde(default = "default_sendmail_program")]
        program: PathBuf,
        #[serde(default = "default_sendmail_args")]
        args: Vec<String>,
    },
    /// Compose and log only
    #[default]
    DryRun,
}

impl TransportConfig {
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Http { .. } => "http",
            Self::Sendmail { .. } => "sendmail",
            Self::DryRun => "dry_run",
        }
    }
}

fn default_http_timeout_ms() -> u64 {
    30_000
}

fn default_sendmail_program() -> PathBuf {
    PathBuf::from("/usr/sbin/sendmail")
}

fn default_sendmail_args() -> Vec<String> {
    vec!["-t".to_string(), "-i".to_string()]
}
