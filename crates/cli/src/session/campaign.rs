//! Campaign file + recipient sources, loaded together.

use std::path::{Path, PathBuf};

use anyhow::Context;
use config_loader::{CampaignConfig, ConfigLoader};
use recipients::RecipientQueue;
use tracing::info;

use crate::error::{CliError, Result};

/// A campaign ready to be validated or sent
#[derive(Debug, Clone)]
pub struct LoadedCampaign {
    pub path: PathBuf,
    pub config: CampaignConfig,
    pub queue: RecipientQueue,
}

impl LoadedCampaign {
    /// Load `config_path`; `recipients_file` replaces the campaign's own sources
    pub fn load(config_path: &Path, recipients_file: Option<&Path>) -> Result<Self> {
        if !config_path.exists() {
            return Err(CliError::config_not_found(config_path));
        }

        let config = ConfigLoader::load_from_path(config_path)
            .with_context(|| format!("Failed to load campaign from {}", config_path.display()))?;

        let queue = match recipients_file {
            Some(path) => recipients::load_recipients(path),
            None => recipients::parse_sources(&config.recipients, config_path.parent()),
        }
        .map_err(|e| CliError::recipients(e.to_string()))?;

        info!(
            config = %config_path.display(),
            recipients = queue.len(),
            transport = config.transport.kind(),
            delay_ms = config.dispatch.delay_ms,
            "Campaign loaded"
        );

        Ok(Self {
            path: config_path.to_path_buf(),
            config,
            queue,
        })
    }

    /// Entries failing the address check, in queue order
    pub fn invalid_recipients(&self) -> Vec<String> {
        recipients::invalid_recipients(&self.queue)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const CAMPAIGN: &str = r#"
[message]
from_name = "Ops"
from_email = "ops@example.com"
reply_to = "reply@example.com"
subject = "Hello"
body = "Hi"

[recipients]
list = ["a@x.com"]
file = "more.txt"
"#;

    #[test]
    fn test_load_merges_sources() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("more.txt"), "b@x.com\n\n  bad \n").unwrap();
        let path = dir.path().join("campaign.toml");
        std::fs::write(&path, CAMPAIGN).unwrap();

        let campaign = LoadedCampaign::load(&path, None).unwrap();
        assert_eq!(campaign.queue.len(), 3);
        assert_eq!(campaign.invalid_recipients(), vec!["bad"]);
    }

    #[test]
    fn test_recipients_override() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("campaign.toml");
        std::fs::write(&path, CAMPAIGN).unwrap();
        let list = dir.path().join("list.txt");
        std::fs::write(&list, "c@x.com\nd@x.com\n").unwrap();

        let campaign = LoadedCampaign::load(&path, Some(&list)).unwrap();
        let addrs: Vec<String> = campaign.queue.iter().map(|r| r.to_string()).collect();
        assert_eq!(addrs, vec!["c@x.com", "d@x.com"]);
    }

    #[test]
    fn test_missing_campaign() {
        let err = LoadedCampaign::load(Path::new("/nonexistent/campaign.toml"), None).unwrap_err();
        assert!(matches!(err, CliError::ConfigNotFound { .. }));
    }

    #[test]
    fn test_missing_recipient_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("campaign.toml");
        std::fs::write(&path, CAMPAIGN).unwrap();

        let err = LoadedCampaign::load(&path, None).unwrap_err();
        assert!(matches!(err, CliError::Recipients { .. }));
    }
}
