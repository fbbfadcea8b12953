//! # Config Loader
//!
//! Campaign file loading, validation and persistence.
//!
//! Responsibilities:
//! - Parse TOML/JSON campaign files
//! - Fill the message body from `body_file` (relative to the campaign file)
//! - Validate message, pacing and transport settings
//! - Save a campaign snapshot back to disk
//!
//! # Example
//!
//! ```no_run
//! use config_loader::ConfigLoader;
//! use std::path::Path;
//!
//! let campaign = ConfigLoader::load_from_path(Path::new("campaign.toml")).unwrap();
//! println!("Subject: {}", campaign.message.subject);
//! ```

mod parser;
mod validator;

pub use contracts::CampaignConfig;
pub use parser::ConfigFormat;

use contracts::ContractError;
use std::path::{Path, PathBuf};

/// Configuration loader
///
/// Provides static methods to load campaigns from files or strings.
pub struct ConfigLoader;

impl ConfigLoader {
    /// Load a campaign from file path
    ///
    /// Automatically detects format from file extension (.toml / .json).
    /// A relative `body_file` is read from the campaign file's directory.
    ///
    /// # Errors
    /// - File read failure
    /// - Unsupported format
    /// - Parse failure
    /// - Validation failure
    pub fn load_from_path(path: &Path) -> Result<CampaignConfig, ContractError> {
        let format = Self::detect_format(path)?;
        let content = Self::read_file(path)?;
        Self::parse_and_validate(&content, format, path.parent())
    }

    /// Load a campaign from string
    ///
    /// A relative `body_file` is read from the working directory.
    ///
    /// # Errors
    /// - Parse failure
    /// - Body file read failure
    /// - Validation failure
    pub fn load_from_str(
        content: &str,
        format: ConfigFormat,
    ) -> Result<CampaignConfig, ContractError> {
        Self::parse_and_validate(content, format, None)
    }

    /// Serialize a campaign to TOML string
    pub fn to_toml(config: &CampaignConfig) -> Result<String, ContractError> {
        parser::serialize(&Self::snapshot(config), ConfigFormat::Toml)
    }

    /// Serialize a campaign to JSON string
    pub fn to_json(config: &CampaignConfig) -> Result<String, ContractError> {
        parser::serialize(&Self::snapshot(config), ConfigFormat::Json)
    }

    /// Write a campaign to `path`, format chosen by extension
    ///
    /// Parent directories are created as needed.
    pub fn save_to_path(config: &CampaignConfig, path: &Path) -> Result<(), ContractError> {
        let format = Self::detect_format(path)?;
        let content = parser::serialize(&Self::snapshot(config), format)?;

        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(path, content)?;
        Ok(())
    }

    /// Check a campaign that was built in memory
    pub fn validate(config: &CampaignConfig) -> Result<(), ContractError> {
        validator::validate(config)
    }
}

impl ConfigLoader {
    /// Infer configuration format from file extension
    fn detect_format(path: &Path) -> Result<ConfigFormat, ContractError> {
        let ext = path.extension().and_then(|e| e.to_str()).ok_or_else(|| {
            ContractError::config_parse("cannot determine file format from extension")
        })?;

        ConfigFormat::from_extension(ext).ok_or_else(|| {
            ContractError::config_parse(format!("unsupported config format: .{ext}"))
        })
    }

    /// Read configuration file content
    fn read_file(path: &Path) -> Result<String, ContractError> {
        Ok(std::fs::read_to_string(path)?)
    }

    /// Parse, resolve the body file and validate
    fn parse_and_validate(
        content: &str,
        format: ConfigFormat,
        base_dir: Option<&Path>,
    ) -> Result<CampaignConfig, ContractError> {
        let mut config = parser::parse(content, format)?;
        Self::resolve_body(&mut config, base_dir)?;
        validator::validate(&config)?;
        Ok(config)
    }

    fn resolve_body(
        config: &mut CampaignConfig,
        base_dir: Option<&Path>,
    ) -> Result<(), ContractError> {
        let Some(body_file) = config.message.body_file.as_ref() else {
            return Ok(());
        };

        if !config.message.body.is_empty() {
            return Err(ContractError::config_validation(
                "message.body_file",
                "set either body or body_file, not both",
            ));
        }

        let path = resolve_path(body_file, base_dir);
        config.message.body = std::fs::read_to_string(&path).map_err(|e| {
            ContractError::config_validation(
                "message.body_file",
                format!("cannot read '{}': {e}", path.display()),
            )
        })?;
        Ok(())
    }

    /// Body loaded from `body_file` is not persisted inline
    fn snapshot(config: &CampaignConfig) -> CampaignConfig {
        let mut snapshot = config.clone();
        if snapshot.message.body_file.is_some() {
            snapshot.message.body.clear();
        }
        snapshot
    }
}

fn resolve_path(path: &Path, base_dir: Option<&Path>) -> PathBuf {
    match base_dir {
        Some(dir) if path.is_relative() => dir.join(path),
        _ => path.to_path_buf(),
    }
}
