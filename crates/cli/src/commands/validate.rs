//! `validate` command implementation.

use anyhow::{Context, Result};
use contracts::{BodyEncoding, CampaignConfig, TransportConfig};
use serde::Serialize;
use tracing::info;

use crate::cli::ValidateArgs;
use crate::session::LoadedCampaign;

/// Validation result for JSON output
#[derive(Serialize)]
struct ValidationResult {
    valid: bool,
    config_path: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    invalid_recipients: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    warnings: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    summary: Option<CampaignSummary>,
}

#[derive(Serialize)]
struct CampaignSummary {
    version: String,
    subject: String,
    recipient_count: usize,
    transport: String,
    delay_ms: u64,
}

/// Execute the `validate` command
pub fn run_validate(args: &ValidateArgs) -> Result<()> {
    info!(config = %args.config.display(), "Validating campaign");

    let result = validate_campaign(args);

    if args.json {
        let json = serde_json::to_string_pretty(&result)
            .context("Failed to serialize validation result")?;
        println!("{}", json);
    } else {
        print_validation_result(&result);
    }

    if result.valid {
        Ok(())
    } else {
        anyhow::bail!("Campaign validation failed")
    }
}

fn validate_campaign(args: &ValidateArgs) -> ValidationResult {
    let config_path = args.config.display().to_string();

    let campaign = match LoadedCampaign::load(&args.config, args.recipients.as_deref()) {
        Ok(campaign) => campaign,
        Err(e) => {
            return ValidationResult {
                valid: false,
                config_path,
                error: Some(format!("{e:#}")),
                invalid_recipients: Vec::new(),
                warnings: None,
                summary: None,
            }
        }
    };

    let invalid = campaign.invalid_recipients();
    let error = if campaign.queue.is_empty() {
        Some("Please enter at least one recipient email".to_string())
    } else if !invalid.is_empty() {
        Some(format!("Invalid email addresses found: {}", invalid.join(", ")))
    } else {
        None
    };

    let warnings = collect_warnings(&campaign.config);
    ValidationResult {
        valid: error.is_none(),
        config_path,
        error,
        invalid_recipients: invalid,
        warnings: if warnings.is_empty() {
            None
        } else {
            Some(warnings)
        },
        summary: Some(CampaignSummary {
            version: format!("{:?}", campaign.config.version),
            subject: campaign.config.message.subject.clone(),
            recipient_count: campaign.queue.len(),
            transport: campaign.config.transport.kind().to_string(),
            delay_ms: campaign.config.dispatch.delay_ms,
        }),
    }
}

/// Collect campaign warnings (non-fatal issues)
fn collect_warnings(config: &CampaignConfig) -> Vec<String> {
    let mut warnings = Vec::new();

    if config.message.base64 && config.message.body_encoding == BodyEncoding::Plain {
        warnings.push("base64 = true is ignored for plain-text bodies".to_string());
    }

    if config.transport == TransportConfig::DryRun {
        warnings.push("transport is dry_run - nothing will be delivered".to_string());
    }

    if let TransportConfig::Http { endpoint, .. } = &config.transport {
        if endpoint.starts_with("http://") {
            warnings.push(format!("endpoint {endpoint} is not using TLS"));
        }
    }

    warnings
}

fn print_validation_result(result: &ValidationResult) {
    if result.valid {
        println!("✓ Campaign is valid: {}", result.config_path);
    } else {
        println!("✗ Campaign is invalid: {}", result.config_path);
        if let Some(ref error) = result.error {
            println!("\n  Error: {}", error);
        }
    }

    if let Some(ref summary) = result.summary {
        println!("\n  Version: {}", summary.version);
        println!("  Subject: {}", summary.subject);
        println!("  Recipients: {}", summary.recipient_count);
        println!("  Transport: {}", summary.transport);
        println!("  Delay: {} ms", summary.delay_ms);
    }

    if let Some(ref warnings) = result.warnings {
        println!("\n⚠ Warnings:");
        for warning in warnings {
            println!("  - {}", warning);
        }
    }
}
