//! `init` command implementation.

use anyhow::{Context, Result};
use config_loader::ConfigLoader;
use contracts::{
    BodyEncoding, CampaignConfig, ConfigVersion, DispatchSettings, MessageTemplate,
    RecipientsConfig, TransportConfig,
};
use tracing::info;

use crate::cli::InitArgs;
use crate::error::CliError;

/// Execute the `init` command
pub fn run_init(args: &InitArgs) -> Result<()> {
    if args.output.exists() && !args.force {
        return Err(CliError::output_exists(&args.output).into());
    }

    let campaign = sample_campaign();
    ConfigLoader::validate(&campaign).context("Sample campaign is invalid")?;
    ConfigLoader::save_to_path(&campaign, &args.output)
        .with_context(|| format!("Failed to write {}", args.output.display()))?;

    info!(output = %args.output.display(), "Sample campaign written");
    println!("✓ Sample campaign written to {}", args.output.display());
    println!("  Edit it, then run: mailer validate --config {}", args.output.display());
    Ok(())
}

/// Starting point for a new campaign (dry run until a transport is chosen)
pub fn sample_campaign() -> CampaignConfig {
    CampaignConfig {
        version: ConfigVersion::V1,
        message: MessageTemplate {
            from_name: "Newsletter Team".to_string(),
            from_email: "newsletter@example.com".to_string(),
            reply_to: "support@example.com".to_string(),
            subject: "Monthly update".to_string(),
            body_encoding: BodyEncoding::Html,
            base64: false,
            body: "<h1>Hello!</h1>\n<p>Here is what happened this month.</p>".to_string(),
            body_file: None,
        },
        recipients: RecipientsConfig {
            list: vec![
                "alice@example.com".to_string(),
                "bob@example.com".to_string(),
            ],
            file: None,
        },
        dispatch: DispatchSettings::default(),
        transport: TransportConfig::DryRun,
    }
}
