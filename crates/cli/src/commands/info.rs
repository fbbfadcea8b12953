//! `info` command implementation.

use anyhow::{Context, Result};
use contracts::TransportConfig;
use serde::Serialize;
use tracing::info;

use crate::cli::InfoArgs;
use crate::session::LoadedCampaign;

/// Campaign info for JSON output
#[derive(Serialize)]
struct CampaignInfo {
    version: String,
    message: MessageInfo,
    recipient_count: usize,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    recipients: Vec<String>,
    delay_ms: u64,
    transport: TransportInfo,
}

#[derive(Serialize)]
struct MessageInfo {
    from: String,
    reply_to: String,
    subject: String,
    body_encoding: String,
    base64: bool,
    body_bytes: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    body_file: Option<String>,
}

#[derive(Serialize)]
struct TransportInfo {
    kind: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    target: Option<String>,
}

/// Execute the `info` command
pub fn run_info(args: &InfoArgs) -> Result<()> {
    info!(config = %args.config.display(), "Loading campaign info");

    let campaign = LoadedCampaign::load(&args.config, None)?;

    if args.json {
        let info = build_campaign_info(&campaign, args);
        let json =
            serde_json::to_string_pretty(&info).context("Failed to serialize campaign info")?;
        println!("{}", json);
    } else {
        print_campaign_info(&campaign, args);
    }

    Ok(())
}

fn transport_target(transport: &TransportConfig) -> Option<String> {
    match transport {
        TransportConfig::Http {
            endpoint,
            timeout_ms,
        } => Some(format!("{endpoint} (timeout {timeout_ms} ms)")),
        TransportConfig::Sendmail { program, args } => {
            Some(format!("{} {}", program.display(), args.join(" ")).trim_end().to_string())
        }
        TransportConfig::DryRun => None,
    }
}

fn build_campaign_info(campaign: &LoadedCampaign, args: &InfoArgs) -> CampaignInfo {
    let config = &campaign.config;
    let message = &config.message;

    let recipients = if args.recipients {
        campaign.queue.iter().map(|r| r.to_string()).collect()
    } else {
        Vec::new()
    };

    CampaignInfo {
        version: format!("{:?}", config.version),
        message: MessageInfo {
            from: format!("{} <{}>", message.from_name, message.from_email),
            reply_to: message.reply_to.clone(),
            subject: message.subject.clone(),
            body_encoding: message.body_encoding.as_str().to_string(),
            base64: message.base64,
            body_bytes: message.body.len(),
            body_file: message
                .body_file
                .as_ref()
                .map(|p| p.display().to_string()),
        },
        recipient_count: campaign.queue.len(),
        recipients,
        delay_ms: config.dispatch.delay_ms,
        transport: TransportInfo {
            kind: config.transport.kind().to_string(),
            target: transport_target(&config.transport),
        },
    }
}

fn print_campaign_info(campaign: &LoadedCampaign, args: &InfoArgs) {
    let config = &campaign.config;
    let message = &config.message;

    println!("╔══════════════════════════════════════════════════════════════╗");
    println!("║                     Mailer Campaign                          ║");
    println!("╚══════════════════════════════════════════════════════════════╝\n");

    println!("✉️  Message");
    println!("   ├─ Version: {:?}", config.version);
    println!("   ├─ From: {} <{}>", message.from_name, message.from_email);
    println!("   ├─ Reply-To: {}", message.reply_to);
    println!("   ├─ Subject: {}", message.subject);
    println!(
        "   ├─ Body: {} ({} bytes{})",
        message.body_encoding.content_type(),
        message.body.len(),
        if message.base64 { ", base64" } else { "" }
    );
    match &message.body_file {
        Some(path) => println!("   └─ Body file: {}", path.display()),
        None => println!("   └─ Body file: (inline)"),
    }

    println!("\n👥 Recipients ({})", campaign.queue.len());
    if args.recipients {
        let count = campaign.queue.len();
        for (i, recipient) in campaign.queue.iter().enumerate() {
            let prefix = if i + 1 == count { "└─" } else { "├─" };
            println!("   {} {}", prefix, recipient);
        }
    }

    println!("\n⚙️  Dispatch");
    println!("   ├─ Delay: {} ms", config.dispatch.delay_ms);
    match transport_target(&config.transport) {
        Some(target) => {
            println!("   ├─ Transport: {}", config.transport.kind());
            println!("   └─ Target: {}", target);
        }
        None => println!("   └─ Transport: {}", config.transport.kind()),
    }

    println!();
}
