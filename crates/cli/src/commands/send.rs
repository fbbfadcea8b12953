//! `send` command implementation.

use std::time::Duration;

use anyhow::{Context, Result};
use contracts::RunState;
use transport::{AnyTransport, DryRunTransport};
use tracing::info;

use crate::cli::SendArgs;
use crate::session::{BatchSession, LoadedCampaign, SessionConfig};

/// Execute the `send` command
///
/// `console` selects terminal output for entries and progress; with JSON logs
/// they go through tracing instead.
pub async fn run_send(args: &SendArgs, console: bool) -> Result<()> {
    info!(config = %args.config.display(), "Loading campaign");

    let campaign = LoadedCampaign::load(&args.config, args.recipients.as_deref())?;

    // Metrics endpoint (optional)
    if args.metrics_port != 0 {
        observability::init_metrics_only(args.metrics_port)?;
        info!("Metrics endpoint available on port {}", args.metrics_port);
    }

    let transport = if args.dry_run {
        info!("Dry run - messages are composed but not delivered");
        AnyTransport::DryRun(DryRunTransport::new())
    } else {
        AnyTransport::from_config(&campaign.config.transport)
            .context("Failed to create transport")?
    };

    let delay = match args.delay_ms {
        Some(ms) => {
            info!(delay_ms = ms, "Overriding delay from CLI");
            Duration::from_millis(ms)
        }
        None => campaign.config.dispatch.delay(),
    };

    let session_config = SessionConfig {
        delay,
        status_file: args.status_file.clone(),
        read_input: !args.no_input,
        confirm_cancel: !args.yes,
        console,
    };

    info!(
        campaign = %campaign.path.display(),
        recipients = campaign.queue.len(),
        delay_ms = delay.as_millis() as u64,
        "Starting batch..."
    );

    let session = BatchSession::new(transport, campaign.config.message, session_config);
    let stats = session.run(campaign.queue).await?;

    info!(
        final_state = %stats.report.final_state,
        processed = stats.report.processed,
        sent = stats.report.succeeded,
        failed = stats.report.failed,
        duration_secs = stats.report.elapsed.as_secs_f64(),
        "Batch finished"
    );

    if console {
        stats.print_summary();
    }

    if stats.report.final_state == RunState::Cancelled {
        info!("Batch was cancelled before all recipients were processed");
    }

    Ok(())
}
