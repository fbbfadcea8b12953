//! # Mailer CLI
//!
//! 命令行接口入口点。
//!
//! 提供：
//! - 活动配置加载与验证
//! - 批量发送与交互控制 (暂停 / 恢复 / 取消)
//! - 示例配置生成

mod cli;
mod commands;
mod error;
mod session;

use anyhow::Result;
use clap::Parser;
use tracing::info;

use cli::{Cli, Commands};
use commands::{run_info, run_init, run_send, run_validate};

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file if present
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    // Initialize logging based on CLI options
    observability::init_logging(&cli.logging_config())?;

    info!(version = env!("CARGO_PKG_VERSION"), "Mailer CLI starting");

    // Execute command
    let result = match &cli.command {
        Commands::Send(args) => {
            let console = !cli.quiet && !matches!(cli.log_format, cli::LogFormat::Json);
            run_send(args, console).await
        }
        Commands::Validate(args) => run_validate(args),
        Commands::Info(args) => run_info(args),
        Commands::Init(args) => run_init(args),
    };

    if let Err(ref e) = result {
        tracing::error!(error = %e, "Command failed");
    }

    result
}
