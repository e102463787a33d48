//! # Bubbler CLI
//!
//! 命令行接口入口点。
//!
//! 提供：
//! - 层级蓝图加载与验证
//! - 事件回放 (冒泡分发)

mod cli;
mod commands;
mod error;
mod replay;

use anyhow::Result;
use clap::Parser;
use observability::ObservabilityConfig;
use tracing::info;

use cli::{Cli, Commands};
use commands::{run_info, run_replay, run_validate};

fn main() -> Result<()> {
    // Load .env file if present
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    observability::init_with_config(observability_config(&cli))?;

    info!(version = env!("CARGO_PKG_VERSION"), "Bubbler CLI starting");

    let result = match &cli.command {
        Commands::Run(args) => run_replay(args),
        Commands::Validate(args) => run_validate(args),
        Commands::Info(args) => run_info(args),
    };

    if let Err(ref e) = result {
        tracing::error!(error = %e, "Command failed");
    }

    result
}

/// Map global flags (and `run --metrics-port`) onto the observability setup
fn observability_config(cli: &Cli) -> ObservabilityConfig {
    let metrics_port = match &cli.command {
        Commands::Run(args) if args.metrics_port != 0 => Some(args.metrics_port),
        _ => None,
    };

    ObservabilityConfig {
        log_format: cli.log_format.into(),
        metrics_port,
        ..ObservabilityConfig::default()
    }
    .with_verbosity(cli.verbose, cli.quiet)
}
