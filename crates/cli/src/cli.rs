//! CLI argument definitions using clap.

use clap::{Parser, Subcommand, ValueEnum};
use contracts::UnhandledPolicy;
use std::path::PathBuf;

/// Bubbler - replay events bubbling through a declared node hierarchy
#[derive(Parser, Debug)]
#[command(
    name = "bubbler",
    author,
    version,
    about = "Bubbling event dispatch over a declared hierarchy",
    long_about = "Loads a hierarchy blueprint, registers its scripted handlers and \n\
                  replays its events, bubbling each one from its start node towards \n\
                  the root until a handler consumes it."
)]
pub struct Cli {
    /// Increase logging verbosity (-v for debug, -vv for trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true, env = "BUBBLER_VERBOSE")]
    pub verbose: u8,

    /// Suppress all output except errors
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Log output format
    #[arg(
        long,
        value_enum,
        default_value = "pretty",
        global = true,
        env = "BUBBLER_LOG_FORMAT"
    )]
    pub log_format: LogFormat,

    #[command(subcommand)]
    pub command: Commands,
}

/// Available CLI commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Replay the blueprint's events through the dispatcher
    Run(RunArgs),

    /// Validate a blueprint without replaying it
    Validate(ValidateArgs),

    /// Display blueprint information
    Info(InfoArgs),
}

/// Arguments for the `run` command
#[derive(Parser, Debug, Clone)]
pub struct RunArgs {
    /// Path to blueprint file (TOML or JSON)
    #[arg(
        short,
        long,
        default_value = "hierarchy.toml",
        env = "BUBBLER_CONFIG"
    )]
    pub config: PathBuf,

    /// Override the blueprint's unhandled-event policy
    #[arg(long, value_enum, env = "BUBBLER_UNHANDLED_POLICY")]
    pub policy: Option<PolicyArg>,

    /// Only replay events of this kind
    #[arg(long)]
    pub kind: Option<String>,

    /// Output per-event reports as JSON
    #[arg(long)]
    pub json: bool,

    /// Validate the blueprint and exit without replaying
    #[arg(long)]
    pub dry_run: bool,

    /// Metrics server port (0 = disabled)
    #[arg(long, default_value = "0", env = "BUBBLER_METRICS_PORT")]
    pub metrics_port: u16,
}

/// Arguments for the `validate` command
#[derive(Parser, Debug)]
pub struct ValidateArgs {
    /// Path to blueprint file to validate
    #[arg(short, long, default_value = "hierarchy.toml")]
    pub config: PathBuf,

    /// Output validation result as JSON
    #[arg(long)]
    pub json: bool,
}

/// Arguments for the `info` command
#[derive(Parser, Debug)]
pub struct InfoArgs {
    /// Path to blueprint file
    #[arg(short, long, default_value = "hierarchy.toml")]
    pub config: PathBuf,

    /// Output as JSON
    #[arg(long)]
    pub json: bool,

    /// Render the node hierarchy as a tree
    #[arg(long)]
    pub tree: bool,
}

/// Log output format
#[derive(ValueEnum, Clone, Copy, Debug, Default)]
pub enum LogFormat {
    /// JSON structured logging
    Json,
    /// Human-readable pretty format
    #[default]
    Pretty,
    /// Compact single-line format
    Compact,
}

impl From<LogFormat> for observability::LogFormat {
    fn from(format: LogFormat) -> Self {
        match format {
            LogFormat::Json => Self::Json,
            LogFormat::Pretty => Self::Pretty,
            LogFormat::Compact => Self::Compact,
        }
    }
}

/// Unhandled-event policy as accepted on the command line
#[derive(ValueEnum, Clone, Copy, Debug)]
pub enum PolicyArg {
    /// Drop unhandled events silently
    Ignore,
    /// Log a warning per unhandled event
    Warn,
    /// Stop with an error at the first unhandled event
    Fail,
    /// Panic in debug builds, warn in release builds
    Assert,
}

impl From<PolicyArg> for UnhandledPolicy {
    fn from(arg: PolicyArg) -> Self {
        match arg {
            PolicyArg::Ignore => Self::Ignore,
            PolicyArg::Warn => Self::Warn,
            PolicyArg::Fail => Self::Fail,
            PolicyArg::Assert => Self::Assert,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_run_with_policy() {
        let cli = Cli::try_parse_from([
            "bubbler", "-v", "run", "-c", "ui.toml", "--policy", "fail", "--json",
        ])
        .unwrap();

        assert_eq!(cli.verbose, 1);
        let Commands::Run(args) = cli.command else {
            panic!("expected run command");
        };
        assert_eq!(args.config, PathBuf::from("ui.toml"));
        assert_eq!(
            args.policy.map(UnhandledPolicy::from),
            Some(UnhandledPolicy::Fail)
        );
        assert!(args.json);
    }

    #[test]
    fn test_quiet_conflicts_with_verbose() {
        let result = Cli::try_parse_from(["bubbler", "-q", "-v", "validate"]);
        assert!(result.is_err());
    }

    #[test]
    fn test_info_defaults() {
        let cli = Cli::try_parse_from(["bubbler", "info", "--tree"]).unwrap();
        let Commands::Info(args) = cli.command else {
            panic!("expected info command");
        };
        assert_eq!(args.config, PathBuf::from("hierarchy.toml"));
        assert!(args.tree);
        assert!(!args.json);
    }
}
