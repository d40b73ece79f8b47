use clap::{Parser, ValueEnum};
use std::path::PathBuf;

/// Output format for the run report
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable output with colors
    #[default]
    Human,
    /// JSON format for machine processing
    Json,
}

/// Log line format
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum LogFormat {
    #[default]
    Text,
    Json,
}

/// Command-line interface for the whitebox devstack hook
#[derive(Parser, Debug)]
#[command(
    name = "whitebox-devstack",
    about = "Write whitebox tempest settings into tempest.conf during devstack provisioning",
    version = env!("GIT_DESCRIBE"),
    after_help = "Only `stack test-config` with tempest enabled does anything; every other call is a no-op."
)]
pub struct Cli {
    /// Devstack phase (source, stack, unstack, clean)
    pub phase: Option<String>,

    /// Devstack stack sub-phase (pre-install, install, post-config, extra, test-config)
    pub sub_phase: Option<String>,

    /// Tempest configuration file to write
    #[arg(long, env = "TEMPEST_CONFIG", value_name = "PATH")]
    pub tempest_config: Option<PathBuf>,

    /// Comma-separated list of enabled devstack services
    #[arg(long, env = "ENABLED_SERVICES", default_value = "", hide_default_value = true)]
    pub enabled_services: String,

    /// Configuration file path
    #[arg(short, long, help = "Path to configuration file")]
    pub config: Option<PathBuf>,

    /// Output format
    #[arg(short = 'f', long, value_enum, default_value = "human", help = "Output format")]
    pub format: OutputFormat,

    /// Resolve and report settings without saving the file
    #[arg(long)]
    pub dry_run: bool,

    /// List the settings this tool writes and exit
    #[arg(long, help = "List all settings and their source variables and exit")]
    pub list_entries: bool,

    /// Show configuration and exit
    #[arg(long, help = "Show effective configuration and exit")]
    pub show_config: bool,

    /// Log level used when RUST_LOG is unset
    #[arg(long, value_name = "LEVEL")]
    pub log_level: Option<String>,

    /// Log line format
    #[arg(long, value_enum, default_value = "text")]
    pub log_format: LogFormat,

    /// Enable verbose output
    #[arg(short, long, help = "Enable verbose output")]
    pub verbose: bool,
}

impl Cli {
    /// Log level from the flags: explicit level, then verbosity, then warn
    pub fn effective_log_level(&self) -> &str {
        match (&self.log_level, self.verbose) {
            (Some(level), _) => level.as_str(),
            (None, true) => "info",
            (None, false) => "warn",
        }
    }
}
