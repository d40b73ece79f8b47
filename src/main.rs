use clap::Parser;
use eyre::{Context, Result};

mod cli;
mod config;
mod entries;
mod environment;
mod hook;
mod ini;
mod logging;
mod materializer;
mod output;
mod phase;
mod services;

use cli::{Cli, OutputFormat};
use config::Config;
use entries::ENTRIES;
use environment::Environment;
use hook::{Hook, Outcome};
use output::get_formatter;
use phase::Invocation;
use services::EnabledServices;

fn main() -> Result<()> {
    // Parse CLI arguments
    let cli = Cli::parse();

    logging::init_tracing(cli.effective_log_level(), cli.log_format)?;

    // Handle special commands
    if cli.list_entries {
        println!("{}", get_formatter(&cli.format).format_entries(ENTRIES));
        return Ok(());
    }

    if cli.show_config {
        let config = Config::load(cli.config.as_ref()).context("Failed to load configuration")?;
        return show_config(&config);
    }

    // Phase and sub-phase alone decide most invocations; those never read the config file
    let invocation = Invocation::from_args(cli.phase.as_deref(), cli.sub_phase.as_deref());
    if let Some(reason) = invocation.argument_skip() {
        tracing::info!(%reason, "skipping tempest configuration");
        report(&Outcome::Skipped(reason), &cli);
        return Ok(());
    }

    let config = Config::load(cli.config.as_ref()).context("Failed to load configuration")?;

    let services = EnabledServices::parse(&cli.enabled_services);
    tracing::debug!(services = ?services.names(), "enabled services");

    let hook = Hook {
        invocation,
        services: &services,
        config: &config,
        destination: cli.tempest_config.clone(),
        dry_run: cli.dry_run,
    };

    let outcome = hook
        .run(Environment::from_process())
        .context("Failed to configure tempest")?;

    report(&outcome, &cli);

    Ok(())
}

/// Print the outcome in the requested format
fn report(outcome: &Outcome, cli: &Cli) {
    if should_print(outcome, cli) {
        println!("{}", get_formatter(&cli.format).format_outcome(outcome));
    }
}

/// Show the effective configuration
fn show_config(config: &Config) -> Result<()> {
    let yaml = serde_yaml::to_string(config).context("Failed to serialize configuration")?;

    println!("Effective configuration:");
    println!("{}", yaml);

    Ok(())
}

/// Skipped invocations stay silent unless asked for
fn should_print(outcome: &Outcome, cli: &Cli) -> bool {
    match outcome {
        Outcome::Configured { .. } => true,
        Outcome::Skipped(_) => cli.verbose || cli.format == OutputFormat::Json,
    }
}
