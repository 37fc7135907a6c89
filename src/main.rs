//! chainreg - registry of chain metadata, addresses and warp routes
//!
//! Main entry point for the chainreg CLI.

mod cli;
mod cmd_registry;
mod register;

use clap::Parser;
use tracing::{debug, error};
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use chainreg_config::{Config, ConfigLoader, ConfigValidator};

use crate::cli::Cli;
use crate::cmd_registry::handle_command;
use crate::register::{build_registry, sources_from_args};

/// Initialize tracing to stderr so command output stays clean on stdout.
///
/// `RUST_LOG` wins over the configured level.
fn init_tracing(default_level: &str) {
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(default_level))
        .unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::registry()
        .with(env_filter)
        .with(
            fmt::layer()
                .with_target(true)
                .with_writer(std::io::stderr),
        )
        .init();
}

fn load_config(cli: &Cli) -> anyhow::Result<Config> {
    let mut config = ConfigLoader::load_or_default(cli.config.as_deref())?;
    if !cli.registries.is_empty() {
        config.registries = sources_from_args(&cli.registries);
    }
    Ok(config)
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let config = load_config(&cli)?;
    init_tracing(&config.logging.level);

    let mut failures = 0;
    for issue in ConfigValidator::validate(&config) {
        if issue.is_error() {
            error!("Config error at {}", issue);
            failures += 1;
        } else {
            debug!("Config warning at {}", issue);
        }
    }
    if failures > 0 {
        anyhow::bail!("Invalid configuration ({} errors)", failures);
    }

    let registry = build_registry(&config)?;
    handle_command(cli.command, registry, cli.format).await
}
