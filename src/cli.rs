//! CLI definitions for chainreg.

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};

/// chainreg CLI.
#[derive(Parser)]
#[command(name = "chainreg")]
#[command(about = "Query and update chain metadata, addresses and warp route registries")]
#[command(version)]
pub(crate) struct Cli {
    /// Configuration file path (default: <config dir>/chainreg/config.toml)
    #[arg(short, long, global = true, env = "CHAINREG_CONFIG")]
    pub config: Option<PathBuf>,

    /// Registry to use instead of the configured ones; a local path or a
    /// GitHub repository URL. Repeat to stack, later ones win.
    #[arg(short, long = "registry", global = true)]
    pub registries: Vec<String>,

    /// Output format
    #[arg(short, long, value_enum, default_value_t = OutputFormat::Yaml, global = true)]
    pub format: OutputFormat,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub(crate) enum OutputFormat {
    Yaml,
    Json,
}

#[derive(Subcommand)]
pub(crate) enum Commands {
    /// Show the registry content listing
    Content,

    /// List chain names
    Chains,

    /// Show chain metadata (all chains if none is given)
    Metadata {
        /// Chain name
        chain: Option<String>,
    },

    /// Show chain addresses (all chains if none is given)
    Addresses {
        /// Chain name
        chain: Option<String>,
    },

    /// Show the logo URI of a chain
    Logo {
        /// Chain name
        chain: String,
    },

    /// List warp route configs
    WarpRoutes {
        /// Filter by token symbol
        #[arg(long)]
        symbol: Option<String>,

        /// Filter by participating chain
        #[arg(long)]
        chain: Option<String>,
    },

    /// Show one warp route config
    WarpRoute {
        /// Warp route id, e.g. USDC/base-ethereum
        id: String,
    },

    /// List warp route deploy configs
    WarpDeployConfigs {
        /// Filter by token symbol
        #[arg(long)]
        symbol: Option<String>,

        /// Filter by participating chain
        #[arg(long)]
        chain: Option<String>,
    },

    /// Validate the metadata and addresses of every chain
    Validate,

    /// Add a chain to the registry stack
    AddChain {
        /// Chain name
        name: String,

        /// Metadata YAML file
        #[arg(long)]
        metadata: PathBuf,

        /// Addresses YAML file
        #[arg(long)]
        addresses: Option<PathBuf>,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_warp_routes_filters() {
        let cli = Cli::try_parse_from([
            "chainreg",
            "warp-routes",
            "--symbol",
            "USDC",
            "--chain",
            "base",
        ])
        .unwrap();
        match cli.command {
            Commands::WarpRoutes { symbol, chain } => {
                assert_eq!(symbol.as_deref(), Some("USDC"));
                assert_eq!(chain.as_deref(), Some("base"));
            }
            _ => panic!("expected warp-routes"),
        }
        assert_eq!(cli.format, OutputFormat::Yaml);
    }

    #[test]
    fn test_parse_global_options() {
        let cli = Cli::try_parse_from([
            "chainreg",
            "metadata",
            "ethereum",
            "-r",
            "/srv/registry",
            "-r",
            "https://github.com/acme/registry",
            "--format",
            "json",
        ])
        .unwrap();
        assert_eq!(cli.registries.len(), 2);
        assert_eq!(cli.format, OutputFormat::Json);
        assert!(matches!(
            cli.command,
            Commands::Metadata { chain: Some(ref c) } if c == "ethereum"
        ));
    }

    #[test]
    fn test_add_chain_requires_metadata() {
        assert!(Cli::try_parse_from(["chainreg", "add-chain", "celo"]).is_err());
        let cli = Cli::try_parse_from([
            "chainreg",
            "add-chain",
            "celo",
            "--metadata",
            "celo.yaml",
        ])
        .unwrap();
        assert!(matches!(cli.command, Commands::AddChain { addresses: None, .. }));
    }
}
