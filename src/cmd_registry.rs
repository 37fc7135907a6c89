//! Registry command handlers.

use std::path::Path;
use std::sync::Arc;

use anyhow::{bail, Context};
use serde::Serialize;
use tracing::{info, warn};

use chainreg_core::yaml::parse_yaml;
use chainreg_protocols::validation::{validate_chain_addresses, validate_chain_metadata};
use chainreg_protocols::{ChainMetadata, Registry, UpdateChainParams, WarpRouteFilter};

use crate::cli::{Commands, OutputFormat};

pub(crate) async fn handle_command(
    command: Commands,
    registry: Arc<dyn Registry>,
    format: OutputFormat,
) -> anyhow::Result<()> {
    match command {
        Commands::Content => print(&registry.list_registry_content().await?, format),
        Commands::Chains => print(&registry.get_chains().await?, format),
        Commands::Metadata { chain: None } => print(&registry.get_metadata().await?, format),
        Commands::Metadata { chain: Some(chain) } => {
            let metadata = registry
                .get_chain_metadata(&chain)
                .await?
                .with_context(|| format!("No metadata for chain {}", chain))?;
            print(&metadata, format)
        }
        Commands::Addresses { chain: None } => print(&registry.get_addresses().await?, format),
        Commands::Addresses { chain: Some(chain) } => {
            let addresses = registry
                .get_chain_addresses(&chain)
                .await?
                .with_context(|| format!("No addresses for chain {}", chain))?;
            print(&addresses, format)
        }
        Commands::Logo { chain } => match registry.get_chain_logo_uri(&chain).await? {
            Some(uri) => {
                println!("{}", uri);
                Ok(())
            }
            None => bail!("No logo for chain {}", chain),
        },
        Commands::WarpRoutes { symbol, chain } => {
            let filter = filter_from(symbol, chain);
            print(&registry.get_warp_routes(filter.as_ref()).await?, format)
        }
        Commands::WarpRoute { id } => {
            let route = registry
                .get_warp_route(&id)
                .await?
                .with_context(|| format!("No warp route {}", id))?;
            print(&route, format)
        }
        Commands::WarpDeployConfigs { symbol, chain } => {
            let filter = filter_from(symbol, chain);
            print(
                &registry.get_warp_deploy_configs(filter.as_ref()).await?,
                format,
            )
        }
        Commands::Validate => validate(registry.as_ref()).await,
        Commands::AddChain {
            name,
            metadata,
            addresses,
        } => add_chain(registry.as_ref(), name, &metadata, addresses.as_deref()).await,
    }
}

fn filter_from(symbol: Option<String>, chain: Option<String>) -> Option<WarpRouteFilter> {
    let filter = WarpRouteFilter {
        symbol,
        chain_name: chain,
    };
    (!filter.is_empty()).then_some(filter)
}

fn print<T: Serialize + ?Sized>(value: &T, format: OutputFormat) -> anyhow::Result<()> {
    let rendered = match format {
        OutputFormat::Json => serde_json::to_string_pretty(value)?,
        OutputFormat::Yaml => serde_yml::to_string(value)?,
    };
    println!("{}", rendered.trim_end());
    Ok(())
}

/// Check every chain's metadata against the schema.
async fn validate(registry: &dyn Registry) -> anyhow::Result<()> {
    let metadata = registry.get_metadata().await?;
    let addresses = registry.get_addresses().await?;

    let mut failures = 0;
    for (chain, record) in &metadata {
        if let Err(e) = validate_chain_metadata(record) {
            warn!("Invalid metadata for {}: {}", chain, e);
            println!("FAIL {}: {}", chain, e);
            failures += 1;
        }
    }
    for chain in addresses.keys().filter(|c| !metadata.contains_key(*c)) {
        println!("WARN {}: addresses without metadata", chain);
    }

    if failures > 0 {
        bail!("{} of {} chains failed validation", failures, metadata.len());
    }
    println!("OK {} chains", metadata.len());
    Ok(())
}

async fn add_chain(
    registry: &dyn Registry,
    name: String,
    metadata_path: &Path,
    addresses_path: Option<&Path>,
) -> anyhow::Result<()> {
    let metadata = ChainMetadata::from_value(read_yaml_file(metadata_path).await?)?;
    validate_chain_metadata(&metadata)
        .with_context(|| format!("Invalid metadata in {}", metadata_path.display()))?;

    let mut params = UpdateChainParams::new(name.clone()).with_metadata(metadata);
    if let Some(path) = addresses_path {
        let addresses = validate_chain_addresses(read_yaml_file(path).await?)
            .with_context(|| format!("Invalid addresses in {}", path.display()))?;
        params = params.with_addresses(addresses);
    }

    registry.add_chain(params).await?;
    info!("Added chain {} to {}", name, registry.uri());
    println!("Added chain {}", name);
    Ok(())
}

async fn read_yaml_file(path: &Path) -> anyhow::Result<serde_json::Value> {
    let text = tokio::fs::read_to_string(path)
        .await
        .with_context(|| format!("Failed to read {}", path.display()))?;
    Ok(parse_yaml(&text)?)
}

#[cfg(test)]
#[path = "cmd_registry_tests.rs"]
mod tests;
