//! Builds the registry stack described by the configuration.

use std::sync::Arc;
use std::time::Duration;

use anyhow::{bail, Context};
use tracing::{debug, info};

use chainreg_config::{Config, OverridesConfig, RegistryKind, RegistrySource};
use chainreg_core::{MergedRegistry, PartialRegistry, PartialRegistryParams, ReadOnlyRegistry};
use chainreg_protocols::{ChainMap, ChainMetadata, Registry};
use chainreg_registry_filesystem::FileSystemRegistry;
use chainreg_registry_github::{GithubRegistry, GithubRegistryOptions};

/// Create one registry per source, add the overrides layer last and merge.
pub(crate) fn build_registry(config: &Config) -> anyhow::Result<Arc<dyn Registry>> {
    let mut registries: Vec<Arc<dyn Registry>> = Vec::with_capacity(config.registries.len() + 1);

    for (i, source) in config.registries.iter().enumerate() {
        let registry = create_registry(source)
            .with_context(|| format!("Failed to create registries[{}]", i))?;
        let registry: Arc<dyn Registry> = if source.read_only {
            Arc::new(ReadOnlyRegistry::new(registry))
        } else {
            registry
        };
        info!(
            "Registered {} registry {} (read_only: {})",
            source.kind,
            registry.uri(),
            source.read_only
        );
        registries.push(registry);
    }

    if !config.overrides.is_empty() {
        let overrides = overrides_registry(&config.overrides)?;
        debug!(
            "Applying overrides for {} chains",
            config.overrides.metadata.len() + config.overrides.addresses.len()
        );
        registries.push(Arc::new(overrides));
    }

    match registries.len() {
        0 => bail!("No registries configured"),
        1 => Ok(registries.remove(0)),
        _ => Ok(Arc::new(MergedRegistry::new(registries))),
    }
}

fn create_registry(source: &RegistrySource) -> anyhow::Result<Arc<dyn Registry>> {
    match source.kind {
        RegistryKind::Filesystem => {
            let path = source
                .path
                .as_ref()
                .context("Filesystem registry requires a path")?;
            Ok(Arc::new(FileSystemRegistry::new(path)))
        }
        RegistryKind::Github => {
            let defaults = GithubRegistryOptions::default();
            let options = GithubRegistryOptions {
                uri: source.uri.clone().unwrap_or(defaults.uri),
                branch: source.branch.clone(),
                auth_token: source.auth_token.clone().filter(|t| !t.is_empty()),
                api_url: source.api_url.clone().unwrap_or(defaults.api_url),
                archive_base_url: None,
                timeout: Duration::from_secs(source.timeout_seconds),
            };
            Ok(Arc::new(GithubRegistry::new(options)?))
        }
    }
}

/// Turn `--registry` arguments into sources: URLs are GitHub repositories,
/// anything else a local directory.
pub(crate) fn sources_from_args(args: &[String]) -> Vec<RegistrySource> {
    args.iter()
        .map(|arg| {
            if arg.starts_with("http://") || arg.starts_with("https://") {
                RegistrySource {
                    uri: Some(arg.clone()),
                    ..RegistrySource::github()
                }
            } else {
                RegistrySource::filesystem(chainreg_config::ConfigLoader::expand_path(arg))
            }
        })
        .collect()
}

fn overrides_registry(overrides: &OverridesConfig) -> anyhow::Result<PartialRegistry> {
    let mut chain_metadata = ChainMap::new();
    for (chain, value) in &overrides.metadata {
        let metadata = ChainMetadata::from_value(value.clone())
            .with_context(|| format!("Invalid metadata override for {}", chain))?;
        chain_metadata.insert(chain.clone(), metadata);
    }

    let params = PartialRegistryParams {
        chain_metadata,
        chain_addresses: overrides.addresses.clone(),
        ..Default::default()
    };
    Ok(PartialRegistry::new(params)?)
}
