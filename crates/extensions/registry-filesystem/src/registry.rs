//! Filesystem registry implementation.

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::fs;
use tracing::{debug, info, warn};
use walkdir::WalkDir;

use chainreg_core::yaml::{leading_comments, parse_yaml, to_yaml, with_header};
use chainreg_core::{MergedRegistry, RegistryCache};
use chainreg_protocols::content_index::{
    chain_file_path, validate_chain_name, warp_route_config_path, warp_route_deploy_path,
    ChainFileKind, CHAINS_DIR, SCHEMA_REF,
};
use chainreg_protocols::validation::validate_chain_addresses;
use chainreg_protocols::warp_id::{
    core_config_route_id, deploy_config_route_id, filter_warp_routes_ids,
};
use chainreg_protocols::{
    AddWarpRouteOptions, ChainAddresses, ChainMap, ChainMetadata, Registry, RegistryContent,
    RegistryError, RegistryType, UpdateChainParams, WarpCoreConfig, WarpDeployConfigMap,
    WarpRouteConfigMap, WarpRouteDeployConfig, WarpRouteFilter,
};

use crate::error::FileSystemRegistryError;

/// Registry backed by a local directory.
///
/// The listing and the bulk metadata/address maps are cached after the
/// first read. Writes patch those caches instead of invalidating them.
pub struct FileSystemRegistry {
    base_path: PathBuf,
    uri: String,
    cache: RegistryCache,
}

impl FileSystemRegistry {
    pub fn new(base_path: impl AsRef<Path>) -> Self {
        let base_path = base_path.as_ref().to_path_buf();
        Self {
            uri: base_path.display().to_string(),
            base_path,
            cache: RegistryCache::new(),
        }
    }

    pub fn base_path(&self) -> &Path {
        &self.base_path
    }

    pub fn cache(&self) -> &RegistryCache {
        &self.cache
    }

    async fn content(&self) -> Result<RegistryContent, RegistryError> {
        if let Some(content) = self.cache.content() {
            return Ok(content);
        }
        let content = self.scan().await?;
        self.cache.store_content(content.clone());
        Ok(content)
    }

    /// Walk the directory tree and classify every file.
    async fn scan(&self) -> Result<RegistryContent, RegistryError> {
        let base_path = self.base_path.clone();

        let content = tokio::task::spawn_blocking(move || {
            let mut content = RegistryContent::new();
            for entry in WalkDir::new(&base_path)
                .into_iter()
                .filter_map(|e| {
                    e.inspect_err(|err| warn!("Skipping unreadable registry entry: {}", err))
                        .ok()
                })
                .filter(|e| e.file_type().is_file())
            {
                let path = entry.path();
                let Ok(relative) = path.strip_prefix(&base_path) else {
                    continue;
                };
                content.insert_path(&relative.to_string_lossy(), path.display().to_string());
            }
            content
        })
        .await
        .map_err(|e| FileSystemRegistryError::Scan(e.to_string()))?;

        info!(
            "Indexed {} chains and {} warp routes under {}",
            content.chains.len(),
            content.deployments.warp_routes.len(),
            self.uri
        );
        Ok(content)
    }

    async fn read_yaml(path: &str) -> Result<Value, RegistryError> {
        let path = PathBuf::from(path);
        let text = fs::read_to_string(&path)
            .await
            .map_err(|source| FileSystemRegistryError::Read {
                path: path.clone(),
                source,
            })?;
        let value = parse_yaml(&text).map_err(|e| FileSystemRegistryError::Parse {
            path,
            reason: e.to_string(),
        })?;
        Ok(value)
    }

    async fn read_yaml_as<T: DeserializeOwned>(path: &str) -> Result<T, RegistryError> {
        let value = Self::read_yaml(path).await?;
        serde_json::from_value(value).map_err(|e| {
            FileSystemRegistryError::Parse {
                path: PathBuf::from(path),
                reason: e.to_string(),
            }
            .into()
        })
    }

    /// Write `contents` to `relative`, creating parent directories.
    /// Returns the absolute location written.
    async fn write_file(&self, relative: &str, contents: String) -> Result<String, RegistryError> {
        let path = self.base_path.join(relative);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)
                .await
                .map_err(|source| FileSystemRegistryError::Write {
                    path: parent.to_path_buf(),
                    source,
                })?;
        }
        fs::write(&path, contents)
            .await
            .map_err(|source| FileSystemRegistryError::Write {
                path: path.clone(),
                source,
            })?;
        debug!("Wrote {:?}", path);
        Ok(path.display().to_string())
    }

    /// Render a metadata document, keeping the comment header already on disk.
    async fn render_metadata(
        &self,
        relative: &str,
        metadata: &ChainMetadata,
    ) -> Result<String, RegistryError> {
        let existing = fs::read_to_string(self.base_path.join(relative)).await.ok();
        let header = existing
            .as_deref()
            .and_then(leading_comments)
            .unwrap_or_else(|| SCHEMA_REF.to_string());
        Ok(with_header(&header, &to_yaml(metadata)?))
    }

    async fn render_addresses(
        &self,
        relative: &str,
        addresses: &ChainAddresses,
    ) -> Result<String, RegistryError> {
        let existing = fs::read_to_string(self.base_path.join(relative)).await.ok();
        let body = to_yaml(addresses)?;
        Ok(match existing.as_deref().and_then(leading_comments) {
            Some(header) => with_header(&header, &body),
            None => body,
        })
    }

    /// Shared write path of `add_chain` and `update_chain`.
    async fn create_or_update(&self, chain: UpdateChainParams) -> Result<(), RegistryError> {
        chain.ensure_not_empty()?;
        validate_chain_name(&chain.chain_name)?;
        let name = &chain.chain_name;

        if let Some(metadata) = &chain.metadata {
            let relative = chain_file_path(name, ChainFileKind::Metadata);
            let contents = self.render_metadata(&relative, metadata).await?;
            let location = self.write_file(&relative, contents).await?;
            self.cache.update_content(|c| {
                c.insert_path(&relative, location);
            });
        }
        if let Some(addresses) = &chain.addresses {
            let relative = chain_file_path(name, ChainFileKind::Addresses);
            let contents = self.render_addresses(&relative, addresses).await?;
            let location = self.write_file(&relative, contents).await?;
            self.cache.update_content(|c| {
                c.insert_path(&relative, location);
            });
        }

        self.cache
            .upsert_chain(name, chain.metadata.as_ref(), chain.addresses.as_ref());
        Ok(())
    }

    async fn remove_file(path: &str) -> Result<(), RegistryError> {
        match fs::remove_file(path).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(source) => Err(FileSystemRegistryError::Write {
                path: PathBuf::from(path),
                source,
            }
            .into()),
        }
    }
}

#[async_trait]
impl Registry for FileSystemRegistry {
    fn uri(&self) -> &str {
        &self.uri
    }

    fn registry_type(&self) -> RegistryType {
        RegistryType::FileSystem
    }

    fn get_uri(&self, item_path: Option<&str>) -> Result<String, RegistryError> {
        Ok(match item_path {
            Some(item) => self.base_path.join(item).display().to_string(),
            None => self.uri.clone(),
        })
    }

    async fn list_registry_content(&self) -> Result<RegistryContent, RegistryError> {
        self.content().await
    }

    async fn get_metadata(&self) -> Result<ChainMap<ChainMetadata>, RegistryError> {
        if let Some(metadata) = self.cache.metadata() {
            return Ok(metadata);
        }

        let content = self.content().await?;
        let mut metadata = ChainMap::new();
        for (chain, files) in &content.chains {
            let Some(path) = &files.metadata else {
                continue;
            };
            let record = ChainMetadata::from_value(Self::read_yaml(path).await?)?;
            metadata.insert(chain.clone(), record);
        }

        self.cache.store_metadata(metadata.clone());
        Ok(metadata)
    }

    async fn get_addresses(&self) -> Result<ChainMap<ChainAddresses>, RegistryError> {
        if let Some(addresses) = self.cache.addresses() {
            return Ok(addresses);
        }

        let content = self.content().await?;
        let mut addresses = ChainMap::new();
        for (chain, files) in &content.chains {
            let Some(path) = &files.addresses else {
                continue;
            };
            let record = validate_chain_addresses(Self::read_yaml(path).await?)?;
            addresses.insert(chain.clone(), record);
        }

        self.cache.store_addresses(addresses.clone());
        Ok(addresses)
    }

    async fn get_chain_logo_uri(&self, chain: &str) -> Result<Option<String>, RegistryError> {
        let content = self.content().await?;
        Ok(content.chains.get(chain).and_then(|files| files.logo.clone()))
    }

    async fn add_chain(&self, chain: UpdateChainParams) -> Result<(), RegistryError> {
        if self.content().await?.has_chain(&chain.chain_name) {
            return Err(RegistryError::AlreadyExists(format!(
                "chain {}",
                chain.chain_name
            )));
        }
        self.create_or_update(chain).await
    }

    async fn update_chain(&self, chain: UpdateChainParams) -> Result<(), RegistryError> {
        if !self.content().await?.has_chain(&chain.chain_name) {
            debug!("Chain {} not in registry, creating it", chain.chain_name);
        }
        self.create_or_update(chain).await
    }

    async fn remove_chain(&self, chain: &str) -> Result<(), RegistryError> {
        let content = self.content().await?;
        let files = content
            .chains
            .get(chain)
            .ok_or_else(|| RegistryError::NotFound(format!("chain {}", chain)))?;

        for location in files.locations() {
            Self::remove_file(location).await?;
        }

        let dir = self.base_path.join(CHAINS_DIR).join(chain);
        if let Ok(mut entries) = fs::read_dir(&dir).await {
            if entries.next_entry().await?.is_none() {
                fs::remove_dir(&dir).await?;
                debug!("Removed empty directory {:?}", dir);
            }
        }

        self.cache.remove_chain(chain);
        info!("Removed chain {} from {}", chain, self.uri);
        Ok(())
    }

    async fn get_warp_route(&self, route_id: &str) -> Result<Option<WarpCoreConfig>, RegistryError> {
        let content = self.content().await?;
        match content.deployments.warp_routes.get(route_id) {
            Some(path) => Ok(Some(Self::read_yaml_as(path).await?)),
            None => Ok(None),
        }
    }

    async fn get_warp_routes(
        &self,
        filter: Option<&WarpRouteFilter>,
    ) -> Result<WarpRouteConfigMap, RegistryError> {
        let content = self.content().await?;
        let matching = filter_warp_routes_ids(&content.deployments.warp_routes, filter);

        let mut routes = WarpRouteConfigMap::new();
        for (id, path) in matching.id_map {
            routes.insert(id, Self::read_yaml_as(&path).await?);
        }
        Ok(routes)
    }

    async fn add_warp_route(
        &self,
        config: WarpCoreConfig,
        options: Option<AddWarpRouteOptions>,
    ) -> Result<(), RegistryError> {
        let id = core_config_route_id(&config, options.as_ref())?;
        let relative = warp_route_config_path(&id)?;
        let location = self.write_file(&relative, to_yaml(&config)?).await?;
        self.cache.update_content(|c| {
            c.deployments.warp_routes.insert(id.clone(), location);
        });
        info!("Added warp route {}", id);
        Ok(())
    }

    async fn add_warp_route_config(
        &self,
        config: WarpRouteDeployConfig,
        options: Option<AddWarpRouteOptions>,
    ) -> Result<(), RegistryError> {
        let id = deploy_config_route_id(&config, options.as_ref())?;
        let relative = warp_route_deploy_path(&id)?;
        let location = self.write_file(&relative, to_yaml(&config)?).await?;
        self.cache.update_content(|c| {
            c.deployments.warp_deploy_config.insert(id.clone(), location);
        });
        info!("Added warp deploy config {}", id);
        Ok(())
    }

    async fn get_warp_deploy_config(
        &self,
        route_id: &str,
    ) -> Result<Option<WarpRouteDeployConfig>, RegistryError> {
        let content = self.content().await?;
        match content.deployments.warp_deploy_config.get(route_id) {
            Some(path) => Ok(Some(Self::read_yaml_as(path).await?)),
            None => Ok(None),
        }
    }

    async fn get_warp_deploy_configs(
        &self,
        filter: Option<&WarpRouteFilter>,
    ) -> Result<WarpDeployConfigMap, RegistryError> {
        let content = self.content().await?;
        let matching = filter_warp_routes_ids(&content.deployments.warp_deploy_config, filter);

        let mut configs = WarpDeployConfigMap::new();
        for (id, path) in matching.id_map {
            configs.insert(id, Self::read_yaml_as(&path).await?);
        }
        Ok(configs)
    }

    fn merge(self: Arc<Self>, other: Arc<dyn Registry>) -> Arc<dyn Registry> {
        Arc::new(MergedRegistry::new(vec![self, other]))
    }
}

#[cfg(test)]
#[path = "registry_tests.rs"]
mod tests;
