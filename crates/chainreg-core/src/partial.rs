//! In-memory partial registry.
//!
//! Built directly from (possibly incomplete) records. Used as an override
//! layer at the end of a merged registry.

use async_trait::async_trait;
use parking_lot::RwLock;
use std::sync::Arc;
use tracing::debug;

use chainreg_protocols::content_index::{
    chain_file_path, validate_chain_name, warp_route_config_path, warp_route_deploy_path,
    ChainFileKind,
};
use chainreg_protocols::warp_id::{
    core_config_route_id, deploy_config_route_id, filter_warp_routes_ids, validate_warp_route_id,
};
use chainreg_protocols::{
    AddWarpRouteOptions, ChainAddresses, ChainMap, ChainMetadata, Registry, RegistryContent,
    RegistryError, RegistryMethod, RegistryType, UpdateChainParams, WarpCoreConfig,
    WarpDeployConfigMap, WarpRouteConfigMap, WarpRouteDeployConfig, WarpRouteFilter,
};

use crate::merged::MergedRegistry;

pub const PARTIAL_REGISTRY_URI: &str = "partial";

/// Records a [`PartialRegistry`] starts with.
#[derive(Debug, Clone, Default)]
pub struct PartialRegistryParams {
    pub chain_metadata: ChainMap<ChainMetadata>,
    pub chain_addresses: ChainMap<ChainAddresses>,
    /// Core configs; each is stored under the id derived from its tokens.
    pub warp_routes: Vec<WarpCoreConfig>,
    pub warp_deploy_configs: WarpDeployConfigMap,
}

#[derive(Debug, Default)]
struct PartialState {
    metadata: ChainMap<ChainMetadata>,
    addresses: ChainMap<ChainAddresses>,
    warp_routes: WarpRouteConfigMap,
    warp_deploy_configs: WarpDeployConfigMap,
}

pub struct PartialRegistry {
    state: RwLock<PartialState>,
}

impl PartialRegistry {
    pub fn new(params: PartialRegistryParams) -> Result<Self, RegistryError> {
        let mut warp_routes = WarpRouteConfigMap::new();
        for config in params.warp_routes {
            let id = core_config_route_id(&config, None)?;
            warp_routes.insert(id, config);
        }
        for id in params.warp_deploy_configs.keys() {
            validate_warp_route_id(id)?;
        }

        Ok(Self {
            state: RwLock::new(PartialState {
                metadata: params.chain_metadata,
                addresses: params.chain_addresses,
                warp_routes,
                warp_deploy_configs: params.warp_deploy_configs,
            }),
        })
    }

    pub fn empty() -> Self {
        Self {
            state: RwLock::new(PartialState::default()),
        }
    }

    fn upsert(&self, chain: UpdateChainParams) {
        let mut state = self.state.write();
        if let Some(metadata) = chain.metadata {
            state.metadata.insert(chain.chain_name.clone(), metadata);
        }
        if let Some(addresses) = chain.addresses {
            state.addresses.insert(chain.chain_name, addresses);
        }
    }
}

#[async_trait]
impl Registry for PartialRegistry {
    fn uri(&self) -> &str {
        PARTIAL_REGISTRY_URI
    }

    fn registry_type(&self) -> RegistryType {
        RegistryType::Partial
    }

    fn unimplemented_methods(&self) -> &[RegistryMethod] {
        &[RegistryMethod::GetUri]
    }

    fn get_uri(&self, _item_path: Option<&str>) -> Result<String, RegistryError> {
        Err(RegistryError::unimplemented(
            RegistryType::Partial,
            RegistryMethod::GetUri,
        ))
    }

    async fn list_registry_content(&self) -> Result<RegistryContent, RegistryError> {
        let state = self.state.read();
        let mut content = RegistryContent::new();

        for chain in state.metadata.keys() {
            let path = chain_file_path(chain, ChainFileKind::Metadata);
            content.insert_path(&path, path.clone());
        }
        for chain in state.addresses.keys() {
            let path = chain_file_path(chain, ChainFileKind::Addresses);
            content.insert_path(&path, path.clone());
        }
        for id in state.warp_routes.keys() {
            let path = warp_route_config_path(id)?;
            content.deployments.warp_routes.insert(id.clone(), path);
        }
        for id in state.warp_deploy_configs.keys() {
            let path = warp_route_deploy_path(id)?;
            content.deployments.warp_deploy_config.insert(id.clone(), path);
        }

        Ok(content)
    }

    async fn get_metadata(&self) -> Result<ChainMap<ChainMetadata>, RegistryError> {
        Ok(self.state.read().metadata.clone())
    }

    async fn get_addresses(&self) -> Result<ChainMap<ChainAddresses>, RegistryError> {
        Ok(self.state.read().addresses.clone())
    }

    async fn get_chain_logo_uri(&self, _chain: &str) -> Result<Option<String>, RegistryError> {
        Ok(None)
    }

    async fn add_chain(&self, chain: UpdateChainParams) -> Result<(), RegistryError> {
        chain.ensure_not_empty()?;
        validate_chain_name(&chain.chain_name)?;
        {
            let state = self.state.read();
            if state.metadata.contains_key(&chain.chain_name)
                || state.addresses.contains_key(&chain.chain_name)
            {
                return Err(RegistryError::AlreadyExists(format!(
                    "chain {}",
                    chain.chain_name
                )));
            }
        }
        self.upsert(chain);
        Ok(())
    }

    async fn update_chain(&self, chain: UpdateChainParams) -> Result<(), RegistryError> {
        chain.ensure_not_empty()?;
        validate_chain_name(&chain.chain_name)?;
        self.upsert(chain);
        Ok(())
    }

    async fn remove_chain(&self, chain: &str) -> Result<(), RegistryError> {
        let mut state = self.state.write();
        let had_metadata = state.metadata.remove(chain).is_some();
        let had_addresses = state.addresses.remove(chain).is_some();
        if !had_metadata && !had_addresses {
            return Err(RegistryError::NotFound(format!("chain {}", chain)));
        }
        debug!("Removed chain {} from partial registry", chain);
        Ok(())
    }

    async fn get_warp_route(&self, route_id: &str) -> Result<Option<WarpCoreConfig>, RegistryError> {
        Ok(self.state.read().warp_routes.get(route_id).cloned())
    }

    async fn get_warp_routes(
        &self,
        filter: Option<&WarpRouteFilter>,
    ) -> Result<WarpRouteConfigMap, RegistryError> {
        let state = self.state.read();
        Ok(filter_warp_routes_ids(&state.warp_routes, filter).id_map)
    }

    async fn add_warp_route(
        &self,
        config: WarpCoreConfig,
        options: Option<AddWarpRouteOptions>,
    ) -> Result<(), RegistryError> {
        let id = core_config_route_id(&config, options.as_ref())?;
        self.state.write().warp_routes.insert(id, config);
        Ok(())
    }

    async fn add_warp_route_config(
        &self,
        config: WarpRouteDeployConfig,
        options: Option<AddWarpRouteOptions>,
    ) -> Result<(), RegistryError> {
        let id = deploy_config_route_id(&config, options.as_ref())?;
        self.state.write().warp_deploy_configs.insert(id, config);
        Ok(())
    }

    async fn get_warp_deploy_config(
        &self,
        route_id: &str,
    ) -> Result<Option<WarpRouteDeployConfig>, RegistryError> {
        Ok(self.state.read().warp_deploy_configs.get(route_id).cloned())
    }

    async fn get_warp_deploy_configs(
        &self,
        filter: Option<&WarpRouteFilter>,
    ) -> Result<WarpDeployConfigMap, RegistryError> {
        let state = self.state.read();
        Ok(filter_warp_routes_ids(&state.warp_deploy_configs, filter).id_map)
    }

    fn merge(self: Arc<Self>, other: Arc<dyn Registry>) -> Arc<dyn Registry> {
        Arc::new(MergedRegistry::new(vec![self, other]))
    }
}

#[cfg(test)]
#[path = "partial_tests.rs"]
mod tests;
