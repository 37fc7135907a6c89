//! Merged registry implementation.
//!
//! Composes an ordered list of member registries into one. Reads fan out to
//! every member concurrently and are deep-merged left to right, so later
//! members override earlier ones. Writes fan out sequentially and never
//! fail: a member error is logged and the next member is tried.

use async_trait::async_trait;
use futures::future::join_all;
use std::future::Future;
use std::sync::Arc;
use tracing::{debug, error, info, warn};

use chainreg_protocols::{
    AddWarpRouteOptions, ChainAddresses, ChainMap, ChainMetadata, Registry, RegistryContent,
    RegistryError, RegistryMethod, RegistryType, UpdateChainParams, WarpCoreConfig,
    WarpDeployConfigMap, WarpRouteConfigMap, WarpRouteDeployConfig, WarpRouteFilter,
};

use crate::merge::merge_all;

pub const MERGED_REGISTRY_URI: &str = "merged";

/// Registry that aggregates several member registries.
pub struct MergedRegistry {
    registries: Vec<Arc<dyn Registry>>,
}

impl MergedRegistry {
    pub fn new(registries: Vec<Arc<dyn Registry>>) -> Self {
        debug!("Creating merged registry with {} members", registries.len());
        Self { registries }
    }

    /// Members in override order (last wins).
    pub fn registries(&self) -> &[Arc<dyn Registry>] {
        &self.registries
    }

    /// Run `read` on every member supporting `method`, dropping failures.
    async fn read_all<T, F, Fut>(&self, method: RegistryMethod, read: F) -> Vec<T>
    where
        T: Send,
        F: Fn(Arc<dyn Registry>) -> Fut + Send + Sync,
        Fut: Future<Output = Result<T, RegistryError>> + Send,
    {
        let reads: Vec<_> = self
            .registries
            .iter()
            .filter(|registry| registry.supports(method))
            .map(|registry| {
                let uri = registry.uri().to_string();
                let pending = read(registry.clone());
                async move { (uri, pending.await) }
            })
            .collect();

        join_all(reads)
            .await
            .into_iter()
            .filter_map(|(uri, result)| match result {
                Ok(value) => Some(value),
                Err(e) => {
                    warn!("Registry {} failed {}: {}", uri, method, e);
                    None
                }
            })
            .collect()
    }

    /// Run `write` on every member in order. Errors are logged, never returned.
    async fn write_all<F, Fut>(&self, method: RegistryMethod, write: F) -> Result<(), RegistryError>
    where
        F: Fn(Arc<dyn Registry>) -> Fut + Send + Sync,
        Fut: Future<Output = Result<(), RegistryError>> + Send,
    {
        for registry in &self.registries {
            if !registry.supports(method) {
                info!(
                    "Skipping {} on {} registry {}: not supported",
                    method,
                    registry.registry_type(),
                    registry.uri()
                );
                continue;
            }
            if let Err(e) = write(registry.clone()).await {
                error!("Registry {} failed {}: {}", registry.uri(), method, e);
            }
        }
        Ok(())
    }
}

#[async_trait]
impl Registry for MergedRegistry {
    fn uri(&self) -> &str {
        MERGED_REGISTRY_URI
    }

    fn registry_type(&self) -> RegistryType {
        RegistryType::Merged
    }

    fn unimplemented_methods(&self) -> &[RegistryMethod] {
        &[RegistryMethod::GetUri]
    }

    fn get_uri(&self, _item_path: Option<&str>) -> Result<String, RegistryError> {
        Err(RegistryError::unimplemented(
            RegistryType::Merged,
            RegistryMethod::GetUri,
        ))
    }

    async fn list_registry_content(&self) -> Result<RegistryContent, RegistryError> {
        let results = self
            .read_all(RegistryMethod::ListRegistryContent, |r| async move {
                r.list_registry_content().await
            })
            .await;
        merge_all(results)
    }

    async fn get_metadata(&self) -> Result<ChainMap<ChainMetadata>, RegistryError> {
        let results = self
            .read_all(RegistryMethod::GetMetadata, |r| async move {
                r.get_metadata().await
            })
            .await;
        merge_all(results)
    }

    async fn get_addresses(&self) -> Result<ChainMap<ChainAddresses>, RegistryError> {
        let results = self
            .read_all(RegistryMethod::GetAddresses, |r| async move {
                r.get_addresses().await
            })
            .await;
        merge_all(results)
    }

    async fn get_chain_logo_uri(&self, chain: &str) -> Result<Option<String>, RegistryError> {
        let chain = chain.to_string();
        let results = self
            .read_all(RegistryMethod::GetChainLogoUri, |r| {
                let chain = chain.clone();
                async move { r.get_chain_logo_uri(&chain).await }
            })
            .await;
        Ok(results.into_iter().flatten().last())
    }

    async fn add_chain(&self, chain: UpdateChainParams) -> Result<(), RegistryError> {
        self.write_all(RegistryMethod::AddChain, |r| {
            let chain = chain.clone();
            async move { r.add_chain(chain).await }
        })
        .await
    }

    async fn update_chain(&self, chain: UpdateChainParams) -> Result<(), RegistryError> {
        self.write_all(RegistryMethod::UpdateChain, |r| {
            let chain = chain.clone();
            async move { r.update_chain(chain).await }
        })
        .await
    }

    async fn remove_chain(&self, chain: &str) -> Result<(), RegistryError> {
        let chain = chain.to_string();
        self.write_all(RegistryMethod::RemoveChain, |r| {
            let chain = chain.clone();
            async move { r.remove_chain(&chain).await }
        })
        .await
    }

    async fn get_warp_route(&self, route_id: &str) -> Result<Option<WarpCoreConfig>, RegistryError> {
        Ok(self.get_warp_routes(None).await?.remove(route_id))
    }

    async fn get_warp_routes(
        &self,
        filter: Option<&WarpRouteFilter>,
    ) -> Result<WarpRouteConfigMap, RegistryError> {
        let filter = filter.cloned();
        let results = self
            .read_all(RegistryMethod::GetWarpRoutes, |r| {
                let filter = filter.clone();
                async move { r.get_warp_routes(filter.as_ref()).await }
            })
            .await;
        merge_all(results)
    }

    async fn add_warp_route(
        &self,
        config: WarpCoreConfig,
        options: Option<AddWarpRouteOptions>,
    ) -> Result<(), RegistryError> {
        self.write_all(RegistryMethod::AddWarpRoute, |r| {
            let config = config.clone();
            let options = options.clone();
            async move { r.add_warp_route(config, options).await }
        })
        .await
    }

    async fn add_warp_route_config(
        &self,
        config: WarpRouteDeployConfig,
        options: Option<AddWarpRouteOptions>,
    ) -> Result<(), RegistryError> {
        self.write_all(RegistryMethod::AddWarpRouteConfig, |r| {
            let config = config.clone();
            let options = options.clone();
            async move { r.add_warp_route_config(config, options).await }
        })
        .await
    }

    async fn get_warp_deploy_config(
        &self,
        route_id: &str,
    ) -> Result<Option<WarpRouteDeployConfig>, RegistryError> {
        Ok(self.get_warp_deploy_configs(None).await?.remove(route_id))
    }

    async fn get_warp_deploy_configs(
        &self,
        filter: Option<&WarpRouteFilter>,
    ) -> Result<WarpDeployConfigMap, RegistryError> {
        let filter = filter.cloned();
        let results = self
            .read_all(RegistryMethod::GetWarpDeployConfigs, |r| {
                let filter = filter.clone();
                async move { r.get_warp_deploy_configs(filter.as_ref()).await }
            })
            .await;
        merge_all(results)
    }

    fn merge(self: Arc<Self>, other: Arc<dyn Registry>) -> Arc<dyn Registry> {
        let mut registries = self.registries.clone();
        registries.push(other);
        Arc::new(MergedRegistry::new(registries))
    }
}

#[cfg(test)]
#[path = "merged_tests.rs"]
mod tests;
