//! Read-only registry wrapper.
//!
//! Delegates reads to the wrapped registry. Writes are logged and dropped
//! without error, so a wrapped registry can sit inside a merged registry
//! next to writable members.

use async_trait::async_trait;
use std::sync::Arc;
use tracing::warn;

use chainreg_protocols::{
    AddWarpRouteOptions, ChainAddresses, ChainMap, ChainMetadata, ChainName, Registry,
    RegistryContent, RegistryError, RegistryMethod, RegistryType, UpdateChainParams,
    WarpCoreConfig, WarpDeployConfigMap, WarpRouteConfigMap, WarpRouteDeployConfig,
    WarpRouteFilter,
};

pub struct ReadOnlyRegistry {
    inner: Arc<dyn Registry>,
    /// Read methods the inner registry cannot serve.
    unimplemented: Vec<RegistryMethod>,
}

impl ReadOnlyRegistry {
    pub fn new(inner: Arc<dyn Registry>) -> Self {
        let unimplemented = inner
            .unimplemented_methods()
            .iter()
            .copied()
            .filter(|method| !method.is_write())
            .collect();
        Self {
            inner,
            unimplemented,
        }
    }

    pub fn inner(&self) -> &Arc<dyn Registry> {
        &self.inner
    }

    fn skip(&self, method: RegistryMethod) -> Result<(), RegistryError> {
        warn!(
            "Skipping {} on read-only registry {}",
            method,
            self.inner.uri()
        );
        Ok(())
    }
}

#[async_trait]
impl Registry for ReadOnlyRegistry {
    fn uri(&self) -> &str {
        self.inner.uri()
    }

    fn registry_type(&self) -> RegistryType {
        RegistryType::ReadOnly
    }

    fn unimplemented_methods(&self) -> &[RegistryMethod] {
        &self.unimplemented
    }

    fn get_uri(&self, item_path: Option<&str>) -> Result<String, RegistryError> {
        self.inner.get_uri(item_path)
    }

    async fn list_registry_content(&self) -> Result<RegistryContent, RegistryError> {
        self.inner.list_registry_content().await
    }

    async fn get_chains(&self) -> Result<Vec<ChainName>, RegistryError> {
        self.inner.get_chains().await
    }

    async fn get_metadata(&self) -> Result<ChainMap<ChainMetadata>, RegistryError> {
        self.inner.get_metadata().await
    }

    async fn get_chain_metadata(&self, chain: &str) -> Result<Option<ChainMetadata>, RegistryError> {
        self.inner.get_chain_metadata(chain).await
    }

    async fn get_addresses(&self) -> Result<ChainMap<ChainAddresses>, RegistryError> {
        self.inner.get_addresses().await
    }

    async fn get_chain_addresses(
        &self,
        chain: &str,
    ) -> Result<Option<ChainAddresses>, RegistryError> {
        self.inner.get_chain_addresses(chain).await
    }

    async fn get_chain_logo_uri(&self, chain: &str) -> Result<Option<String>, RegistryError> {
        self.inner.get_chain_logo_uri(chain).await
    }

    async fn add_chain(&self, _chain: UpdateChainParams) -> Result<(), RegistryError> {
        self.skip(RegistryMethod::AddChain)
    }

    async fn update_chain(&self, _chain: UpdateChainParams) -> Result<(), RegistryError> {
        self.skip(RegistryMethod::UpdateChain)
    }

    async fn remove_chain(&self, _chain: &str) -> Result<(), RegistryError> {
        self.skip(RegistryMethod::RemoveChain)
    }

    async fn get_warp_route(&self, route_id: &str) -> Result<Option<WarpCoreConfig>, RegistryError> {
        self.inner.get_warp_route(route_id).await
    }

    async fn get_warp_routes(
        &self,
        filter: Option<&WarpRouteFilter>,
    ) -> Result<WarpRouteConfigMap, RegistryError> {
        self.inner.get_warp_routes(filter).await
    }

    async fn add_warp_route(
        &self,
        _config: WarpCoreConfig,
        _options: Option<AddWarpRouteOptions>,
    ) -> Result<(), RegistryError> {
        self.skip(RegistryMethod::AddWarpRoute)
    }

    async fn add_warp_route_config(
        &self,
        _config: WarpRouteDeployConfig,
        _options: Option<AddWarpRouteOptions>,
    ) -> Result<(), RegistryError> {
        self.skip(RegistryMethod::AddWarpRouteConfig)
    }

    async fn get_warp_deploy_config(
        &self,
        route_id: &str,
    ) -> Result<Option<WarpRouteDeployConfig>, RegistryError> {
        self.inner.get_warp_deploy_config(route_id).await
    }

    async fn get_warp_deploy_configs(
        &self,
        filter: Option<&WarpRouteFilter>,
    ) -> Result<WarpDeployConfigMap, RegistryError> {
        self.inner.get_warp_deploy_configs(filter).await
    }

    fn merge(self: Arc<Self>, other: Arc<dyn Registry>) -> Arc<dyn Registry> {
        Arc::new(ReadOnlyRegistry::new(self.inner.clone().merge(other)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::partial::{PartialRegistry, PartialRegistryParams};

    fn inner() -> Arc<PartialRegistry> {
        Arc::new(
            PartialRegistry::new(PartialRegistryParams {
                chain_metadata: ChainMap::from([(
                    "ethereum".to_string(),
                    ChainMetadata::new("ethereum"),
                )]),
                ..Default::default()
            })
            .unwrap(),
        )
    }

    #[tokio::test]
    async fn test_reads_delegate() {
        let registry = ReadOnlyRegistry::new(inner());
        assert_eq!(registry.get_chains().await.unwrap(), vec!["ethereum"]);
        assert_eq!(
            registry.get_chain_metadata("ethereum").await.unwrap().unwrap().name(),
            Some("ethereum")
        );
        assert_eq!(registry.registry_type(), RegistryType::ReadOnly);
        assert_eq!(registry.uri(), "partial");
    }

    #[tokio::test]
    async fn test_writes_are_dropped() {
        let inner = inner();
        let registry = ReadOnlyRegistry::new(inner.clone());

        let params = UpdateChainParams::new("base").with_metadata(ChainMetadata::new("base"));
        registry.add_chain(params.clone()).await.unwrap();
        registry.update_chain(params).await.unwrap();
        registry.remove_chain("ethereum").await.unwrap();

        assert_eq!(inner.get_chains().await.unwrap(), vec!["ethereum"]);
        assert_eq!(registry.get_chains().await.unwrap(), vec!["ethereum"]);
    }

    #[tokio::test]
    async fn test_keeps_read_gaps_of_inner() {
        let registry = ReadOnlyRegistry::new(inner());
        assert!(!registry.supports(RegistryMethod::GetUri));
        assert!(registry.supports(RegistryMethod::AddChain));
    }

    #[tokio::test]
    async fn test_merge_stays_read_only() {
        let registry = Arc::new(ReadOnlyRegistry::new(inner()));
        let override_layer = Arc::new(
            PartialRegistry::new(PartialRegistryParams {
                chain_metadata: ChainMap::from([(
                    "base".to_string(),
                    ChainMetadata::new("base"),
                )]),
                ..Default::default()
            })
            .unwrap(),
        );

        let merged = registry.merge(override_layer.clone());
        assert_eq!(merged.registry_type(), RegistryType::ReadOnly);
        assert_eq!(merged.get_chains().await.unwrap(), vec!["base", "ethereum"]);

        merged.remove_chain("base").await.unwrap();
        assert_eq!(override_layer.get_chains().await.unwrap(), vec!["base"]);
    }
}
