//! Registry protocol definitions.
//!
//! Every backend (filesystem, remote archive, merged, partial, read-only)
//! implements [`Registry`]. All reads are async so callers treat local and
//! remote backends the same way.

use async_trait::async_trait;
use std::fmt;
use std::sync::Arc;

use crate::error::RegistryError;
use crate::types::{
    AddWarpRouteOptions, ChainAddresses, ChainMap, ChainMetadata, ChainName, RegistryContent,
    WarpCoreConfig, WarpDeployConfigMap, WarpRouteConfigMap, WarpRouteDeployConfig,
};
use crate::warp_id::WarpRouteFilter;

/// Kind of backend behind a [`Registry`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RegistryType {
    FileSystem,
    Github,
    Merged,
    Partial,
    ReadOnly,
}

impl fmt::Display for RegistryType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::FileSystem => "filesystem",
            Self::Github => "github",
            Self::Merged => "merged",
            Self::Partial => "partial",
            Self::ReadOnly => "readonly",
        };
        f.write_str(name)
    }
}

/// Names of the registry operations, used to declare unsupported ones.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RegistryMethod {
    GetUri,
    ListRegistryContent,
    GetChains,
    GetMetadata,
    GetChainMetadata,
    GetAddresses,
    GetChainAddresses,
    GetChainLogoUri,
    AddChain,
    UpdateChain,
    RemoveChain,
    GetWarpRoute,
    GetWarpRoutes,
    AddWarpRoute,
    AddWarpRouteConfig,
    GetWarpDeployConfig,
    GetWarpDeployConfigs,
}

impl RegistryMethod {
    /// Every operation that mutates a registry.
    pub const WRITES: [RegistryMethod; 5] = [
        Self::AddChain,
        Self::UpdateChain,
        Self::RemoveChain,
        Self::AddWarpRoute,
        Self::AddWarpRouteConfig,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::GetUri => "getUri",
            Self::ListRegistryContent => "listRegistryContent",
            Self::GetChains => "getChains",
            Self::GetMetadata => "getMetadata",
            Self::GetChainMetadata => "getChainMetadata",
            Self::GetAddresses => "getAddresses",
            Self::GetChainAddresses => "getChainAddresses",
            Self::GetChainLogoUri => "getChainLogoUri",
            Self::AddChain => "addChain",
            Self::UpdateChain => "updateChain",
            Self::RemoveChain => "removeChain",
            Self::GetWarpRoute => "getWarpRoute",
            Self::GetWarpRoutes => "getWarpRoutes",
            Self::AddWarpRoute => "addWarpRoute",
            Self::AddWarpRouteConfig => "addWarpRouteConfig",
            Self::GetWarpDeployConfig => "getWarpDeployConfig",
            Self::GetWarpDeployConfigs => "getWarpDeployConfigs",
        }
    }

    pub fn is_write(&self) -> bool {
        Self::WRITES.contains(self)
    }
}

impl fmt::Display for RegistryMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Input to `add_chain` / `update_chain`: either facet may be omitted.
#[derive(Debug, Clone, PartialEq)]
pub struct UpdateChainParams {
    pub chain_name: ChainName,
    pub metadata: Option<ChainMetadata>,
    pub addresses: Option<ChainAddresses>,
}

impl UpdateChainParams {
    pub fn new(chain_name: impl Into<ChainName>) -> Self {
        Self {
            chain_name: chain_name.into(),
            metadata: None,
            addresses: None,
        }
    }

    pub fn with_metadata(mut self, metadata: ChainMetadata) -> Self {
        self.metadata = Some(metadata);
        self
    }

    pub fn with_addresses(mut self, addresses: ChainAddresses) -> Self {
        self.addresses = Some(addresses);
        self
    }

    /// Reject updates that carry no facet at all.
    pub fn ensure_not_empty(&self) -> Result<(), RegistryError> {
        if self.metadata.is_none() && self.addresses.is_none() {
            return Err(RegistryError::InvalidArgument(format!(
                "Chain {} must have metadata or addresses",
                self.chain_name
            )));
        }
        Ok(())
    }
}

/// Core trait for registries.
#[async_trait]
pub trait Registry: Send + Sync {
    /// Location of this registry (directory path, repository URL, ...).
    fn uri(&self) -> &str;

    fn registry_type(&self) -> RegistryType;

    /// Operations this backend cannot perform; calling one fails with
    /// [`RegistryError::Unimplemented`].
    fn unimplemented_methods(&self) -> &[RegistryMethod] {
        &[]
    }

    fn supports(&self, method: RegistryMethod) -> bool {
        !self.unimplemented_methods().contains(&method)
    }

    /// Resolve an item path (e.g. `chains/ethereum/logo.svg`) to a URI
    /// inside this registry; `None` resolves the registry root.
    fn get_uri(&self, item_path: Option<&str>) -> Result<String, RegistryError>;

    /// Index of chains and warp routes held by this registry.
    async fn list_registry_content(&self) -> Result<RegistryContent, RegistryError>;

    async fn get_chains(&self) -> Result<Vec<ChainName>, RegistryError> {
        Ok(self
            .list_registry_content()
            .await?
            .chains
            .into_keys()
            .collect())
    }

    async fn get_metadata(&self) -> Result<ChainMap<ChainMetadata>, RegistryError>;

    async fn get_chain_metadata(&self, chain: &str) -> Result<Option<ChainMetadata>, RegistryError> {
        Ok(self.get_metadata().await?.remove(chain))
    }

    async fn get_addresses(&self) -> Result<ChainMap<ChainAddresses>, RegistryError>;

    async fn get_chain_addresses(
        &self,
        chain: &str,
    ) -> Result<Option<ChainAddresses>, RegistryError> {
        Ok(self.get_addresses().await?.remove(chain))
    }

    async fn get_chain_logo_uri(&self, chain: &str) -> Result<Option<String>, RegistryError>;

    /// Add a new chain; fails with `AlreadyExists` if it is present.
    async fn add_chain(&self, chain: UpdateChainParams) -> Result<(), RegistryError>;

    /// Create or overwrite the given facets of a chain.
    async fn update_chain(&self, chain: UpdateChainParams) -> Result<(), RegistryError>;

    /// Remove a chain; fails with `NotFound` if it is absent.
    async fn remove_chain(&self, chain: &str) -> Result<(), RegistryError>;

    async fn get_warp_route(&self, route_id: &str) -> Result<Option<WarpCoreConfig>, RegistryError>;

    async fn get_warp_routes(
        &self,
        filter: Option<&WarpRouteFilter>,
    ) -> Result<WarpRouteConfigMap, RegistryError>;

    async fn add_warp_route(
        &self,
        config: WarpCoreConfig,
        options: Option<AddWarpRouteOptions>,
    ) -> Result<(), RegistryError>;

    async fn add_warp_route_config(
        &self,
        config: WarpRouteDeployConfig,
        options: Option<AddWarpRouteOptions>,
    ) -> Result<(), RegistryError>;

    async fn get_warp_deploy_config(
        &self,
        route_id: &str,
    ) -> Result<Option<WarpRouteDeployConfig>, RegistryError>;

    async fn get_warp_deploy_configs(
        &self,
        filter: Option<&WarpRouteFilter>,
    ) -> Result<WarpDeployConfigMap, RegistryError>;

    /// Compose this registry with `other`; `other` takes precedence on conflicts.
    fn merge(self: Arc<Self>, other: Arc<dyn Registry>) -> Arc<dyn Registry>;
}
