//! Registry content listing.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use super::chain::ChainMap;
use crate::warp_id::WarpRouteId;

/// Locations of the files that make up one chain entry.
///
/// A location is whatever the backend uses to address a file: an absolute
/// path for the filesystem backend, an archive path or URL for remote ones.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChainFiles {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub metadata: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub addresses: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub logo: Option<String>,
}

impl ChainFiles {
    pub fn is_empty(&self) -> bool {
        self.metadata.is_none() && self.addresses.is_none() && self.logo.is_none()
    }

    /// All known file locations for this chain.
    pub fn locations(&self) -> impl Iterator<Item = &String> {
        [&self.metadata, &self.addresses, &self.logo]
            .into_iter()
            .flatten()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeploymentContent {
    /// Warp route id -> core config location.
    #[serde(default)]
    pub warp_routes: BTreeMap<WarpRouteId, String>,
    /// Warp route id -> deploy config location.
    #[serde(default)]
    pub warp_deploy_config: BTreeMap<WarpRouteId, String>,
}

/// Index of everything a registry holds.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegistryContent {
    #[serde(default)]
    pub chains: ChainMap<ChainFiles>,
    #[serde(default)]
    pub deployments: DeploymentContent,
}

impl RegistryContent {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn has_chain(&self, chain: &str) -> bool {
        self.chains.contains_key(chain)
    }
}
