//! Warp route configuration types.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::BTreeMap;

use super::chain::{ChainMap, ChainName};
use crate::warp_id::WarpRouteId;

/// A connection from one warp token to its counterpart on another chain.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WarpTokenConnection {
    /// Token reference in `<protocol>|<chain>|<address>` form.
    pub token: String,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// One per-chain token entry of a deployed warp route.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WarpTokenConfig {
    pub chain_name: ChainName,
    pub standard: String,
    pub symbol: String,
    pub name: String,
    pub decimals: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub address_or_denom: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub collateral_address_or_denom: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub connections: Vec<WarpTokenConnection>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// A deployed warp route as consumed by clients.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WarpCoreConfig {
    pub tokens: Vec<WarpTokenConfig>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub options: Option<Value>,
}

impl WarpCoreConfig {
    /// Chain names of all tokens, in declaration order.
    pub fn chain_names(&self) -> Vec<ChainName> {
        self.tokens.iter().map(|t| t.chain_name.clone()).collect()
    }
}

/// Input to a warp route deployment: chain name -> per-chain token config.
pub type WarpRouteDeployConfig = ChainMap<Value>;

pub type WarpRouteConfigMap = BTreeMap<WarpRouteId, WarpCoreConfig>;

pub type WarpDeployConfigMap = BTreeMap<WarpRouteId, WarpRouteDeployConfig>;

/// How a write should name the route it stores.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AddWarpRouteOptions {
    /// Use this token symbol with the chains found in the config.
    Symbol(String),
    /// Store under exactly this id.
    WarpRouteId(WarpRouteId),
}
