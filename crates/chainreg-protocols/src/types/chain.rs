//! Chain metadata and address types.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::BTreeMap;

use crate::error::{json_kind, RegistryError};

/// Short unique chain name (e.g. `ethereum`).
pub type ChainName = String;

/// Map keyed by chain name, ordered for stable output.
pub type ChainMap<T> = BTreeMap<ChainName, T>;

/// Contract role -> address.
pub type ChainAddresses = BTreeMap<String, String>;

/// Chain configuration record.
///
/// Stored as an ordered JSON object so partial records and deep merges keep
/// every field, including ones this crate does not know about. Typed access
/// goes through the accessors below; full schema checks live in
/// [`crate::validation`].
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ChainMetadata(Map<String, Value>);

impl ChainMetadata {
    /// Create a metadata record with only the `name` field set.
    pub fn new(name: impl Into<String>) -> Self {
        let mut map = Map::new();
        map.insert("name".to_string(), Value::String(name.into()));
        Self(map)
    }

    /// Wrap a JSON value; anything but an object is rejected.
    pub fn from_value(value: Value) -> Result<Self, RegistryError> {
        match value {
            Value::Object(map) => Ok(Self(map)),
            other => Err(RegistryError::Validation(format!(
                "chain metadata must be an object, got {}",
                json_kind(&other)
            ))),
        }
    }

    pub fn into_value(self) -> Value {
        Value::Object(self.0)
    }

    pub fn as_map(&self) -> &Map<String, Value> {
        &self.0
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    pub fn set(&mut self, key: impl Into<String>, value: Value) {
        self.0.insert(key.into(), value);
    }

    pub fn with(mut self, key: impl Into<String>, value: Value) -> Self {
        self.set(key, value);
        self
    }

    pub fn name(&self) -> Option<&str> {
        self.0.get("name").and_then(Value::as_str)
    }

    /// Chain id; numeric for EVM chains, a string for Cosmos-style chains.
    pub fn chain_id(&self) -> Option<&Value> {
        self.0.get("chainId")
    }

    pub fn domain_id(&self) -> Option<u64> {
        self.0.get("domainId").and_then(Value::as_u64)
    }

    pub fn protocol(&self) -> Option<&str> {
        self.0.get("protocol").and_then(Value::as_str)
    }

    /// HTTP endpoints listed under `rpcUrls`.
    pub fn rpc_urls(&self) -> Vec<&str> {
        self.0
            .get("rpcUrls")
            .and_then(Value::as_array)
            .map(|urls| {
                urls.iter()
                    .filter_map(|u| u.get("http").and_then(Value::as_str))
                    .collect()
            })
            .unwrap_or_default()
    }

    pub fn deployer(&self) -> Option<&Value> {
        self.0.get("deployer")
    }

    pub fn technical_stack(&self) -> Option<&str> {
        self.0.get("technicalStack").and_then(Value::as_str)
    }

    pub fn is_testnet(&self) -> bool {
        self.0
            .get("isTestnet")
            .and_then(Value::as_bool)
            .unwrap_or(false)
    }
}

impl From<Map<String, Value>> for ChainMetadata {
    fn from(map: Map<String, Value>) -> Self {
        Self(map)
    }
}
