//! Schema checks for registry records.
//!
//! Reads never require full metadata validity (partial records are legal
//! inside merged registries); these checks are run by writers and tooling.

use serde::Deserialize;
use serde_json::Value;

use crate::content_index::validate_chain_name;
use crate::error::{json_kind, RegistryError};
use crate::types::{ChainAddresses, ChainMetadata};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProtocolType {
    Ethereum,
    Sealevel,
    Cosmos,
    #[serde(rename = "cosmosnative")]
    CosmosNative,
    Starknet,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(untagged)]
pub enum ChainId {
    Number(u64),
    String(String),
}

#[derive(Debug, Clone, Deserialize)]
pub struct RpcUrl {
    pub http: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Deployer {
    pub name: String,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub url: Option<String>,
}

/// Typed view of the required part of chain metadata.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChainMetadataSchema {
    pub name: String,
    pub chain_id: ChainId,
    pub domain_id: u32,
    pub protocol: ProtocolType,
    pub rpc_urls: Vec<RpcUrl>,
    #[serde(default)]
    pub display_name: Option<String>,
    #[serde(default)]
    pub deployer: Option<Deployer>,
    #[serde(default)]
    pub technical_stack: Option<String>,
    #[serde(default)]
    pub is_testnet: Option<bool>,
}

/// Validate a metadata record, returning its typed view.
pub fn validate_chain_metadata(
    metadata: &ChainMetadata,
) -> Result<ChainMetadataSchema, RegistryError> {
    let schema: ChainMetadataSchema =
        serde_json::from_value(Value::Object(metadata.as_map().clone()))
            .map_err(|e| RegistryError::Validation(format!("chain metadata: {}", e)))?;

    validate_chain_name(&schema.name)
        .map_err(|e| RegistryError::Validation(e.to_string()))?;

    if schema.rpc_urls.is_empty() {
        return Err(RegistryError::Validation(format!(
            "chain {} has no rpcUrls",
            schema.name
        )));
    }
    for rpc in &schema.rpc_urls {
        let parsed = url::Url::parse(&rpc.http).map_err(|e| {
            RegistryError::Validation(format!("chain {} rpc url {}: {}", schema.name, rpc.http, e))
        })?;
        if !matches!(parsed.scheme(), "http" | "https") {
            return Err(RegistryError::Validation(format!(
                "chain {} rpc url {} must use http(s)",
                schema.name, rpc.http
            )));
        }
    }

    Ok(schema)
}

/// Validate a parsed addresses document as a string -> string map.
pub fn validate_chain_addresses(value: Value) -> Result<ChainAddresses, RegistryError> {
    let map = match value {
        Value::Object(map) => map,
        other => {
            return Err(RegistryError::Validation(format!(
                "chain addresses must be a map, got {}",
                json_kind(&other)
            )));
        }
    };

    map.into_iter()
        .map(|(role, address)| match address {
            Value::String(address) => Ok((role, address)),
            other => Err(RegistryError::Validation(format!(
                "address for {} must be a string, got {}",
                role,
                json_kind(&other)
            ))),
        })
        .collect()
}
