//! Warp route id codec and filters.
//!
//! A warp route id has the form `<tokenSymbol>/<chain1>-<chain2>-...` with
//! the chain components in ascending lexical order, e.g. `USDT/arbitrum-ethereum`.

use regex::Regex;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;
use std::sync::LazyLock;

use crate::error::RegistryError;
use crate::types::{AddWarpRouteOptions, ChainName, WarpCoreConfig, WarpRouteDeployConfig};

pub type WarpRouteId = String;

static WARP_ROUTE_CONFIG_FILE_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"warp_routes/([a-zA-Z0-9\-_]+)/([a-z0-9\-_]+)-config\.yaml$")
        .expect("valid warp route config regex")
});

static WARP_ROUTE_DEPLOY_FILE_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"warp_routes/([a-zA-Z0-9\-_]+)/([a-z0-9\-_]+)-deploy\.yaml$")
        .expect("valid warp route deploy regex")
});

/// Components of a warp route id.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedWarpRouteId {
    pub token_symbol: String,
    pub chain_names: Vec<ChainName>,
}

/// Build a canonical id from a token symbol and its chains; chains are sorted.
pub fn create_warp_route_config_id<S: AsRef<str>>(
    token_symbol: &str,
    chains: &[S],
) -> Result<WarpRouteId, RegistryError> {
    if token_symbol.is_empty() || token_symbol.contains('/') {
        return Err(RegistryError::InvalidArgument(format!(
            "Invalid warp route token symbol: '{}'",
            token_symbol
        )));
    }
    if chains.is_empty() {
        return Err(RegistryError::InvalidArgument(format!(
            "Warp route {} has no chains",
            token_symbol
        )));
    }

    let mut sorted: Vec<&str> = chains.iter().map(AsRef::as_ref).collect();
    if let Some(bad) = sorted
        .iter()
        .find(|c| c.is_empty() || c.contains('-') || c.contains('/'))
    {
        return Err(RegistryError::InvalidArgument(format!(
            "Invalid chain name in warp route {}: '{}'",
            token_symbol, bad
        )));
    }
    sorted.sort_unstable();

    Ok(format!("{}/{}", token_symbol, sorted.join("-")))
}

/// Split an id into its symbol and chain names.
pub fn parse_warp_route_config_id(route_id: &str) -> Result<ParsedWarpRouteId, RegistryError> {
    let invalid = || RegistryError::InvalidArgument(format!("Invalid warp route id: '{}'", route_id));

    let (token_symbol, chains) = route_id.split_once('/').ok_or_else(invalid)?;
    if token_symbol.is_empty() || chains.is_empty() || chains.contains('/') {
        return Err(invalid());
    }
    let chain_names: Vec<ChainName> = chains.split('-').map(str::to_string).collect();
    if chain_names.iter().any(String::is_empty) {
        return Err(invalid());
    }

    Ok(ParsedWarpRouteId {
        token_symbol: token_symbol.to_string(),
        chain_names,
    })
}

/// Check that an id parses and lists its chains in ascending order.
pub fn validate_warp_route_id(route_id: &str) -> Result<(), RegistryError> {
    let parsed = parse_warp_route_config_id(route_id)?;
    if !parsed.chain_names.is_sorted() {
        return Err(RegistryError::Validation(format!(
            "Warp route id {} must list chains in alphabetical order",
            route_id
        )));
    }
    Ok(())
}

/// Derive an id from a `<symbol>/<chains>-config.yaml` path.
pub fn warp_route_config_path_to_id(config_path: &str) -> Result<WarpRouteId, RegistryError> {
    path_to_id(&WARP_ROUTE_CONFIG_FILE_REGEX, config_path, "config")
}

/// Derive an id from a `<symbol>/<chains>-deploy.yaml` path.
pub fn warp_route_deploy_path_to_id(deploy_path: &str) -> Result<WarpRouteId, RegistryError> {
    path_to_id(&WARP_ROUTE_DEPLOY_FILE_REGEX, deploy_path, "deploy")
}

fn path_to_id(regex: &Regex, path: &str, kind: &str) -> Result<WarpRouteId, RegistryError> {
    let normalized = path.replace('\\', "/");
    let captures = regex.captures(&normalized).ok_or_else(|| {
        RegistryError::InvalidArgument(format!("Invalid warp route {} path: {}", kind, path))
    })?;
    let chains: Vec<&str> = captures[2].split('-').collect();
    create_warp_route_config_id(&captures[1], &chains)
}

/// Derive an id from a core config: the first token's symbol plus every token chain.
pub fn warp_route_id_from_config(config: &WarpCoreConfig) -> Result<WarpRouteId, RegistryError> {
    let first = config.tokens.first().ok_or_else(|| {
        RegistryError::InvalidArgument("Warp route config has no tokens".to_string())
    })?;
    create_warp_route_config_id(&first.symbol, &config.chain_names())
}

/// Pick the id a write should be stored under.
///
/// An explicit id wins, then an explicit symbol, then `fallback_symbol`
/// taken from the config itself.
pub fn resolve_warp_route_id(
    chains: &[ChainName],
    fallback_symbol: Option<&str>,
    options: Option<&AddWarpRouteOptions>,
) -> Result<WarpRouteId, RegistryError> {
    match options {
        Some(AddWarpRouteOptions::WarpRouteId(id)) => {
            validate_warp_route_id(id)?;
            Ok(id.clone())
        }
        Some(AddWarpRouteOptions::Symbol(symbol)) => create_warp_route_config_id(symbol, chains),
        None => {
            let symbol = fallback_symbol.ok_or_else(|| {
                RegistryError::InvalidArgument(
                    "A token symbol or warp route id is required".to_string(),
                )
            })?;
            create_warp_route_config_id(symbol, chains)
        }
    }
}

/// Id a core config should be stored under.
pub fn core_config_route_id(
    config: &WarpCoreConfig,
    options: Option<&AddWarpRouteOptions>,
) -> Result<WarpRouteId, RegistryError> {
    let symbol = config.tokens.first().map(|t| t.symbol.as_str());
    resolve_warp_route_id(&config.chain_names(), symbol, options)
}

/// Id a deploy config should be stored under. Without options the symbol
/// comes from the first chain entry that declares one.
pub fn deploy_config_route_id(
    config: &WarpRouteDeployConfig,
    options: Option<&AddWarpRouteOptions>,
) -> Result<WarpRouteId, RegistryError> {
    let chains: Vec<ChainName> = config.keys().cloned().collect();
    let symbol = config
        .values()
        .find_map(|chain| chain.get("symbol").and_then(Value::as_str));
    resolve_warp_route_id(&chains, symbol, options)
}

/// Predicate over warp route ids.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WarpRouteFilter {
    /// Token symbol, compared case-insensitively.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub symbol: Option<String>,
    /// Chain that must take part in the route.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub chain_name: Option<String>,
}

impl WarpRouteFilter {
    pub fn symbol(symbol: impl Into<String>) -> Self {
        Self {
            symbol: Some(symbol.into()),
            chain_name: None,
        }
    }

    pub fn chain(chain_name: impl Into<String>) -> Self {
        Self {
            symbol: None,
            chain_name: Some(chain_name.into()),
        }
    }

    pub fn with_chain(mut self, chain_name: impl Into<String>) -> Self {
        self.chain_name = Some(chain_name.into());
        self
    }

    pub fn is_empty(&self) -> bool {
        self.symbol.is_none() && self.chain_name.is_none()
    }

    /// Whether `route_id` satisfies this filter. Malformed ids never match.
    pub fn matches(&self, route_id: &str) -> bool {
        if self.is_empty() {
            return true;
        }
        let Ok(parsed) = parse_warp_route_config_id(route_id) else {
            return false;
        };
        if let Some(symbol) = &self.symbol {
            if !parsed.token_symbol.eq_ignore_ascii_case(symbol) {
                return false;
            }
        }
        if let Some(chain) = &self.chain_name {
            let chain = chain.to_lowercase();
            if !parsed.chain_names.contains(&chain) {
                return false;
            }
        }
        true
    }
}

/// Result of [`filter_warp_routes_ids`].
#[derive(Debug, Clone, PartialEq)]
pub struct FilteredWarpRoutes<T> {
    pub ids: Vec<WarpRouteId>,
    pub values: Vec<T>,
    pub id_map: BTreeMap<WarpRouteId, T>,
}

/// Keep the entries of `id_map` whose ids satisfy `filter`.
pub fn filter_warp_routes_ids<T: Clone>(
    id_map: &BTreeMap<WarpRouteId, T>,
    filter: Option<&WarpRouteFilter>,
) -> FilteredWarpRoutes<T> {
    let id_map: BTreeMap<WarpRouteId, T> = id_map
        .iter()
        .filter(|(id, _)| filter.is_none_or(|f| f.matches(id)))
        .map(|(id, value)| (id.clone(), value.clone()))
        .collect();

    FilteredWarpRoutes {
        ids: id_map.keys().cloned().collect(),
        values: id_map.values().cloned().collect(),
        id_map,
    }
}

#[cfg(test)]
#[path = "warp_id_tests.rs"]
mod tests;
