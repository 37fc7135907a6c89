use super::*;
use crate::types::WarpTokenConfig;
use serde_json::Map;

fn token(chain: &str, symbol: &str) -> WarpTokenConfig {
    WarpTokenConfig {
        chain_name: chain.to_string(),
        standard: "EvmHypSynthetic".to_string(),
        symbol: symbol.to_string(),
        name: symbol.to_string(),
        decimals: 18,
        address_or_denom: None,
        collateral_address_or_denom: None,
        connections: Vec::new(),
        extra: Map::new(),
    }
}

#[test]
fn test_create_id_sorts_chains() {
    let id = create_warp_route_config_id("USDT", &["ethereum", "arbitrum"]).unwrap();
    assert_eq!(id, "USDT/arbitrum-ethereum");
}

#[test]
fn test_create_id_rejects_bad_input() {
    assert!(create_warp_route_config_id("USDT", &[] as &[&str]).is_err());
    assert!(create_warp_route_config_id("", &["ethereum"]).is_err());
    assert!(create_warp_route_config_id("US/DT", &["ethereum"]).is_err());
    assert!(create_warp_route_config_id("USDT", &["eth-ereum"]).is_err());
}

#[test]
fn test_config_path_to_id() {
    let id = warp_route_config_path_to_id("warp_routes/USDT/arbitrum-ethereum-config.yaml").unwrap();
    assert_eq!(id, "USDT/arbitrum-ethereum");
}

#[test]
fn test_config_path_to_id_sorts_unsorted_file_names() {
    let id = warp_route_config_path_to_id(
        "/data/registry/deployments/warp_routes/ETH/zksync-base-config.yaml",
    )
    .unwrap();
    assert_eq!(id, "ETH/base-zksync");
}

#[test]
fn test_config_path_to_id_accepts_windows_separators() {
    let id = warp_route_config_path_to_id(r"deployments\warp_routes\USDC\base-ethereum-config.yaml")
        .unwrap();
    assert_eq!(id, "USDC/base-ethereum");
}

#[test]
fn test_config_path_to_id_rejects_other_files() {
    assert!(warp_route_config_path_to_id("warp_routes/USDT/arbitrum-ethereum-deploy.yaml").is_err());
    assert!(warp_route_config_path_to_id("chains/ethereum/metadata.yaml").is_err());
}

#[test]
fn test_deploy_path_to_id() {
    let id = warp_route_deploy_path_to_id("warp_routes/USDT/arbitrum-ethereum-deploy.yaml").unwrap();
    assert_eq!(id, "USDT/arbitrum-ethereum");
    assert!(warp_route_deploy_path_to_id("warp_routes/USDT/arbitrum-ethereum-config.yaml").is_err());
}

#[test]
fn test_parse_id() {
    let parsed = parse_warp_route_config_id("USDT/arbitrum-ethereum").unwrap();
    assert_eq!(parsed.token_symbol, "USDT");
    assert_eq!(parsed.chain_names, vec!["arbitrum", "ethereum"]);
}

#[test]
fn test_parse_id_rejects_malformed() {
    assert!(parse_warp_route_config_id("USDT").is_err());
    assert!(parse_warp_route_config_id("/arbitrum").is_err());
    assert!(parse_warp_route_config_id("USDT/").is_err());
    assert!(parse_warp_route_config_id("USDT/a/b").is_err());
    assert!(parse_warp_route_config_id("USDT/a--b").is_err());
}

#[test]
fn test_validate_id_requires_sorted_chains() {
    assert!(validate_warp_route_id("USDT/arbitrum-ethereum").is_ok());
    let err = validate_warp_route_id("USDT/ethereum-arbitrum").unwrap_err();
    assert!(matches!(err, RegistryError::Validation(_)));
}

#[test]
fn test_id_from_config() {
    let config = WarpCoreConfig {
        tokens: vec![token("optimism", "ETH"), token("base", "ETH")],
        options: None,
    };
    assert_eq!(warp_route_id_from_config(&config).unwrap(), "ETH/base-optimism");

    let empty = WarpCoreConfig {
        tokens: vec![],
        options: None,
    };
    assert!(warp_route_id_from_config(&empty).is_err());
}

#[test]
fn test_resolve_id_precedence() {
    let chains = vec!["optimism".to_string(), "base".to_string()];

    let explicit = AddWarpRouteOptions::WarpRouteId("WETH/base-optimism".to_string());
    assert_eq!(
        resolve_warp_route_id(&chains, Some("ETH"), Some(&explicit)).unwrap(),
        "WETH/base-optimism"
    );

    let symbol = AddWarpRouteOptions::Symbol("superETH".to_string());
    assert_eq!(
        resolve_warp_route_id(&chains, Some("ETH"), Some(&symbol)).unwrap(),
        "superETH/base-optimism"
    );

    assert_eq!(
        resolve_warp_route_id(&chains, Some("ETH"), None).unwrap(),
        "ETH/base-optimism"
    );
    assert!(resolve_warp_route_id(&chains, None, None).is_err());
}

#[test]
fn test_resolve_id_rejects_unsorted_explicit_id() {
    let explicit = AddWarpRouteOptions::WarpRouteId("ETH/optimism-base".to_string());
    assert!(resolve_warp_route_id(&[], None, Some(&explicit)).is_err());
}

#[test]
fn test_core_config_route_id() {
    let config = WarpCoreConfig {
        tokens: vec![token("optimism", "ETH"), token("base", "ETH")],
        options: None,
    };
    assert_eq!(core_config_route_id(&config, None).unwrap(), "ETH/base-optimism");
    let symbol = AddWarpRouteOptions::Symbol("WETH".to_string());
    assert_eq!(
        core_config_route_id(&config, Some(&symbol)).unwrap(),
        "WETH/base-optimism"
    );
}

#[test]
fn test_deploy_config_route_id() {
    let config: WarpRouteDeployConfig = BTreeMap::from([
        ("ethereum".to_string(), serde_json::json!({"type": "collateral", "symbol": "USDC"})),
        ("base".to_string(), serde_json::json!({"type": "synthetic"})),
    ]);
    assert_eq!(deploy_config_route_id(&config, None).unwrap(), "USDC/base-ethereum");

    let anonymous: WarpRouteDeployConfig =
        BTreeMap::from([("base".to_string(), serde_json::json!({"type": "native"}))]);
    assert!(deploy_config_route_id(&anonymous, None).is_err());
}

fn sample_ids() -> BTreeMap<WarpRouteId, u32> {
    BTreeMap::from([
        ("USDT/arbitrum-ethereum".to_string(), 1),
        ("USDC/base-ethereum".to_string(), 2),
        ("ETH/arbitrum-base".to_string(), 3),
    ])
}

#[test]
fn test_filter_by_symbol_is_case_insensitive() {
    let ids = sample_ids();
    let filtered = filter_warp_routes_ids(&ids, Some(&WarpRouteFilter::symbol("usdt")));
    assert_eq!(filtered.ids, vec!["USDT/arbitrum-ethereum"]);
    assert_eq!(filtered.values, vec![1]);
}

#[test]
fn test_filter_unmatched_symbol_yields_nothing() {
    let ids = sample_ids();
    let filtered = filter_warp_routes_ids(&ids, Some(&WarpRouteFilter::symbol("DAI")));
    assert!(filtered.ids.is_empty());
    assert!(filtered.id_map.is_empty());
}

#[test]
fn test_filter_by_chain() {
    let ids = sample_ids();
    let filtered = filter_warp_routes_ids(&ids, Some(&WarpRouteFilter::chain("arbitrum")));
    assert_eq!(filtered.ids, vec!["ETH/arbitrum-base", "USDT/arbitrum-ethereum"]);
}

#[test]
fn test_filter_by_symbol_and_chain() {
    let ids = sample_ids();
    let filter = WarpRouteFilter::symbol("usdc").with_chain("ethereum");
    let filtered = filter_warp_routes_ids(&ids, Some(&filter));
    assert_eq!(filtered.ids, vec!["USDC/base-ethereum"]);

    let filter = WarpRouteFilter::symbol("usdc").with_chain("arbitrum");
    assert!(filter_warp_routes_ids(&ids, Some(&filter)).ids.is_empty());
}

#[test]
fn test_filter_none_keeps_everything() {
    let ids = sample_ids();
    assert_eq!(filter_warp_routes_ids(&ids, None).ids.len(), 3);
    assert_eq!(
        filter_warp_routes_ids(&ids, Some(&WarpRouteFilter::default())).ids.len(),
        3
    );
}

#[test]
fn test_chain_filter_does_not_match_substrings() {
    let ids = sample_ids();
    let filtered = filter_warp_routes_ids(&ids, Some(&WarpRouteFilter::chain("eth")));
    assert!(filtered.ids.is_empty());
}
