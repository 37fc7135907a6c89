use super::*;

#[test]
fn test_classify_chain_files() {
    assert_eq!(
        classify_path("chains/ethereum/metadata.yaml"),
        Some(ContentEntry::Chain {
            chain: "ethereum".to_string(),
            kind: ChainFileKind::Metadata
        })
    );
    assert_eq!(
        classify_path("/srv/registry/chains/base/addresses.yaml"),
        Some(ContentEntry::Chain {
            chain: "base".to_string(),
            kind: ChainFileKind::Addresses
        })
    );
    assert_eq!(
        classify_path("chains/base/logo.svg"),
        Some(ContentEntry::Chain {
            chain: "base".to_string(),
            kind: ChainFileKind::Logo
        })
    );
}

#[test]
fn test_classify_ignores_unknown_files() {
    assert_eq!(classify_path("chains/ethereum/notes.yaml"), None);
    assert_eq!(classify_path("chains/ethereum/metadata.svg"), None);
    assert_eq!(classify_path("chains/Ethereum/metadata.yaml"), None);
    assert_eq!(classify_path("chains/schema.json"), None);
    assert_eq!(classify_path("README.md"), None);
}

#[test]
fn test_classify_requires_whole_chains_dir() {
    assert_eq!(classify_path("foochains/ethereum/metadata.yaml"), None);
    assert_eq!(classify_path("/srv/mychains/base/addresses.yaml"), None);
    assert_eq!(
        classify_path("vendor/chains/base/logo.svg"),
        Some(ContentEntry::Chain {
            chain: "base".to_string(),
            kind: ChainFileKind::Logo
        })
    );
}

#[test]
fn test_classify_warp_files() {
    assert_eq!(
        classify_path("deployments/warp_routes/USDT/ethereum-arbitrum-config.yaml"),
        Some(ContentEntry::WarpRoute("USDT/arbitrum-ethereum".to_string()))
    );
    assert_eq!(
        classify_path("deployments/warp_routes/USDT/arbitrum-ethereum-deploy.yaml"),
        Some(ContentEntry::WarpDeployConfig(
            "USDT/arbitrum-ethereum".to_string()
        ))
    );
}

#[test]
fn test_classify_windows_path() {
    assert_eq!(
        classify_path(r"C:\registry\chains\ethereum\metadata.yaml"),
        Some(ContentEntry::Chain {
            chain: "ethereum".to_string(),
            kind: ChainFileKind::Metadata
        })
    );
}

#[test]
fn test_from_paths_builds_listing() {
    let content = RegistryContent::from_paths([
        ("chains/ethereum/metadata.yaml", "/r/chains/ethereum/metadata.yaml"),
        ("chains/ethereum/addresses.yaml", "/r/chains/ethereum/addresses.yaml"),
        ("chains/base/metadata.yaml", "/r/chains/base/metadata.yaml"),
        (
            "deployments/warp_routes/ETH/base-ethereum-config.yaml",
            "/r/deployments/warp_routes/ETH/base-ethereum-config.yaml",
        ),
        ("LICENSE", "/r/LICENSE"),
    ]);

    assert_eq!(content.chains.len(), 2);
    let ethereum = &content.chains["ethereum"];
    assert_eq!(
        ethereum.metadata.as_deref(),
        Some("/r/chains/ethereum/metadata.yaml")
    );
    assert!(ethereum.addresses.is_some());
    assert!(ethereum.logo.is_none());
    assert!(content.chains["base"].addresses.is_none());
    assert_eq!(
        content.deployments.warp_routes["ETH/base-ethereum"],
        "/r/deployments/warp_routes/ETH/base-ethereum-config.yaml"
    );
    assert!(content.deployments.warp_deploy_config.is_empty());
}

#[test]
fn test_insert_path_reports_recognition() {
    let mut content = RegistryContent::new();
    assert!(content.insert_path("chains/ethereum/logo.svg", "logo"));
    assert!(!content.insert_path("docs/index.md", "docs"));
    assert!(content.has_chain("ethereum"));
}

#[test]
fn test_chain_file_path() {
    assert_eq!(
        chain_file_path("ethereum", ChainFileKind::Addresses),
        "chains/ethereum/addresses.yaml"
    );
}

#[test]
fn test_warp_route_paths() {
    assert_eq!(
        warp_route_config_path("USDT/arbitrum-ethereum").unwrap(),
        "deployments/warp_routes/USDT/arbitrum-ethereum-config.yaml"
    );
    assert_eq!(
        warp_route_deploy_path("USDT/arbitrum-ethereum").unwrap(),
        "deployments/warp_routes/USDT/arbitrum-ethereum-deploy.yaml"
    );
    assert!(warp_route_config_path("not-an-id").is_err());
}

#[test]
fn test_validate_chain_name() {
    assert!(validate_chain_name("ethereum").is_ok());
    assert!(validate_chain_name("zksync2").is_ok());
    assert!(validate_chain_name("Ethereum").is_err());
    assert!(validate_chain_name("eth-mainnet").is_err());
    assert!(validate_chain_name("").is_err());
}
