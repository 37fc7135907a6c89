use super::*;
use chainreg_registry_filesystem::FileSystemRegistry;
use std::fs;
use tempfile::TempDir;

const ETHEREUM: &str = "name: ethereum\nchainId: 1\ndomainId: 1\nprotocol: ethereum\nrpcUrls:\n  - http: https://eth.example\n";

fn registry_dir() -> TempDir {
    let dir = tempfile::tempdir().unwrap();
    let chain_dir = dir.path().join("chains/ethereum");
    fs::create_dir_all(&chain_dir).unwrap();
    fs::write(chain_dir.join("metadata.yaml"), ETHEREUM).unwrap();
    fs::write(chain_dir.join("addresses.yaml"), "mailbox: \"0xabc\"\n").unwrap();
    dir
}

fn registry(dir: &TempDir) -> Arc<dyn Registry> {
    Arc::new(FileSystemRegistry::new(dir.path()))
}

#[tokio::test]
async fn test_read_commands() {
    let dir = registry_dir();
    let registry = registry(&dir);

    for command in [
        Commands::Content,
        Commands::Chains,
        Commands::Metadata { chain: None },
        Commands::Metadata {
            chain: Some("ethereum".to_string()),
        },
        Commands::Addresses {
            chain: Some("ethereum".to_string()),
        },
        Commands::WarpRoutes {
            symbol: Some("USDC".to_string()),
            chain: None,
        },
    ] {
        handle_command(command, registry.clone(), OutputFormat::Json)
            .await
            .unwrap();
    }
}

#[tokio::test]
async fn test_missing_chain_fails() {
    let dir = registry_dir();
    let err = handle_command(
        Commands::Metadata {
            chain: Some("celo".to_string()),
        },
        registry(&dir),
        OutputFormat::Yaml,
    )
    .await
    .unwrap_err();
    assert!(err.to_string().contains("celo"));

    let err = handle_command(
        Commands::Logo {
            chain: "ethereum".to_string(),
        },
        registry(&dir),
        OutputFormat::Yaml,
    )
    .await
    .unwrap_err();
    assert!(err.to_string().contains("No logo"));
}

#[tokio::test]
async fn test_validate_reports_bad_metadata() {
    let dir = registry_dir();
    handle_command(Commands::Validate, registry(&dir), OutputFormat::Yaml)
        .await
        .unwrap();

    let broken = dir.path().join("chains/broken");
    fs::create_dir_all(&broken).unwrap();
    fs::write(broken.join("metadata.yaml"), "name: broken\nrpcUrls: []\n").unwrap();

    let err = handle_command(Commands::Validate, registry(&dir), OutputFormat::Yaml)
        .await
        .unwrap_err();
    assert!(err.to_string().contains("1 of 2"));
}

#[tokio::test]
async fn test_add_chain_writes_files() {
    let dir = registry_dir();
    let input = tempfile::tempdir().unwrap();
    let metadata = input.path().join("celo.yaml");
    let addresses = input.path().join("celo-addresses.yaml");
    fs::write(
        &metadata,
        "name: celo\nchainId: 42220\ndomainId: 42220\nprotocol: ethereum\nrpcUrls:\n  - http: https://celo.example\n",
    )
    .unwrap();
    fs::write(&addresses, "mailbox: \"0xdef\"\n").unwrap();

    let registry = registry(&dir);
    handle_command(
        Commands::AddChain {
            name: "celo".to_string(),
            metadata,
            addresses: Some(addresses),
        },
        registry.clone(),
        OutputFormat::Yaml,
    )
    .await
    .unwrap();

    assert!(dir.path().join("chains/celo/metadata.yaml").exists());
    let stored = registry.get_chain_addresses("celo").await.unwrap().unwrap();
    assert_eq!(stored["mailbox"], "0xdef");
}

#[tokio::test]
async fn test_add_chain_rejects_invalid_metadata() {
    let dir = registry_dir();
    let input = tempfile::tempdir().unwrap();
    let metadata = input.path().join("celo.yaml");
    fs::write(&metadata, "name: celo\n").unwrap();

    let result = handle_command(
        Commands::AddChain {
            name: "celo".to_string(),
            metadata,
            addresses: None,
        },
        registry(&dir),
        OutputFormat::Yaml,
    )
    .await;
    assert!(result.is_err());
    assert!(!dir.path().join("chains/celo").exists());
}

#[test]
fn test_filter_from() {
    assert!(filter_from(None, None).is_none());
    let filter = filter_from(Some("ETH".to_string()), Some("base".to_string())).unwrap();
    assert!(filter.matches("ETH/base-ethereum"));
    assert!(!filter.matches("ETH/arbitrum-ethereum"));
}
