//! Classification of registry file paths.
//!
//! Registry layout:
//!
//! ```text
//! chains/<chain>/metadata.yaml
//! chains/<chain>/addresses.yaml
//! chains/<chain>/logo.svg
//! deployments/warp_routes/<symbol>/<chain>-<chain>-config.yaml
//! deployments/warp_routes/<symbol>/<chain>-<chain>-deploy.yaml
//! ```

use regex::Regex;
use std::sync::LazyLock;

use crate::error::RegistryError;
use crate::types::{ChainName, RegistryContent};
use crate::warp_id::{
    parse_warp_route_config_id, warp_route_config_path_to_id, warp_route_deploy_path_to_id,
    WarpRouteId,
};

pub const CHAINS_DIR: &str = "chains";
pub const WARP_ROUTES_DIR: &str = "deployments/warp_routes";
pub const METADATA_FILE: &str = "metadata.yaml";
pub const ADDRESSES_FILE: &str = "addresses.yaml";
pub const LOGO_FILE: &str = "logo.svg";

/// First line of generated metadata files.
pub const SCHEMA_REF: &str = "# yaml-language-server: $schema=../schema.json";

static CHAIN_FILE_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?:^|/)chains/([a-z0-9]+)/([a-z]+)\.(yaml|svg)$").expect("valid chain file regex")
});

static CHAIN_NAME_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[a-z0-9]+$").expect("valid chain name regex"));

/// Which facet of a chain a file holds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ChainFileKind {
    Metadata,
    Addresses,
    Logo,
}

impl ChainFileKind {
    pub fn file_name(&self) -> &'static str {
        match self {
            Self::Metadata => METADATA_FILE,
            Self::Addresses => ADDRESSES_FILE,
            Self::Logo => LOGO_FILE,
        }
    }

    fn from_file(stem: &str, ext: &str) -> Option<Self> {
        match (stem, ext) {
            ("metadata", "yaml") => Some(Self::Metadata),
            ("addresses", "yaml") => Some(Self::Addresses),
            ("logo", "svg") => Some(Self::Logo),
            _ => None,
        }
    }
}

/// What a registry file path refers to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ContentEntry {
    Chain {
        chain: ChainName,
        kind: ChainFileKind,
    },
    WarpRoute(WarpRouteId),
    WarpDeployConfig(WarpRouteId),
}

/// Convert OS separators to `/`.
pub fn normalize_path(path: &str) -> String {
    path.replace('\\', "/")
}

/// Classify a file path. Returns `None` for files outside the layout.
pub fn classify_path(path: &str) -> Option<ContentEntry> {
    let path = normalize_path(path);

    if let Some(captures) = CHAIN_FILE_REGEX.captures(&path) {
        let kind = ChainFileKind::from_file(&captures[2], &captures[3])?;
        return Some(ContentEntry::Chain {
            chain: captures[1].to_string(),
            kind,
        });
    }
    if path.ends_with("-config.yaml") {
        return warp_route_config_path_to_id(&path)
            .ok()
            .map(ContentEntry::WarpRoute);
    }
    if path.ends_with("-deploy.yaml") {
        return warp_route_deploy_path_to_id(&path)
            .ok()
            .map(ContentEntry::WarpDeployConfig);
    }
    None
}

impl RegistryContent {
    /// Record `location` under the entry `path` classifies to.
    ///
    /// `path` is matched against the layout; `location` is what gets stored
    /// (it may be the same string). Returns whether the path was recognized.
    pub fn insert_path(&mut self, path: &str, location: impl Into<String>) -> bool {
        let Some(entry) = classify_path(path) else {
            return false;
        };
        let location = location.into();
        match entry {
            ContentEntry::Chain { chain, kind } => {
                let files = self.chains.entry(chain).or_default();
                match kind {
                    ChainFileKind::Metadata => files.metadata = Some(location),
                    ChainFileKind::Addresses => files.addresses = Some(location),
                    ChainFileKind::Logo => files.logo = Some(location),
                }
            }
            ContentEntry::WarpRoute(id) => {
                self.deployments.warp_routes.insert(id, location);
            }
            ContentEntry::WarpDeployConfig(id) => {
                self.deployments.warp_deploy_config.insert(id, location);
            }
        }
        true
    }

    /// Build a listing from `(path, location)` pairs, skipping unrecognized paths.
    pub fn from_paths<I, P, L>(paths: I) -> Self
    where
        I: IntoIterator<Item = (P, L)>,
        P: AsRef<str>,
        L: Into<String>,
    {
        let mut content = Self::new();
        for (path, location) in paths {
            content.insert_path(path.as_ref(), location);
        }
        content
    }
}

/// Reject chain names outside `[a-z0-9]+`.
pub fn validate_chain_name(chain: &str) -> Result<(), RegistryError> {
    if CHAIN_NAME_REGEX.is_match(chain) {
        Ok(())
    } else {
        Err(RegistryError::InvalidArgument(format!(
            "Invalid chain name '{}': expected lowercase letters and digits only",
            chain
        )))
    }
}

/// Relative path of a chain file, e.g. `chains/ethereum/metadata.yaml`.
pub fn chain_file_path(chain: &str, kind: ChainFileKind) -> String {
    format!("{}/{}/{}", CHAINS_DIR, chain, kind.file_name())
}

/// Relative path of a warp route core config.
pub fn warp_route_config_path(route_id: &str) -> Result<String, RegistryError> {
    warp_route_file_path(route_id, "config")
}

/// Relative path of a warp route deploy config.
pub fn warp_route_deploy_path(route_id: &str) -> Result<String, RegistryError> {
    warp_route_file_path(route_id, "deploy")
}

fn warp_route_file_path(route_id: &str, suffix: &str) -> Result<String, RegistryError> {
    let parsed = parse_warp_route_config_id(route_id)?;
    Ok(format!(
        "{}/{}/{}-{}.yaml",
        WARP_ROUTES_DIR,
        parsed.token_symbol,
        parsed.chain_names.join("-"),
        suffix
    ))
}

#[cfg(test)]
#[path = "content_index_tests.rs"]
mod tests;
