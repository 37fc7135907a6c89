//! GitHub registry implementation.

use async_trait::async_trait;
use futures::future::{BoxFuture, FutureExt, Shared};
use futures::stream::{self, StreamExt, TryStreamExt};
use parking_lot::{Mutex, RwLock};
use reqwest::Client;
use serde::de::DeserializeOwned;
use std::collections::BTreeMap;
use std::sync::atomic::AtomicUsize;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info};
use url::Url;

use chainreg_core::yaml::parse_yaml;
use chainreg_core::{MergedRegistry, RegistryCache};
use chainreg_protocols::content_index::{chain_file_path, ChainFileKind};
use chainreg_protocols::validation::validate_chain_addresses;
use chainreg_protocols::warp_id::filter_warp_routes_ids;
use chainreg_protocols::{
    AddWarpRouteOptions, ChainAddresses, ChainMap, ChainMetadata, Registry, RegistryContent,
    RegistryError, RegistryMethod, RegistryType, UpdateChainParams, WarpCoreConfig,
    WarpDeployConfigMap, WarpRouteConfigMap, WarpRouteDeployConfig, WarpRouteFilter, WarpRouteId,
};

use crate::archive::ArchiveIndex;
use crate::error::GithubRegistryError;
use crate::fetcher::{ArchiveFetcher, RateLimitStatus};

/// The well-known public registry.
pub const DEFAULT_GITHUB_REGISTRY: &str = "https://github.com/hyperlane-xyz/hyperlane-registry";
pub const DEFAULT_BRANCH: &str = "main";
pub const DEFAULT_API_URL: &str = "https://api.github.com";
pub const RAW_CONTENT_URL: &str = "https://raw.githubusercontent.com";

const USER_AGENT: &str = concat!("chainreg/", env!("CARGO_PKG_VERSION"));

/// Per-file reads in flight during bulk warp route reads.
const MAX_CONCURRENT_READS: usize = 5;

#[derive(Debug, Clone)]
pub struct GithubRegistryOptions {
    /// Repository URL, e.g. `https://github.com/<owner>/<repo>`.
    /// A `/tree/<ref>` suffix selects the ref when `branch` is unset.
    pub uri: String,
    pub branch: Option<String>,
    /// Token for the GitHub API. Without one the public archive URLs are used.
    pub auth_token: Option<String>,
    pub api_url: String,
    /// Host serving `/<owner>/<repo>/archive/...`; defaults to the URI's origin.
    pub archive_base_url: Option<String>,
    pub timeout: Duration,
}

impl Default for GithubRegistryOptions {
    fn default() -> Self {
        Self {
            uri: DEFAULT_GITHUB_REGISTRY.to_string(),
            branch: None,
            auth_token: None,
            api_url: DEFAULT_API_URL.to_string(),
            archive_base_url: None,
            timeout: Duration::from_secs(60),
        }
    }
}

type ArchiveResult = Result<Arc<ArchiveIndex>, GithubRegistryError>;
type PendingArchive = Shared<BoxFuture<'static, ArchiveResult>>;

/// Archive slot shared with the in-flight download.
#[derive(Default)]
struct ArchiveState {
    index: RwLock<Option<Arc<ArchiveIndex>>>,
    /// The download every concurrent caller awaits. Cleared when it settles.
    pending: Mutex<Option<PendingArchive>>,
}

/// Registry served from a snapshot of a GitHub repository.
pub struct GithubRegistry {
    uri: String,
    branch: String,
    fetcher: Arc<ArchiveFetcher>,
    archive: Arc<ArchiveState>,
    cache: RegistryCache,
}

impl GithubRegistry {
    pub fn new(options: GithubRegistryOptions) -> Result<Self, RegistryError> {
        let (owner, repo, tree_ref) = parse_repository_uri(&options.uri)?;
        let branch = options
            .branch
            .or(tree_ref)
            .unwrap_or_else(|| DEFAULT_BRANCH.to_string());

        let archive_base_url = match options.archive_base_url {
            Some(base) => base,
            None => {
                let url = Url::parse(&options.uri).map_err(|e| invalid_uri(&options.uri, e))?;
                url.origin().ascii_serialization()
            }
        };

        let client = Client::builder()
            .timeout(options.timeout)
            .user_agent(USER_AGENT)
            .build()
            .map_err(|e| RegistryError::Network(e.to_string()))?;

        let uri = format!("{}/{}/{}", archive_base_url.trim_end_matches('/'), owner, repo);
        debug!("Created GitHub registry {} at ref {}", uri, branch);

        Ok(Self {
            uri,
            fetcher: Arc::new(ArchiveFetcher {
                client,
                owner,
                repo,
                reference: branch.clone(),
                auth_token: options.auth_token,
                api_url: options.api_url,
                archive_base_url,
                downloads: AtomicUsize::new(0),
            }),
            branch,
            archive: Arc::new(ArchiveState::default()),
            cache: RegistryCache::new(),
        })
    }

    pub fn owner(&self) -> &str {
        &self.fetcher.owner
    }

    pub fn repo(&self) -> &str {
        &self.fetcher.repo
    }

    pub fn branch(&self) -> &str {
        &self.branch
    }

    /// Number of archive downloads started by this instance.
    pub fn download_count(&self) -> usize {
        self.fetcher.download_count()
    }

    /// The archive index, if it has been loaded.
    pub fn archive_entries(&self) -> Option<Arc<ArchiveIndex>> {
        self.archive.index.read().clone()
    }

    /// Quota of the configured credential.
    pub async fn rate_limit(&self) -> Result<RateLimitStatus, RegistryError> {
        Ok(self.fetcher.rate_limit().await?)
    }

    /// Load the archive, downloading it at most once across concurrent callers.
    pub async fn ensure_archive_entries(&self) -> Result<Arc<ArchiveIndex>, RegistryError> {
        if let Some(index) = self.archive_entries() {
            return Ok(index);
        }

        let pending = {
            let mut slot = self.archive.pending.lock();
            if let Some(index) = self.archive_entries() {
                return Ok(index);
            }
            match slot.as_ref() {
                Some(pending) => pending.clone(),
                None => {
                    let pending = self.start_download();
                    *slot = Some(pending.clone());
                    pending
                }
            }
        };

        Ok(pending.await?)
    }

    fn start_download(&self) -> PendingArchive {
        let fetcher = self.fetcher.clone();
        let state = self.archive.clone();
        async move {
            let result = fetcher.fetch().await.map(Arc::new);
            if let Ok(index) = &result {
                *state.index.write() = Some(index.clone());
            }
            state.pending.lock().take();
            result
        }
        .boxed()
        .shared()
    }

    async fn content(&self) -> Result<RegistryContent, RegistryError> {
        if let Some(content) = self.cache.content() {
            return Ok(content);
        }
        let index = self.ensure_archive_entries().await?;
        let content = RegistryContent::from_paths(index.paths().map(|path| (path, path)));
        self.cache.store_content(content.clone());
        Ok(content)
    }

    /// Raw file URL for a path inside the repository.
    fn raw_url(&self, path: &str) -> String {
        format!(
            "{}/{}/{}/{}/{}",
            RAW_CONTENT_URL,
            self.fetcher.owner,
            self.fetcher.repo,
            self.branch,
            path.trim_start_matches('/')
        )
    }

    fn unsupported(&self, method: RegistryMethod) -> RegistryError {
        RegistryError::unimplemented(RegistryType::Github, method)
    }
}

fn invalid_uri(uri: &str, reason: impl ToString) -> RegistryError {
    GithubRegistryError::InvalidUri {
        uri: uri.to_string(),
        reason: reason.to_string(),
    }
    .into()
}

/// Split a repository URL into owner, repo and an optional `/tree/<ref>`.
fn parse_repository_uri(uri: &str) -> Result<(String, String, Option<String>), RegistryError> {
    let url = Url::parse(uri).map_err(|e| invalid_uri(uri, e))?;
    if !matches!(url.scheme(), "http" | "https") {
        return Err(invalid_uri(uri, "expected an http(s) URL"));
    }

    let segments: Vec<&str> = url
        .path_segments()
        .map(|s| s.filter(|segment| !segment.is_empty()).collect())
        .unwrap_or_default();
    match segments.as_slice() {
        [owner, repo] => Ok((owner.to_string(), strip_git(repo), None)),
        [owner, repo, "tree", reference @ ..] if !reference.is_empty() => Ok((
            owner.to_string(),
            strip_git(repo),
            Some(reference.join("/")),
        )),
        _ => Err(invalid_uri(uri, "expected /<owner>/<repo>")),
    }
}

fn strip_git(repo: &str) -> String {
    repo.strip_suffix(".git").unwrap_or(repo).to_string()
}

/// Parse the archive file at `path`.
fn read_entry<T: DeserializeOwned>(index: &ArchiveIndex, path: &str) -> Result<T, RegistryError> {
    let text = index
        .read_text(path)
        .ok_or_else(|| RegistryError::NotFound(path.to_string()))??;
    let value = parse_yaml(text).map_err(|e| RegistryError::Yaml(format!("{}: {}", path, e)))?;
    serde_json::from_value(value).map_err(|e| RegistryError::Yaml(format!("{}: {}", path, e)))
}

/// Parse every file in `paths`, at most [`MAX_CONCURRENT_READS`] at a time.
async fn read_entries<T>(
    index: Arc<ArchiveIndex>,
    paths: BTreeMap<WarpRouteId, String>,
) -> Result<BTreeMap<WarpRouteId, T>, RegistryError>
where
    T: DeserializeOwned + Send + 'static,
{
    stream::iter(paths)
        .map(|(id, path)| {
            let index = index.clone();
            async move { read_entry::<T>(&index, &path).map(|value| (id, value)) }
        })
        .buffer_unordered(MAX_CONCURRENT_READS)
        .try_collect()
        .await
}

#[async_trait]
impl Registry for GithubRegistry {
    fn uri(&self) -> &str {
        &self.uri
    }

    fn registry_type(&self) -> RegistryType {
        RegistryType::Github
    }

    fn unimplemented_methods(&self) -> &[RegistryMethod] {
        &RegistryMethod::WRITES
    }

    fn get_uri(&self, item_path: Option<&str>) -> Result<String, RegistryError> {
        Ok(match item_path {
            Some(path) => self.raw_url(path),
            None => self.uri.clone(),
        })
    }

    async fn list_registry_content(&self) -> Result<RegistryContent, RegistryError> {
        self.content().await
    }

    async fn get_metadata(&self) -> Result<ChainMap<ChainMetadata>, RegistryError> {
        if let Some(metadata) = self.cache.metadata() {
            return Ok(metadata);
        }

        let content = self.content().await?;
        let index = self.ensure_archive_entries().await?;
        let mut metadata = ChainMap::new();
        for (chain, files) in &content.chains {
            if let Some(path) = &files.metadata {
                metadata.insert(chain.clone(), read_entry(&index, path)?);
            }
        }

        self.cache.store_metadata(metadata.clone());
        Ok(metadata)
    }

    async fn get_chain_metadata(&self, chain: &str) -> Result<Option<ChainMetadata>, RegistryError> {
        if let Some(mut metadata) = self.cache.metadata() {
            return Ok(metadata.remove(chain));
        }
        let index = self.ensure_archive_entries().await?;
        let path = chain_file_path(chain, ChainFileKind::Metadata);
        if index.get(&path).is_none() {
            return Ok(None);
        }
        Ok(Some(read_entry(&index, &path)?))
    }

    async fn get_addresses(&self) -> Result<ChainMap<ChainAddresses>, RegistryError> {
        if let Some(addresses) = self.cache.addresses() {
            return Ok(addresses);
        }

        let content = self.content().await?;
        let index = self.ensure_archive_entries().await?;
        let mut addresses = ChainMap::new();
        for (chain, files) in &content.chains {
            if let Some(path) = &files.addresses {
                let value: serde_json::Value = read_entry(&index, path)?;
                addresses.insert(chain.clone(), validate_chain_addresses(value)?);
            }
        }

        self.cache.store_addresses(addresses.clone());
        Ok(addresses)
    }

    async fn get_chain_addresses(
        &self,
        chain: &str,
    ) -> Result<Option<ChainAddresses>, RegistryError> {
        if let Some(mut addresses) = self.cache.addresses() {
            return Ok(addresses.remove(chain));
        }
        let index = self.ensure_archive_entries().await?;
        let path = chain_file_path(chain, ChainFileKind::Addresses);
        if index.get(&path).is_none() {
            return Ok(None);
        }
        let value: serde_json::Value = read_entry(&index, &path)?;
        Ok(Some(validate_chain_addresses(value)?))
    }

    async fn get_chain_logo_uri(&self, chain: &str) -> Result<Option<String>, RegistryError> {
        let content = self.content().await?;
        Ok(content
            .chains
            .get(chain)
            .and_then(|files| files.logo.as_deref())
            .map(|path| self.raw_url(path)))
    }

    async fn add_chain(&self, _chain: UpdateChainParams) -> Result<(), RegistryError> {
        Err(self.unsupported(RegistryMethod::AddChain))
    }

    async fn update_chain(&self, _chain: UpdateChainParams) -> Result<(), RegistryError> {
        Err(self.unsupported(RegistryMethod::UpdateChain))
    }

    async fn remove_chain(&self, _chain: &str) -> Result<(), RegistryError> {
        Err(self.unsupported(RegistryMethod::RemoveChain))
    }

    async fn get_warp_route(&self, route_id: &str) -> Result<Option<WarpCoreConfig>, RegistryError> {
        let content = self.content().await?;
        let Some(path) = content.deployments.warp_routes.get(route_id) else {
            return Ok(None);
        };
        let index = self.ensure_archive_entries().await?;
        Ok(Some(read_entry(&index, path)?))
    }

    async fn get_warp_routes(
        &self,
        filter: Option<&WarpRouteFilter>,
    ) -> Result<WarpRouteConfigMap, RegistryError> {
        let content = self.content().await?;
        let matching = filter_warp_routes_ids(&content.deployments.warp_routes, filter);
        let index = self.ensure_archive_entries().await?;
        read_entries(index, matching.id_map).await
    }

    async fn add_warp_route(
        &self,
        _config: WarpCoreConfig,
        _options: Option<AddWarpRouteOptions>,
    ) -> Result<(), RegistryError> {
        Err(self.unsupported(RegistryMethod::AddWarpRoute))
    }

    async fn add_warp_route_config(
        &self,
        _config: WarpRouteDeployConfig,
        _options: Option<AddWarpRouteOptions>,
    ) -> Result<(), RegistryError> {
        Err(self.unsupported(RegistryMethod::AddWarpRouteConfig))
    }

    async fn get_warp_deploy_config(
        &self,
        route_id: &str,
    ) -> Result<Option<WarpRouteDeployConfig>, RegistryError> {
        let content = self.content().await?;
        let Some(path) = content.deployments.warp_deploy_config.get(route_id) else {
            return Ok(None);
        };
        let index = self.ensure_archive_entries().await?;
        Ok(Some(read_entry(&index, path)?))
    }

    async fn get_warp_deploy_configs(
        &self,
        filter: Option<&WarpRouteFilter>,
    ) -> Result<WarpDeployConfigMap, RegistryError> {
        let content = self.content().await?;
        let matching = filter_warp_routes_ids(&content.deployments.warp_deploy_config, filter);
        let index = self.ensure_archive_entries().await?;
        let configs = read_entries(index, matching.id_map).await?;
        info!("Read {} warp deploy configs from {}", configs.len(), self.uri);
        Ok(configs)
    }

    fn merge(self: Arc<Self>, other: Arc<dyn Registry>) -> Arc<dyn Registry> {
        Arc::new(MergedRegistry::new(vec![self, other]))
    }
}

#[cfg(test)]
#[path = "registry_tests.rs"]
mod tests;
