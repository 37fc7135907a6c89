//! Archive download over HTTP.
//!
//! Authenticated fetchers check the API quota first and download the
//! zipball through the API. Anonymous fetchers walk the public archive
//! URLs in order; a 404 moves on to the next candidate, any other failure
//! status ends the attempt.

use bytes::Bytes;
use chrono::{DateTime, Utc};
use reqwest::{Client, StatusCode};
use serde::Deserialize;
use std::sync::atomic::{AtomicUsize, Ordering};
use tracing::{debug, info, warn};

use crate::archive::ArchiveIndex;
use crate::error::GithubRegistryError;

/// Remaining core API quota of the configured credential.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RateLimitStatus {
    pub limit: u64,
    pub remaining: u64,
    pub reset_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Deserialize)]
struct RateLimitResponse {
    resources: RateLimitResources,
}

#[derive(Debug, Deserialize)]
struct RateLimitResources {
    core: RateLimitCore,
}

#[derive(Debug, Deserialize)]
struct RateLimitCore {
    limit: u64,
    remaining: u64,
    reset: i64,
}

pub(crate) struct ArchiveFetcher {
    pub(crate) client: Client,
    pub(crate) owner: String,
    pub(crate) repo: String,
    pub(crate) reference: String,
    pub(crate) auth_token: Option<String>,
    pub(crate) api_url: String,
    pub(crate) archive_base_url: String,
    pub(crate) downloads: AtomicUsize,
}

impl ArchiveFetcher {
    /// Download and index the archive.
    pub(crate) async fn fetch(&self) -> Result<ArchiveIndex, GithubRegistryError> {
        if self.auth_token.is_some() {
            self.ensure_quota().await?;
        }

        let data = self.download().await?;
        let size = data.len();
        let index = tokio::task::spawn_blocking(move || ArchiveIndex::from_zip(&data))
            .await
            .map_err(|e| GithubRegistryError::Archive(e.to_string()))??;

        info!(
            "Indexed {} files from {}/{}@{} ({} bytes)",
            index.len(),
            self.owner,
            self.repo,
            self.reference,
            size
        );
        Ok(index)
    }

    pub(crate) fn download_count(&self) -> usize {
        self.downloads.load(Ordering::SeqCst)
    }

    /// Public archive URLs in the order they are tried.
    pub(crate) fn candidate_urls(&self) -> Vec<String> {
        let base = format!(
            "{}/{}/{}",
            self.archive_base_url.trim_end_matches('/'),
            self.owner,
            self.repo
        );
        vec![
            format!("{}/archive/refs/heads/{}.zip", base, self.reference),
            format!("{}/archive/refs/tags/{}.zip", base, self.reference),
            format!("{}/archive/{}.zip", base, self.reference),
        ]
    }

    pub(crate) fn api_archive_url(&self) -> String {
        format!(
            "{}/repos/{}/{}/zipball/{}",
            self.api_url.trim_end_matches('/'),
            self.owner,
            self.repo,
            self.reference
        )
    }

    async fn download(&self) -> Result<Bytes, GithubRegistryError> {
        self.downloads.fetch_add(1, Ordering::SeqCst);

        if let Some(token) = &self.auth_token {
            let url = self.api_archive_url();
            debug!("Downloading archive from {}", url);
            let response = self
                .client
                .get(&url)
                .bearer_auth(token)
                .header("Accept", "application/vnd.github+json")
                .send()
                .await
                .map_err(|e| request_error(&url, e))?;
            return read_body(&url, response).await;
        }

        for url in self.candidate_urls() {
            debug!("Downloading archive from {}", url);
            let response = self
                .client
                .get(&url)
                .send()
                .await
                .map_err(|e| request_error(&url, e))?;
            if response.status() == StatusCode::NOT_FOUND {
                debug!("No archive at {}, trying next candidate", url);
                continue;
            }
            return read_body(&url, response).await;
        }

        Err(GithubRegistryError::ArchiveNotFound {
            repository: format!("{}/{}", self.owner, self.repo),
            reference: self.reference.clone(),
        })
    }

    /// Query the API quota of the configured credential.
    pub(crate) async fn rate_limit(&self) -> Result<RateLimitStatus, GithubRegistryError> {
        let url = format!("{}/rate_limit", self.api_url.trim_end_matches('/'));
        let mut request = self
            .client
            .get(&url)
            .header("Accept", "application/vnd.github+json");
        if let Some(token) = &self.auth_token {
            request = request.bearer_auth(token);
        }

        let response = request.send().await.map_err(|e| request_error(&url, e))?;
        let status = response.status();
        if !status.is_success() {
            return Err(status_error(&url, status));
        }
        let body: RateLimitResponse = response
            .json()
            .await
            .map_err(|e| request_error(&url, e))?;

        let core = body.resources.core;
        Ok(RateLimitStatus {
            limit: core.limit,
            remaining: core.remaining,
            reset_at: DateTime::from_timestamp(core.reset, 0),
        })
    }

    /// Fail fast when the quota is spent. A failed probe is not fatal.
    async fn ensure_quota(&self) -> Result<(), GithubRegistryError> {
        match self.rate_limit().await {
            Ok(status) if status.remaining == 0 => {
                warn!(
                    "GitHub rate limit exhausted for {}/{}, resets at {:?}",
                    self.owner, self.repo, status.reset_at
                );
                Err(GithubRegistryError::RateLimited {
                    reset_at: status.reset_at,
                })
            }
            Ok(status) => {
                debug!("GitHub quota: {}/{} remaining", status.remaining, status.limit);
                Ok(())
            }
            Err(e) => {
                warn!("Could not check GitHub rate limit: {}", e);
                Ok(())
            }
        }
    }
}

fn request_error(url: &str, err: reqwest::Error) -> GithubRegistryError {
    GithubRegistryError::Request {
        url: url.to_string(),
        reason: err.to_string(),
    }
}

fn status_error(url: &str, status: StatusCode) -> GithubRegistryError {
    GithubRegistryError::Status {
        url: url.to_string(),
        status: status.as_u16(),
        reason: status.canonical_reason().unwrap_or("Unknown").to_string(),
    }
}

async fn read_body(url: &str, response: reqwest::Response) -> Result<Bytes, GithubRegistryError> {
    let status = response.status();
    if !status.is_success() {
        return Err(status_error(url, status));
    }
    response.bytes().await.map_err(|e| request_error(url, e))
}
