//! Shared caches for file-backed registries.
//!
//! Holds the content listing plus the bulk metadata and address maps.
//! Writes through a backend patch the caches in place so a later read
//! sees the write without rebuilding the listing.

use parking_lot::RwLock;
use std::sync::atomic::{AtomicUsize, Ordering};

use chainreg_protocols::{ChainAddresses, ChainMap, ChainMetadata, RegistryContent};

#[derive(Debug, Default)]
pub struct RegistryCache {
    content: RwLock<Option<RegistryContent>>,
    metadata: RwLock<Option<ChainMap<ChainMetadata>>>,
    addresses: RwLock<Option<ChainMap<ChainAddresses>>>,
    content_builds: AtomicUsize,
}

impl RegistryCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn content(&self) -> Option<RegistryContent> {
        self.content.read().clone()
    }

    /// Store a freshly built listing.
    pub fn store_content(&self, content: RegistryContent) {
        self.content_builds.fetch_add(1, Ordering::Relaxed);
        *self.content.write() = Some(content);
    }

    /// Number of listings stored since creation or the last invalidation.
    pub fn content_builds(&self) -> usize {
        self.content_builds.load(Ordering::Relaxed)
    }

    pub fn metadata(&self) -> Option<ChainMap<ChainMetadata>> {
        self.metadata.read().clone()
    }

    pub fn store_metadata(&self, metadata: ChainMap<ChainMetadata>) {
        *self.metadata.write() = Some(metadata);
    }

    pub fn addresses(&self) -> Option<ChainMap<ChainAddresses>> {
        self.addresses.read().clone()
    }

    pub fn store_addresses(&self, addresses: ChainMap<ChainAddresses>) {
        *self.addresses.write() = Some(addresses);
    }

    /// Patch the cached listing. No-op when nothing is cached yet.
    pub fn update_content(&self, f: impl FnOnce(&mut RegistryContent)) {
        if let Some(content) = self.content.write().as_mut() {
            f(content);
        }
    }

    /// Record new facets for `chain` in whichever bulk maps are loaded.
    pub fn upsert_chain(
        &self,
        chain: &str,
        metadata: Option<&ChainMetadata>,
        addresses: Option<&ChainAddresses>,
    ) {
        if let Some(metadata) = metadata {
            if let Some(cached) = self.metadata.write().as_mut() {
                cached.insert(chain.to_string(), metadata.clone());
            }
        }
        if let Some(addresses) = addresses {
            if let Some(cached) = self.addresses.write().as_mut() {
                cached.insert(chain.to_string(), addresses.clone());
            }
        }
    }

    /// Forget every trace of `chain`.
    pub fn remove_chain(&self, chain: &str) {
        self.update_content(|content| {
            content.chains.remove(chain);
        });
        if let Some(cached) = self.metadata.write().as_mut() {
            cached.remove(chain);
        }
        if let Some(cached) = self.addresses.write().as_mut() {
            cached.remove(chain);
        }
    }

    pub fn invalidate(&self) {
        *self.content.write() = None;
        *self.metadata.write() = None;
        *self.addresses.write() = None;
        self.content_builds.store(0, Ordering::Relaxed);
    }
}
