use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use thiserror::Error;

use crate::models::{RankingResponse, TenantId};

/// Errors that can occur with cache operations
#[derive(Debug, Error)]
pub enum CacheError {
    #[error("Invalidation error: {0}")]
    InvalidationError(#[from] moka::PredicateError),
}

/// Memo of ranking responses per client selection
///
/// Rankings are recomputed whenever a tenant's inventory or client list
/// changes: writes call [`RankingCache::invalidate_tenant`], which bumps the
/// tenant's generation and drops every entry under that tenant's prefix.
/// A ranking computed from records read under an older generation is never
/// stored.
pub struct RankingCache {
    cache: moka::future::Cache<String, Arc<RankingResponse>>,
    generations: Mutex<HashMap<String, u64>>,
}

impl RankingCache {
    pub fn new(capacity: u64, ttl_secs: u64) -> Self {
        let cache = moka::future::CacheBuilder::new(capacity)
            .time_to_live(Duration::from_secs(ttl_secs))
            .support_invalidation_closures()
            .build();

        Self {
            cache,
            generations: Mutex::new(HashMap::new()),
        }
    }

    /// Current write generation of a tenant; read it before loading records
    pub fn generation(&self, tenant: &TenantId) -> u64 {
        let generations = self.generations.lock().unwrap_or_else(|e| e.into_inner());
        generations.get(tenant.as_str()).copied().unwrap_or(0)
    }

    fn bump_generation(&self, tenant: &TenantId) {
        let mut generations = self.generations.lock().unwrap_or_else(|e| e.into_inner());
        *generations.entry(tenant.as_str().to_string()).or_insert(0) += 1;
    }

    pub async fn get(&self, key: &str) -> Option<Arc<RankingResponse>> {
        let hit = self.cache.get(key).await;
        if hit.is_some() {
            tracing::trace!("Ranking cache hit: {}", key);
        } else {
            tracing::trace!("Ranking cache miss: {}", key);
        }
        hit
    }

    /// Store a ranking only if no write happened since `generation` was read
    ///
    /// Returns whether the ranking was kept.
    pub async fn insert_if_current(
        &self,
        tenant: &TenantId,
        generation: u64,
        key: String,
        ranking: Arc<RankingResponse>,
    ) -> bool {
        if self.generation(tenant) != generation {
            tracing::debug!("Skipping stale ranking for {}", key);
            return false;
        }

        self.cache.insert(key.clone(), ranking).await;

        // A write may have bumped the generation after the check but before
        // its invalidation saw our entry
        if self.generation(tenant) != generation {
            self.cache.invalidate(&key).await;
            return false;
        }

        true
    }

    /// Drop every memoized ranking of a tenant
    pub fn invalidate_tenant(&self, tenant: &TenantId) -> Result<(), CacheError> {
        self.bump_generation(tenant);

        let prefix = CacheKey::tenant_prefix(tenant);
        self.cache
            .invalidate_entries_if(move |key, _| key.starts_with(&prefix))?;

        tracing::debug!("Invalidated rankings for tenant {}", tenant);
        Ok(())
    }

    /// Get cache statistics
    pub fn stats(&self) -> CacheStats {
        CacheStats {
            entries: self.cache.entry_count(),
        }
    }
}

/// Cache statistics
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CacheStats {
    pub entries: u64,
}

/// Cache key builder
pub struct CacheKey;

impl CacheKey {
    /// Prefix shared by all of a tenant's ranking keys
    pub fn tenant_prefix(tenant: &TenantId) -> String {
        format!("ranking:{}:", tenant)
    }

    /// Build a cache key for one client's ranking
    pub fn ranking(tenant: &TenantId, client_id: &str, limit: Option<usize>) -> String {
        match limit {
            Some(limit) => format!("{}{}:{}", Self::tenant_prefix(tenant), client_id, limit),
            None => format!("{}{}:all", Self::tenant_prefix(tenant), client_id),
        }
    }
}
