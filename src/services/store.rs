use redis::aio::ConnectionManager;
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;
use tokio::sync::{Mutex, RwLock};

use crate::models::TenantId;

/// Errors that can occur with store operations
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Redis error: {0}")]
    RedisError(#[from] redis::RedisError),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),
}

/// Record collections kept per tenant
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Collection {
    Properties,
    Clients,
    Reminders,
}

impl Collection {
    pub fn as_str(&self) -> &'static str {
        match self {
            Collection::Properties => "properties",
            Collection::Clients => "clients",
            Collection::Reminders => "reminders",
        }
    }
}

/// Store key builder
pub struct StoreKey;

impl StoreKey {
    /// Build the key of one tenant's collection blob
    pub fn blob(tenant: &TenantId, collection: Collection) -> String {
        format!("propmate:{}:{}", tenant, collection.as_str())
    }
}

enum Backend {
    // Stored in a Mutex for interior mutability
    Redis(Arc<Mutex<ConnectionManager>>),
    Memory(Arc<RwLock<HashMap<String, String>>>),
}

/// Per-tenant key-value blob store
///
/// Every collection is one JSON array stored under a tenant-namespaced key.
/// Reads go through an in-memory L1 cache; the backend is either Redis or,
/// when no Redis URL is configured, process memory.
pub struct TenantStore {
    backend: Backend,
    l1_cache: moka::future::Cache<String, String>,
    // Serializes read-modify-write cycles
    write_lock: Mutex<()>,
}

impl TenantStore {
    /// Create a Redis-backed store
    pub async fn connect(redis_url: &str, l1_size: u64, ttl_secs: u64) -> Result<Self, StoreError> {
        let client = redis::Client::open(redis_url)?;
        let redis = ConnectionManager::new(client).await?;

        Ok(Self::with_backend(
            Backend::Redis(Arc::new(Mutex::new(redis))),
            l1_size,
            ttl_secs,
        ))
    }

    /// Create a store that lives in process memory
    pub fn in_memory(l1_size: u64, ttl_secs: u64) -> Self {
        let map = Arc::new(RwLock::new(HashMap::new()));
        Self::with_backend(Backend::Memory(map), l1_size, ttl_secs)
    }

    fn with_backend(backend: Backend, l1_size: u64, ttl_secs: u64) -> Self {
        let l1_cache = moka::future::CacheBuilder::new(l1_size)
            .time_to_live(Duration::from_secs(ttl_secs))
            .build();

        Self {
            backend,
            l1_cache,
            write_lock: Mutex::new(()),
        }
    }

    pub fn backend_name(&self) -> &'static str {
        match self.backend {
            Backend::Redis(_) => "redis",
            Backend::Memory(_) => "memory",
        }
    }

    async fn get_raw(&self, key: &str) -> Result<Option<String>, StoreError> {
        if let Some(json) = self.l1_cache.get(key).await {
            tracing::trace!("L1 store hit: {}", key);
            return Ok(Some(json));
        }

        let value: Option<String> = match &self.backend {
            Backend::Redis(redis) => {
                let mut conn = redis.lock().await;
                let value: Option<String> =
                    redis::cmd("GET").arg(key).query_async(&mut *conn).await?;
                value
            }
            Backend::Memory(map) => map.read().await.get(key).cloned(),
        };

        if let Some(json) = &value {
            self.l1_cache.insert(key.to_string(), json.clone()).await;
        }

        Ok(value)
    }

    async fn set_raw(&self, key: &str, json: String) -> Result<(), StoreError> {
        match &self.backend {
            Backend::Redis(redis) => {
                let mut conn = redis.lock().await;
                let _: () = redis::cmd("SET").arg(key).arg(&json).query_async(&mut *conn).await?;
            }
            Backend::Memory(map) => {
                map.write().await.insert(key.to_string(), json.clone());
            }
        }

        self.l1_cache.insert(key.to_string(), json).await;
        Ok(())
    }

    /// Load a tenant's collection; a missing blob is an empty list
    pub async fn load<T>(
        &self,
        tenant: &TenantId,
        collection: Collection,
    ) -> Result<Vec<T>, StoreError>
    where
        T: DeserializeOwned,
    {
        let key = StoreKey::blob(tenant, collection);

        match self.get_raw(&key).await? {
            Some(json) => Ok(serde_json::from_str(&json)?),
            None => {
                tracing::trace!("Store miss: {}", key);
                Ok(Vec::new())
            }
        }
    }

    /// Replace a tenant's collection
    pub async fn save<T>(
        &self,
        tenant: &TenantId,
        collection: Collection,
        items: &[T],
    ) -> Result<(), StoreError>
    where
        T: Serialize,
    {
        let key = StoreKey::blob(tenant, collection);
        let json = serde_json::to_string(items)?;
        self.set_raw(&key, json).await?;

        tracing::debug!("Saved {} {} for tenant {}", items.len(), collection.as_str(), tenant);
        Ok(())
    }

    /// Read-modify-write a collection under the store's write lock
    ///
    /// The closure returns `None` to leave the collection untouched, in which
    /// case nothing is written back.
    pub async fn update<T, R, F>(
        &self,
        tenant: &TenantId,
        collection: Collection,
        apply: F,
    ) -> Result<Option<R>, StoreError>
    where
        T: Serialize + DeserializeOwned,
        F: FnOnce(&mut Vec<T>) -> Option<R>,
    {
        let _guard = self.write_lock.lock().await;

        let mut items: Vec<T> = self.load(tenant, collection).await?;
        let outcome = apply(&mut items);

        if outcome.is_some() {
            self.save(tenant, collection, &items).await?;
        }

        Ok(outcome)
    }

    /// Health check for the backend
    pub async fn health_check(&self) -> Result<bool, StoreError> {
        match &self.backend {
            Backend::Redis(redis) => {
                let mut conn = redis.lock().await;
                let pong: String = redis::cmd("PING").query_async(&mut *conn).await?;
                Ok(pong == "PONG")
            }
            Backend::Memory(_) => Ok(true),
        }
    }
}
