use crate::models::Farmer;
use crate::services::supabase::{ExporterSession, SupabaseClient, SupabaseError};
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

/// In-process cache of the farmer catalog
///
/// The catalog changes rarely compared to how often matches are requested,
/// so service-key reads are kept for a short TTL. Reads made with a caller's
/// session token bypass the cache since row-level policies may differ.
pub struct CatalogCache {
    cache: moka::future::Cache<String, Arc<Vec<Farmer>>>,
}

impl CatalogCache {
    pub fn new(capacity: u64, ttl_secs: u64) -> Self {
        let cache = moka::future::CacheBuilder::new(capacity)
            .time_to_live(Duration::from_secs(ttl_secs))
            .build();

        Self { cache }
    }

    /// Return the cached value for `key`, loading it with `fetch` on a miss
    ///
    /// Concurrent misses on the same key share a single `fetch`. Failed
    /// loads are not cached.
    pub async fn get_or_fetch<F, Fut>(
        &self,
        key: &str,
        fetch: F,
    ) -> Result<Arc<Vec<Farmer>>, SupabaseError>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<Vec<Farmer>, SupabaseError>>,
    {
        self.cache
            .try_get_with(key.to_string(), async {
                tracing::trace!("Catalog cache miss: {}", key);
                fetch().await.map(Arc::new)
            })
            .await
            .map_err(unshare_error)
    }

    /// Farmer catalog as visible to the given session
    pub async fn farmers(
        &self,
        client: &SupabaseClient,
        session: &ExporterSession,
    ) -> Result<Arc<Vec<Farmer>>, SupabaseError> {
        if !session.is_anonymous() {
            return client.list_farmers(session).await.map(Arc::new);
        }

        self.get_or_fetch(&CacheKey::farmers("service"), || client.list_farmers(session))
            .await
    }

    pub fn invalidate_all(&self) {
        self.cache.invalidate_all();
        tracing::debug!("Invalidated farmer catalog cache");
    }
}

// Waiters that shared a failed load get their own copy of the error
fn unshare_error(error: Arc<SupabaseError>) -> SupabaseError {
    Arc::try_unwrap(error).unwrap_or_else(|shared| match shared.as_ref() {
        SupabaseError::NotFound(what) => SupabaseError::NotFound(what.clone()),
        SupabaseError::Unauthorized => SupabaseError::Unauthorized,
        SupabaseError::InvalidResponse(msg) => SupabaseError::InvalidResponse(msg.clone()),
        other => SupabaseError::ApiError(other.to_string()),
    })
}

/// Cache key builder
pub struct CacheKey;

impl CacheKey {
    /// Build a cache key for the farmer catalog seen by a given scope
    pub fn farmers(scope: &str) -> String {
        format!("farmers:{}", scope)
    }
}
