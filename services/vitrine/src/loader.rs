//! Data loader: fetch-all with a TTL memo

use std::sync::Arc;
use std::time::{Duration, Instant};

use tokio::sync::RwLock;

use crate::backend::TableClient;
use crate::cache::TtlCache;
use crate::record::RecordSet;

/// Cache key: (backend identity, table name)
type CacheKey = (String, String);

/// Loads the full data table, memoizing the result per (backend, table) for
/// the configured TTL. Refresh is idempotent, so concurrent misses may each
/// query once and the last writer wins.
pub struct DataLoader {
    client: TableClient,
    table: String,
    cache: RwLock<TtlCache<CacheKey, Arc<RecordSet>>>,
}

impl std::fmt::Debug for DataLoader {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DataLoader")
            .field("table", &self.table)
            .finish()
    }
}

impl DataLoader {
    pub fn new(client: TableClient, table: &str, ttl: Duration) -> Self {
        Self {
            client,
            table: table.to_string(),
            cache: RwLock::new(TtlCache::new(ttl)),
        }
    }

    /// Load all rows, returning the memoized set when it is still fresh
    pub async fn load(&self) -> crate::Result<Arc<RecordSet>> {
        self.load_at(Instant::now()).await
    }

    pub(crate) async fn load_at(&self, now: Instant) -> crate::Result<Arc<RecordSet>> {
        let key = (self.client.identity().to_string(), self.table.clone());

        if let Some(records) = self.cache.read().await.get_at(&key, now) {
            tracing::debug!("Cache hit for table '{}' ({} rows)", self.table, records.len());
            return Ok(records);
        }

        tracing::debug!("Cache miss for table '{}', querying backend", self.table);
        let records: Arc<RecordSet> = Arc::new(self.client.select_all(&self.table).await?);

        let mut cache = self.cache.write().await;
        cache.evict_expired_at(now);
        cache.insert_at(key, Arc::clone(&records), now);
        Ok(records)
    }
}
