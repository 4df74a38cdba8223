use crate::ApiResult;
use crate::models::CacheStats;
use async_trait::async_trait;
use std::path::Path;

#[async_trait]
pub trait EngineLifecycle: Send + Sync {
    /// Drop all cached content, symbols and the built dependency graph.
    async fn clear_cache(&self) -> ApiResult<()>;

    /// Evict exactly one file's cached content and symbols.
    async fn invalidate_file(&self, path: &Path) -> ApiResult<()>;

    async fn cache_stats(&self) -> ApiResult<CacheStats>;
}
