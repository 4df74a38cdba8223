use super::EngineHandle;
use async_trait::async_trait;
use std::path::Path;
use wayfinder_api::{ApiResult, CacheStats, EngineLifecycle};

#[async_trait]
impl EngineLifecycle for EngineHandle {
    async fn clear_cache(&self) -> ApiResult<()> {
        self.engine.clear_cache();
        Ok(())
    }

    async fn invalidate_file(&self, path: &Path) -> ApiResult<()> {
        let path = path.to_path_buf();
        self.blocking(move |engine| engine.invalidate_file(&path))
            .await
    }

    async fn cache_stats(&self) -> ApiResult<CacheStats> {
        Ok(self.engine.cache_stats())
    }
}
