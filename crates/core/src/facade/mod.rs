//! Async service API over [`CodeEngine`]. Every call runs on the blocking pool.

pub mod graph;
pub mod lifecycle;
pub mod navigation;
pub mod semantic;

use crate::error::Result;
use crate::runtime::CodeEngine;
use std::sync::Arc;
use wayfinder_api::{ApiError, ApiResult};

#[derive(Clone)]
pub struct EngineHandle {
    pub(crate) engine: Arc<CodeEngine>,
}

impl EngineHandle {
    pub fn from_engine(engine: Arc<CodeEngine>) -> Self {
        Self { engine }
    }

    pub fn engine(&self) -> &Arc<CodeEngine> {
        &self.engine
    }

    pub(crate) async fn blocking<T, F>(&self, op: F) -> ApiResult<T>
    where
        T: Send + 'static,
        F: FnOnce(&CodeEngine) -> Result<T> + Send + 'static,
    {
        let engine = self.engine.clone();
        tokio::task::spawn_blocking(move || op(&engine))
            .await
            .map_err(|e| ApiError::Internal(e.to_string()))?
            .map_err(ApiError::from)
    }
}
