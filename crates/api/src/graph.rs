use crate::error::ApiResult;
use crate::models::{DependencyCounts, GraphSummary, ReferencedFile, ScanScope, UnusedExport};
use async_trait::async_trait;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::path::Path;

#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq, Eq, Hash, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct DependencyQuery {
    #[serde(default)]
    pub scope: ScanScope,
    #[serde(default)]
    pub include_external: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_depth: Option<usize>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timeout_ms: Option<u64>,
}

/// Import/export graph queries.
///
/// Graph-wide queries run against the most recently analyzed graph, building one
/// with the configured default scope when none exists yet.
#[async_trait]
pub trait DependencyAnalyzer: Send + Sync {
    async fn analyze_dependencies(&self, query: &DependencyQuery) -> ApiResult<GraphSummary>;

    /// Transitive dependencies of a file.
    async fn get_file_dependencies(&self, path: &Path) -> ApiResult<Vec<String>>;

    /// Transitive dependents of a file.
    async fn get_file_dependents(&self, path: &Path) -> ApiResult<Vec<String>>;

    async fn get_dependency_counts(&self, path: &Path) -> ApiResult<Option<DependencyCounts>>;

    async fn check_circular_dependencies(
        &self,
        show_relative_paths: bool,
    ) -> ApiResult<Vec<Vec<String>>>;

    async fn get_most_referenced_files(&self, limit: usize) -> ApiResult<Vec<ReferencedFile>>;

    async fn find_unused_exports(&self, query: &DependencyQuery) -> ApiResult<Vec<UnusedExport>>;
}
