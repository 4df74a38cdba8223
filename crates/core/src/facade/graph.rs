use super::EngineHandle;
use crate::features::WorkspaceIndex;
use crate::features::analytics::DependencyAnalytics;
use crate::features::unused::UnusedExportFinder;
use crate::workspace::Deadline;
use async_trait::async_trait;
use std::path::Path;
use wayfinder_api::{
    ApiResult, DependencyAnalyzer, DependencyCounts, DependencyQuery, GraphSummary,
    ReferencedFile, UnusedExport,
};

#[async_trait]
impl DependencyAnalyzer for EngineHandle {
    async fn analyze_dependencies(&self, query: &DependencyQuery) -> ApiResult<GraphSummary> {
        let query = query.clone();
        self.blocking(move |engine| Ok(engine.dependency_graph(&query)?.summary()))
            .await
    }

    async fn get_file_dependencies(&self, path: &Path) -> ApiResult<Vec<String>> {
        let path = path.to_path_buf();
        self.blocking(move |engine| {
            let path = engine.resolve_path(&path)?;
            let graph = engine.current_graph()?;
            let deps = DependencyAnalytics::new(&graph).transitive_dependencies(&path);
            Ok(deps.iter().map(|p| engine.relative_path(p)).collect())
        })
        .await
    }

    async fn get_file_dependents(&self, path: &Path) -> ApiResult<Vec<String>> {
        let path = path.to_path_buf();
        self.blocking(move |engine| {
            let path = engine.resolve_path(&path)?;
            let graph = engine.current_graph()?;
            let dependents = DependencyAnalytics::new(&graph).transitive_dependents(&path);
            Ok(dependents.iter().map(|p| engine.relative_path(p)).collect())
        })
        .await
    }

    async fn get_dependency_counts(&self, path: &Path) -> ApiResult<Option<DependencyCounts>> {
        let path = path.to_path_buf();
        self.blocking(move |engine| {
            let path = engine.resolve_path(&path)?;
            let graph = engine.current_graph()?;
            Ok(graph.node(&path).map(|node| DependencyCounts {
                file: node.relative_path.clone(),
                dependencies: node.dependencies.len(),
                dependents: node.dependents.len(),
            }))
        })
        .await
    }

    async fn check_circular_dependencies(
        &self,
        show_relative_paths: bool,
    ) -> ApiResult<Vec<Vec<String>>> {
        self.blocking(move |engine| {
            let graph = engine.current_graph()?;
            let cycles = DependencyAnalytics::new(&graph).cycles();
            Ok(cycles
                .iter()
                .map(|cycle| {
                    cycle
                        .iter()
                        .map(|p| {
                            if show_relative_paths {
                                engine.relative_path(p)
                            } else {
                                p.display().to_string()
                            }
                        })
                        .collect()
                })
                .collect())
        })
        .await
    }

    async fn get_most_referenced_files(&self, limit: usize) -> ApiResult<Vec<ReferencedFile>> {
        self.blocking(move |engine| {
            let graph = engine.current_graph()?;
            Ok(DependencyAnalytics::new(&graph)
                .most_referenced(limit)
                .into_iter()
                .map(|(path, count)| ReferencedFile {
                    file: engine.relative_path(&path),
                    count,
                })
                .collect())
        })
        .await
    }

    async fn find_unused_exports(&self, query: &DependencyQuery) -> ApiResult<Vec<UnusedExport>> {
        let query = query.clone();
        self.blocking(move |engine| {
            let graph = engine.dependency_graph(&query)?;
            let deadline = Deadline::new(
                "findUnusedExports",
                query.timeout_ms.or(engine.config().scan_timeout_ms),
            );
            UnusedExportFinder::new(engine, &graph).find(&query.scope, &deadline)
        })
        .await
    }
}
