use super::WorkspaceIndex;
use crate::error::Result;
use crate::workspace::{Deadline, GlobFilter};
use std::path::Path;
use wayfinder_api::{DependencyGraph, ScanScope, UnusedExport};

/// Exports of files nothing imports.
///
/// Detection is file-level: a file with at least one dependent keeps all of
/// its exports. Entry-point basenames are never reported.
pub struct UnusedExportFinder<'a> {
    index: &'a dyn WorkspaceIndex,
    graph: &'a DependencyGraph,
}

/// `src/index.tsx` and `lib/index.d.ts` both have the basename `index`.
fn basename(path: &Path) -> Option<&str> {
    let name = path.file_name()?.to_str()?;
    Some(name.split('.').next().unwrap_or(name))
}

impl<'a> UnusedExportFinder<'a> {
    pub fn new(index: &'a dyn WorkspaceIndex, graph: &'a DependencyGraph) -> Self {
        Self { index, graph }
    }

    pub fn find(&self, scope: &ScanScope, deadline: &Deadline) -> Result<Vec<UnusedExport>> {
        let config = self.index.config();
        let filter = GlobFilter::for_scope(scope, config)?;
        let mut out = Vec::new();

        for node in self.graph.nodes.values() {
            if !node.dependents.is_empty() || !filter.is_match(&node.relative_path) {
                continue;
            }
            if basename(&node.file_path).is_some_and(|b| config.entry_points.iter().any(|e| e == b))
            {
                continue;
            }
            deadline.check()?;
            let symbols = match self.index.symbols(&node.file_path) {
                Ok(symbols) => symbols,
                Err(e) => {
                    tracing::warn!("Skipping {}: {}", node.relative_path, e);
                    continue;
                }
            };
            out.extend(
                symbols
                    .iter()
                    .filter(|s| s.is_top_level_export())
                    .map(|symbol| UnusedExport {
                        symbol: symbol.clone(),
                        file_path: node.relative_path.clone(),
                        reason: "file not imported elsewhere".to_string(),
                    }),
            );
        }
        Ok(out)
    }
}
