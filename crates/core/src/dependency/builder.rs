use super::Resolution;
use crate::error::Result;
use crate::features::WorkspaceIndex;
use crate::workspace::Deadline;
use rayon::prelude::*;
use std::collections::{BTreeMap, BTreeSet, HashSet};
use std::path::{Path, PathBuf};
use wayfinder_api::{DependencyGraph, DependencyNode, DependencyQuery};

/// Parsed imports of one file plus where each specifier led.
struct FileScan {
    node: DependencyNode,
    targets: Vec<Resolution>,
}

/// Breadth-first construction of the file dependency graph.
///
/// Every eligible file is a seed at depth 0. Imports are followed even into
/// files the scope globs would not select, up to `max_depth` hops from the
/// nearest seed. Each frontier is parsed in parallel and merged in frontier
/// order, so the result does not depend on scheduling.
pub struct DependencyGraphBuilder<'a> {
    index: &'a dyn WorkspaceIndex,
}

impl<'a> DependencyGraphBuilder<'a> {
    pub fn new(index: &'a dyn WorkspaceIndex) -> Self {
        Self { index }
    }

    pub fn build(&self, query: &DependencyQuery, deadline: &Deadline) -> Result<DependencyGraph> {
        let max_depth = query.max_depth.unwrap_or(self.index.config().max_depth);
        let seeds = self.index.eligible_files(&query.scope)?;
        tracing::info!(
            "Building dependency graph from {} files (max depth {})",
            seeds.len(),
            max_depth
        );

        let mut nodes: BTreeMap<PathBuf, DependencyNode> = BTreeMap::new();
        let mut external: BTreeSet<String> = BTreeSet::new();
        let mut discovered: HashSet<PathBuf> = seeds.iter().cloned().collect();
        let mut frontier = seeds;
        let mut depth = 0usize;

        // 1. Forward edges, one frontier at a time
        while !frontier.is_empty() {
            deadline.check()?;
            let scans: Vec<Option<FileScan>> = frontier
                .par_iter()
                .map(|path| self.scan_file(path, query.include_external))
                .collect();

            let mut next = Vec::new();
            for scan in scans.into_iter().flatten() {
                let FileScan { mut node, targets } = scan;
                for target in targets {
                    match target {
                        Resolution::External(specifier) => {
                            external.insert(specifier);
                        }
                        Resolution::Internal(path) => {
                            if node.dependencies.contains(&path) {
                                continue;
                            }
                            if discovered.contains(&path) {
                                node.dependencies.push(path);
                            } else if depth < max_depth {
                                discovered.insert(path.clone());
                                next.push(path.clone());
                                node.dependencies.push(path);
                            } else {
                                tracing::debug!(
                                    "{} imports {} beyond depth {}",
                                    node.relative_path,
                                    self.index.relative_path(&path),
                                    max_depth
                                );
                            }
                        }
                    }
                }
                nodes.insert(node.file_path.clone(), node);
            }
            frontier = next;
            depth += 1;
        }

        // 2. Drop edges to files that could not be read, then invert
        let known: HashSet<PathBuf> = nodes.keys().cloned().collect();
        let mut reverse: BTreeMap<PathBuf, Vec<PathBuf>> = BTreeMap::new();
        for node in nodes.values_mut() {
            node.dependencies.retain(|dep| known.contains(dep));
            for dep in &node.dependencies {
                reverse
                    .entry(dep.clone())
                    .or_default()
                    .push(node.file_path.clone());
            }
        }
        for (path, dependents) in reverse {
            if let Some(node) = nodes.get_mut(&path) {
                node.dependents = dependents;
            }
        }

        let graph = DependencyGraph {
            nodes,
            external_dependencies: external,
        };
        tracing::info!(
            "Dependency graph ready: {} nodes, {} edges, {} external in {} ms",
            graph.node_count(),
            graph.edge_count(),
            graph.external_dependencies.len(),
            deadline.elapsed_ms()
        );
        Ok(graph)
    }

    fn scan_file(&self, path: &Path, include_external: bool) -> Option<FileScan> {
        let syntax = match self.index.module_syntax(path) {
            Ok(syntax) => syntax,
            Err(e) => {
                tracing::warn!(
                    "Skipping {} in dependency graph: {}",
                    self.index.relative_path(path),
                    e
                );
                return None;
            }
        };
        let targets = syntax
            .specifiers()
            .into_iter()
            .map(|specifier| self.index.resolve_import(path, specifier, include_external))
            .collect();
        let mut node = DependencyNode::new(path.to_path_buf(), self.index.relative_path(path));
        node.imports = syntax.imports.clone();
        node.exports = syntax.exports.clone();
        Some(FileScan { node, targets })
    }
}
