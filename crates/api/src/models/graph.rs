use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use std::path::{Path, PathBuf};

/// One binding introduced by an import statement.
///
/// Side-effect imports (`import './polyfill'`) carry an empty `name`.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct ImportInfo {
    pub name: String,
    pub source: String,
    #[serde(default)]
    pub is_default: bool,
    #[serde(default)]
    pub is_namespace: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub local_name: Option<String>,
}

impl ImportInfo {
    pub fn named(name: impl Into<String>, source: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            source: source.into(),
            is_default: false,
            is_namespace: false,
            local_name: None,
        }
    }

    /// The identifier this import binds in the importing file.
    pub fn binding(&self) -> &str {
        self.local_name.as_deref().unwrap_or(&self.name)
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct ExportInfo {
    pub name: String,
    #[serde(default)]
    pub is_default: bool,
    #[serde(default)]
    pub is_re_export: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source: Option<String>,
}

impl ExportInfo {
    pub fn local(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            is_default: false,
            is_re_export: false,
            source: None,
        }
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct DependencyNode {
    pub file_path: PathBuf,
    pub relative_path: String,
    pub imports: Vec<ImportInfo>,
    pub exports: Vec<ExportInfo>,
    /// Resolved internal files this file imports, in first-import order.
    pub dependencies: Vec<PathBuf>,
    /// Files importing this one. Only meaningful on a completed graph.
    pub dependents: Vec<PathBuf>,
}

impl DependencyNode {
    pub fn new(file_path: PathBuf, relative_path: String) -> Self {
        Self {
            file_path,
            relative_path,
            imports: Vec::new(),
            exports: Vec::new(),
            dependencies: Vec::new(),
            dependents: Vec::new(),
        }
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq, Eq, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct DependencyGraph {
    pub nodes: BTreeMap<PathBuf, DependencyNode>,
    pub external_dependencies: BTreeSet<String>,
}

impl DependencyGraph {
    pub fn node(&self, path: &Path) -> Option<&DependencyNode> {
        self.nodes.get(path)
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn edge_count(&self) -> usize {
        self.nodes.values().map(|n| n.dependencies.len()).sum()
    }

    /// Every forward edge has its backward twin and vice versa.
    pub fn is_symmetric(&self) -> bool {
        self.nodes.values().all(|node| {
            let forward_ok = node.dependencies.iter().all(|dep| {
                self.nodes
                    .get(dep)
                    .is_some_and(|target| target.dependents.contains(&node.file_path))
            });
            let backward_ok = node.dependents.iter().all(|dependent| {
                self.nodes
                    .get(dependent)
                    .is_some_and(|source| source.dependencies.contains(&node.file_path))
            });
            forward_ok && backward_ok
        })
    }

    pub fn summary(&self) -> GraphSummary {
        GraphSummary {
            node_count: self.node_count(),
            edge_count: self.edge_count(),
            external_count: self.external_dependencies.len(),
            external_dependencies: self.external_dependencies.iter().cloned().collect(),
        }
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq, Eq, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct GraphSummary {
    pub node_count: usize,
    pub edge_count: usize,
    pub external_count: usize,
    pub external_dependencies: Vec<String>,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq, JsonSchema)]
pub struct ReferencedFile {
    pub file: String,
    pub count: usize,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq, JsonSchema)]
pub struct DependencyCounts {
    pub file: String,
    pub dependencies: usize,
    pub dependents: usize,
}
