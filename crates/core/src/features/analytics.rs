use petgraph::graph::{DiGraph, NodeIndex};
use petgraph::visit::{Bfs, Reversed, Walker};
use std::collections::{HashMap, HashSet};
use std::path::{Path, PathBuf};
use wayfinder_api::DependencyGraph;

/// Graph-wide queries over a completed dependency graph.
pub struct DependencyAnalytics<'a> {
    graph: &'a DependencyGraph,
    topology: DiGraph<&'a Path, ()>,
    indices: HashMap<&'a Path, NodeIndex>,
}

impl<'a> DependencyAnalytics<'a> {
    pub fn new(graph: &'a DependencyGraph) -> Self {
        let mut topology = DiGraph::new();
        let mut indices = HashMap::new();
        for path in graph.nodes.keys() {
            indices.insert(path.as_path(), topology.add_node(path.as_path()));
        }
        for node in graph.nodes.values() {
            let from = indices[node.file_path.as_path()];
            for dep in &node.dependencies {
                if let Some(&to) = indices.get(dep.as_path()) {
                    topology.add_edge(from, to, ());
                }
            }
        }
        Self {
            graph,
            topology,
            indices,
        }
    }

    /// Every file reachable from `path` through imports, nearest first.
    pub fn transitive_dependencies(&self, path: &Path) -> Vec<PathBuf> {
        let Some(&start) = self.indices.get(path) else {
            return Vec::new();
        };
        Bfs::new(&self.topology, start)
            .iter(&self.topology)
            .skip(1)
            .map(|ix| self.topology[ix].to_path_buf())
            .collect()
    }

    /// Every file that reaches `path` through imports, nearest first.
    pub fn transitive_dependents(&self, path: &Path) -> Vec<PathBuf> {
        let Some(&start) = self.indices.get(path) else {
            return Vec::new();
        };
        let reversed = Reversed(&self.topology);
        Bfs::new(reversed, start)
            .iter(reversed)
            .skip(1)
            .map(|ix| self.topology[ix].to_path_buf())
            .collect()
    }

    /// Import cycles, each listed once in import order.
    ///
    /// Iterative depth-first search from every not-yet-finished node, so deep
    /// chains do not grow the call stack.
    pub fn cycles(&self) -> Vec<Vec<PathBuf>> {
        let mut finished: HashSet<&Path> = HashSet::new();
        let mut seen: HashSet<Vec<PathBuf>> = HashSet::new();
        let mut cycles = Vec::new();

        for root in self.graph.nodes.keys() {
            if finished.contains(root.as_path()) {
                continue;
            }
            // (node, index of the next dependency to visit)
            let mut stack: Vec<(&Path, usize)> = vec![(root.as_path(), 0)];
            let mut on_path: Vec<&Path> = vec![root.as_path()];
            let mut depth_of: HashMap<&Path, usize> = HashMap::from([(root.as_path(), 0)]);

            while let Some(frame) = stack.last_mut() {
                let (current, next) = *frame;
                let deps = self
                    .graph
                    .node(current)
                    .map(|n| n.dependencies.as_slice())
                    .unwrap_or_default();
                let Some(dep) = deps.get(next) else {
                    finished.insert(current);
                    stack.pop();
                    on_path.pop();
                    depth_of.remove(current);
                    continue;
                };
                frame.1 += 1;
                let dep = dep.as_path();

                if let Some(&at) = depth_of.get(dep) {
                    let cycle = canonical_rotation(&on_path[at..]);
                    if seen.insert(cycle.clone()) {
                        cycles.push(cycle);
                    }
                } else if !finished.contains(dep) && self.graph.node(dep).is_some() {
                    stack.push((dep, 0));
                    depth_of.insert(dep, on_path.len());
                    on_path.push(dep);
                }
            }
        }
        cycles
    }

    /// Files by dependent count, highest first, ties broken by path.
    pub fn most_referenced(&self, limit: usize) -> Vec<(PathBuf, usize)> {
        let mut ranked: Vec<(PathBuf, usize)> = self
            .graph
            .nodes
            .values()
            .map(|n| (n.file_path.clone(), n.dependents.len()))
            .collect();
        ranked.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
        ranked.truncate(limit);
        ranked
    }
}

/// Rotate a cycle so it starts at its smallest path, keeping direction.
fn canonical_rotation(cycle: &[&Path]) -> Vec<PathBuf> {
    let start = cycle
        .iter()
        .enumerate()
        .min_by_key(|(_, p)| **p)
        .map_or(0, |(i, _)| i);
    cycle[start..]
        .iter()
        .chain(&cycle[..start])
        .map(|p| p.to_path_buf())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use wayfinder_api::DependencyNode;

    fn graph(edges: &[(&str, &[&str])]) -> DependencyGraph {
        let mut graph = DependencyGraph::default();
        for (from, deps) in edges {
            let mut node = DependencyNode::new(PathBuf::from(from), from.to_string());
            node.dependencies = deps.iter().map(PathBuf::from).collect();
            graph.nodes.insert(PathBuf::from(from), node);
        }
        let edges: Vec<(PathBuf, PathBuf)> = graph
            .nodes
            .values()
            .flat_map(|n| n.dependencies.iter().map(|d| (d.clone(), n.file_path.clone())))
            .collect();
        for (to, from) in edges {
            if let Some(node) = graph.nodes.get_mut(&to) {
                node.dependents.push(from);
            }
        }
        graph
    }

    #[test]
    fn test_three_cycle_reported_once_in_order() {
        let g = graph(&[("/a", &["/b"]), ("/b", &["/c"]), ("/c", &["/a"])]);
        let cycles = DependencyAnalytics::new(&g).cycles();
        assert_eq!(
            cycles,
            vec![vec![PathBuf::from("/a"), PathBuf::from("/b"), PathBuf::from("/c")]]
        );
    }

    #[test]
    fn test_acyclic_graph_has_no_cycles() {
        let g = graph(&[("/a", &["/b", "/c"]), ("/b", &["/c"]), ("/c", &[])]);
        assert!(DependencyAnalytics::new(&g).cycles().is_empty());
    }

    #[test]
    fn test_long_chain_does_not_overflow() {
        let names: Vec<String> = (0..20_000).map(|i| format!("/f{:05}", i)).collect();
        let mut g = DependencyGraph::default();
        for (i, name) in names.iter().enumerate() {
            let mut node = DependencyNode::new(PathBuf::from(name), name.clone());
            if let Some(next) = names.get(i + 1) {
                node.dependencies.push(PathBuf::from(next));
            }
            g.nodes.insert(PathBuf::from(name), node);
        }
        let analytics = DependencyAnalytics::new(&g);
        assert!(analytics.cycles().is_empty());
        assert_eq!(analytics.transitive_dependencies(Path::new("/f00000")).len(), 19_999);
    }

    #[test]
    fn test_transitive_queries_and_ranking() {
        let g = graph(&[("/a", &["/b"]), ("/b", &["/c"]), ("/c", &[]), ("/d", &["/c"])]);
        let analytics = DependencyAnalytics::new(&g);
        assert_eq!(
            analytics.transitive_dependencies(Path::new("/a")),
            vec![PathBuf::from("/b"), PathBuf::from("/c")]
        );
        let mut dependents = analytics.transitive_dependents(Path::new("/c"));
        dependents.sort();
        assert_eq!(
            dependents,
            vec![PathBuf::from("/a"), PathBuf::from("/b"), PathBuf::from("/d")]
        );
        assert_eq!(
            analytics.most_referenced(2),
            vec![(PathBuf::from("/c"), 2), (PathBuf::from("/b"), 1)]
        );
    }
}
