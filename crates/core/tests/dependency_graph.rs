mod common;

use common::{memory_workspace, workspace};
use std::path::Path;
use wayfinder_api::{ApiError, DependencyAnalyzer, DependencyQuery, ScanScope};

#[tokio::test]
async fn test_dependents_of_imported_file() {
    let (_dir, handle) = workspace(&[
        ("a.ts", "export function f() {}\n"),
        ("b.ts", "import { f } from './a';\nf();\n"),
    ]);
    let summary = handle
        .analyze_dependencies(&DependencyQuery::default())
        .await
        .unwrap();
    assert_eq!((summary.node_count, summary.edge_count), (2, 1));

    let dependents = handle.get_file_dependents(Path::new("a.ts")).await.unwrap();
    assert_eq!(dependents, vec!["b.ts"]);
    let dependencies = handle.get_file_dependencies(Path::new("b.ts")).await.unwrap();
    assert_eq!(dependencies, vec!["a.ts"]);
}

#[tokio::test]
async fn test_graph_is_symmetric() {
    let (_dir, handle) = workspace(&[
        ("src/index.ts", "import { a } from './a';\nimport { b } from './lib/b';\n"),
        ("src/a.ts", "import { b } from './lib/b';\nexport const a = b;\n"),
        ("src/lib/b.ts", "import React from 'react';\nexport const b = 1;\n"),
        ("src/lib/index.ts", "export * from './b';\n"),
    ]);
    handle
        .analyze_dependencies(&DependencyQuery::default())
        .await
        .unwrap();
    let graph = handle
        .engine()
        .dependency_graph(&DependencyQuery::default())
        .unwrap();

    assert!(graph.is_symmetric());
    assert_eq!(graph.node_count(), 4);
    assert!(graph.external_dependencies.contains("react"));
    for node in graph.nodes.values() {
        for dep in &node.dependencies {
            assert!(graph.nodes.contains_key(dep));
        }
    }

    let counts = handle
        .get_dependency_counts(Path::new("src/lib/b.ts"))
        .await
        .unwrap()
        .unwrap();
    assert_eq!((counts.dependencies, counts.dependents), (0, 3));
}

#[tokio::test]
async fn test_import_cycle_is_reported_in_order() {
    let (_dir, handle) = workspace(&[
        ("a.ts", "import './b';\n"),
        ("b.ts", "import './c';\n"),
        ("c.ts", "import './a';\n"),
        ("d.ts", "import './a';\n"),
    ]);
    let cycles = handle.check_circular_dependencies(true).await.unwrap();
    assert_eq!(cycles, vec![vec!["a.ts", "b.ts", "c.ts"]]);
}

#[tokio::test]
async fn test_acyclic_graph_reports_no_cycles() {
    let (_dir, handle) = workspace(&[
        ("a.ts", "import './b';\nimport './c';\n"),
        ("b.ts", "import './c';\n"),
        ("c.ts", ""),
    ]);
    assert!(handle.check_circular_dependencies(false).await.unwrap().is_empty());
}

#[tokio::test]
async fn test_most_referenced_ranking() {
    let (_dir, handle) = workspace(&[
        ("a.ts", "import './util';\nimport './types';\n"),
        ("b.ts", "import './util';\n"),
        ("types.ts", ""),
        ("util.ts", "import './types';\n"),
    ]);
    let ranked = handle.get_most_referenced_files(2).await.unwrap();
    let files: Vec<(&str, usize)> = ranked.iter().map(|r| (r.file.as_str(), r.count)).collect();
    assert_eq!(files, vec![("types.ts", 2), ("util.ts", 2)]);
}

#[tokio::test]
async fn test_depth_limit_stops_following_imports() {
    let (_dir, handle) = workspace(&[
        ("a.ts", "import './b';\n"),
        ("b.ts", "import './c';\n"),
        ("c.ts", ""),
    ]);
    let query = DependencyQuery {
        scope: ScanScope::new(vec!["a.ts".to_string()], vec![]),
        max_depth: Some(1),
        ..DependencyQuery::default()
    };
    let summary = handle.analyze_dependencies(&query).await.unwrap();
    assert_eq!((summary.node_count, summary.edge_count), (2, 1));
}

#[tokio::test]
async fn test_unused_exports_skip_imported_files_and_entry_points() {
    let (_dir, handle) = workspace(&[
        ("index.ts", "import { used } from './lib';\nexport const main = used;\n"),
        ("lib.ts", "export const used = 1;\n"),
        ("orphan.ts", "export function lonely() {}\nexport class Alone {}\nconst hidden = 1;\n"),
    ]);
    let unused = handle
        .find_unused_exports(&DependencyQuery::default())
        .await
        .unwrap();
    let names: Vec<(&str, &str)> = unused
        .iter()
        .map(|u| (u.file_path.as_str(), u.symbol.name.as_str()))
        .collect();
    assert_eq!(names, vec![("orphan.ts", "lonely"), ("orphan.ts", "Alone")]);
    assert!(unused.iter().all(|u| u.reason == "file not imported elsewhere"));
}

#[tokio::test]
async fn test_zero_timeout_aborts_analysis() {
    let (_dir, handle) = workspace(&[("a.ts", "import './b';\n"), ("b.ts", "")]);
    let query = DependencyQuery {
        timeout_ms: Some(0),
        ..DependencyQuery::default()
    };
    let err = handle.analyze_dependencies(&query).await.unwrap_err();
    assert!(matches!(err, ApiError::Timeout { .. }));
}

#[tokio::test]
async fn test_unreadable_file_does_not_abort_graph() {
    let (dir, handle) = workspace(&[("a.ts", "import './b';\n"), ("b.ts", "")]);
    std::fs::write(dir.path().join("bad.ts"), [0xff, 0xfe, 0x00, 0x80]).unwrap();

    let summary = handle
        .analyze_dependencies(&DependencyQuery::default())
        .await
        .unwrap();
    assert_eq!((summary.node_count, summary.edge_count), (2, 1));
}

#[tokio::test]
async fn test_extensionless_import_of_mts_module() {
    let (_dir, handle) = workspace(&[
        ("a.ts", "import { x } from './x';\n"),
        ("x.mts", "export const x = 1;\n"),
    ]);
    let summary = handle
        .analyze_dependencies(&DependencyQuery::default())
        .await
        .unwrap();
    assert_eq!(summary.edge_count, 1);
    assert!(summary.external_dependencies.is_empty());
}

#[tokio::test]
async fn test_discovery_order_does_not_change_graph() {
    let files: &[(&str, &str)] = &[
        ("app.ts", "import './lib/a';\nimport './lib/b';\n"),
        ("lib/a.ts", "import './b';\nimport './c';\n"),
        ("lib/b.ts", "import './c';\n"),
        ("lib/c.ts", "import './a';\n"),
        ("lone.ts", ""),
    ];
    let dir = tempfile::tempdir().unwrap();
    let root = dir.path().canonicalize().unwrap();
    let forward = memory_workspace(&root, files, false);
    let backward = memory_workspace(&root, files, true);

    let query = DependencyQuery::default();
    let a = forward.engine().dependency_graph(&query).unwrap();
    let b = backward.engine().dependency_graph(&query).unwrap();
    assert_eq!(a.nodes, b.nodes);
    assert!(a.is_symmetric());
    let c = a.node(&root.join("lib/c.ts")).unwrap();
    assert_eq!(c.dependents, vec![root.join("lib/a.ts"), root.join("lib/b.ts")]);
}
