mod common;

use common::{memory_workspace, rel, workspace};
use std::path::Path;
use wayfinder_api::{ApiError, SearchQuery, SymbolKind, SymbolSearcher};

const SHAPES: &str = r#"export interface Shape {
  area(): number;
}

export class Circle implements Shape {
  constructor(private radius: number) {}

  area(): number {
    return Math.PI * this.radius ** 2;
  }
}

export function makeCircle(r: number): Circle {
  return new Circle(r);
}

const internal = 1;
"#;

#[tokio::test]
async fn test_every_top_level_export_is_found() {
    let (_dir, handle) = workspace(&[("shapes.ts", SHAPES)]);
    let result = handle
        .search_symbols(&SearchQuery::new("/.*/"))
        .await
        .unwrap();

    let exported: Vec<&str> = result
        .symbols
        .iter()
        .filter(|s| s.is_top_level_export())
        .map(|s| s.name.as_str())
        .collect();
    assert_eq!(exported, vec!["Shape", "Circle", "makeCircle"]);
    assert!(result.symbols.iter().any(|s| s.name == "internal"));
}

#[tokio::test]
async fn test_kind_filter_and_context() {
    let (_dir, handle) = workspace(&[("shapes.ts", SHAPES)]);
    let result = handle
        .search_symbols(&SearchQuery::new("circle").with_kind(SymbolKind::Class))
        .await
        .unwrap();

    assert_eq!(result.symbols.len(), 1);
    let circle = &result.symbols[0];
    assert_eq!(circle.name, "Circle");
    assert_eq!(circle.location.start_line, 5);
    assert_eq!(rel(&handle, &circle.location.path), "shapes.ts");

    let context = &result.contexts[0];
    assert_eq!(context.file_path, "shapes.ts");
    assert_eq!(context.focus_line, 5);
    assert_eq!((context.start_line, context.end_line), (1, 10));
}

#[tokio::test]
async fn test_budget_never_splits_a_file() {
    let (_dir, handle) = workspace(&[
        ("a.ts", "export const itemA = 1;\nexport const itemB = 2;\nexport const itemC = 3;\n"),
        ("b.ts", "export const itemD = 4;\n"),
    ]);

    let three = handle
        .search_symbols(&SearchQuery::new("item").with_max_results(3))
        .await
        .unwrap();
    let names: Vec<&str> = three.symbols.iter().map(|s| s.name.as_str()).collect();
    assert_eq!(names, vec!["itemA", "itemB", "itemC"]);

    let two = handle
        .search_symbols(&SearchQuery::new("item").with_max_results(2))
        .await
        .unwrap();
    assert!(two.symbols.is_empty());
}

#[tokio::test]
async fn test_references_share_the_budget() {
    let (_dir, handle) = workspace(&[
        ("a.ts", "export function f() {}\n"),
        ("b.ts", "import { f } from './a';\nf();\nf();\n"),
    ]);
    let mut query = SearchQuery::new("f").with_max_results(2);
    query.case_sensitive = true;
    query.include_references = true;

    let result = handle.search_symbols(&query).await.unwrap();
    assert_eq!(result.symbols.len(), 1);
    assert_eq!(result.references.len(), 2);
    assert!(result.references[0].is_definition);
}

#[tokio::test]
async fn test_repeated_search_is_identical() {
    let (_dir, handle) = workspace(&[
        ("shapes.ts", SHAPES),
        ("other.ts", "export const area = 2;\n"),
    ]);
    let query = SearchQuery::new("area");
    let first = handle.search_symbols(&query).await.unwrap();
    let second = handle.search_symbols(&query).await.unwrap();
    assert_eq!(first, second);
    assert!(!first.symbols.is_empty());
}

#[tokio::test]
async fn test_empty_name_is_invalid() {
    let (_dir, handle) = workspace(&[("a.ts", "export const a = 1;\n")]);
    let err = handle.search_symbols(&SearchQuery::new("  ")).await.unwrap_err();
    assert!(matches!(err, ApiError::InvalidParams(_)));
}

#[tokio::test]
async fn test_zero_timeout_reports_timeout() {
    let (_dir, handle) = workspace(&[("a.ts", "export const a = 1;\n")]);
    let mut query = SearchQuery::new("a");
    query.timeout_ms = Some(0);
    let err = handle.search_symbols(&query).await.unwrap_err();
    assert!(matches!(err, ApiError::Timeout { ref operation, .. } if operation == "searchSymbols"));
}

#[tokio::test]
async fn test_document_symbols_are_nested() {
    let (_dir, handle) = workspace(&[("shapes.ts", SHAPES)]);
    let outline = handle
        .get_document_symbols(Path::new("shapes.ts"))
        .await
        .unwrap();

    let circle = outline.iter().find(|s| s.name == "Circle").unwrap();
    let members: Vec<&str> = circle.children.iter().map(|s| s.name.as_str()).collect();
    assert!(members.contains(&"constructor"));
    assert!(members.contains(&"area"));
}

#[tokio::test]
async fn test_code_context_is_clamped() {
    let (_dir, handle) = workspace(&[("shapes.ts", SHAPES)]);

    let top = handle
        .get_code_context(Path::new("shapes.ts"), 2, Some(3))
        .await
        .unwrap()
        .unwrap();
    assert_eq!((top.start_line, top.end_line), (1, 5));
    assert_eq!(top.lines.len(), 5);

    let body = handle
        .get_code_context(Path::new("shapes.ts"), 9, Some(1))
        .await
        .unwrap()
        .unwrap();
    let enclosing = body.enclosing_symbol.unwrap();
    assert_eq!(enclosing.name, "area");
    assert_eq!(enclosing.kind, SymbolKind::Method);

    let past_end = handle
        .get_code_context(Path::new("shapes.ts"), 500, None)
        .await
        .unwrap();
    assert!(past_end.is_none());
}

#[tokio::test]
async fn test_engine_reads_through_custom_source() {
    let dir = tempfile::tempdir().unwrap();
    let root = dir.path().canonicalize().unwrap();
    let handle = memory_workspace(
        &root,
        &[
            ("virtual.ts", "export class Ghost {}\n"),
            ("notes.md", "# Ghost\n"),
        ],
        false,
    );

    let found = handle.search_symbols(&SearchQuery::new("Ghost")).await.unwrap();
    assert_eq!(found.symbols.len(), 1);
    assert_eq!(rel(&handle, &found.symbols[0].location.path), "virtual.ts");
}

#[tokio::test]
async fn test_unreadable_file_is_skipped() {
    let (dir, handle) = workspace(&[("a.ts", "export const itemA = 1;\n")]);
    std::fs::write(dir.path().join("bad.ts"), [0xff, 0xfe, 0x00, 0x80]).unwrap();

    let found = handle.search_symbols(&SearchQuery::new("item")).await.unwrap();
    let names: Vec<&str> = found.symbols.iter().map(|s| s.name.as_str()).collect();
    assert_eq!(names, vec!["itemA"]);
}

#[tokio::test]
async fn test_context_size_larger_than_file() {
    let (_dir, handle) = workspace(&[("a.ts", "const a = 1;\nconst b = 2;\nconst c = 3;\n")]);
    let context = handle
        .get_code_context(Path::new("a.ts"), 2, Some(usize::MAX))
        .await
        .unwrap()
        .unwrap();
    assert_eq!((context.start_line, context.end_line), (1, 3));
    assert_eq!(context.lines.len(), 3);
}
