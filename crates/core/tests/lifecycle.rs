mod common;

use common::{workspace, write};
use std::path::Path;
use wayfinder_api::{ApiError, EngineLifecycle, SearchQuery, SymbolSearcher};

#[tokio::test]
async fn test_invalidation_is_targeted() {
    let (dir, handle) = workspace(&[
        ("a.ts", "export const itemA = 1;\n"),
        ("b.ts", "export const itemB = 2;\n"),
    ]);
    let found = handle.search_symbols(&SearchQuery::new("item")).await.unwrap();
    assert_eq!(found.symbols.len(), 2);
    let before = handle.cache_stats().await.unwrap();
    assert_eq!(before.symbol_entries, 2);

    write(dir.path(), "a.ts", "export const itemRenamed = 1;\n");
    handle.invalidate_file(Path::new("a.ts")).await.unwrap();
    let after = handle.cache_stats().await.unwrap();
    assert_eq!(after.symbol_entries, before.symbol_entries - 1);

    let found = handle.search_symbols(&SearchQuery::new("item")).await.unwrap();
    let names: Vec<&str> = found.symbols.iter().map(|s| s.name.as_str()).collect();
    assert_eq!(names, vec!["itemRenamed", "itemB"]);
}

#[tokio::test]
async fn test_repeated_search_hits_cache() {
    let (_dir, handle) = workspace(&[("a.ts", "export const itemA = 1;\n")]);
    handle.search_symbols(&SearchQuery::new("item")).await.unwrap();
    let first = handle.cache_stats().await.unwrap();
    handle.search_symbols(&SearchQuery::new("item")).await.unwrap();
    let second = handle.cache_stats().await.unwrap();
    assert!(second.hits > first.hits);
    assert_eq!(second.misses, first.misses);
}

#[tokio::test]
async fn test_paths_outside_workspace_are_rejected() {
    let (_dir, handle) = workspace(&[("a.ts", "export const a = 1;\n")]);
    let err = handle
        .invalidate_file(Path::new("../outside.ts"))
        .await
        .unwrap_err();
    assert!(matches!(err, ApiError::WorkspaceViolation(_)));

    let err = handle
        .get_code_context(Path::new("../outside.ts"), 1, None)
        .await
        .unwrap_err();
    assert!(matches!(err, ApiError::WorkspaceViolation(_)));
}

#[tokio::test]
async fn test_clear_cache_empties_everything() {
    let (_dir, handle) = workspace(&[("a.ts", "export const a = 1;\n")]);
    handle.search_symbols(&SearchQuery::new("a")).await.unwrap();
    assert!(handle.cache_stats().await.unwrap().content_entries > 0);

    handle.clear_cache().await.unwrap();
    let stats = handle.cache_stats().await.unwrap();
    assert_eq!((stats.content_entries, stats.symbol_entries), (0, 0));
}
