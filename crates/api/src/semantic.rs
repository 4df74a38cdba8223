use crate::error::ApiResult;
use crate::models::{
    CodeContext, CodeSymbol, PositionQuery, Reference, ReferenceQuery, SearchQuery, SearchResult,
    TypeHint,
};
use async_trait::async_trait;
use std::path::Path;

/// Workspace-wide symbol search.
#[async_trait]
pub trait SymbolSearcher: Send + Sync {
    async fn search_symbols(&self, query: &SearchQuery) -> ApiResult<SearchResult>;

    /// All symbols of one file, nested by container.
    async fn get_document_symbols(&self, path: &Path) -> ApiResult<Vec<CodeSymbol>>;

    async fn get_code_context(
        &self,
        path: &Path,
        line: usize,
        context_size: Option<usize>,
    ) -> ApiResult<Option<CodeContext>>;
}

/// Lexical reference discovery: definition first, then whole-word occurrences.
#[async_trait]
pub trait ReferenceAnalyzer: Send + Sync {
    async fn find_references(&self, query: &ReferenceQuery) -> ApiResult<Vec<Reference>>;
}

/// Heuristic type information.
#[async_trait]
pub trait TypeHintProvider: Send + Sync {
    async fn infer_type_hint(&self, position: &PositionQuery) -> ApiResult<Option<TypeHint>>;
}
