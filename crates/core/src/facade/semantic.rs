use super::EngineHandle;
use crate::features::WorkspaceIndex;
use crate::features::context::ContextBuilder;
use crate::features::hints::TypeHintInferrer;
use crate::features::references::ReferenceFinder;
use crate::features::search::SymbolSearch;
use async_trait::async_trait;
use std::path::Path;
use wayfinder_api::models::nest_symbols;
use wayfinder_api::{
    ApiResult, CodeContext, CodeSymbol, PositionQuery, Reference, ReferenceAnalyzer,
    ReferenceQuery, SearchQuery, SearchResult, SymbolSearcher, TypeHint, TypeHintProvider,
};

#[async_trait]
impl SymbolSearcher for EngineHandle {
    async fn search_symbols(&self, query: &SearchQuery) -> ApiResult<SearchResult> {
        let query = query.clone();
        self.blocking(move |engine| SymbolSearch::new(engine).search(&query))
            .await
    }

    async fn get_document_symbols(&self, path: &Path) -> ApiResult<Vec<CodeSymbol>> {
        let path = path.to_path_buf();
        self.blocking(move |engine| {
            let path = engine.resolve_path(&path)?;
            let flat = engine.symbols(&path)?;
            Ok(nest_symbols(flat.as_ref().clone()))
        })
        .await
    }

    async fn get_code_context(
        &self,
        path: &Path,
        line: usize,
        context_size: Option<usize>,
    ) -> ApiResult<Option<CodeContext>> {
        let path = path.to_path_buf();
        self.blocking(move |engine| {
            let path = engine.resolve_path(&path)?;
            let size = context_size.unwrap_or(engine.config().context_lines);
            ContextBuilder::new(engine).around(&path, line, size)
        })
        .await
    }
}

#[async_trait]
impl ReferenceAnalyzer for EngineHandle {
    async fn find_references(&self, query: &ReferenceQuery) -> ApiResult<Vec<Reference>> {
        let query = query.clone();
        self.blocking(move |engine| ReferenceFinder::new(engine).find(&query))
            .await
    }
}

#[async_trait]
impl TypeHintProvider for EngineHandle {
    async fn infer_type_hint(&self, position: &PositionQuery) -> ApiResult<Option<TypeHint>> {
        let position = position.clone();
        self.blocking(move |engine| TypeHintInferrer::new(engine).infer(&position))
            .await
    }
}
