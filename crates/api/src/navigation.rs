use crate::error::ApiResult;
use crate::models::{CodeSymbol, PositionQuery};
use async_trait::async_trait;

/// Position-based navigation.
///
/// Every call is a pure function of the engine caches and the workspace content:
/// a position that maps to no known symbol yields `None` or an empty list.
#[async_trait]
pub trait NavigationService: Send + Sync {
    /// Resolve the identifier under the cursor to its definition.
    ///
    /// When several symbols share the name, one defined in a direct dependency of
    /// the origin file wins; otherwise the first match in traversal order.
    async fn go_to_definition(&self, position: &PositionQuery) -> ApiResult<Option<CodeSymbol>>;

    /// Classes implementing the interface under the cursor, or same-named
    /// methods of other classes when the cursor is on a method.
    async fn find_implementations(&self, position: &PositionQuery) -> ApiResult<Vec<CodeSymbol>>;

    /// Classes whose `extends` clause names the class under the cursor.
    async fn find_derived_classes(&self, position: &PositionQuery) -> ApiResult<Vec<CodeSymbol>>;
}
