use super::EngineHandle;
use crate::features::navigation::Navigator;
use async_trait::async_trait;
use wayfinder_api::{ApiResult, CodeSymbol, NavigationService, PositionQuery};

#[async_trait]
impl NavigationService for EngineHandle {
    async fn go_to_definition(&self, position: &PositionQuery) -> ApiResult<Option<CodeSymbol>> {
        let position = position.clone();
        self.blocking(move |engine| Navigator::new(engine).go_to_definition(&position))
            .await
    }

    async fn find_implementations(&self, position: &PositionQuery) -> ApiResult<Vec<CodeSymbol>> {
        let position = position.clone();
        self.blocking(move |engine| Navigator::new(engine).find_implementations(&position))
            .await
    }

    async fn find_derived_classes(&self, position: &PositionQuery) -> ApiResult<Vec<CodeSymbol>> {
        let position = position.clone();
        self.blocking(move |engine| Navigator::new(engine).find_derived_classes(&position))
            .await
    }
}
