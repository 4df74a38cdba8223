pub mod error;
pub mod graph;
pub mod lifecycle;
pub mod models;
pub mod navigation;
pub mod semantic;

pub use error::{ApiError, ApiResult};
pub use graph::{DependencyAnalyzer, DependencyQuery};
pub use lifecycle::EngineLifecycle;
pub use models::*;
pub use navigation::NavigationService;
pub use semantic::{ReferenceAnalyzer, SymbolSearcher, TypeHintProvider};

/// Composite trait representing the full Wayfinder engine API.
/// This allows clients to depend on a single trait instead of multiple individual ones.
pub trait WayfinderEngine:
    SymbolSearcher
    + ReferenceAnalyzer
    + NavigationService
    + DependencyAnalyzer
    + TypeHintProvider
    + EngineLifecycle
{
}

impl<T> WayfinderEngine for T where
    T: SymbolSearcher
        + ReferenceAnalyzer
        + NavigationService
        + DependencyAnalyzer
        + TypeHintProvider
        + EngineLifecycle
{
}
