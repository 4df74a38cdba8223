use crate::BoxError;
use std::path::Path;
use std::sync::Arc;
use wayfinder_api::models::CodeSymbol;

/// Turns one file's text into an ordered list of symbols. Implementations are pure.
pub trait SymbolParser: Send + Sync {
    /// Short strategy label used in logs.
    fn strategy(&self) -> &'static str;

    fn parse_symbols(&self, path: &Path, content: &str) -> Result<Vec<CodeSymbol>, BoxError>;
}

/// Prefer `primary`; use `fallback` when the primary yields nothing or fails.
pub struct FallbackParser {
    primary: Arc<dyn SymbolParser>,
    fallback: Arc<dyn SymbolParser>,
}

impl FallbackParser {
    pub fn new(primary: Arc<dyn SymbolParser>, fallback: Arc<dyn SymbolParser>) -> Self {
        Self { primary, fallback }
    }
}

impl SymbolParser for FallbackParser {
    fn strategy(&self) -> &'static str {
        "fallback"
    }

    fn parse_symbols(&self, path: &Path, content: &str) -> Result<Vec<CodeSymbol>, BoxError> {
        match self.primary.parse_symbols(path, content) {
            Ok(symbols) if !symbols.is_empty() => return Ok(symbols),
            Ok(_) => tracing::debug!(
                "{} parser found no symbols in {}, trying {}",
                self.primary.strategy(),
                path.display(),
                self.fallback.strategy()
            ),
            Err(e) => tracing::warn!(
                "{} parser failed on {}: {}",
                self.primary.strategy(),
                path.display(),
                e
            ),
        }
        self.fallback.parse_symbols(path, content)
    }
}
