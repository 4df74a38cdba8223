use crate::parser::SymbolParser;
use std::sync::Arc;

pub trait SymbolParseCap: Send + Sync {
    /// The parser the engine should use for this language, fallback rule included.
    fn symbol_parser(&self) -> Arc<dyn SymbolParser>;
}
