pub mod cap;
pub mod constants;
pub mod heritage;
pub mod modules;
pub mod parser;
pub mod pattern;

use std::path::Path;
use std::sync::Arc;
use wayfinder_api::models::Language;
use wayfinder_plugin::{FallbackParser, LanguagePlugin, PluginInfo, SymbolParser};

pub use parser::TreeSitterParser;
pub use pattern::PatternParser;

/// TypeScript and JavaScript support.
pub struct TypeScriptPlugin {
    parser: Arc<dyn SymbolParser>,
}

impl TypeScriptPlugin {
    pub fn new() -> Self {
        Self::with_parser(Arc::new(FallbackParser::new(
            Arc::new(TreeSitterParser::new()),
            Arc::new(PatternParser::new()),
        )))
    }

    /// Use a specific symbol parser instead of the tree-sitter/pattern pair.
    pub fn with_parser(parser: Arc<dyn SymbolParser>) -> Self {
        Self { parser }
    }
}

impl Default for TypeScriptPlugin {
    fn default() -> Self {
        Self::new()
    }
}

impl LanguagePlugin for TypeScriptPlugin {
    fn info(&self) -> PluginInfo {
        PluginInfo {
            id: "typescript".to_string(),
            name: "TypeScript".to_string(),
            version: env!("CARGO_PKG_VERSION").to_string(),
            description: Some("TypeScript and JavaScript sources".to_string()),
        }
    }

    fn language_for(&self, path: &Path) -> Language {
        path.extension()
            .and_then(|e| e.to_str())
            .map(Language::from_extension)
            .unwrap_or(Language::UNKNOWN)
    }

    fn supported_extensions(&self) -> &[&str] {
        constants::SUPPORTED_EXTENSIONS
    }
}
