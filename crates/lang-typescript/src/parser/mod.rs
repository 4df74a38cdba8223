mod walker;

use std::path::Path;
use tree_sitter::{Parser, Tree};
use wayfinder_api::models::CodeSymbol;
use wayfinder_plugin::{BoxError, SymbolParser};

/// Syntax-tree symbol extraction over the tree-sitter TypeScript grammars.
#[derive(Debug, Default, Clone, Copy)]
pub struct TreeSitterParser;

impl TreeSitterParser {
    pub fn new() -> Self {
        Self
    }

    /// TSX for anything that may contain JSX, plain TypeScript otherwise.
    /// The TSX grammar rejects `<T>expr` casts, which only `.ts` files use.
    pub fn grammar_for(path: &Path) -> tree_sitter::Language {
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .unwrap_or_default()
            .to_ascii_lowercase();
        match ext.as_str() {
            "tsx" | "jsx" | "js" | "mjs" | "cjs" => tree_sitter_typescript::LANGUAGE_TSX.into(),
            _ => tree_sitter_typescript::LANGUAGE_TYPESCRIPT.into(),
        }
    }

    pub fn parse_tree(&self, path: &Path, content: &str) -> Result<Tree, BoxError> {
        let mut parser = Parser::new();
        parser.set_language(&Self::grammar_for(path))?;
        parser
            .parse(content, None)
            .ok_or_else(|| format!("tree-sitter produced no tree for {}", path.display()).into())
    }
}

impl SymbolParser for TreeSitterParser {
    fn strategy(&self) -> &'static str {
        "tree-sitter"
    }

    fn parse_symbols(&self, path: &Path, content: &str) -> Result<Vec<CodeSymbol>, BoxError> {
        let tree = self.parse_tree(path, content)?;
        let root = tree.root_node();
        if root.has_error() {
            tracing::debug!(
                "Syntax errors in {}, keeping the declarations that parsed",
                path.display()
            );
        }
        let mut walker = walker::Walker::new(path, content);
        walker.visit_statements(root, None);
        Ok(walker.finish())
    }
}
