use super::symbol::{CodeSymbol, SymbolKind, SymbolLocation};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Include/exclude globs matched against workspace-relative paths.
///
/// Exclude wins over include; an empty include list matches everything not excluded.
/// When both lists are empty the engine's configured defaults apply.
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq, Eq, Hash, JsonSchema)]
pub struct ScanScope {
    #[serde(default)]
    pub include: Vec<String>,
    #[serde(default)]
    pub exclude: Vec<String>,
}

impl ScanScope {
    pub fn new(include: Vec<String>, exclude: Vec<String>) -> Self {
        Self { include, exclude }
    }
}

/// A cursor in a file, 1-based line and column.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq, JsonSchema)]
pub struct PositionQuery {
    pub path: PathBuf,
    pub line: usize,
    pub column: usize,
}

impl PositionQuery {
    pub fn new(path: impl Into<PathBuf>, line: usize, column: usize) -> Self {
        Self {
            path: path.into(),
            line,
            column,
        }
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct SearchQuery {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub kind: Option<SymbolKind>,
    #[serde(default)]
    pub scope: ScanScope,
    #[serde(default)]
    pub case_sensitive: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_results: Option<usize>,
    #[serde(default)]
    pub include_references: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub context_lines: Option<usize>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timeout_ms: Option<u64>,
}

impl SearchQuery {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            kind: None,
            scope: ScanScope::default(),
            case_sensitive: false,
            max_results: None,
            include_references: false,
            context_lines: None,
            timeout_ms: None,
        }
    }

    pub fn with_kind(mut self, kind: SymbolKind) -> Self {
        self.kind = Some(kind);
        self
    }

    pub fn with_max_results(mut self, max: usize) -> Self {
        self.max_results = Some(max);
        self
    }
}

/// Lines surrounding a point of interest in a file.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct CodeContext {
    pub file_path: String,
    pub start_line: usize,
    pub end_line: usize,
    pub focus_line: usize,
    pub lines: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub enclosing_symbol: Option<CodeSymbol>,
}

impl CodeContext {
    pub fn text(&self) -> String {
        self.lines.join("\n")
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct Reference {
    pub symbol: CodeSymbol,
    pub location: SymbolLocation,
    pub is_definition: bool,
    /// Trimmed source line of the occurrence.
    pub context: String,
}

#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq, Eq, JsonSchema)]
pub struct SearchResult {
    pub symbols: Vec<CodeSymbol>,
    pub references: Vec<Reference>,
    pub contexts: Vec<CodeContext>,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq, JsonSchema)]
pub enum ReferenceTarget {
    Symbol(CodeSymbol),
    Position(PositionQuery),
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct ReferenceQuery {
    pub target: ReferenceTarget,
    #[serde(default)]
    pub scope: ScanScope,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_results: Option<usize>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timeout_ms: Option<u64>,
}

impl ReferenceQuery {
    pub fn for_symbol(symbol: CodeSymbol) -> Self {
        Self {
            target: ReferenceTarget::Symbol(symbol),
            scope: ScanScope::default(),
            max_results: None,
            timeout_ms: None,
        }
    }

    pub fn at(position: PositionQuery) -> Self {
        Self {
            target: ReferenceTarget::Position(position),
            scope: ScanScope::default(),
            max_results: None,
            timeout_ms: None,
        }
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct UnusedExport {
    pub symbol: CodeSymbol,
    pub file_path: String,
    pub reason: String,
}
