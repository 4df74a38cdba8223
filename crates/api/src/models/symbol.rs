use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Hash, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub enum SymbolKind {
    Module,
    Namespace,
    Class,
    Interface,
    Enum,
    EnumMember,
    Method,
    Constructor,
    Property,
    Field,
    Function,
    Variable,
    Constant,
    Parameter,
    TypeAlias,
}

impl SymbolKind {
    pub const ALL: [SymbolKind; 15] = [
        SymbolKind::Module,
        SymbolKind::Namespace,
        SymbolKind::Class,
        SymbolKind::Interface,
        SymbolKind::Enum,
        SymbolKind::EnumMember,
        SymbolKind::Method,
        SymbolKind::Constructor,
        SymbolKind::Property,
        SymbolKind::Field,
        SymbolKind::Function,
        SymbolKind::Variable,
        SymbolKind::Constant,
        SymbolKind::Parameter,
        SymbolKind::TypeAlias,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            SymbolKind::Module => "module",
            SymbolKind::Namespace => "namespace",
            SymbolKind::Class => "class",
            SymbolKind::Interface => "interface",
            SymbolKind::Enum => "enum",
            SymbolKind::EnumMember => "enumMember",
            SymbolKind::Method => "method",
            SymbolKind::Constructor => "constructor",
            SymbolKind::Property => "property",
            SymbolKind::Field => "field",
            SymbolKind::Function => "function",
            SymbolKind::Variable => "variable",
            SymbolKind::Constant => "constant",
            SymbolKind::Parameter => "parameter",
            SymbolKind::TypeAlias => "typeAlias",
        }
    }

    /// Kinds whose definitions carry a body that can contain other symbols.
    pub fn is_container(&self) -> bool {
        matches!(
            self,
            SymbolKind::Module
                | SymbolKind::Namespace
                | SymbolKind::Class
                | SymbolKind::Interface
                | SymbolKind::Enum
        )
    }

    pub fn is_callable(&self) -> bool {
        matches!(
            self,
            SymbolKind::Function | SymbolKind::Method | SymbolKind::Constructor
        )
    }
}

impl fmt::Display for SymbolKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SymbolKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized: String = s
            .chars()
            .filter(|c| *c != '_' && *c != '-')
            .collect::<String>()
            .to_lowercase();
        SymbolKind::ALL
            .iter()
            .copied()
            .find(|k| k.as_str().to_lowercase() == normalized)
            .ok_or_else(|| format!("unknown symbol kind '{}'", s))
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Hash, JsonSchema)]
#[serde(rename_all = "lowercase")]
pub enum Modifier {
    Export,
    Default,
    Public,
    Private,
    Protected,
    Static,
    Readonly,
    Async,
    Abstract,
    Declare,
}

impl Modifier {
    pub fn from_keyword(keyword: &str) -> Option<Self> {
        match keyword {
            "export" => Some(Modifier::Export),
            "default" => Some(Modifier::Default),
            "public" => Some(Modifier::Public),
            "private" => Some(Modifier::Private),
            "protected" => Some(Modifier::Protected),
            "static" => Some(Modifier::Static),
            "readonly" => Some(Modifier::Readonly),
            "async" => Some(Modifier::Async),
            "abstract" => Some(Modifier::Abstract),
            "declare" => Some(Modifier::Declare),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Modifier::Export => "export",
            Modifier::Default => "default",
            Modifier::Public => "public",
            Modifier::Private => "private",
            Modifier::Protected => "protected",
            Modifier::Static => "static",
            Modifier::Readonly => "readonly",
            Modifier::Async => "async",
            Modifier::Abstract => "abstract",
            Modifier::Declare => "declare",
        }
    }
}

impl fmt::Display for Modifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A 1-based line/column pair.
#[derive(
    Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, JsonSchema,
)]
pub struct Position {
    pub line: usize,
    pub column: usize,
}

/// Where a symbol or an occurrence lives.
///
/// Lines are 1-based. For symbols `start_line`/`column` point at the symbol's
/// name and `end_line` at the last line of its declaration.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq, Hash, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct SymbolLocation {
    pub path: PathBuf,
    pub start_line: usize,
    pub end_line: usize,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub column: Option<usize>,
}

impl SymbolLocation {
    pub fn new(path: impl Into<PathBuf>, start_line: usize, end_line: usize) -> Self {
        Self {
            path: path.into(),
            start_line,
            end_line: end_line.max(start_line),
            column: None,
        }
    }

    pub fn with_column(mut self, column: usize) -> Self {
        self.column = Some(column);
        self
    }

    pub fn contains_line(&self, line: usize) -> bool {
        line >= self.start_line && line <= self.end_line
    }

    pub fn span(&self) -> usize {
        self.end_line - self.start_line
    }

    /// True when `path:line:column` is the anchor of this location.
    pub fn is_anchored_at(&self, path: &Path, line: usize, column: usize) -> bool {
        self.path == path && self.start_line == line && self.column == Some(column)
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct CodeSymbol {
    pub name: String,
    pub kind: SymbolKind,
    pub location: SymbolLocation,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub container_name: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub modifiers: Vec<Modifier>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<CodeSymbol>,
}

impl CodeSymbol {
    pub fn new(name: impl Into<String>, kind: SymbolKind, location: SymbolLocation) -> Self {
        Self {
            name: name.into(),
            kind,
            location,
            container_name: None,
            modifiers: Vec::new(),
            details: None,
            children: Vec::new(),
        }
    }

    pub fn has_modifier(&self, modifier: Modifier) -> bool {
        self.modifiers.contains(&modifier)
    }

    pub fn add_modifier(&mut self, modifier: Modifier) {
        if !self.modifiers.contains(&modifier) {
            self.modifiers.push(modifier);
        }
    }

    /// Exported at module level (not a member of an exported container).
    pub fn is_top_level_export(&self) -> bool {
        self.container_name.is_none() && self.has_modifier(Modifier::Export)
    }

    /// Name under which members of this symbol record it as their container.
    pub fn qualified_name(&self) -> String {
        match &self.container_name {
            Some(container) => format!("{}.{}", container, self.name),
            None => self.name.clone(),
        }
    }
}

/// Nest a flat, source-ordered symbol list into an outline using `container_name`.
///
/// A symbol is attached to the innermost preceding symbol whose span encloses it
/// and whose name (or qualified name) equals its `container_name`. Symbols
/// without a matching container stay at the top level.
pub fn nest_symbols(flat: Vec<CodeSymbol>) -> Vec<CodeSymbol> {
    fn insert(into: &mut Vec<CodeSymbol>, symbol: CodeSymbol) -> Option<CodeSymbol> {
        let Some(container) = symbol.container_name.clone() else {
            return Some(symbol);
        };
        for candidate in into.iter_mut().rev() {
            if !candidate.location.contains_line(symbol.location.start_line) {
                continue;
            }
            let symbol = insert(&mut candidate.children, symbol)?;
            if candidate.name == container || candidate.qualified_name() == container {
                candidate.children.push(symbol);
                return None;
            }
            return Some(symbol);
        }
        Some(symbol)
    }

    let mut roots: Vec<CodeSymbol> = Vec::new();
    for symbol in flat {
        if let Some(orphan) = insert(&mut roots, symbol) {
            roots.push(orphan);
        }
    }
    roots
}
