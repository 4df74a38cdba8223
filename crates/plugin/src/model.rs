use serde::{Deserialize, Serialize};
use std::ops::Range;
use wayfinder_api::models::{ExportInfo, ImportInfo};

/// Module-level syntax of one file.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModuleSyntax {
    pub imports: Vec<ImportInfo>,
    pub exports: Vec<ExportInfo>,
    /// Byte ranges of statements that only bind imported names.
    #[serde(default)]
    pub binding_ranges: Vec<Range<usize>>,
}

impl ModuleSyntax {
    pub fn is_binding_offset(&self, offset: usize) -> bool {
        self.binding_ranges.iter().any(|r| r.contains(&offset))
    }

    /// Every specifier this file pulls in, imports first, each listed once.
    pub fn specifiers(&self) -> Vec<&str> {
        let mut seen = Vec::new();
        let from_imports = self.imports.iter().map(|i| i.source.as_str());
        let from_exports = self.exports.iter().filter_map(|e| e.source.as_deref());
        for spec in from_imports.chain(from_exports) {
            if !spec.is_empty() && !seen.contains(&spec) {
                seen.push(spec);
            }
        }
        seen
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum HeaderKind {
    Class,
    Interface,
}

/// A class or interface declaration header.
///
/// `line` and `column` are 1-based and point at the declared name. Heritage
/// names are stripped of type arguments and namespace qualifiers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClassHeader {
    pub kind: HeaderKind,
    pub name: String,
    pub line: usize,
    pub column: usize,
    pub extends: Vec<String>,
    pub implements: Vec<String>,
}

impl ClassHeader {
    pub fn extends_name(&self, name: &str) -> bool {
        self.extends.iter().any(|e| e == name)
    }

    pub fn implements_name(&self, name: &str) -> bool {
        self.implements.iter().any(|i| i == name)
    }
}
