use super::symbol::SymbolKind;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Best-effort type information for a symbol.
///
/// `inferred` is false only when the type comes from an explicit annotation.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct TypeHint {
    pub name: String,
    pub kind: SymbolKind,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub declared_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub return_type: Option<String>,
    pub inferred: bool,
    pub rationale: String,
}

impl TypeHint {
    /// The type most relevant to the symbol kind.
    pub fn primary_type(&self) -> Option<&str> {
        if self.kind.is_callable() {
            self.return_type.as_deref()
        } else {
            self.declared_type.as_deref()
        }
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq, Eq, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct CacheStats {
    pub content_entries: usize,
    pub symbol_entries: usize,
    pub hits: u64,
    pub misses: u64,
}
