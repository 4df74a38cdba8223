use serde::Serialize;
use std::path::Path;
use tabled::settings::Style;
use tabled::{Table, Tabled};
use wayfinder_api::{CodeContext, CodeSymbol, Reference, UnusedExport};
use wayfinder_core::{EngineHandle, WorkspaceIndex};

/// Renders results either as pretty JSON or as a psql-style table.
pub struct Printer {
    pub json: bool,
}

impl Printer {
    pub fn emit<T, R, F>(&self, value: &T, rows: F) -> anyhow::Result<()>
    where
        T: Serialize + ?Sized,
        R: Tabled,
        F: FnOnce() -> Vec<R>,
    {
        if self.json {
            println!("{}", serde_json::to_string_pretty(value)?);
            return Ok(());
        }
        let rows = rows();
        if rows.is_empty() {
            println!("No results.");
        } else {
            println!("{}", Table::new(rows).with(Style::psql()));
        }
        Ok(())
    }

    pub fn message<T: Serialize + ?Sized>(&self, value: &T, text: &str) -> anyhow::Result<()> {
        if self.json {
            println!("{}", serde_json::to_string_pretty(value)?);
        } else {
            println!("{}", text);
        }
        Ok(())
    }
}

#[derive(Tabled)]
pub struct SymbolRow {
    #[tabled(rename = "Kind")]
    pub kind: String,
    #[tabled(rename = "Name")]
    pub name: String,
    #[tabled(rename = "Container")]
    pub container: String,
    #[tabled(rename = "Location")]
    pub location: String,
}

impl SymbolRow {
    pub fn new(handle: &EngineHandle, symbol: &CodeSymbol, depth: usize) -> Self {
        Self {
            kind: symbol.kind.to_string(),
            name: format!("{}{}", "  ".repeat(depth), symbol.name),
            container: symbol.container_name.clone().unwrap_or_else(|| "-".to_string()),
            location: location(handle, &symbol.location.path, symbol.location.start_line),
        }
    }

    /// Rows for a symbol tree, children indented under their parent.
    pub fn tree(handle: &EngineHandle, symbols: &[CodeSymbol], depth: usize, out: &mut Vec<Self>) {
        for symbol in symbols {
            out.push(Self::new(handle, symbol, depth));
            Self::tree(handle, &symbol.children, depth + 1, out);
        }
    }
}

#[derive(Tabled)]
pub struct ReferenceRow {
    #[tabled(rename = "Location")]
    pub location: String,
    #[tabled(rename = "Def")]
    pub definition: String,
    #[tabled(rename = "Line")]
    pub context: String,
}

impl ReferenceRow {
    pub fn new(handle: &EngineHandle, reference: &Reference) -> Self {
        let loc = &reference.location;
        let mut location = location(handle, &loc.path, loc.start_line);
        if let Some(column) = loc.column {
            location = format!("{}:{}", location, column);
        }
        Self {
            location,
            definition: if reference.is_definition { "*" } else { "" }.to_string(),
            context: reference.context.clone(),
        }
    }
}

#[derive(Tabled)]
pub struct ContextRow {
    #[tabled(rename = "")]
    pub marker: String,
    #[tabled(rename = "Line")]
    pub line: usize,
    #[tabled(rename = "Source")]
    pub text: String,
}

impl ContextRow {
    pub fn rows(context: &CodeContext) -> Vec<Self> {
        context
            .lines
            .iter()
            .enumerate()
            .map(|(i, text)| {
                let line = context.start_line + i;
                Self {
                    marker: if line == context.focus_line { ">" } else { "" }.to_string(),
                    line,
                    text: text.clone(),
                }
            })
            .collect()
    }
}

#[derive(Tabled)]
pub struct ValueRow {
    #[tabled(rename = "Key")]
    pub key: String,
    #[tabled(rename = "Value")]
    pub value: String,
}

impl ValueRow {
    pub fn new(key: &str, value: impl ToString) -> Self {
        Self {
            key: key.to_string(),
            value: value.to_string(),
        }
    }
}

#[derive(Tabled)]
pub struct PathRow {
    #[tabled(rename = "File")]
    pub file: String,
}

#[derive(Tabled)]
pub struct UnusedRow {
    #[tabled(rename = "File")]
    pub file: String,
    #[tabled(rename = "Kind")]
    pub kind: String,
    #[tabled(rename = "Export")]
    pub name: String,
    #[tabled(rename = "Line")]
    pub line: usize,
}

impl From<&UnusedExport> for UnusedRow {
    fn from(unused: &UnusedExport) -> Self {
        Self {
            file: unused.file_path.clone(),
            kind: unused.symbol.kind.to_string(),
            name: unused.symbol.name.clone(),
            line: unused.symbol.location.start_line,
        }
    }
}

/// `relative/path.ts:LINE`
pub fn location(handle: &EngineHandle, path: &Path, line: usize) -> String {
    format!("{}:{}", handle.engine().relative_path(path), line)
}
