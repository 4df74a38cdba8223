use super::WorkspaceIndex;
use crate::error::{Result, WayfinderError};
use crate::util::identifier_at;
use crate::workspace::Deadline;
use std::collections::HashSet;
use std::path::{Path, PathBuf};
use wayfinder_api::{CodeSymbol, PositionQuery, ScanScope, SymbolKind};
use wayfinder_plugin::{ClassHeader, HeaderKind};

/// Position-based navigation over name matches.
pub struct Navigator<'a> {
    index: &'a dyn WorkspaceIndex,
}

impl<'a> Navigator<'a> {
    pub fn new(index: &'a dyn WorkspaceIndex) -> Self {
        Self { index }
    }

    fn origin(&self, position: &PositionQuery) -> Result<PathBuf> {
        if position.line == 0 || position.column == 0 {
            return Err(WayfinderError::InvalidParams(
                "line and column start at 1".to_string(),
            ));
        }
        self.index.resolve_path(&position.path)
    }

    fn deadline(&self, operation: &'static str) -> Deadline {
        Deadline::new(operation, self.index.config().scan_timeout_ms)
    }

    /// Definition of the identifier under the cursor.
    ///
    /// Among same-named symbols a top-level declaration in the origin file wins
    /// unless the origin imports that name. Then a direct dependency of the
    /// origin, then the first match in traversal order.
    pub fn go_to_definition(&self, position: &PositionQuery) -> Result<Option<CodeSymbol>> {
        let origin = self.origin(position)?;
        let content = self.index.content(&origin)?;
        let Some((name, _)) = identifier_at(&content, position.line, position.column) else {
            return Ok(None);
        };
        self.definition_of(&origin, &name)
    }

    fn definition_of(&self, origin: &Path, name: &str) -> Result<Option<CodeSymbol>> {
        let deadline = self.deadline("goToDefinition");
        let mut candidates = self.symbols_named(origin, name, &deadline)?;
        if candidates.len() <= 1 {
            return Ok(candidates.pop());
        }

        let imported = self
            .index
            .module_syntax(origin)
            .map(|syntax| syntax.imports.iter().any(|i| i.binding() == name))
            .unwrap_or(false);
        if !imported
            && let Some(at) = candidates
                .iter()
                .position(|c| c.location.path == origin && c.container_name.is_none())
        {
            return Ok(Some(candidates.swap_remove(at)));
        }
        let dependencies = self.index.direct_dependencies(origin).unwrap_or_else(|e| {
            tracing::debug!("No imports for {}: {}", self.index.relative_path(origin), e);
            Vec::new()
        });
        let preferred = candidates
            .iter()
            .position(|c| dependencies.contains(&c.location.path))
            .unwrap_or(0);
        Ok(Some(candidates.swap_remove(preferred)))
    }

    /// Every symbol called `name`, origin file first if it is not otherwise scanned.
    fn symbols_named(
        &self,
        origin: &Path,
        name: &str,
        deadline: &Deadline,
    ) -> Result<Vec<CodeSymbol>> {
        let mut files = self.index.eligible_files(&ScanScope::default())?;
        if !files.iter().any(|f| f == origin) {
            files.insert(0, origin.to_path_buf());
        }

        let mut out = Vec::new();
        for file in files {
            deadline.check()?;
            match self.index.symbols(&file) {
                Ok(symbols) => out.extend(symbols.iter().filter(|s| s.name == name).cloned()),
                Err(e) => tracing::debug!("Skipping {}: {}", self.index.relative_path(&file), e),
            }
        }
        Ok(out)
    }

    /// The symbol the cursor is on: a declaration on that line, else its definition.
    pub fn symbol_at(&self, position: &PositionQuery) -> Result<Option<CodeSymbol>> {
        let origin = self.origin(position)?;
        let content = self.index.content(&origin)?;
        let Some((name, start)) = identifier_at(&content, position.line, position.column) else {
            return Ok(None);
        };

        let symbols = self.index.symbols(&origin)?;
        let on_line: Vec<&CodeSymbol> = symbols
            .iter()
            .filter(|s| s.name == name && s.location.start_line == position.line)
            .collect();
        let declared = on_line
            .iter()
            .find(|s| s.location.column == Some(start))
            .or_else(|| on_line.first());
        if let Some(symbol) = declared {
            return Ok(Some((*symbol).clone()));
        }
        self.definition_of(&origin, &name)
    }

    /// Classes implementing the interface under the cursor, or other classes'
    /// same-named methods when the cursor is on a method.
    pub fn find_implementations(&self, position: &PositionQuery) -> Result<Vec<CodeSymbol>> {
        let Some(target) = self.symbol_at(position)? else {
            return Ok(Vec::new());
        };
        match target.kind {
            SymbolKind::Interface => self.classes_where("findImplementations", |h| {
                h.kind == HeaderKind::Class && h.implements_name(&target.name)
            }),
            SymbolKind::Method => self.method_implementations(&target),
            _ => Ok(Vec::new()),
        }
    }

    /// Classes whose `extends` clause names the class under the cursor.
    pub fn find_derived_classes(&self, position: &PositionQuery) -> Result<Vec<CodeSymbol>> {
        let Some(target) = self.symbol_at(position)? else {
            return Ok(Vec::new());
        };
        if target.kind != SymbolKind::Class {
            return Ok(Vec::new());
        }
        self.classes_where("findDerivedClasses", |h| {
            h.kind == HeaderKind::Class && h.extends_name(&target.name)
        })
    }

    fn classes_where(
        &self,
        operation: &'static str,
        matches: impl Fn(&ClassHeader) -> bool,
    ) -> Result<Vec<CodeSymbol>> {
        let deadline = self.deadline(operation);
        let mut out = Vec::new();
        for file in self.index.eligible_files(&ScanScope::default())? {
            deadline.check()?;
            let headers = match self.index.class_headers(&file) {
                Ok(headers) => headers,
                Err(e) => {
                    tracing::debug!("Skipping {}: {}", self.index.relative_path(&file), e);
                    continue;
                }
            };
            let hits: Vec<&ClassHeader> = headers.iter().filter(|h| matches(h)).collect();
            if hits.is_empty() {
                continue;
            }
            let symbols = self.index.symbols(&file)?;
            for header in hits {
                let is_class =
                    |s: &&CodeSymbol| s.kind == SymbolKind::Class && s.name == header.name;
                let symbol = symbols
                    .iter()
                    .filter(is_class)
                    .find(|s| s.location.start_line == header.line)
                    .or_else(|| symbols.iter().find(is_class));
                match symbol {
                    Some(symbol) => out.push(symbol.clone()),
                    None => tracing::debug!("No symbol for class header {}", header.name),
                }
            }
        }
        Ok(out)
    }

    fn method_implementations(&self, target: &CodeSymbol) -> Result<Vec<CodeSymbol>> {
        let deadline = self.deadline("findImplementations");
        let mut out = Vec::new();
        for file in self.index.eligible_files(&ScanScope::default())? {
            deadline.check()?;
            let Ok(symbols) = self.index.symbols(&file) else {
                continue;
            };
            let classes: HashSet<&str> = symbols
                .iter()
                .filter(|s| s.kind == SymbolKind::Class)
                .map(|s| s.name.as_str())
                .collect();
            out.extend(
                symbols
                    .iter()
                    .filter(|s| s.kind == SymbolKind::Method && s.name == target.name)
                    .filter(|s| s.location != target.location)
                    .filter(|s| {
                        s.container_name
                            .as_deref()
                            .is_some_and(|c| classes.contains(c))
                    })
                    .cloned(),
            );
        }
        Ok(out)
    }
}
