use super::WorkspaceIndex;
use super::navigation::Navigator;
use crate::error::Result;
use crate::util::word_occurrences;
use crate::workspace::Deadline;
use std::path::Path;
use wayfinder_api::{
    CodeSymbol, Reference, ReferenceQuery, ReferenceTarget, ScanScope, SymbolLocation,
};

/// Lexical reference search.
///
/// The definition comes first, then every whole-word occurrence of the
/// symbol's name in traversal order. Occurrences inside import bindings are
/// not uses and are skipped.
pub struct ReferenceFinder<'a> {
    index: &'a dyn WorkspaceIndex,
}

impl<'a> ReferenceFinder<'a> {
    pub fn new(index: &'a dyn WorkspaceIndex) -> Self {
        Self { index }
    }

    pub fn find(&self, query: &ReferenceQuery) -> Result<Vec<Reference>> {
        let config = self.index.config();
        let deadline = Deadline::new(
            "findReferences",
            query.timeout_ms.or(config.scan_timeout_ms),
        );
        let max = query.max_results.unwrap_or(config.max_results);

        let symbol = match &query.target {
            ReferenceTarget::Symbol(symbol) => {
                let mut symbol = symbol.clone();
                symbol.location.path = self.index.resolve_path(&symbol.location.path)?;
                symbol
            }
            ReferenceTarget::Position(position) => {
                match Navigator::new(self.index).symbol_at(position)? {
                    Some(symbol) => symbol,
                    None => return Ok(Vec::new()),
                }
            }
        };
        self.collect(&symbol, &query.scope, max, &deadline)
    }

    /// At most `max` references to `symbol`, the definition included.
    pub fn collect(
        &self,
        symbol: &CodeSymbol,
        scope: &ScanScope,
        max: usize,
        deadline: &Deadline,
    ) -> Result<Vec<Reference>> {
        let mut refs = Vec::new();
        if max == 0 {
            return Ok(refs);
        }
        refs.push(self.definition(symbol));

        let name = symbol.name.as_str();
        for file in self.index.eligible_files(scope)? {
            deadline.check()?;
            let content = match self.index.content(&file) {
                Ok(content) => content,
                Err(e) => {
                    tracing::warn!("Skipping {}: {}", self.index.relative_path(&file), e);
                    continue;
                }
            };
            if !content.contains(name) {
                continue;
            }
            let syntax = self.index.module_syntax(&file).ok();

            let mut line_start = 0;
            for (idx, raw) in content.split('\n').enumerate() {
                let line_no = idx + 1;
                let text = raw.strip_suffix('\r').unwrap_or(raw);
                for (byte, column) in word_occurrences(text, name) {
                    if is_anchor(symbol, &file, line_no, column) {
                        continue;
                    }
                    if syntax
                        .as_ref()
                        .is_some_and(|s| s.is_binding_offset(line_start + byte))
                    {
                        continue;
                    }
                    if refs.len() >= max {
                        return Ok(refs);
                    }
                    refs.push(Reference {
                        symbol: symbol.clone(),
                        location: SymbolLocation::new(file.clone(), line_no, line_no)
                            .with_column(column),
                        is_definition: false,
                        context: text.trim().to_string(),
                    });
                }
                line_start += raw.len() + 1;
            }
        }
        tracing::debug!("{} references to {}", refs.len(), name);
        Ok(refs)
    }

    fn definition(&self, symbol: &CodeSymbol) -> Reference {
        let context = self
            .index
            .content(&symbol.location.path)
            .ok()
            .and_then(|content| {
                content
                    .lines()
                    .nth(symbol.location.start_line.saturating_sub(1))
                    .map(|l| l.trim().to_string())
            })
            .unwrap_or_default();
        Reference {
            symbol: symbol.clone(),
            location: symbol.location.clone(),
            is_definition: true,
            context,
        }
    }
}

/// True for the occurrence that is the definition's own name.
fn is_anchor(symbol: &CodeSymbol, file: &Path, line: usize, column: usize) -> bool {
    let location = &symbol.location;
    match location.column {
        Some(_) => location.is_anchored_at(file, line, column),
        None => location.path == file && location.start_line == line,
    }
}
