use super::WorkspaceIndex;
use crate::error::{Result, WayfinderError};
use std::path::Path;
use wayfinder_api::{CodeContext, CodeSymbol};

/// Windows of source lines around a point of interest.
pub struct ContextBuilder<'a> {
    index: &'a dyn WorkspaceIndex,
}

impl<'a> ContextBuilder<'a> {
    pub fn new(index: &'a dyn WorkspaceIndex) -> Self {
        Self { index }
    }

    /// `size` lines either side of `line`, clamped to the file. `None` past the last line.
    pub fn around(&self, path: &Path, line: usize, size: usize) -> Result<Option<CodeContext>> {
        if line == 0 {
            return Err(WayfinderError::InvalidParams(
                "line numbers start at 1".to_string(),
            ));
        }
        let content = self.index.content(path)?;
        let lines: Vec<&str> = content.lines().collect();
        if line > lines.len() {
            return Ok(None);
        }

        let start_line = line.saturating_sub(size).max(1);
        let end_line = line.saturating_add(size).min(lines.len());
        Ok(Some(CodeContext {
            file_path: self.index.relative_path(path),
            start_line,
            end_line,
            focus_line: line,
            lines: lines[start_line - 1..end_line]
                .iter()
                .map(|l| l.to_string())
                .collect(),
            enclosing_symbol: self.enclosing_symbol(path, line),
        }))
    }

    /// Innermost symbol whose declaration spans `line`.
    fn enclosing_symbol(&self, path: &Path, line: usize) -> Option<CodeSymbol> {
        let symbols = match self.index.symbols(path) {
            Ok(symbols) => symbols,
            Err(e) => {
                tracing::debug!("No symbols for context: {}", e);
                return None;
            }
        };
        symbols
            .iter()
            .filter(|s| s.location.contains_line(line))
            .filter(|s| s.kind.is_container() || s.kind.is_callable())
            .min_by_key(|s| s.location.span())
            .cloned()
    }
}
