use super::WorkspaceIndex;
use super::context::ContextBuilder;
use super::references::ReferenceFinder;
use crate::error::{Result, WayfinderError};
use crate::workspace::Deadline;
use regex::{Regex, RegexBuilder};
use wayfinder_api::{CodeSymbol, SearchQuery, SearchResult};

const PATTERN_CHARS: &[char] = &[
    '^', '$', '*', '+', '?', '(', ')', '[', ']', '{', '}', '|', '\\', '.',
];

/// How a search name is compared against symbol names.
#[derive(Debug)]
pub enum NameMatcher {
    Substring { needle: String, case_sensitive: bool },
    Pattern(Regex),
}

impl NameMatcher {
    /// `/.../` is always a regex. Otherwise a name with pattern characters is
    /// tried as a regex and falls back to a substring if it does not compile.
    pub fn new(query: &str, case_sensitive: bool) -> Result<Self> {
        let compile = |pattern: &str| {
            RegexBuilder::new(pattern)
                .case_insensitive(!case_sensitive)
                .build()
        };
        if let Some(inner) = query
            .strip_prefix('/')
            .and_then(|q| q.strip_suffix('/'))
            .filter(|q| !q.is_empty())
        {
            return Ok(NameMatcher::Pattern(compile(inner)?));
        }
        if query.contains(PATTERN_CHARS)
            && let Ok(regex) = compile(query)
        {
            return Ok(NameMatcher::Pattern(regex));
        }
        let needle = if case_sensitive {
            query.to_string()
        } else {
            query.to_lowercase()
        };
        Ok(NameMatcher::Substring {
            needle,
            case_sensitive,
        })
    }

    pub fn is_match(&self, name: &str) -> bool {
        match self {
            NameMatcher::Substring {
                needle,
                case_sensitive: true,
            } => name.contains(needle.as_str()),
            NameMatcher::Substring { needle, .. } => name.to_lowercase().contains(needle.as_str()),
            NameMatcher::Pattern(regex) => regex.is_match(name),
        }
    }
}

pub struct SymbolSearch<'a> {
    index: &'a dyn WorkspaceIndex,
}

impl<'a> SymbolSearch<'a> {
    pub fn new(index: &'a dyn WorkspaceIndex) -> Self {
        Self { index }
    }

    pub fn search(&self, query: &SearchQuery) -> Result<SearchResult> {
        let config = self.index.config();

        // 1. Validate
        if query.name.trim().is_empty() {
            return Err(WayfinderError::InvalidParams(
                "search name must not be empty".to_string(),
            ));
        }
        let max = query.max_results.unwrap_or(config.max_results);
        if max == 0 {
            return Err(WayfinderError::InvalidParams(
                "maxResults must be at least 1".to_string(),
            ));
        }
        let matcher = NameMatcher::new(&query.name, query.case_sensitive)?;
        let deadline = Deadline::new(
            "searchSymbols",
            query.timeout_ms.or(config.scan_timeout_ms),
        );

        // 2. Symbols, whole files at a time
        let mut symbols: Vec<CodeSymbol> = Vec::new();
        for file in self.index.eligible_files(&query.scope)? {
            deadline.check()?;
            let file_symbols = match self.index.symbols(&file) {
                Ok(symbols) => symbols,
                Err(e) => {
                    tracing::warn!("Skipping {}: {}", self.index.relative_path(&file), e);
                    continue;
                }
            };
            let matched: Vec<CodeSymbol> = file_symbols
                .iter()
                .filter(|s| query.kind.is_none_or(|kind| s.kind == kind))
                .filter(|s| matcher.is_match(&s.name))
                .cloned()
                .collect();
            if symbols.len() + matched.len() > max {
                tracing::debug!(
                    "Result budget reached before {}",
                    self.index.relative_path(&file)
                );
                break;
            }
            symbols.extend(matched);
            if symbols.len() == max {
                break;
            }
        }

        // 3. Contexts
        let context_lines = query.context_lines.unwrap_or(config.context_lines);
        let contexts = ContextBuilder::new(self.index);
        let mut result = SearchResult::default();
        for symbol in &symbols {
            let location = &symbol.location;
            match contexts.around(&location.path, location.start_line, context_lines) {
                Ok(Some(context)) => result.contexts.push(context),
                Ok(None) => {}
                Err(e) => tracing::debug!("No context for {}: {}", symbol.name, e),
            }
        }

        // 4. References share what is left of the budget
        if query.include_references {
            let finder = ReferenceFinder::new(self.index);
            for symbol in &symbols {
                let remaining = max.saturating_sub(result.references.len());
                if remaining == 0 {
                    break;
                }
                let refs = finder.collect(symbol, &query.scope, remaining, &deadline)?;
                result.references.extend(refs);
            }
        }

        tracing::debug!(
            "search '{}' matched {} symbols in {} ms",
            query.name,
            symbols.len(),
            deadline.elapsed_ms()
        );
        result.symbols = symbols;
        Ok(result)
    }
}
