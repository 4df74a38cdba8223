//! Per-file memo of content and derived syntax.
//!
//! Content and symbols are evicted explicitly. Module syntax and class
//! headers are keyed by the content hash they were derived from, so they stay
//! correct across evictions without being dropped.

use crate::error::{Result, WayfinderError};
use crate::workspace::SourceProvider;
use dashmap::DashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use wayfinder_api::{CacheStats, CodeSymbol};
use wayfinder_plugin::{ClassHeader, ModuleSyntax};
use xxhash_rust::xxh3::xxh3_64;

#[derive(Debug, Clone)]
pub struct CachedContent {
    pub text: Arc<str>,
    pub hash: u64,
}

#[derive(Debug, Clone)]
struct Derived<T> {
    hash: u64,
    value: Arc<T>,
}

#[derive(Debug, Default)]
pub struct FileCache {
    contents: DashMap<PathBuf, CachedContent>,
    symbols: DashMap<PathBuf, Derived<Vec<CodeSymbol>>>,
    modules: DashMap<PathBuf, Derived<ModuleSyntax>>,
    headers: DashMap<PathBuf, Derived<Vec<ClassHeader>>>,
    hits: AtomicU64,
    misses: AtomicU64,
}

impl FileCache {
    pub fn new() -> Self {
        Self::default()
    }

    fn hit(&self) {
        self.hits.fetch_add(1, Ordering::Relaxed);
    }

    fn miss(&self) {
        self.misses.fetch_add(1, Ordering::Relaxed);
    }

    /// Cached content of `path`, read through `source` on a miss.
    ///
    /// `display` is the workspace-relative name used in error messages.
    pub fn content(
        &self,
        path: &Path,
        display: &str,
        source: &dyn SourceProvider,
    ) -> Result<CachedContent> {
        if let Some(entry) = self.contents.get(path) {
            self.hit();
            return Ok(entry.clone());
        }
        self.miss();
        let text = source.read(path).map_err(|source| WayfinderError::Read {
            path: display.to_string(),
            source,
        })?;
        let entry = CachedContent {
            hash: xxh3_64(text.as_bytes()),
            text: Arc::from(text),
        };
        self.contents.insert(path.to_path_buf(), entry.clone());
        Ok(entry)
    }

    pub fn symbols(
        &self,
        path: &Path,
        content: &CachedContent,
        parse: impl FnOnce(&str) -> Result<Vec<CodeSymbol>>,
    ) -> Result<Arc<Vec<CodeSymbol>>> {
        derive(&self.symbols, path, content, parse, || self.hit(), || self.miss())
    }

    pub fn module_syntax(
        &self,
        path: &Path,
        content: &CachedContent,
        parse: impl FnOnce(&str) -> Result<ModuleSyntax>,
    ) -> Result<Arc<ModuleSyntax>> {
        derive(&self.modules, path, content, parse, || self.hit(), || self.miss())
    }

    pub fn class_headers(
        &self,
        path: &Path,
        content: &CachedContent,
        parse: impl FnOnce(&str) -> Result<Vec<ClassHeader>>,
    ) -> Result<Arc<Vec<ClassHeader>>> {
        derive(&self.headers, path, content, parse, || self.hit(), || self.miss())
    }

    /// Drop exactly one file's content and symbols.
    pub fn invalidate(&self, path: &Path) -> bool {
        let had_content = self.contents.remove(path).is_some();
        let had_symbols = self.symbols.remove(path).is_some();
        had_content || had_symbols
    }

    pub fn clear(&self) {
        self.contents.clear();
        self.symbols.clear();
        self.modules.clear();
        self.headers.clear();
        self.hits.store(0, Ordering::Relaxed);
        self.misses.store(0, Ordering::Relaxed);
    }

    pub fn contains_symbols(&self, path: &Path) -> bool {
        self.symbols.contains_key(path)
    }

    pub fn stats(&self) -> CacheStats {
        CacheStats {
            content_entries: self.contents.len(),
            symbol_entries: self.symbols.len(),
            hits: self.hits.load(Ordering::Relaxed),
            misses: self.misses.load(Ordering::Relaxed),
        }
    }
}

fn derive<T>(
    map: &DashMap<PathBuf, Derived<T>>,
    path: &Path,
    content: &CachedContent,
    parse: impl FnOnce(&str) -> Result<T>,
    on_hit: impl FnOnce(),
    on_miss: impl FnOnce(),
) -> Result<Arc<T>> {
    if let Some(entry) = map.get(path)
        && entry.hash == content.hash
    {
        on_hit();
        return Ok(entry.value.clone());
    }
    on_miss();
    let value = Arc::new(parse(content.text.as_ref())?);
    map.insert(
        path.to_path_buf(),
        Derived {
            hash: content.hash,
            value: value.clone(),
        },
    );
    Ok(value)
}
