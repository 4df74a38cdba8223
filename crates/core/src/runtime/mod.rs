//! The synchronous engine: plugins, caches and the built dependency graph.

use crate::cache::{CachedContent, FileCache};
use crate::config::EngineConfig;
use crate::dependency::{DependencyGraphBuilder, ModuleResolver, Resolution};
use crate::error::{Result, WayfinderError};
use crate::features::WorkspaceIndex;
use crate::workspace::{Deadline, FsSource, GlobFilter, PathGuard, RootGuard, SourceProvider};
use std::collections::HashSet;
use std::path::{Path, PathBuf};
use std::sync::{Arc, RwLock};
use wayfinder_api::{CacheStats, CodeSymbol, DependencyGraph, DependencyQuery, ScanScope};
use wayfinder_plugin::{
    ClassHeader, FileMatcherCap, HeritageCap, LanguagePlugin, ModuleSyntax, ModuleSyntaxCap,
    SymbolParseCap,
};

/// Graph plus the query it was built for. Timeouts do not change the shape.
struct BuiltGraph {
    key: DependencyQuery,
    graph: Arc<DependencyGraph>,
}

fn graph_key(query: &DependencyQuery) -> DependencyQuery {
    DependencyQuery {
        timeout_ms: None,
        ..query.clone()
    }
}

pub struct CodeEngine {
    config: EngineConfig,
    guard: Arc<dyn PathGuard>,
    source: Arc<dyn SourceProvider>,
    plugins: Vec<Arc<dyn LanguagePlugin>>,
    cache: FileCache,
    graph: RwLock<Option<BuiltGraph>>,
}

impl CodeEngine {
    pub fn builder(root: impl Into<PathBuf>) -> CodeEngineBuilder {
        CodeEngineBuilder::new(root)
    }

    pub fn plugins(&self) -> &[Arc<dyn LanguagePlugin>] {
        &self.plugins
    }

    pub fn plugin_for(&self, path: &Path) -> Option<&Arc<dyn LanguagePlugin>> {
        self.plugins.iter().find(|p| p.supports_path(path))
    }

    fn plugin_or_err(&self, path: &Path) -> Result<&Arc<dyn LanguagePlugin>> {
        self.plugin_for(path).ok_or_else(|| {
            WayfinderError::InvalidParams(format!(
                "no language support for {}",
                self.relative_path(path)
            ))
        })
    }

    fn cached_content(&self, path: &Path) -> Result<CachedContent> {
        self.cache
            .content(path, &self.relative_path(path), self.source.as_ref())
    }

    /// The dependency graph for `query`, reusing the last one when the query matches.
    pub fn dependency_graph(&self, query: &DependencyQuery) -> Result<Arc<DependencyGraph>> {
        let key = graph_key(query);
        {
            let built = self
                .graph
                .read()
                .map_err(|_| WayfinderError::Internal("graph lock poisoned".to_string()))?;
            if let Some(built) = built.as_ref()
                && built.key == key
            {
                return Ok(built.graph.clone());
            }
        }

        let deadline = Deadline::new(
            "analyzeDependencies",
            query.timeout_ms.or(self.config.scan_timeout_ms),
        );
        let graph = Arc::new(DependencyGraphBuilder::new(self).build(query, &deadline)?);
        let mut slot = self
            .graph
            .write()
            .map_err(|_| WayfinderError::Internal("graph lock poisoned".to_string()))?;
        *slot = Some(BuiltGraph {
            key,
            graph: graph.clone(),
        });
        Ok(graph)
    }

    /// The most recently built graph, or one built with the default query.
    pub fn current_graph(&self) -> Result<Arc<DependencyGraph>> {
        {
            let built = self
                .graph
                .read()
                .map_err(|_| WayfinderError::Internal("graph lock poisoned".to_string()))?;
            if let Some(built) = built.as_ref() {
                return Ok(built.graph.clone());
            }
        }
        self.dependency_graph(&DependencyQuery::default())
    }

    fn drop_graph(&self) {
        match self.graph.write() {
            Ok(mut slot) => *slot = None,
            Err(poisoned) => *poisoned.into_inner() = None,
        }
    }

    pub fn clear_cache(&self) {
        self.cache.clear();
        self.drop_graph();
        tracing::info!("Cleared all caches");
    }

    /// Forget one file. Other files' cached entries stay untouched.
    pub fn invalidate_file(&self, path: &Path) -> Result<()> {
        let path = self.resolve_path(path)?;
        let evicted = self.cache.invalidate(&path);
        self.drop_graph();
        tracing::debug!(
            "Invalidated {} (cached: {})",
            self.relative_path(&path),
            evicted
        );
        Ok(())
    }

    pub fn cache_stats(&self) -> CacheStats {
        self.cache.stats()
    }
}

impl WorkspaceIndex for CodeEngine {
    fn root(&self) -> &Path {
        self.guard.root()
    }

    fn config(&self) -> &EngineConfig {
        &self.config
    }

    fn relative_path(&self, path: &Path) -> String {
        self.guard.relative(path)
    }

    fn resolve_path(&self, path: &Path) -> Result<PathBuf> {
        self.guard.resolve(path)
    }

    fn eligible_files(&self, scope: &ScanScope) -> Result<Vec<PathBuf>> {
        let filter = GlobFilter::for_scope(scope, &self.config)?;
        let mut files = Vec::new();
        let mut seen = HashSet::new();
        for path in self.source.list_files(self.guard.root()) {
            if self.plugin_for(&path).is_none() {
                continue;
            }
            if !filter.is_match(&self.guard.relative(&path)) {
                continue;
            }
            match self.guard.resolve(&path) {
                Ok(real) => {
                    if seen.insert(real.clone()) {
                        files.push(real);
                    }
                }
                Err(e) => tracing::warn!("Skipping {}: {}", self.guard.relative(&path), e),
            }
        }
        Ok(files)
    }

    fn content(&self, path: &Path) -> Result<Arc<str>> {
        Ok(self.cached_content(path)?.text)
    }

    fn symbols(&self, path: &Path) -> Result<Arc<Vec<CodeSymbol>>> {
        let plugin = self.plugin_or_err(path)?;
        let content = self.cached_content(path)?;
        self.cache.symbols(path, &content, |text| {
            tracing::trace!(
                "Parsing {} as {}",
                self.relative_path(path),
                plugin.language_for(path)
            );
            plugin
                .symbol_parser()
                .parse_symbols(path, text)
                .map_err(WayfinderError::from)
        })
    }

    fn module_syntax(&self, path: &Path) -> Result<Arc<ModuleSyntax>> {
        let plugin = self.plugin_or_err(path)?;
        let content = self.cached_content(path)?;
        self.cache.module_syntax(path, &content, |text| {
            plugin
                .module_syntax(path, text)
                .map_err(WayfinderError::from)
        })
    }

    fn class_headers(&self, path: &Path) -> Result<Arc<Vec<ClassHeader>>> {
        let plugin = self.plugin_or_err(path)?;
        let content = self.cached_content(path)?;
        self.cache
            .class_headers(path, &content, |text| Ok(plugin.class_headers(text)))
    }

    fn resolve_import(&self, from: &Path, specifier: &str, include_external: bool) -> Resolution {
        let Some(plugin) = self.plugin_for(from) else {
            return Resolution::External(specifier.to_string());
        };
        let resolver = ModuleResolver {
            source: self.source.as_ref(),
            guard: self.guard.as_ref(),
            extensions: plugin.resolution_extensions(),
            index_basenames: plugin.index_basenames(),
            resolve_roots: &self.config.resolve_roots,
        };
        resolver.resolve(from, specifier, include_external)
    }
}

pub struct CodeEngineBuilder {
    root: PathBuf,
    config: Option<EngineConfig>,
    source: Option<Arc<dyn SourceProvider>>,
    plugins: Vec<Arc<dyn LanguagePlugin>>,
}

impl CodeEngineBuilder {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            config: None,
            source: None,
            plugins: Vec::new(),
        }
    }

    /// Use `config` instead of loading `.wayfinder.json` from the root.
    pub fn with_config(mut self, config: EngineConfig) -> Self {
        self.config = Some(config);
        self
    }

    pub fn with_source(mut self, source: Arc<dyn SourceProvider>) -> Self {
        self.source = Some(source);
        self
    }

    pub fn with_plugin(mut self, plugin: Arc<dyn LanguagePlugin>) -> Self {
        self.plugins.push(plugin);
        self
    }

    pub fn build(self) -> Result<CodeEngine> {
        let guard = RootGuard::new(&self.root)?;
        let config = match self.config {
            Some(config) => config,
            None => EngineConfig::load(guard.root())?,
        };
        for plugin in &self.plugins {
            let info = plugin.info();
            tracing::info!(
                "Registered language plugin {} {} ({})",
                info.id,
                info.version,
                plugin.supported_extensions().join(", ")
            );
        }
        Ok(CodeEngine {
            config,
            guard: Arc::new(guard),
            source: self.source.unwrap_or_else(|| Arc::new(FsSource)),
            plugins: self.plugins,
            cache: FileCache::new(),
            graph: RwLock::new(None),
        })
    }
}
