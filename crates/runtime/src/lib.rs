use std::path::PathBuf;
use std::sync::Arc;
use wayfinder_api::WayfinderEngine;
use wayfinder_core::{CodeEngine, EngineConfig, EngineHandle};

/// Bootstraps an engine for `root` with every bundled language plugin.
///
/// Configuration comes from `.wayfinder.json` in the root when present.
pub fn build_default_engine(root: PathBuf) -> wayfinder_core::Result<EngineHandle> {
    let config = EngineConfig::load(&root)?;
    build_engine(root, config)
}

/// Same as [`build_default_engine`] with an explicit configuration.
pub fn build_engine(root: PathBuf, config: EngineConfig) -> wayfinder_core::Result<EngineHandle> {
    let engine = CodeEngine::builder(root)
        .with_config(config)
        .with_plugin(Arc::new(wayfinder_typescript::TypeScriptPlugin::new()))
        .build()?;
    tracing::debug!("Engine ready");
    Ok(EngineHandle::from_engine(Arc::new(engine)))
}

/// The engine behind the composite API trait, for clients that only need the trait.
pub fn build_dyn_engine(root: PathBuf) -> wayfinder_core::Result<Arc<dyn WayfinderEngine>> {
    Ok(Arc::new(build_default_engine(root)?))
}

/// Initializes the logging system for a specific component.
/// This delegates to the core logging module.
pub fn init_logging(component: &str, to_stderr: bool) -> Option<impl Drop> {
    Some(wayfinder_core::logging::init_logging(component, to_stderr))
}

#[cfg(test)]
mod tests {
    use super::*;
    use wayfinder_api::{SearchQuery, SymbolSearcher};

    #[tokio::test]
    async fn test_default_engine_reads_workspace_config() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("a.ts"), "export const alpha = 1;\n").unwrap();
        std::fs::create_dir_all(dir.path().join("gen")).unwrap();
        std::fs::write(dir.path().join("gen/b.ts"), "export const alphaGen = 1;\n").unwrap();
        std::fs::write(
            dir.path().join(".wayfinder.json"),
            r#"{ "exclude": ["gen/**"] }"#,
        )
        .unwrap();

        let engine = build_dyn_engine(dir.path().to_path_buf()).unwrap();
        let found = engine.search_symbols(&SearchQuery::new("alpha")).await.unwrap();
        let names: Vec<&str> = found.symbols.iter().map(|s| s.name.as_str()).collect();
        assert_eq!(names, vec!["alpha"]);
    }
}
