use crate::error::{Result, WayfinderError};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Optional per-workspace configuration file at the repository root.
pub const CONFIG_FILE: &str = ".wayfinder.json";

/// Overrides `scanTimeoutMs` when set to an integer.
pub const SCAN_TIMEOUT_ENV: &str = "WAYFINDER_SCAN_TIMEOUT_MS";

pub const DEFAULT_CONTEXT_LINES: usize = 5;
pub const DEFAULT_MAX_RESULTS: usize = 100;
pub const DEFAULT_MAX_DEPTH: usize = 10;

/// Engine-wide defaults. Every field is optional in the config file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(default, rename_all = "camelCase")]
pub struct EngineConfig {
    /// Globs selecting files when a query gives no include list.
    pub include: Vec<String>,
    /// Globs always excluded, merged with any query excludes.
    pub exclude: Vec<String>,
    /// Basenames (without extension) treated as entry points by unused-export detection.
    pub entry_points: Vec<String>,
    pub context_lines: usize,
    pub max_results: usize,
    pub max_depth: usize,
    pub scan_timeout_ms: Option<u64>,
    /// Extra roots, relative to the workspace, tried for bare specifiers.
    pub resolve_roots: Vec<PathBuf>,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            include: Vec::new(),
            exclude: vec![
                "**/node_modules/**".to_string(),
                "**/.git/**".to_string(),
                "**/dist/**".to_string(),
                "**/build/**".to_string(),
                "**/coverage/**".to_string(),
            ],
            entry_points: vec!["index".to_string(), "main".to_string(), "app".to_string()],
            context_lines: DEFAULT_CONTEXT_LINES,
            max_results: DEFAULT_MAX_RESULTS,
            max_depth: DEFAULT_MAX_DEPTH,
            scan_timeout_ms: None,
            resolve_roots: Vec::new(),
        }
    }
}

impl EngineConfig {
    /// Read `.wayfinder.json` under `root` if present, then apply env overrides.
    pub fn load(root: &Path) -> Result<Self> {
        let path = root.join(CONFIG_FILE);
        let mut config = if path.is_file() {
            let raw = std::fs::read_to_string(&path).map_err(|source| WayfinderError::Read {
                path: CONFIG_FILE.to_string(),
                source,
            })?;
            let config: EngineConfig = serde_json::from_str(&raw)?;
            tracing::info!("Loaded {}", CONFIG_FILE);
            config
        } else {
            EngineConfig::default()
        };
        config.apply_env();
        Ok(config)
    }

    fn apply_env(&mut self) {
        let Ok(raw) = std::env::var(SCAN_TIMEOUT_ENV) else {
            return;
        };
        match raw.trim().parse::<u64>() {
            Ok(ms) => self.scan_timeout_ms = Some(ms),
            Err(_) => tracing::warn!("Ignoring non-numeric {}={}", SCAN_TIMEOUT_ENV, raw),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_file_keeps_defaults() {
        let config: EngineConfig = serde_json::from_str(r#"{"maxResults": 7}"#).unwrap();
        assert_eq!(config.max_results, 7);
        assert_eq!(config.context_lines, DEFAULT_CONTEXT_LINES);
        assert!(config.exclude.iter().any(|g| g.contains("node_modules")));
    }

    #[test]
    fn test_load_without_file() {
        let dir = std::env::temp_dir().join("wayfinder-config-missing");
        let config = EngineConfig::load(&dir).unwrap();
        assert_eq!(config.max_depth, DEFAULT_MAX_DEPTH);
    }
}
