use crate::config::EngineConfig;
use crate::error::Result;
use globset::{Glob, GlobSet, GlobSetBuilder};
use wayfinder_api::ScanScope;

/// Include/exclude globs over workspace-relative, `/`-separated paths.
#[derive(Debug, Clone)]
pub struct GlobFilter {
    include: Option<GlobSet>,
    exclude: GlobSet,
}

fn build_set(patterns: &[String]) -> Result<GlobSet> {
    let mut builder = GlobSetBuilder::new();
    for pattern in patterns {
        builder.add(Glob::new(pattern)?);
    }
    Ok(builder.build()?)
}

impl GlobFilter {
    pub fn new(include: &[String], exclude: &[String]) -> Result<Self> {
        let include = if include.is_empty() {
            None
        } else {
            Some(build_set(include)?)
        };
        Ok(Self {
            include,
            exclude: build_set(exclude)?,
        })
    }

    /// Query includes replace the configured ones; excludes accumulate.
    pub fn for_scope(scope: &ScanScope, config: &EngineConfig) -> Result<Self> {
        let include = if scope.include.is_empty() {
            &config.include
        } else {
            &scope.include
        };
        let mut exclude = config.exclude.clone();
        exclude.extend(scope.exclude.iter().cloned());
        Self::new(include, &exclude)
    }

    pub fn is_match(&self, relative: &str) -> bool {
        if self.exclude.is_match(relative) {
            return false;
        }
        self.include.as_ref().is_none_or(|set| set.is_match(relative))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exclude_wins() {
        let filter = GlobFilter::new(&["src/**".into()], &["**/*.test.ts".into()]).unwrap();
        assert!(filter.is_match("src/a.ts"));
        assert!(!filter.is_match("src/a.test.ts"));
        assert!(!filter.is_match("lib/a.ts"));
    }

    #[test]
    fn test_empty_include_matches_all() {
        let filter = GlobFilter::new(&[], &[]).unwrap();
        assert!(filter.is_match("deep/nested/file.tsx"));
    }

    #[test]
    fn test_config_excludes_survive_query_scope() {
        let scope = ScanScope::new(vec!["**/*.ts".into()], vec![]);
        let filter = GlobFilter::for_scope(&scope, &EngineConfig::default()).unwrap();
        assert!(!filter.is_match("node_modules/pkg/index.ts"));
        assert!(filter.is_match("src/index.ts"));
    }

    #[test]
    fn test_invalid_glob_is_rejected() {
        assert!(GlobFilter::new(&["src/[".into()], &[]).is_err());
    }
}
