use clap::Args;
use std::path::PathBuf;
use wayfinder_api::{PositionQuery, ScanScope};

#[derive(Args, Debug, Clone, Default)]
pub struct ScopeArgs {
    /// Glob of workspace-relative files to scan (repeatable)
    #[arg(long = "include", value_name = "GLOB")]
    pub include: Vec<String>,
    /// Glob of files to skip (repeatable)
    #[arg(long = "exclude", value_name = "GLOB")]
    pub exclude: Vec<String>,
}

impl ScopeArgs {
    pub fn scope(&self) -> ScanScope {
        ScanScope::new(self.include.clone(), self.exclude.clone())
    }
}

/// A cursor: file, 1-based line and 1-based column.
#[derive(Args, Debug, Clone)]
pub struct PositionArgs {
    #[arg(value_name = "FILE")]
    pub file: PathBuf,
    #[arg(value_name = "LINE")]
    pub line: usize,
    #[arg(value_name = "COLUMN")]
    pub column: usize,
}

impl PositionArgs {
    pub fn query(&self) -> PositionQuery {
        PositionQuery::new(self.file.clone(), self.line, self.column)
    }
}
