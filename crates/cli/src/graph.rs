use crate::args::ScopeArgs;
use crate::view::{PathRow, Printer, UnusedRow, ValueRow};
use clap::{Args, Subcommand};
use std::path::PathBuf;
use tabled::Tabled;
use wayfinder_api::{DependencyAnalyzer, DependencyQuery};
use wayfinder_core::EngineHandle;

#[derive(Args, Debug, Clone, Default)]
pub struct GraphArgs {
    #[command(flatten)]
    pub scope: ScopeArgs,
    /// Resolve bare specifiers through node_modules
    #[arg(long)]
    pub external: bool,
    /// Maximum import hops from a scanned file
    #[arg(long)]
    pub depth: Option<usize>,
    #[arg(long, value_name = "MS")]
    pub timeout: Option<u64>,
}

impl GraphArgs {
    fn query(&self) -> DependencyQuery {
        DependencyQuery {
            scope: self.scope.scope(),
            include_external: self.external,
            max_depth: self.depth,
            timeout_ms: self.timeout,
        }
    }
}

#[derive(Subcommand, Debug)]
pub enum DepsCommands {
    /// Build the graph and summarize it
    Analyze(GraphArgs),
    /// Files a file depends on, directly or transitively
    Of {
        #[arg(value_name = "FILE")]
        file: PathBuf,
    },
    /// Files depending on a file, directly or transitively
    Dependents {
        #[arg(value_name = "FILE")]
        file: PathBuf,
    },
    /// Direct import and importer counts of a file
    Counts {
        #[arg(value_name = "FILE")]
        file: PathBuf,
    },
    /// Report import cycles
    Cycles {
        /// Print absolute paths
        #[arg(long)]
        absolute: bool,
    },
    /// Files imported by the most other files
    Top {
        #[arg(long, short = 'n', default_value_t = 10)]
        limit: usize,
    },
    /// Exports of files nothing imports
    Unused(GraphArgs),
}

#[derive(Tabled)]
struct CycleRow {
    #[tabled(rename = "#")]
    index: usize,
    #[tabled(rename = "Cycle")]
    files: String,
}

#[derive(Tabled)]
struct RankRow {
    #[tabled(rename = "File")]
    file: String,
    #[tabled(rename = "Dependents")]
    count: usize,
}

fn paths(files: &[String]) -> Vec<PathRow> {
    files.iter().map(|f| PathRow { file: f.clone() }).collect()
}

pub async fn run(
    handle: &EngineHandle,
    printer: &Printer,
    cmd: DepsCommands,
) -> anyhow::Result<()> {
    match cmd {
        DepsCommands::Analyze(args) => {
            let summary = handle.analyze_dependencies(&args.query()).await?;
            printer.emit(&summary, || {
                vec![
                    ValueRow::new("files", summary.node_count),
                    ValueRow::new("imports", summary.edge_count),
                    ValueRow::new("external", summary.external_dependencies.join(", ")),
                ]
            })
        }
        DepsCommands::Of { file } => {
            let files = handle.get_file_dependencies(&file).await?;
            printer.emit(&files, || paths(&files))
        }
        DepsCommands::Dependents { file } => {
            let files = handle.get_file_dependents(&file).await?;
            printer.emit(&files, || paths(&files))
        }
        DepsCommands::Counts { file } => match handle.get_dependency_counts(&file).await? {
            Some(counts) => printer.emit(&counts, || {
                vec![
                    ValueRow::new("file", &counts.file),
                    ValueRow::new("dependencies", counts.dependencies),
                    ValueRow::new("dependents", counts.dependents),
                ]
            }),
            None => printer.message(&serde_json::Value::Null, "File is not in the graph."),
        },
        DepsCommands::Cycles { absolute } => {
            let cycles = handle.check_circular_dependencies(!absolute).await?;
            printer.emit(&cycles, || {
                cycles
                    .iter()
                    .enumerate()
                    .map(|(i, cycle)| CycleRow {
                        index: i + 1,
                        files: cycle.join(" -> "),
                    })
                    .collect()
            })
        }
        DepsCommands::Top { limit } => {
            let ranked = handle.get_most_referenced_files(limit).await?;
            printer.emit(&ranked, || {
                ranked
                    .iter()
                    .map(|r| RankRow {
                        file: r.file.clone(),
                        count: r.count,
                    })
                    .collect()
            })
        }
        DepsCommands::Unused(args) => {
            let unused = handle.find_unused_exports(&args.query()).await?;
            printer.emit(&unused, || unused.iter().map(UnusedRow::from).collect())
        }
    }
}
