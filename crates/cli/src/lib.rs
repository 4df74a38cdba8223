mod args;
mod graph;
mod navigate;
mod semantic;
mod view;

use anyhow::Context;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use view::Printer;
use wayfinder_api::EngineLifecycle;
use wayfinder_core::EngineConfig;

#[derive(Parser)]
#[command(
    name = "wayfinder",
    version,
    about = "Static code intelligence for TypeScript and JavaScript workspaces",
    long_about = "Wayfinder parses a TypeScript/JavaScript workspace on demand and answers symbol, \
                  reference, navigation and dependency questions about it. Nothing is persisted: \
                  every invocation works from the files on disk."
)]
pub struct Cli {
    /// Workspace root. Defaults to the current directory.
    #[arg(long, short = 'r', global = true, value_name = "PATH")]
    pub root: Option<PathBuf>,

    /// Print results as JSON instead of tables
    #[arg(long, global = true)]
    pub json: bool,

    /// Also log to stderr
    #[arg(long, short = 'v', global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Search symbols by name, substring or /regex/
    Search(semantic::SearchArgs),
    /// List the symbols of one file as a tree
    Symbols {
        #[arg(value_name = "FILE")]
        file: PathBuf,
    },
    /// Show the lines around a line of a file
    Context {
        #[arg(value_name = "FILE")]
        file: PathBuf,
        #[arg(value_name = "LINE")]
        line: usize,
        /// Lines before and after the focus line
        #[arg(long, short = 'n')]
        size: Option<usize>,
    },
    /// Find references to the symbol at a position
    Refs(semantic::RefsArgs),
    /// Infer the type of the symbol at a position
    Hint(args::PositionArgs),
    /// Jump to the definition of the identifier at a position
    Def(args::PositionArgs),
    /// Classes implementing the interface (or overriding the method) at a position
    Impls(args::PositionArgs),
    /// Classes extending the class at a position
    Derived(args::PositionArgs),
    /// Dependency graph queries
    #[command(subcommand)]
    Deps(graph::DepsCommands),
    /// Print the effective configuration, or its JSON schema
    Config {
        #[arg(long)]
        schema: bool,
    },
}

pub fn run() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let _guard = wayfinder_runtime::init_logging("cli", cli.verbose);

    let root = match cli.root.clone() {
        Some(root) => root,
        None => std::env::current_dir().context("cannot determine the current directory")?,
    };
    let printer = Printer { json: cli.json };

    if let Commands::Config { schema } = &cli.command {
        return print_config(&root, *schema);
    }

    let rt = tokio::runtime::Runtime::new()?;
    rt.block_on(async move {
        let handle = wayfinder_runtime::build_default_engine(root.clone())
            .with_context(|| format!("cannot open workspace {}", root.display()))?;
        tracing::info!("Running {} in {}", cli.command.name(), root.display());

        let result = match cli.command {
            Commands::Search(args) => semantic::search(&handle, &printer, args).await,
            Commands::Symbols { file } => semantic::symbols(&handle, &printer, &file).await,
            Commands::Context { file, line, size } => {
                semantic::context(&handle, &printer, &file, line, size).await
            }
            Commands::Refs(args) => semantic::refs(&handle, &printer, args).await,
            Commands::Hint(pos) => semantic::hint(&handle, &printer, &pos).await,
            Commands::Def(pos) => navigate::definition(&handle, &printer, &pos).await,
            Commands::Impls(pos) => navigate::implementations(&handle, &printer, &pos).await,
            Commands::Derived(pos) => navigate::derived(&handle, &printer, &pos).await,
            Commands::Deps(cmd) => graph::run(&handle, &printer, cmd).await,
            Commands::Config { .. } => Ok(()),
        };

        let stats = handle.cache_stats().await?;
        tracing::debug!(
            "Cache: {} files, {} hits, {} misses",
            stats.content_entries,
            stats.hits,
            stats.misses
        );
        result
    })
}

impl Commands {
    fn name(&self) -> &'static str {
        match self {
            Commands::Search(_) => "search",
            Commands::Symbols { .. } => "symbols",
            Commands::Context { .. } => "context",
            Commands::Refs(_) => "refs",
            Commands::Hint(_) => "hint",
            Commands::Def(_) => "def",
            Commands::Impls(_) => "impls",
            Commands::Derived(_) => "derived",
            Commands::Deps(_) => "deps",
            Commands::Config { .. } => "config",
        }
    }
}

fn print_config(root: &std::path::Path, schema: bool) -> anyhow::Result<()> {
    if schema {
        let schema = schemars::schema_for!(EngineConfig);
        println!("{}", serde_json::to_string_pretty(&schema)?);
    } else {
        let config = EngineConfig::load(root)?;
        println!("{}", serde_json::to_string_pretty(&config)?);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_search_flags() {
        let cli = Cli::try_parse_from([
            "wayfinder", "--json", "search", "/^use/", "--kind", "function", "--include",
            "src/**", "--max", "5",
        ])
        .unwrap();
        assert!(cli.json);
        match cli.command {
            Commands::Search(args) => {
                assert_eq!(args.name, "/^use/");
                assert_eq!(args.max, Some(5));
                assert_eq!(args.scope.include, vec!["src/**"]);
            }
            _ => panic!("expected search"),
        }
    }

    #[test]
    fn test_parse_deps_cycles() {
        let cli = Cli::try_parse_from(["wayfinder", "deps", "cycles", "--absolute"]).unwrap();
        assert!(matches!(
            cli.command,
            Commands::Deps(graph::DepsCommands::Cycles { absolute: true })
        ));
    }
}
