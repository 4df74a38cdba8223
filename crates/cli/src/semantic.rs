use crate::args::{PositionArgs, ScopeArgs};
use crate::view::{ContextRow, Printer, ReferenceRow, SymbolRow, ValueRow};
use clap::Args;
use std::path::Path;
use wayfinder_api::{
    ReferenceAnalyzer, ReferenceQuery, SearchQuery, SymbolKind, SymbolSearcher, TypeHintProvider,
};
use wayfinder_core::EngineHandle;

#[derive(Args, Debug)]
pub struct SearchArgs {
    /// Name substring, or a regex wrapped in slashes
    #[arg(value_name = "NAME")]
    pub name: String,
    /// Only symbols of this kind (function, class, interface, ...)
    #[arg(long, short = 'k')]
    pub kind: Option<SymbolKind>,
    #[command(flatten)]
    pub scope: ScopeArgs,
    #[arg(long, short = 'c')]
    pub case_sensitive: bool,
    /// Maximum number of results
    #[arg(long, short = 'm')]
    pub max: Option<usize>,
    /// Also collect references to each match
    #[arg(long)]
    pub refs: bool,
    /// Attach this many lines of context to each match
    #[arg(long)]
    pub context: Option<usize>,
    #[arg(long, value_name = "MS")]
    pub timeout: Option<u64>,
}

#[derive(Args, Debug)]
pub struct RefsArgs {
    #[command(flatten)]
    pub position: PositionArgs,
    #[command(flatten)]
    pub scope: ScopeArgs,
    #[arg(long, short = 'm')]
    pub max: Option<usize>,
    #[arg(long, value_name = "MS")]
    pub timeout: Option<u64>,
}

pub async fn search(
    handle: &EngineHandle,
    printer: &Printer,
    args: SearchArgs,
) -> anyhow::Result<()> {
    let query = SearchQuery {
        name: args.name,
        kind: args.kind,
        scope: args.scope.scope(),
        case_sensitive: args.case_sensitive,
        max_results: args.max,
        include_references: args.refs,
        context_lines: args.context,
        timeout_ms: args.timeout,
    };
    let result = handle.search_symbols(&query).await?;
    if printer.json {
        return printer.emit(&result, Vec::<SymbolRow>::new);
    }

    printer.emit(&result.symbols, || {
        result
            .symbols
            .iter()
            .map(|s| SymbolRow::new(handle, s, 0))
            .collect()
    })?;
    for context in &result.contexts {
        println!("\n{}:{}", context.file_path, context.focus_line);
        printer.emit(context, || ContextRow::rows(context))?;
    }
    if !result.references.is_empty() {
        println!();
        printer.emit(&result.references, || {
            result
                .references
                .iter()
                .map(|r| ReferenceRow::new(handle, r))
                .collect()
        })?;
    }
    Ok(())
}

pub async fn symbols(handle: &EngineHandle, printer: &Printer, file: &Path) -> anyhow::Result<()> {
    let symbols = handle.get_document_symbols(file).await?;
    printer.emit(&symbols, || {
        let mut rows = Vec::new();
        SymbolRow::tree(handle, &symbols, 0, &mut rows);
        rows
    })
}

pub async fn context(
    handle: &EngineHandle,
    printer: &Printer,
    file: &Path,
    line: usize,
    size: Option<usize>,
) -> anyhow::Result<()> {
    match handle.get_code_context(file, line, size).await? {
        Some(context) => {
            if let Some(symbol) = &context.enclosing_symbol
                && !printer.json
            {
                println!("in {} {}", symbol.kind, symbol.name);
            }
            printer.emit(&context, || ContextRow::rows(&context))
        }
        None => printer.message(&serde_json::Value::Null, "Line is past the end of the file."),
    }
}

pub async fn refs(handle: &EngineHandle, printer: &Printer, args: RefsArgs) -> anyhow::Result<()> {
    let mut query = ReferenceQuery::at(args.position.query());
    query.scope = args.scope.scope();
    query.max_results = args.max;
    query.timeout_ms = args.timeout;
    let refs = handle.find_references(&query).await?;
    printer.emit(&refs, || {
        refs.iter().map(|r| ReferenceRow::new(handle, r)).collect()
    })
}

pub async fn hint(
    handle: &EngineHandle,
    printer: &Printer,
    pos: &PositionArgs,
) -> anyhow::Result<()> {
    match handle.infer_type_hint(&pos.query()).await? {
        Some(hint) => printer.emit(&hint, || {
            let mut rows = vec![
                ValueRow::new("name", &hint.name),
                ValueRow::new("kind", hint.kind),
            ];
            if let Some(declared) = &hint.declared_type {
                rows.push(ValueRow::new("type", declared));
            }
            if let Some(returns) = &hint.return_type {
                rows.push(ValueRow::new("returns", returns));
            }
            rows.push(ValueRow::new("inferred", hint.inferred));
            rows.push(ValueRow::new("why", &hint.rationale));
            rows
        }),
        None => printer.message(&serde_json::Value::Null, "No symbol at this position."),
    }
}
