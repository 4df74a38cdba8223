use crate::args::PositionArgs;
use crate::view::{Printer, SymbolRow};
use wayfinder_api::NavigationService;
use wayfinder_core::EngineHandle;

pub async fn definition(
    handle: &EngineHandle,
    printer: &Printer,
    pos: &PositionArgs,
) -> anyhow::Result<()> {
    match handle.go_to_definition(&pos.query()).await? {
        Some(symbol) => printer.emit(&symbol, || vec![SymbolRow::new(handle, &symbol, 0)]),
        None => printer.message(&serde_json::Value::Null, "No definition found."),
    }
}

pub async fn implementations(
    handle: &EngineHandle,
    printer: &Printer,
    pos: &PositionArgs,
) -> anyhow::Result<()> {
    let found = handle.find_implementations(&pos.query()).await?;
    printer.emit(&found, || found.iter().map(|s| SymbolRow::new(handle, s, 0)).collect())
}

pub async fn derived(
    handle: &EngineHandle,
    printer: &Printer,
    pos: &PositionArgs,
) -> anyhow::Result<()> {
    let found = handle.find_derived_classes(&pos.query()).await?;
    printer.emit(&found, || found.iter().map(|s| SymbolRow::new(handle, s, 0)).collect())
}
