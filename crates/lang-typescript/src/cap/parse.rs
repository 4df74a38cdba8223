use crate::TypeScriptPlugin;
use std::sync::Arc;
use wayfinder_plugin::{SymbolParseCap, SymbolParser};

impl SymbolParseCap for TypeScriptPlugin {
    fn symbol_parser(&self) -> Arc<dyn SymbolParser> {
        self.parser.clone()
    }
}
