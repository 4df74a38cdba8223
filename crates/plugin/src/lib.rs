pub mod cap;
pub mod model;
pub mod parser;
pub mod plugin;
pub mod text;
pub mod utils;

pub use cap::*;
pub use model::{ClassHeader, HeaderKind, ModuleSyntax};
pub use parser::{FallbackParser, SymbolParser};
pub use plugin::{LanguagePlugin, PluginInfo};

pub type BoxError = Box<dyn std::error::Error + Send + Sync>;
