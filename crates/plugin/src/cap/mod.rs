pub mod heritage;
pub mod matcher;
pub mod module;
pub mod parse;

pub use heritage::*;
pub use matcher::*;
pub use module::*;
pub use parse::*;
