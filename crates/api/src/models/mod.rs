pub mod graph;
pub mod hint;
pub mod language;
pub mod search;
pub mod symbol;

pub use graph::*;
pub use hint::*;
pub use language::*;
pub use search::*;
pub use symbol::*;
