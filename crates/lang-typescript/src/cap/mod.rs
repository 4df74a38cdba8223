pub mod heritage;
pub mod matcher;
pub mod module;
pub mod parse;
