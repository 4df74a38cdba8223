//! Import resolution and the file-level dependency graph.

pub mod builder;
pub mod resolver;

pub use builder::DependencyGraphBuilder;
pub use resolver::{ModuleResolver, Resolution};
