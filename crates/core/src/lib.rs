pub mod cache;
pub mod config;
pub mod dependency;
pub mod error;
pub mod facade;
pub mod features;
pub mod logging;
pub mod runtime;
pub mod util;
pub mod workspace;

pub use config::EngineConfig;
pub use error::{Result, WayfinderError};
pub use facade::EngineHandle;
pub use features::WorkspaceIndex;
pub use runtime::{CodeEngine, CodeEngineBuilder};
