//! Everything that touches the filesystem or bounds a scan.

pub mod deadline;
pub mod filter;
pub mod guard;
pub mod source;

pub use deadline::Deadline;
pub use filter::GlobFilter;
pub use guard::{PathGuard, RootGuard};
pub use source::{FsSource, SourceProvider};
