//! Directory tree walking logic
//!
//! `DirWalker` lists a directory tree depth-first, children sorted by name,
//! and never enters the same physical directory twice within one walk.

mod config;
mod entry;
mod visited;
mod walker;

pub use config::Options;
pub use entry::{EntryMetadata, FileKind};
pub use visited::{VisitKey, VisitedSet};
pub use walker::{DirWalker, WalkStats};
