//! lsr - recursive directory listing with symlink cycle detection

pub mod error;
pub mod output;
pub mod tree;

#[cfg(any(test, feature = "test-utils"))]
pub mod test_utils;

pub use error::{UsageError, WalkError};
pub use output::{EntryFormatter, ListingOutput, OutputConfig, StreamingFormatter};
pub use tree::{DirWalker, EntryMetadata, FileKind, Options, VisitKey, VisitedSet, WalkStats};
