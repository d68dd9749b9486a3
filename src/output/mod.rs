//! Listing output
//!
//! The walker produces four kinds of events: entry lines, directory section
//! headers, cycle notices and per-path diagnostics. They are delivered to a
//! [`ListingOutput`] sink.
//!
//! # Module Structure
//!
//! - `config` - Output configuration types
//! - `format` - Entry rendering (bare or long format)
//! - `accounts` - uid/gid to name lookup
//! - `streaming` - Console sink writing to stdout/stderr

mod accounts;
mod config;
mod format;
mod streaming;

use std::io;
use std::os::unix::ffi::OsStrExt;
use std::path::Path;

use crate::error::WalkError;

pub use accounts::Accounts;
pub use config::OutputConfig;
pub use format::{EntryFormatter, RenderedEntry, format_human_size, format_timestamp, permission_string};
pub use streaming::StreamingFormatter;

/// Sink for walker output.
pub trait ListingOutput {
    /// One listed entry.
    fn entry(&mut self, entry: &RenderedEntry) -> io::Result<()>;

    /// Header introducing the children of `path`.
    fn section(&mut self, path: &Path) -> io::Result<()>;

    /// `path` leads back to a directory that was already entered.
    fn cycle(&mut self, path: &Path) -> io::Result<()>;

    /// A path-local failure; the walk continues after it.
    fn diagnostic(&mut self, error: &WalkError) -> io::Result<()>;

    /// Called once when the walk is done.
    fn finish(&mut self) -> io::Result<()> {
        Ok(())
    }
}

/// Section header line `[<path>]`, printed after a blank line.
///
/// Lines are raw bytes so non-UTF-8 names reach the terminal unchanged.
pub fn section_header(path: &Path) -> Vec<u8> {
    let mut line = b"[".to_vec();
    line.extend_from_slice(path.as_os_str().as_bytes());
    line.push(b']');
    line
}

/// Notice printed instead of re-entering a directory.
pub fn cycle_notice(path: &Path) -> Vec<u8> {
    let mut line = "(skipped — cycle): ".as_bytes().to_vec();
    line.extend_from_slice(path.as_os_str().as_bytes());
    line
}

/// Diagnostic line for stderr: `lsr: <path>: <system error>`.
pub fn diagnostic_line(error: &WalkError) -> Vec<u8> {
    let mut line = b"lsr: ".to_vec();
    line.extend_from_slice(error.path().as_os_str().as_bytes());
    line.extend_from_slice(b": ");
    line.extend_from_slice(error.io_error().to_string().as_bytes());
    line
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::ffi::OsStr;

    #[test]
    fn test_section_header() {
        assert_eq!(section_header(Path::new("./sub")), b"[./sub]".to_vec());
    }

    #[test]
    fn test_cycle_notice() {
        assert_eq!(
            cycle_notice(Path::new("a/loop")),
            "(skipped — cycle): a/loop".as_bytes().to_vec()
        );
    }

    #[test]
    fn test_diagnostic_line() {
        let err = WalkError::read_dir(
            "locked",
            io::Error::new(io::ErrorKind::PermissionDenied, "Permission denied"),
        );
        assert_eq!(
            diagnostic_line(&err),
            b"lsr: locked: Permission denied".to_vec()
        );
    }

    #[test]
    fn test_lines_keep_non_utf8_bytes() {
        let path = Path::new(OsStr::from_bytes(b"dir/bad\xffname"));
        assert_eq!(section_header(path), b"[dir/bad\xffname]".to_vec());
        assert!(cycle_notice(path).ends_with(b"dir/bad\xffname"));
    }
}
