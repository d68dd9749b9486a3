//! Test utilities for building temporary directory trees and capturing output.
//!
//! This module is only compiled for tests and benchmarks.

use std::fs;
use std::io;
use std::os::unix::fs::symlink;
use std::path::{Path, PathBuf};

use tempfile::TempDir;

use crate::error::WalkError;
use crate::output::{ListingOutput, RenderedEntry, cycle_notice, diagnostic_line, section_header};

/// A temporary directory tree for testing.
///
/// The tree is automatically cleaned up when dropped.
pub struct TestTree {
    dir: TempDir,
}

impl TestTree {
    /// Create a new empty temporary directory.
    pub fn new() -> Self {
        let dir = TempDir::new().expect("Failed to create temp dir");
        Self { dir }
    }

    /// Get the path to the temporary directory.
    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    /// Write a file, creating parent directories as needed.
    pub fn add_file(&self, path: &str, content: &str) -> PathBuf {
        let full_path = self.dir.path().join(path);
        if let Some(parent) = full_path.parent() {
            fs::create_dir_all(parent).expect("Failed to create parent dirs");
        }
        fs::write(&full_path, content).expect("Failed to write file");
        full_path
    }

    /// Create a directory and its parents.
    pub fn add_dir(&self, path: &str) -> PathBuf {
        let full_path = self.dir.path().join(path);
        fs::create_dir_all(&full_path).expect("Failed to create dir");
        full_path
    }

    /// Create a symlink at `link` (relative to the tree) pointing at `target`.
    ///
    /// `target` is stored verbatim, so relative targets resolve from the
    /// link's own directory.
    pub fn add_symlink(&self, target: &str, link: &str) -> PathBuf {
        let link_path = self.dir.path().join(link);
        if let Some(parent) = link_path.parent() {
            fs::create_dir_all(parent).expect("Failed to create parent dirs");
        }
        symlink(target, &link_path).expect("Failed to create symlink");
        link_path
    }
}

impl Default for TestTree {
    fn default() -> Self {
        Self::new()
    }
}

/// Listing sink that records the exact text a console run would print.
///
/// `stdout` and `stderr` hold lines with non-UTF-8 bytes replaced;
/// `raw_stdout` holds the uncolored stdout bytes verbatim.
#[derive(Debug, Default)]
pub struct RecordingOutput {
    pub stdout: Vec<String>,
    pub stderr: Vec<String>,
    pub raw_stdout: Vec<u8>,
    entries: Vec<String>,
    headers: Vec<String>,
}

impl RecordingOutput {
    pub fn new() -> Self {
        Self::default()
    }

    /// Entry lines only, in output order.
    pub fn entries(&self) -> Vec<String> {
        self.entries.clone()
    }

    /// Section header lines only, in output order.
    pub fn headers(&self) -> Vec<String> {
        self.headers.clone()
    }

    /// Check if the raw stdout bytes contain `needle`.
    pub fn stdout_contains(&self, needle: &[u8]) -> bool {
        self.raw_stdout
            .windows(needle.len())
            .any(|window| window == needle)
    }

    fn push_line(&mut self, line: &[u8]) -> String {
        self.raw_stdout.extend_from_slice(line);
        self.raw_stdout.push(b'\n');
        let text = String::from_utf8_lossy(line).into_owned();
        self.stdout.push(text.clone());
        text
    }
}

impl ListingOutput for RecordingOutput {
    fn entry(&mut self, entry: &RenderedEntry) -> io::Result<()> {
        let line = self.push_line(&entry.to_bytes());
        self.entries.push(line);
        Ok(())
    }

    fn section(&mut self, path: &Path) -> io::Result<()> {
        self.push_line(b"");
        let header = self.push_line(&section_header(path));
        self.headers.push(header);
        Ok(())
    }

    fn cycle(&mut self, path: &Path) -> io::Result<()> {
        self.push_line(&cycle_notice(path));
        Ok(())
    }

    fn diagnostic(&mut self, error: &WalkError) -> io::Result<()> {
        self.stderr
            .push(String::from_utf8_lossy(&diagnostic_line(error)).into_owned());
        Ok(())
    }
}
