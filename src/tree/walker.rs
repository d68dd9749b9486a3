//! DirWalker - depth-first listing with cycle detection

use std::ffi::{OsStr, OsString};
use std::fs;
use std::io;
use std::os::unix::ffi::OsStrExt;
use std::path::{Path, PathBuf};

use tracing::{debug, trace};

use crate::error::WalkError;
use crate::output::{EntryFormatter, ListingOutput};

use super::config::Options;
use super::entry::EntryMetadata;
use super::visited::VisitedSet;

/// Counters collected over one walk.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct WalkStats {
    /// Directories whose children were listed
    pub directories: usize,
    /// Entry lines printed
    pub entries: usize,
    /// Directories skipped because they were already entered
    pub cycles: usize,
    /// Path-local failures reported
    pub errors: usize,
}

/// Recursive directory lister.
///
/// Traversal uses an explicit stack of open directories, so nesting depth is
/// bounded by memory rather than by the native call stack.
pub struct DirWalker {
    options: Options,
    formatter: EntryFormatter,
}

impl DirWalker {
    pub fn new(options: Options) -> Self {
        Self {
            options,
            formatter: EntryFormatter::new(options),
        }
    }

    /// List `root` into `output`.
    ///
    /// Filesystem failures are reported through [`ListingOutput::diagnostic`]
    /// and never abort the walk; only errors writing to `output` are returned.
    pub fn walk<O: ListingOutput>(&mut self, root: &Path, output: &mut O) -> io::Result<WalkStats> {
        let mut traversal = Traversal {
            options: &self.options,
            formatter: &mut self.formatter,
            output,
            visited: VisitedSet::new(),
            stack: Vec::new(),
            stats: WalkStats::default(),
        };
        traversal.run(root)?;
        traversal.output.finish()?;
        Ok(traversal.stats)
    }
}

/// An open directory whose sorted children are being listed.
#[derive(Debug)]
struct DirectoryFrame {
    path: PathBuf,
    depth: usize,
    names: std::vec::IntoIter<OsString>,
}

/// State of a single walk; dropped when the walk returns.
struct Traversal<'a, O> {
    options: &'a Options,
    formatter: &'a mut EntryFormatter,
    output: &'a mut O,
    visited: VisitedSet,
    stack: Vec<DirectoryFrame>,
    stats: WalkStats,
}

impl<O: ListingOutput> Traversal<'_, O> {
    fn run(&mut self, root: &Path) -> io::Result<()> {
        let meta = match EntryMetadata::resolve(root, self.options.follow_symlinks) {
            Ok(meta) => meta,
            Err(e) => return self.report(WalkError::metadata(root, e)),
        };

        if !meta.is_dir() {
            return self.emit(&meta, root.as_os_str());
        }

        self.enter(root.to_path_buf(), &meta, 0)?;

        while let Some(frame) = self.stack.last_mut() {
            let Some(name) = frame.names.next() else {
                self.stack.pop();
                continue;
            };
            let path = frame.path.join(&name);
            let depth = frame.depth + 1;

            // Children that cannot be stat-ed are skipped with a diagnostic
            let meta = match EntryMetadata::resolve(&path, self.options.follow_symlinks) {
                Ok(meta) => meta,
                Err(e) => {
                    self.report(WalkError::metadata(&path, e))?;
                    continue;
                }
            };

            self.emit(&meta, &name)?;

            if meta.is_dir() && name != "." && name != ".." {
                self.enter(path, &meta, depth)?;
            }
        }

        Ok(())
    }

    /// Register a directory and, depth permitting, open it for listing.
    fn enter(&mut self, path: PathBuf, meta: &EntryMetadata, depth: usize) -> io::Result<()> {
        let key = meta.visit_key();
        if self.visited.contains(&key) {
            debug!(path = %path.display(), device = key.device, inode = key.inode, "cycle detected");
            self.stats.cycles += 1;
            return self.output.cycle(&path);
        }
        self.visited.insert(key);

        if self.options.beyond_max_depth(depth) {
            debug!(path = %path.display(), depth, "depth limit reached");
            return Ok(());
        }

        let Some(names) = self.read_children(&path)? else {
            return Ok(());
        };

        debug!(path = %path.display(), depth, children = names.len(), "entering directory");
        self.output.section(&path)?;
        self.stats.directories += 1;
        self.stack.push(DirectoryFrame {
            path,
            depth,
            names: names.into_iter(),
        });
        Ok(())
    }

    /// Read, filter and sort the names in a directory.
    ///
    /// With `show_hidden` the self and parent links `.` and `..` are listed
    /// too, as `readdir(3)` reports them. Returns `None` if the directory
    /// could not be opened.
    fn read_children(&mut self, path: &Path) -> io::Result<Option<Vec<OsString>>> {
        let entries = match fs::read_dir(path) {
            Ok(entries) => entries,
            Err(e) => {
                self.report(WalkError::read_dir(path, e))?;
                return Ok(None);
            }
        };

        let mut names = Vec::new();
        if self.options.show_hidden {
            names.push(OsString::from("."));
            names.push(OsString::from(".."));
        }
        for entry in entries {
            match entry {
                Ok(entry) => {
                    let name = entry.file_name();
                    if self.options.show_hidden || !is_hidden(&name) {
                        names.push(name);
                    }
                }
                Err(e) => self.report(WalkError::read_dir_entry(path, e))?,
            }
        }

        // OsString ordering on Unix is byte-wise
        names.sort();
        Ok(Some(names))
    }

    fn emit(&mut self, meta: &EntryMetadata, display_name: &OsStr) -> io::Result<()> {
        let entry = self.formatter.render_parts(meta, display_name);
        trace!(name = ?display_name, kind = ?meta.kind, "entry");
        self.stats.entries += 1;
        self.output.entry(&entry)
    }

    fn report(&mut self, error: WalkError) -> io::Result<()> {
        debug!(path = %error.path().display(), %error, "path skipped");
        self.stats.errors += 1;
        self.output.diagnostic(&error)
    }
}

fn is_hidden(name: &OsStr) -> bool {
    name.as_bytes().first() == Some(&b'.')
}
