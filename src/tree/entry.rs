//! Filesystem metadata snapshot used by the walker and the formatter

use std::fs;
use std::io;
use std::os::unix::fs::MetadataExt;
use std::path::Path;

use super::visited::VisitKey;

/// Type of a filesystem entry, as far as the listing cares.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileKind {
    Regular,
    Directory,
    Symlink,
    Other,
}

impl From<fs::FileType> for FileKind {
    fn from(ft: fs::FileType) -> Self {
        if ft.is_dir() {
            FileKind::Directory
        } else if ft.is_symlink() {
            FileKind::Symlink
        } else if ft.is_file() {
            FileKind::Regular
        } else {
            FileKind::Other
        }
    }
}

/// The subset of `stat(2)` the listing renders.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EntryMetadata {
    pub kind: FileKind,
    /// Full `st_mode`; only the permission bits are rendered.
    pub mode: u32,
    pub nlink: u64,
    pub uid: u32,
    pub gid: u32,
    pub size: u64,
    /// Modification time in seconds since the Unix epoch.
    pub mtime: i64,
    pub dev: u64,
    pub ino: u64,
}

impl EntryMetadata {
    /// Resolve metadata for `path`.
    ///
    /// With `follow_symlinks` this is `stat` semantics, otherwise `lstat`, so a
    /// symlink to a directory stays a symlink leaf.
    pub fn resolve(path: &Path, follow_symlinks: bool) -> io::Result<Self> {
        let meta = if follow_symlinks {
            fs::metadata(path)?
        } else {
            fs::symlink_metadata(path)?
        };
        Ok(Self::from(&meta))
    }

    pub fn is_dir(&self) -> bool {
        self.kind == FileKind::Directory
    }

    pub fn visit_key(&self) -> VisitKey {
        VisitKey::new(self.dev, self.ino)
    }
}

impl From<&fs::Metadata> for EntryMetadata {
    fn from(meta: &fs::Metadata) -> Self {
        Self {
            kind: meta.file_type().into(),
            mode: meta.mode(),
            nlink: meta.nlink(),
            uid: meta.uid(),
            gid: meta.gid(),
            size: meta.size(),
            mtime: meta.mtime(),
            dev: meta.dev(),
            ino: meta.ino(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::os::unix::fs::symlink;
    use tempfile::TempDir;

    #[test]
    fn test_lstat_keeps_symlink() {
        let dir = TempDir::new().unwrap();
        fs::create_dir(dir.path().join("real")).unwrap();
        symlink("real", dir.path().join("link")).unwrap();

        let meta = EntryMetadata::resolve(&dir.path().join("link"), false).unwrap();
        assert_eq!(meta.kind, FileKind::Symlink);
    }

    #[test]
    fn test_stat_follows_symlink() {
        let dir = TempDir::new().unwrap();
        fs::create_dir(dir.path().join("real")).unwrap();
        symlink("real", dir.path().join("link")).unwrap();

        let via_link = EntryMetadata::resolve(&dir.path().join("link"), true).unwrap();
        let direct = EntryMetadata::resolve(&dir.path().join("real"), false).unwrap();
        assert!(via_link.is_dir());
        assert_eq!(via_link.visit_key(), direct.visit_key());
    }

    #[test]
    fn test_regular_file_size() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("a.txt"), "0123456789").unwrap();

        let meta = EntryMetadata::resolve(&dir.path().join("a.txt"), false).unwrap();
        assert_eq!(meta.kind, FileKind::Regular);
        assert_eq!(meta.size, 10);
        assert_eq!(meta.nlink, 1);
    }

    #[test]
    fn test_missing_path_errors() {
        let dir = TempDir::new().unwrap();
        let err = EntryMetadata::resolve(&dir.path().join("nope"), true).unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::NotFound);
    }
}
