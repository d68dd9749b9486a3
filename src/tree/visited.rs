//! Visited-directory tracking for cycle detection.

use std::collections::HashSet;

/// Identity of a physical directory: `(device, inode)`.
///
/// Two paths with the same key reach the same directory, whether through a
/// symlink, a hardlink or a bind mount.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct VisitKey {
    pub device: u64,
    pub inode: u64,
}

impl VisitKey {
    pub fn new(device: u64, inode: u64) -> Self {
        Self { device, inode }
    }
}

/// Directories already entered during one traversal.
///
/// Keys are only ever added; the set lives as long as a single walk.
#[derive(Debug, Default)]
pub struct VisitedSet {
    seen: HashSet<VisitKey>,
}

impl VisitedSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Check if a directory has been entered.
    pub fn contains(&self, key: &VisitKey) -> bool {
        self.seen.contains(key)
    }

    /// Record a directory. Returns `true` if it was not already present.
    pub fn insert(&mut self, key: VisitKey) -> bool {
        self.seen.insert(key)
    }

    pub fn len(&self) -> usize {
        self.seen.len()
    }

    pub fn is_empty(&self) -> bool {
        self.seen.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_insert_is_idempotent() {
        let mut visited = VisitedSet::new();
        let key = VisitKey::new(1, 12345);

        assert!(visited.insert(key));
        assert!(!visited.insert(key));
        assert_eq!(visited.len(), 1);
    }

    #[test]
    fn test_contains() {
        let mut visited = VisitedSet::new();
        let key = VisitKey::new(1, 42);

        assert!(!visited.contains(&key));
        visited.insert(key);
        assert!(visited.contains(&key));
    }

    #[test]
    fn test_same_inode_on_different_devices() {
        let mut visited = VisitedSet::new();

        assert!(visited.insert(VisitKey::new(1, 7)));
        assert!(visited.insert(VisitKey::new(2, 7)));
        assert!(!visited.contains(&VisitKey::new(3, 7)));
    }
}
