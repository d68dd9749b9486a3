//! Configuration types for the directory walker

use crate::error::UsageError;

/// Listing options, resolved once from the command line.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Options {
    /// List entries whose name starts with `.`
    pub show_hidden: bool,
    /// Render permissions, owner, size and mtime for each entry
    pub long_format: bool,
    /// Scale sizes to B/K/M/G/T (long format only)
    pub human_sizes: bool,
    /// Resolve symlinks with `stat` instead of treating them as leaves
    pub follow_symlinks: bool,
    /// Deepest directory level whose children are listed; `None` is unlimited
    pub max_depth: Option<usize>,
}

impl Options {
    /// Build options from raw CLI values, rejecting incoherent combinations.
    ///
    /// `depth` follows the command-line convention: `-1` means unlimited.
    pub fn from_cli(
        show_hidden: bool,
        long_format: bool,
        human_sizes: bool,
        follow_symlinks: bool,
        depth: i64,
    ) -> Result<Self, UsageError> {
        if human_sizes && !long_format {
            return Err(UsageError::HumanWithoutLong);
        }

        let max_depth = match depth {
            -1 => None,
            d if d < -1 => return Err(UsageError::InvalidDepth(d)),
            d => Some(usize::try_from(d).map_err(|_| UsageError::InvalidDepth(d))?),
        };

        Ok(Self {
            show_hidden,
            long_format,
            human_sizes,
            follow_symlinks,
            max_depth,
        })
    }

    /// True when a directory at `depth` should be registered but not listed.
    pub fn beyond_max_depth(&self, depth: usize) -> bool {
        self.max_depth.is_some_and(|max| depth > max)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unlimited_depth() {
        let opts = Options::from_cli(false, false, false, false, -1).unwrap();
        assert_eq!(opts.max_depth, None);
        assert!(!opts.beyond_max_depth(10_000));
    }

    #[test]
    fn test_zero_depth_lists_root_only() {
        let opts = Options::from_cli(false, false, false, false, 0).unwrap();
        assert!(!opts.beyond_max_depth(0));
        assert!(opts.beyond_max_depth(1));
    }

    #[test]
    fn test_human_requires_long() {
        assert_eq!(
            Options::from_cli(false, false, true, false, -1),
            Err(UsageError::HumanWithoutLong)
        );
        assert!(Options::from_cli(false, true, true, false, -1).is_ok());
    }

    #[test]
    fn test_depth_below_minus_one_rejected() {
        assert_eq!(
            Options::from_cli(false, false, false, false, -2),
            Err(UsageError::InvalidDepth(-2))
        );
    }
}
