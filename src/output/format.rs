//! Entry rendering

use std::ffi::{OsStr, OsString};
use std::fmt;
use std::os::unix::ffi::OsStrExt;

use chrono::{Local, TimeZone};

use crate::tree::{EntryMetadata, FileKind, Options};

use super::accounts::Accounts;

const SIZE_UNITS: [&str; 5] = ["B", "K", "M", "G", "T"];
const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M";

/// A rendered entry: long-format columns (empty in bare mode) and the name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedEntry {
    /// Everything before the name, including the separating space.
    pub details: String,
    /// Name exactly as the filesystem returned it.
    pub name: OsString,
    pub kind: FileKind,
}

impl RenderedEntry {
    /// The line as raw bytes, without the trailing newline.
    pub fn to_bytes(&self) -> Vec<u8> {
        let mut line = self.details.clone().into_bytes();
        line.extend_from_slice(self.name.as_bytes());
        line
    }
}

impl fmt::Display for RenderedEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.details, self.name.to_string_lossy())
    }
}

/// Renders entry metadata as a listing line.
#[derive(Debug)]
pub struct EntryFormatter {
    options: Options,
    accounts: Accounts,
}

impl EntryFormatter {
    pub fn new(options: Options) -> Self {
        Self {
            options,
            accounts: Accounts::new(),
        }
    }

    /// Render one line, without the trailing newline.
    ///
    /// Non-UTF-8 names are replaced lossily; sinks use [`Self::render_parts`]
    /// to keep the raw bytes.
    pub fn render(&mut self, meta: &EntryMetadata, display_name: impl AsRef<OsStr>) -> String {
        self.render_parts(meta, display_name).to_string()
    }

    /// Render one entry, keeping the name separate for colored output.
    pub fn render_parts(
        &mut self,
        meta: &EntryMetadata,
        display_name: impl AsRef<OsStr>,
    ) -> RenderedEntry {
        let details = if self.options.long_format {
            self.long_details(meta)
        } else {
            String::new()
        };

        RenderedEntry {
            details,
            name: display_name.as_ref().to_os_string(),
            kind: meta.kind,
        }
    }

    fn long_details(&mut self, meta: &EntryMetadata) -> String {
        let size = if self.options.human_sizes {
            format_human_size(meta.size)
        } else {
            meta.size.to_string()
        };
        let owner = self.accounts.user_name(meta.uid).unwrap_or("?").to_string();
        let group = self.accounts.group_name(meta.gid).unwrap_or("?");

        format!(
            "{} {} {} {} {:>7} {} ",
            permission_string(meta.kind, meta.mode),
            meta.nlink,
            owner,
            group,
            size,
            format_timestamp(meta.mtime),
        )
    }
}

/// `ls -l` style mode string, e.g. `drwxr-xr-x`.
pub fn permission_string(kind: FileKind, mode: u32) -> String {
    const BITS: [(u32, char); 9] = [
        (0o400, 'r'),
        (0o200, 'w'),
        (0o100, 'x'),
        (0o040, 'r'),
        (0o020, 'w'),
        (0o010, 'x'),
        (0o004, 'r'),
        (0o002, 'w'),
        (0o001, 'x'),
    ];

    let type_char = match kind {
        FileKind::Directory => 'd',
        FileKind::Symlink => 'l',
        FileKind::Regular | FileKind::Other => '-',
    };

    std::iter::once(type_char)
        .chain(
            BITS.iter()
                .map(|&(bit, c)| if mode & bit != 0 { c } else { '-' }),
        )
        .collect()
}

/// Format a size in bytes with one decimal and a B/K/M/G/T suffix.
///
/// Units above T are not used; larger sizes are expressed in T.
pub fn format_human_size(bytes: u64) -> String {
    let mut value = bytes as f64;
    let mut unit = 0;
    while value >= 1024.0 && unit < SIZE_UNITS.len() - 1 {
        value /= 1024.0;
        unit += 1;
    }
    format!("{:.1}{}", value, SIZE_UNITS[unit])
}

/// Format an mtime as local `YYYY-MM-DD HH:MM`, or `?` if out of range.
pub fn format_timestamp(mtime: i64) -> String {
    Local
        .timestamp_opt(mtime, 0)
        .single()
        .map(|dt| dt.format(TIMESTAMP_FORMAT).to_string())
        .unwrap_or_else(|| "?".to_string())
}
