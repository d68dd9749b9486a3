//! Streaming console output
//!
//! This module provides `StreamingFormatter` which writes listing lines to
//! stdout and diagnostics to stderr as the walker produces them.

use std::io::{self, Write};
use std::os::unix::ffi::OsStrExt;
use std::path::Path;

use termcolor::{BufferedStandardStream, Color, ColorChoice, ColorSpec, WriteColor};

use crate::error::WalkError;
use crate::tree::FileKind;

use super::config::OutputConfig;
use super::format::RenderedEntry;
use super::{ListingOutput, cycle_notice, diagnostic_line, section_header};

/// Console sink: listing on stdout, diagnostics on stderr.
///
/// Names and paths are written as raw bytes.
pub struct StreamingFormatter<O = BufferedStandardStream, E = BufferedStandardStream> {
    stdout: O,
    stderr: E,
}

impl StreamingFormatter {
    pub fn new(config: OutputConfig) -> Self {
        // Terminal detection already happened when use_color was decided
        let choice = if config.use_color {
            ColorChoice::Always
        } else {
            ColorChoice::Never
        };
        Self::with_writers(
            BufferedStandardStream::stdout(choice),
            BufferedStandardStream::stderr(choice),
        )
    }
}

impl<O: WriteColor, E: WriteColor> StreamingFormatter<O, E> {
    /// Build a sink over arbitrary color-capable writers.
    pub fn with_writers(stdout: O, stderr: E) -> Self {
        Self { stdout, stderr }
    }

    pub fn into_writers(self) -> (O, E) {
        (self.stdout, self.stderr)
    }

    fn write_colored(&mut self, line: &[u8], spec: &ColorSpec) -> io::Result<()> {
        self.stdout.set_color(spec)?;
        self.stdout.write_all(line)?;
        self.stdout.reset()?;
        self.stdout.write_all(b"\n")
    }

    fn write_diagnostic(&mut self, error: &WalkError) -> io::Result<()> {
        self.stderr
            .set_color(ColorSpec::new().set_fg(Some(Color::Red)))?;
        self.stderr.write_all(&diagnostic_line(error))?;
        self.stderr.reset()?;
        self.stderr.write_all(b"\n")?;
        self.stderr.flush()
    }
}

impl<O: WriteColor, E: WriteColor> ListingOutput for StreamingFormatter<O, E> {
    fn entry(&mut self, entry: &RenderedEntry) -> io::Result<()> {
        self.stdout.write_all(entry.details.as_bytes())?;
        let mut spec = ColorSpec::new();
        match entry.kind {
            FileKind::Directory => {
                spec.set_fg(Some(Color::Blue)).set_bold(true);
            }
            FileKind::Symlink => {
                spec.set_fg(Some(Color::Cyan));
            }
            FileKind::Regular | FileKind::Other => {}
        }
        self.write_colored(entry.name.as_bytes(), &spec)
    }

    fn section(&mut self, path: &Path) -> io::Result<()> {
        self.stdout.write_all(b"\n")?;
        self.write_colored(
            &section_header(path),
            ColorSpec::new().set_fg(Some(Color::Blue)).set_bold(true),
        )
    }

    fn cycle(&mut self, path: &Path) -> io::Result<()> {
        self.write_colored(&cycle_notice(path), ColorSpec::new().set_fg(Some(Color::Yellow)))
    }

    fn diagnostic(&mut self, error: &WalkError) -> io::Result<()> {
        // Keep stdout and stderr in order when both go to the same terminal
        self.stdout.flush()?;
        // A diagnostic that cannot be written is lost with its path; the walk goes on
        let _ = self.write_diagnostic(error);
        Ok(())
    }

    fn finish(&mut self) -> io::Result<()> {
        self.stdout.flush()?;
        let _ = self.stderr.flush();
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::ffi::OsStr;
    use termcolor::NoColor;

    /// Writer that rejects every write, like a closed stderr.
    struct ClosedPipe;

    impl Write for ClosedPipe {
        fn write(&mut self, _buf: &[u8]) -> io::Result<usize> {
            Err(io::Error::new(io::ErrorKind::BrokenPipe, "closed"))
        }

        fn flush(&mut self) -> io::Result<()> {
            Err(io::Error::new(io::ErrorKind::BrokenPipe, "closed"))
        }
    }

    fn entry(name: &[u8], kind: FileKind) -> RenderedEntry {
        RenderedEntry {
            details: String::new(),
            name: OsStr::from_bytes(name).to_os_string(),
            kind,
        }
    }

    #[test]
    fn test_plain_output_text() {
        let mut sink = StreamingFormatter::with_writers(NoColor::new(Vec::new()), NoColor::new(Vec::new()));
        sink.section(Path::new(".")).unwrap();
        sink.entry(&entry(b"a.txt", FileKind::Regular)).unwrap();
        sink.entry(&entry(b"sub", FileKind::Directory)).unwrap();
        sink.cycle(Path::new("./sub/back")).unwrap();
        sink.finish().unwrap();

        let (stdout, _) = sink.into_writers();
        assert_eq!(
            String::from_utf8(stdout.into_inner()).unwrap(),
            "\n[.]\na.txt\nsub\n(skipped — cycle): ./sub/back\n"
        );
    }

    #[test]
    fn test_non_utf8_names_written_verbatim() {
        let mut sink = StreamingFormatter::with_writers(NoColor::new(Vec::new()), NoColor::new(Vec::new()));
        let dir = Path::new(OsStr::from_bytes(b"./dir\xfe"));
        sink.section(dir).unwrap();
        sink.entry(&entry(b"bad\xffname", FileKind::Regular)).unwrap();

        let (stdout, _) = sink.into_writers();
        assert_eq!(stdout.into_inner(), b"\n[./dir\xfe]\nbad\xffname\n".to_vec());
    }

    #[test]
    fn test_diagnostic_goes_to_stderr() {
        let mut sink = StreamingFormatter::with_writers(NoColor::new(Vec::new()), NoColor::new(Vec::new()));
        let err = WalkError::metadata(
            "./gone",
            io::Error::new(io::ErrorKind::NotFound, "No such file or directory"),
        );
        sink.diagnostic(&err).unwrap();

        let (stdout, stderr) = sink.into_writers();
        assert!(stdout.into_inner().is_empty());
        assert_eq!(
            stderr.into_inner(),
            b"lsr: ./gone: No such file or directory\n".to_vec()
        );
    }

    #[test]
    fn test_unwritable_stderr_does_not_stop_listing() {
        let mut sink = StreamingFormatter::with_writers(NoColor::new(Vec::new()), NoColor::new(ClosedPipe));
        let err = WalkError::read_dir(
            "./locked",
            io::Error::new(io::ErrorKind::PermissionDenied, "Permission denied"),
        );

        assert!(sink.diagnostic(&err).is_ok());
        sink.entry(&entry(b"next.txt", FileKind::Regular)).unwrap();
        assert!(sink.finish().is_ok());

        let (stdout, _) = sink.into_writers();
        assert_eq!(stdout.into_inner(), b"next.txt\n".to_vec());
    }

    #[test]
    fn test_color_wraps_directory_name_only() {
        let mut sink = StreamingFormatter::with_writers(
            termcolor::Ansi::new(Vec::new()),
            NoColor::new(Vec::new()),
        );
        let mut dir = entry(b"sub", FileKind::Directory);
        dir.details = "drwxr-xr-x ".to_string();
        sink.entry(&dir).unwrap();

        let (stdout, _) = sink.into_writers();
        let text = String::from_utf8(stdout.into_inner()).unwrap();
        assert!(text.starts_with("drwxr-xr-x \x1b["), "{:?}", text);
        assert!(text.ends_with("sub\x1b[0m\n"), "{:?}", text);
    }
}
