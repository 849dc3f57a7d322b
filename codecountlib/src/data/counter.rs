//! Line classification for a single file.
//!
//! Files are read as UTF-8. Line boundaries are `\n`, `\r\n` and a lone `\r`;
//! a final line without a terminator still counts. A line is empty when
//! nothing but whitespace remains after trimming.

use std::fs::File;
use std::io::{self, BufRead, BufReader};
use std::path::Path;

use crate::error::CodeCountError;
use crate::Result;

use super::stats::LineCounts;

/// Count the lines of a file.
///
/// The file is read one `\n`-terminated chunk at a time, so only the current
/// line is held in memory. The handle is released before returning.
///
/// # Example
///
/// ```rust
/// use codecountlib::count_file;
/// use std::fs;
/// use tempfile::tempdir;
///
/// let dir = tempdir().unwrap();
/// let file_path = dir.path().join("a.py");
/// fs::write(&file_path, "import os\n\nprint(os.name)\n").unwrap();
///
/// let counts = count_file(&file_path).unwrap();
/// assert_eq!(counts.total, 3);
/// assert_eq!(counts.non_empty, 2);
/// assert_eq!(counts.empty, 1);
/// ```
pub fn count_file(path: impl AsRef<Path>) -> Result<LineCounts> {
    let path = path.as_ref();
    let read_error = |source: io::Error| CodeCountError::FileRead {
        path: path.to_path_buf(),
        source,
    };

    let file = File::open(path).map_err(read_error)?;
    let mut reader = BufReader::new(file);
    let mut counts = LineCounts::new();
    let mut buf = Vec::new();

    // A chunk ends at `\n`, so a `\r\n` pair never straddles two chunks and
    // no multi-byte character is split.
    loop {
        buf.clear();
        if reader.read_until(b'\n', &mut buf).map_err(read_error)? == 0 {
            break;
        }
        let chunk = std::str::from_utf8(&buf)
            .map_err(|e| read_error(io::Error::new(io::ErrorKind::InvalidData, e)))?;
        counts += count_text(chunk);
    }

    Ok(counts)
}

/// Count the lines of already-decoded text.
pub fn count_text(text: &str) -> LineCounts {
    let mut counts = LineCounts::new();
    let mut rest = text;

    while !rest.is_empty() {
        match rest.find(|c: char| c == '\n' || c == '\r') {
            Some(i) => {
                counts.record(&rest[..i]);
                let terminator = if rest[i..].starts_with("\r\n") { 2 } else { 1 };
                rest = &rest[i + terminator..];
            }
            None => {
                counts.record(rest);
                rest = "";
            }
        }
    }

    counts
}
