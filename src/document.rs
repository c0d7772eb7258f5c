//! In-memory line document with anchored insertions and atomic output.
//!
//! The [`Document`] is the full ordered line sequence of the file being
//! patched. Each stored line keeps the trailing newline it had in the
//! source; after a replacement, a single stored "line" may contain embedded
//! newlines. The document is read in full, mutated in place, and written in
//! full — no streaming I/O.

use crate::error::{PatchError, Result};
use crate::locate::Span;
use std::fs::File;
use std::io::Write;
use std::path::{Path, PathBuf};

/// The full in-memory ordered line sequence of the file being patched.
#[derive(Debug, Clone, Default)]
pub struct Document {
    lines: Vec<String>,
}

impl Document {
    /// Read a document from a UTF-8 text file, keeping line terminators.
    pub fn read(path: &Path) -> Result<Self> {
        let bytes = std::fs::read(path).map_err(|source| PatchError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let text = String::from_utf8(bytes).map_err(|_| PatchError::Utf8 {
            path: path.to_path_buf(),
        })?;
        Ok(Self::from_text(&text))
    }

    /// Build a document from raw text, splitting on newlines (kept).
    pub fn from_text(text: &str) -> Self {
        Self {
            lines: text.split_inclusive('\n').map(str::to_string).collect(),
        }
    }

    /// Build a document from pre-split lines.
    pub fn from_lines(lines: Vec<String>) -> Self {
        Self { lines }
    }

    /// Number of stored lines.
    pub fn len(&self) -> usize {
        self.lines.len()
    }

    /// Returns true when the document has no lines.
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Borrow the line sequence for scanning.
    pub fn lines(&self) -> &[String] {
        &self.lines
    }

    /// Concatenate the lines back into the full file text.
    pub fn contents(&self) -> String {
        self.lines.concat()
    }

    /// Insert `text` immediately after the first line containing `anchor`.
    ///
    /// Returns the index of the first inserted line, or `None` (with no
    /// mutation) when the anchor is absent.
    pub fn insert_after(&mut self, anchor: &str, text: &str) -> Option<usize> {
        let at = self.lines.iter().position(|l| l.contains(anchor))?;
        self.insert_lines(at + 1, text);
        Some(at + 1)
    }

    /// Insert `text` after the first line containing `anchor` that appears
    /// strictly after the first line containing `outer`.
    ///
    /// This is the two-stage anchor used to land inside a specific
    /// enclosing construct (find the class line, then the method line
    /// within it). Returns the index of the first inserted line, or `None`
    /// when either anchor is absent.
    pub fn insert_after_within(&mut self, outer: &str, anchor: &str, text: &str) -> Option<usize> {
        let outer_at = self.lines.iter().position(|l| l.contains(outer))?;
        let rel = self.lines[outer_at + 1..]
            .iter()
            .position(|l| l.contains(anchor))?;
        let at = outer_at + 1 + rel;
        self.insert_lines(at + 1, text);
        Some(at + 1)
    }

    /// Count the lines containing `marker`.
    ///
    /// Used for the post-run verification report (remaining legacy markers
    /// vs. newly introduced ones).
    pub fn count_containing(&self, marker: &str) -> usize {
        self.lines.iter().filter(|l| l.contains(marker)).count()
    }

    /// Replace the lines in `span` with a single stored line.
    ///
    /// The span is clamped to the current document length, so a stale end
    /// index past the last line removes only what exists.
    pub fn replace_span(&mut self, span: Span, line: String) {
        let start = span.start.min(self.lines.len());
        let end = span.end.clamp(start, self.lines.len());
        self.lines.splice(start..end, std::iter::once(line));
    }

    /// Write the document to `path` as UTF-8, overwriting if present.
    ///
    /// The write goes to a temp file in the same directory which is synced
    /// and renamed over the target, so a failed run never leaves a
    /// half-written output.
    pub fn write(&self, path: &Path) -> Result<()> {
        let temp_path = temp_path_for(path)?;
        let io_err = |source| PatchError::Io {
            path: path.to_path_buf(),
            source,
        };

        let mut temp_file = File::create(&temp_path).map_err(io_err)?;
        temp_file.write_all(self.contents().as_bytes()).map_err(io_err)?;
        temp_file.sync_all().map_err(io_err)?;
        std::fs::rename(&temp_path, path).map_err(io_err)?;
        Ok(())
    }

    fn insert_lines(&mut self, at: usize, text: &str) {
        let mut new_lines: Vec<String> = text.split_inclusive('\n').map(str::to_string).collect();
        if let Some(last) = new_lines.last_mut() {
            if !last.ends_with('\n') {
                last.push('\n');
            }
        }
        self.lines.splice(at..at, new_lines);
    }
}

fn temp_path_for(file_path: &Path) -> Result<PathBuf> {
    let file_dir = file_path
        .parent()
        .ok_or_else(|| PatchError::Other("File has no parent directory".to_string()))?;
    let file_name = file_path
        .file_name()
        .and_then(|n| n.to_str())
        .unwrap_or("tmp");
    Ok(file_dir.join(format!(".{}.out.tmp", file_name)))
}
