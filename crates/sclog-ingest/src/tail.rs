//! Tail reader — incremental reads of a growing log file.
//!
//! Each [`TailReader::poll`] compares the file's current fingerprint
//! (size + modification time) against the last poll and returns only what
//! changed. Truncation and replacement are first-class state transitions
//! (`Reset`), not exceptions. Payloads always end at a line boundary: a
//! trailing partial line is buffered internally and prepended to the next
//! poll's bytes, so the caller never sees a torn line.

use std::fs::File;
use std::io::{self, Read, Seek, SeekFrom};
use std::path::{Path, PathBuf};
use std::time::SystemTime;

/// Outcome of one poll of the tailed file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReadResult {
    /// File identity and size match the last poll; nothing new.
    Unchanged,
    /// New complete-line bytes after the last-read offset.
    Appended(Vec<u8>),
    /// File identity changed or it shrank; these are all bytes from the
    /// start, and the caller must discard everything it derived before.
    Reset(Vec<u8>),
    /// The path does not exist or is not readable right now. All cursor
    /// state is retained; the next poll simply retries.
    Missing,
}

#[derive(Debug, Clone, Copy, PartialEq)]
struct Fingerprint {
    len: u64,
    modified: Option<SystemTime>,
}

/// Cursor over one log file. Owns the read offset, the last fingerprint,
/// and the pending partial-line fragment; none of this leaks to callers.
#[derive(Debug)]
pub struct TailReader {
    path: PathBuf,
    offset: u64,
    fingerprint: Option<Fingerprint>,
    fragment: Vec<u8>,
}

impl TailReader {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            offset: 0,
            fingerprint: None,
            fragment: Vec::new(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Forget everything; the next poll is a full `Reset`. This is the
    /// manual "reload now" trigger.
    pub fn rewind(&mut self) {
        self.offset = 0;
        self.fingerprint = None;
        self.fragment.clear();
    }

    /// Poll the file once. Never re-returns bytes already delivered by a
    /// prior `Appended`/`Reset` under normal append-only growth.
    pub fn poll(&mut self) -> ReadResult {
        let meta = match std::fs::metadata(&self.path) {
            Ok(meta) if meta.is_file() => meta,
            _ => return ReadResult::Missing,
        };
        let len = meta.len();
        let modified = meta.modified().ok();

        let Some(prev) = self.fingerprint else {
            // First poll of this file: deliver everything as a reset.
            return self.read_from_start(len, modified);
        };

        if len < self.offset {
            // Shrank below our cursor: truncated or rotated.
            return self.read_from_start(len, modified);
        }
        if len == self.offset {
            if modified == prev.modified {
                return ReadResult::Unchanged;
            }
            // Same size, new mtime: rewritten in place. Byte offsets are no
            // longer trustworthy.
            return self.read_from_start(len, modified);
        }

        match self.read_span(self.offset, len) {
            Ok(bytes) => {
                self.offset = len;
                self.fingerprint = Some(Fingerprint { len, modified });
                match self.take_complete_lines(bytes) {
                    Some(complete) => ReadResult::Appended(complete),
                    // Only a partial fragment arrived; it waits in the buffer.
                    None => ReadResult::Unchanged,
                }
            }
            Err(err) => {
                tracing::debug!(path = %self.path.display(), error = %err, "tail read failed");
                ReadResult::Missing
            }
        }
    }

    fn read_from_start(&mut self, len: u64, modified: Option<SystemTime>) -> ReadResult {
        match self.read_span(0, len) {
            Ok(bytes) => {
                self.offset = len;
                self.fingerprint = Some(Fingerprint { len, modified });
                self.fragment.clear();
                let complete = self.take_complete_lines(bytes).unwrap_or_default();
                ReadResult::Reset(complete)
            }
            Err(err) => {
                tracing::debug!(path = %self.path.display(), error = %err, "tail reset read failed");
                ReadResult::Missing
            }
        }
    }

    fn read_span(&self, from: u64, to: u64) -> io::Result<Vec<u8>> {
        let mut file = File::open(&self.path)?;
        file.seek(SeekFrom::Start(from))?;
        let mut buf = Vec::with_capacity((to - from) as usize);
        // Cap at the length we fingerprinted; bytes appended mid-read are
        // picked up by the next poll.
        file.take(to - from).read_to_end(&mut buf)?;
        Ok(buf)
    }

    /// Push `bytes` through the fragment buffer and split off everything up
    /// to (and including) the last newline. Returns `None` when no complete
    /// line is available yet.
    fn take_complete_lines(&mut self, bytes: Vec<u8>) -> Option<Vec<u8>> {
        self.fragment.extend_from_slice(&bytes);
        let cut = self.fragment.iter().rposition(|&b| b == b'\n')? + 1;
        Some(self.fragment.drain(..cut).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fragment_buffers_until_newline() {
        let mut tail = TailReader::new("/nonexistent");
        assert_eq!(tail.take_complete_lines(b"partial".to_vec()), None);
        assert_eq!(
            tail.take_complete_lines(b" line\nnext".to_vec()),
            Some(b"partial line\n".to_vec())
        );
        assert_eq!(tail.fragment, b"next");
    }

    #[test]
    fn complete_batch_passes_through_whole() {
        let mut tail = TailReader::new("/nonexistent");
        assert_eq!(
            tail.take_complete_lines(b"a\nb\n".to_vec()),
            Some(b"a\nb\n".to_vec())
        );
        assert!(tail.fragment.is_empty());
    }

    #[test]
    fn missing_path_reports_missing() {
        let mut tail = TailReader::new("/definitely/not/a/real/Game.log");
        assert_eq!(tail.poll(), ReadResult::Missing);
    }

    #[test]
    fn growth_on_disk_is_read_from_the_stored_offset() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("Game.log");
        std::fs::write(&path, b"one\n").unwrap();

        let mut tail = TailReader::new(&path);
        assert_eq!(tail.poll(), ReadResult::Reset(b"one\n".to_vec()));

        std::fs::write(&path, b"one\ntwo\n").unwrap();
        assert_eq!(tail.poll(), ReadResult::Appended(b"two\n".to_vec()));
    }
}
