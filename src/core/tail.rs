// LogMon - core/tail.rs
//
// Backward tail reader: returns the last N lines of a file without scanning
// it from the start.
//
// Algorithm:
//   1. Look at the final byte. If it is not '\n' the unterminated trailing
//      line is the line being counted as zero, so one fewer newline is needed.
//   2. Walk backwards in chunks of `buffer` bytes (clamped to the current
//      position), prepending each chunk and subtracting its newline count
//      from the remaining line budget, until the budget drops below zero or
//      the start of the file is reached.
//   3. Chunk boundaries rarely line up with line boundaries, so any surplus
//      leading lines are stripped one newline at a time.
//   4. The bytes are decoded (lossy UTF-8) only once the whole tail has been
//      assembled, so multi-byte characters split across chunks survive, and
//      the result is trimmed.
//
// All position arithmetic is in raw bytes. The file handle is owned by the
// caller's scope and closed on every exit path, including `?` returns.

use crate::util::constants::{
    LARGE_TAIL_BUFFER, MEDIUM_BUFFER_LINE_THRESHOLD, MEDIUM_TAIL_BUFFER,
    SMALL_BUFFER_LINE_THRESHOLD, SMALL_TAIL_BUFFER,
};
use crate::util::error::TailError;
use std::fs::File;
use std::io::{self, Read, Seek, SeekFrom};
use std::path::Path;

/// How the read buffer size is chosen for a tail read.
///
/// Any size produces the same result; the adaptive sizes only keep the
/// number of bytes read close to what a small line count needs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BufferStrategy {
    /// 64 bytes for a single line, 512 for fewer than ten, 4096 otherwise.
    #[default]
    Adaptive,
    /// Always use this many bytes (values below 1 are treated as 1).
    Fixed(usize),
}

impl BufferStrategy {
    /// Buffer size in bytes for a read of `line_count` lines.
    pub fn buffer_size(self, line_count: usize) -> usize {
        match self {
            Self::Adaptive => {
                if line_count < SMALL_BUFFER_LINE_THRESHOLD {
                    SMALL_TAIL_BUFFER
                } else if line_count < MEDIUM_BUFFER_LINE_THRESHOLD {
                    MEDIUM_TAIL_BUFFER
                } else {
                    LARGE_TAIL_BUFFER
                }
            }
            Self::Fixed(size) => size.max(1),
        }
    }

    /// The non-adaptive strategy: a fixed large buffer.
    pub fn fixed_large() -> Self {
        Self::Fixed(LARGE_TAIL_BUFFER)
    }
}

/// Read the last `line_count` lines of the file at `path`.
///
/// Returns `TailError::NotFound` if the file cannot be opened, which callers
/// must keep distinct from an empty file (an empty string).
pub fn tail_file(
    path: &Path,
    line_count: usize,
    strategy: BufferStrategy,
) -> Result<String, TailError> {
    let mut file = File::open(path).map_err(|e| TailError::NotFound {
        path: path.to_path_buf(),
        source: e,
    })?;

    let tail = tail_reader(&mut file, line_count, strategy).map_err(|e| TailError::Io {
        path: path.to_path_buf(),
        source: e,
    })?;

    tracing::trace!(
        file = %path.display(),
        line_count,
        bytes = tail.len(),
        "Tail read complete"
    );
    Ok(tail)
}

/// Read the last `line_count` lines from any seekable byte source.
pub fn tail_reader<R: Read + Seek>(
    reader: &mut R,
    line_count: usize,
    strategy: BufferStrategy,
) -> io::Result<String> {
    let buffer = strategy.buffer_size(line_count);
    let bytes = tail_bytes(reader, line_count, buffer)?;
    Ok(String::from_utf8_lossy(&bytes).trim().to_string())
}

/// Core backward scan. Returns the raw (untrimmed) tail bytes.
fn tail_bytes<R: Read + Seek>(
    reader: &mut R,
    line_count: usize,
    buffer: usize,
) -> io::Result<Vec<u8>> {
    let len = reader.seek(SeekFrom::End(0))?;
    if len == 0 {
        return Ok(Vec::new());
    }

    let mut remaining = i64::try_from(line_count).unwrap_or(i64::MAX);

    reader.seek(SeekFrom::End(-1))?;
    let mut last = [0u8; 1];
    reader.read_exact(&mut last)?;
    if last[0] != b'\n' {
        remaining -= 1;
    }

    // Chunks are collected newest-first and reversed once at the end, which
    // avoids re-copying the accumulated output on every prepend.
    let mut chunks: Vec<Vec<u8>> = Vec::new();
    let mut position = len;

    while position > 0 && remaining >= 0 {
        // `min` against `position` keeps the jump inside the file; the
        // narrowing is safe because `buffer` itself fits in usize.
        let seek = position.min(buffer as u64);
        position -= seek;
        reader.seek(SeekFrom::Start(position))?;

        let mut chunk = vec![0u8; seek as usize];
        reader.read_exact(&mut chunk)?;

        // Step back over what was just read so the next jump starts from
        // the beginning of this chunk.
        reader.seek(SeekFrom::Current(-(chunk.len() as i64)))?;

        remaining -= count_newlines(&chunk) as i64;
        chunks.push(chunk);
    }

    let mut output: Vec<u8> = chunks.into_iter().rev().flatten().collect();

    // Drop surplus leading lines picked up by the last chunk.
    while remaining < 0 {
        match output.iter().position(|&b| b == b'\n') {
            Some(idx) => {
                output.drain(..=idx);
            }
            None => break,
        }
        remaining += 1;
    }

    Ok(output)
}

fn count_newlines(bytes: &[u8]) -> usize {
    bytes.iter().filter(|&&b| b == b'\n').count()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    /// Naive reference: read everything, keep the last N lines.
    fn reference_tail(content: &str, n: usize) -> String {
        let lines: Vec<&str> = content.trim_end_matches('\n').split('\n').collect();
        let start = lines.len().saturating_sub(n);
        lines[start..].join("\n").trim().to_string()
    }

    fn tail_str(content: &str, n: usize, strategy: BufferStrategy) -> String {
        let mut cursor = Cursor::new(content.as_bytes().to_vec());
        tail_reader(&mut cursor, n, strategy).unwrap()
    }

    /// Seekable source whose `read` fails from the `fail_on`-th call onwards.
    struct FailingReader {
        inner: Cursor<Vec<u8>>,
        reads: usize,
        fail_on: usize,
    }

    impl Read for FailingReader {
        fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
            self.reads += 1;
            if self.reads >= self.fail_on {
                return Err(io::Error::new(io::ErrorKind::Other, "disk went away"));
            }
            self.inner.read(buf)
        }
    }

    impl Seek for FailingReader {
        fn seek(&mut self, pos: SeekFrom) -> io::Result<u64> {
            self.inner.seek(pos)
        }
    }

    fn numbered_lines(count: usize) -> String {
        (1..=count)
            .map(|i| format!("2024-03-01 12:00:{:02} INFO line number {i}\n", i % 60))
            .collect()
    }

    #[test]
    fn test_adaptive_buffer_sizes() {
        assert_eq!(BufferStrategy::Adaptive.buffer_size(1), 64);
        assert_eq!(BufferStrategy::Adaptive.buffer_size(2), 512);
        assert_eq!(BufferStrategy::Adaptive.buffer_size(9), 512);
        assert_eq!(BufferStrategy::Adaptive.buffer_size(10), 4096);
        assert_eq!(BufferStrategy::Adaptive.buffer_size(200), 4096);
        assert_eq!(BufferStrategy::Fixed(0).buffer_size(5), 1);
        assert_eq!(BufferStrategy::fixed_large().buffer_size(1), 4096);
    }

    #[test]
    fn test_last_n_lines_with_trailing_newline() {
        let content = "a\nb\nc\n";
        assert_eq!(tail_str(content, 2, BufferStrategy::Adaptive), "b\nc");
        assert_eq!(tail_str(content, 1, BufferStrategy::Adaptive), "c");
    }

    #[test]
    fn test_last_n_lines_without_trailing_newline() {
        let content = "a\nb\nc";
        assert_eq!(tail_str(content, 2, BufferStrategy::Adaptive), "b\nc");
        assert_eq!(tail_str(content, 1, BufferStrategy::Adaptive), "c");
    }

    #[test]
    fn test_more_lines_than_file_returns_everything() {
        let content = "first\nsecond\n";
        assert_eq!(
            tail_str(content, 50, BufferStrategy::Adaptive),
            "first\nsecond"
        );
    }

    #[test]
    fn test_empty_source_returns_empty_string() {
        for n in [1, 2, 10, 500] {
            assert_eq!(tail_str("", n, BufferStrategy::Adaptive), "");
        }
    }

    #[test]
    fn test_matches_reference_for_many_line_counts() {
        let content = numbered_lines(300);
        for n in [1, 2, 5, 9, 10, 11, 99, 100, 200, 299, 300] {
            assert_eq!(
                tail_str(&content, n, BufferStrategy::Adaptive),
                reference_tail(&content, n),
                "line count {n}"
            );
        }
    }

    #[test]
    fn test_buffer_size_invariance() {
        let content = numbered_lines(120);
        for n in [1, 3, 10, 50, 120, 400] {
            let expected = reference_tail(&content, n);
            for size in [1, 64, 4096] {
                assert_eq!(
                    tail_str(&content, n, BufferStrategy::Fixed(size)),
                    expected,
                    "line count {n}, buffer {size}"
                );
            }
        }
    }

    #[test]
    fn test_multibyte_utf8_split_across_chunks() {
        let content = "début\nérreur ünïcödé ✓\nfin — terminé\n";
        for size in [1, 2, 3, 7, 64] {
            assert_eq!(
                tail_str(content, 2, BufferStrategy::Fixed(size)),
                "érreur ünïcödé ✓\nfin — terminé",
                "buffer {size}"
            );
        }
    }

    #[test]
    fn test_crlf_line_endings() {
        let content = "one\r\ntwo\r\nthree\r\n";
        assert_eq!(
            tail_str(content, 2, BufferStrategy::Fixed(4)),
            "two\r\nthree"
        );
    }

    #[test]
    fn test_zero_line_count_reads_no_full_lines() {
        assert_eq!(tail_str("a\nb\n", 0, BufferStrategy::Fixed(1)), "");
        assert_eq!(tail_str("a\nb", 0, BufferStrategy::Fixed(1)), "");
    }

    #[test]
    fn test_file_smaller_than_buffer_needs_one_read() {
        let content = "tiny\n";
        assert_eq!(tail_str(content, 3, BufferStrategy::fixed_large()), "tiny");
    }

    #[test]
    fn test_read_failure_on_later_chunk_is_an_error() {
        // Read 1 is the final byte, read 2 the first chunk, read 3 the second.
        let mut reader = FailingReader {
            inner: Cursor::new(b"aaaa\nbbbb\ncccc\n".to_vec()),
            reads: 0,
            fail_on: 3,
        };
        let err = tail_reader(&mut reader, 2, BufferStrategy::Fixed(4)).unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::Other);
        assert_eq!(reader.reads, 3);
    }

    #[cfg(target_os = "linux")]
    #[test]
    fn test_directory_fails_mid_read_not_on_open() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("inside.log"), "x\n").unwrap();

        let err = tail_file(dir.path(), 10, BufferStrategy::Adaptive).unwrap_err();
        assert!(matches!(err, TailError::Io { .. }), "got {err:?}");
        assert_eq!(err.path(), dir.path());
    }

    #[test]
    fn test_missing_file_is_not_found() {
        let result = tail_file(
            Path::new("/nonexistent/logmon-tail-test.log"),
            10,
            BufferStrategy::Adaptive,
        );
        assert!(matches!(result, Err(TailError::NotFound { .. })));
    }
}
