//! Byte-counting writer.

use std::io::{self, Write};

/// A writer that knows how much writing it did.
///
/// Bytes pass through to the inner writer unchanged; the count is only used
/// to notice a generator that had nothing to emit.
pub struct CountingWriter<W> {
    inner: W,
    count: usize,
}

impl<W: Write> CountingWriter<W> {
    pub fn new(inner: W) -> Self {
        Self { inner, count: 0 }
    }

    /// Bytes accepted by the inner writer so far.
    pub fn count(&self) -> usize {
        self.count
    }

    pub fn into_inner(self) -> W {
        self.inner
    }
}

impl<W: Write> Write for CountingWriter<W> {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        let n = self.inner.write(buf)?;
        self.count += n;
        Ok(n)
    }

    fn flush(&mut self) -> io::Result<()> {
        self.inner.flush()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_counts_and_passes_through() {
        let mut out = Vec::new();
        let mut writer = CountingWriter::new(&mut out);
        writer.write_all(b"hello").unwrap();
        write!(writer, " {}", 42).unwrap();

        assert_eq!(writer.count(), 8);
        assert_eq!(out, b"hello 42");
    }

    #[test]
    fn test_nothing_written() {
        let mut out = Vec::new();
        let writer = CountingWriter::new(&mut out);
        assert_eq!(writer.count(), 0);
    }

    #[test]
    fn test_through_dyn_writer() {
        let mut out: Vec<u8> = b"prefix".to_vec();
        let sink: &mut dyn Write = &mut out;
        let mut writer = CountingWriter::new(sink);
        writer.write_all(b"abc").unwrap();

        assert_eq!(writer.count(), 3);
        assert_eq!(out, b"prefixabc");
    }
}
