//! Format-sniffing input stream
//!
//! Wraps a byte source and pre-reads a fixed-size prefix at construction so
//! a format detector can inspect the head without consuming anything the
//! real parser will need. Reads drain the buffered prefix first and fall
//! through to the live source once it is exhausted. Closing releases the
//! source; any operation afterwards fails with a "stream closed" error.

use crate::Result;
use std::io::{self, Read};

/// Byte-stream decorator with a peekable buffered prefix
#[derive(Debug)]
pub struct SniffReader<R: Read> {
    source: Option<R>,
    prefix: Vec<u8>,
    pos: usize,
    closed: bool,
}

impl<R: Read> SniffReader<R> {
    /// Wrap `source`, buffering up to `sniff_len` bytes from its head
    ///
    /// Short sources yield a shorter prefix; that is not an error. A read
    /// failure during the pre-read surfaces as [`crate::OntographError::Io`].
    pub fn new(mut source: R, sniff_len: usize) -> Result<Self> {
        let mut prefix = vec![0u8; sniff_len];
        let mut filled = 0;
        while filled < sniff_len {
            let n = source.read(&mut prefix[filled..])?;
            if n == 0 {
                break;
            }
            filled += n;
        }
        prefix.truncate(filled);
        Ok(SniffReader {
            source: Some(source),
            prefix,
            pos: 0,
            closed: false,
        })
    }

    /// The buffered prefix, regardless of how much has been consumed
    ///
    /// Format detectors inspect this without affecting the read position.
    pub fn peeked(&self) -> &[u8] {
        &self.prefix
    }

    /// Bytes guaranteed readable without touching the live source
    pub fn available(&self) -> io::Result<usize> {
        self.check_open()?;
        Ok(self.prefix.len() - self.pos)
    }

    /// Discard up to `n` bytes, returning how many were discarded
    pub fn skip(&mut self, n: u64) -> io::Result<u64> {
        self.check_open()?;
        let mut remaining = n;
        let mut scratch = [0u8; 4096];
        while remaining > 0 {
            let want = remaining.min(scratch.len() as u64) as usize;
            let got = self.read(&mut scratch[..want])?;
            if got == 0 {
                break;
            }
            remaining -= got as u64;
        }
        Ok(n - remaining)
    }

    /// Release the live source; every later operation fails
    pub fn close(&mut self) {
        self.source = None;
        self.closed = true;
    }

    fn check_open(&self) -> io::Result<()> {
        if self.closed {
            Err(io::Error::new(
                io::ErrorKind::BrokenPipe,
                "stream closed",
            ))
        } else {
            Ok(())
        }
    }
}

impl<R: Read> Read for SniffReader<R> {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        self.check_open()?;
        if buf.is_empty() {
            return Ok(0);
        }

        // Buffered prefix first.
        if self.pos < self.prefix.len() {
            let take = buf.len().min(self.prefix.len() - self.pos);
            buf[..take].copy_from_slice(&self.prefix[self.pos..self.pos + take]);
            self.pos += take;
            return Ok(take);
        }

        match self.source.as_mut() {
            Some(source) => source.read(buf),
            None => Ok(0),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    fn reader(data: &[u8], sniff_len: usize) -> SniffReader<Cursor<Vec<u8>>> {
        SniffReader::new(Cursor::new(data.to_vec()), sniff_len).unwrap()
    }

    #[derive(Debug)]
    struct FailingSource;

    impl Read for FailingSource {
        fn read(&mut self, _buf: &mut [u8]) -> io::Result<usize> {
            Err(io::Error::new(io::ErrorKind::Other, "backing stream failed"))
        }
    }

    #[test]
    fn test_pre_read_failure_surfaces_as_crate_error() {
        let err = SniffReader::new(FailingSource, 8).unwrap_err();
        assert!(matches!(err, crate::OntographError::Io(_)));
    }

    #[test]
    fn test_peek_does_not_consume() {
        let mut r = reader(b"<?xml version=\"1.0\"?><rdf:RDF/>", 5);
        assert_eq!(r.peeked(), b"<?xml");

        let mut out = Vec::new();
        r.read_to_end(&mut out).unwrap();
        assert_eq!(out, b"<?xml version=\"1.0\"?><rdf:RDF/>");
    }

    #[test]
    fn test_short_source_yields_short_prefix() {
        let r = reader(b"abc", 16);
        assert_eq!(r.peeked(), b"abc");
        assert_eq!(r.available().unwrap(), 3);
    }

    #[test]
    fn test_reads_cross_prefix_boundary() {
        let mut r = reader(b"0123456789", 4);
        let mut buf = [0u8; 3];

        r.read_exact(&mut buf).unwrap();
        assert_eq!(&buf, b"012");
        assert_eq!(r.available().unwrap(), 1);

        // Next read serves the last buffered byte only.
        let n = r.read(&mut buf).unwrap();
        assert_eq!(n, 1);
        assert_eq!(buf[0], b'3');

        let mut rest = Vec::new();
        r.read_to_end(&mut rest).unwrap();
        assert_eq!(rest, b"456789");
    }

    #[test]
    fn test_skip_spans_prefix_and_source() {
        let mut r = reader(b"0123456789", 4);
        assert_eq!(r.skip(6).unwrap(), 6);

        let mut rest = Vec::new();
        r.read_to_end(&mut rest).unwrap();
        assert_eq!(rest, b"6789");

        // Skipping past the end reports the shortfall.
        let mut r = reader(b"01", 4);
        assert_eq!(r.skip(10).unwrap(), 2);
    }

    #[test]
    fn test_closed_stream_rejects_operations() {
        let mut r = reader(b"0123456789", 4);
        r.close();

        let mut buf = [0u8; 4];
        assert!(r.read(&mut buf).is_err());
        assert!(r.available().is_err());
        assert!(r.skip(1).is_err());
    }
}
