use std::io::{ErrorKind, Write};

use bytes::BytesMut;
use pinstream_access::Level;

use crate::codec::encode_line;
use crate::error::{LineError, Result};

const INITIAL_BUFFER_CAPACITY: usize = 256;

/// Writes complete sample lines to any `Write` stream.
///
/// Every line is flushed as soon as it is written; downstream consumers read
/// line by line and must never wait on a buffer.
pub struct LineWriter<T> {
    inner: T,
    buf: BytesMut,
    lines_written: u64,
}

impl<T: Write> LineWriter<T> {
    pub fn new(inner: T) -> Self {
        Self {
            inner,
            buf: BytesMut::with_capacity(INITIAL_BUFFER_CAPACITY),
            lines_written: 0,
        }
    }

    /// Encode, write, and flush one sweep (blocking).
    ///
    /// The whole line is handed to the stream before flushing, so a line is
    /// only ever cut short by process termination.
    pub fn write_sweep(&mut self, samples: &[Level]) -> Result<()> {
        self.buf.clear();
        encode_line(samples, &mut self.buf);

        let mut offset = 0usize;
        while offset < self.buf.len() {
            match self.inner.write(&self.buf[offset..]) {
                Ok(0) => {
                    return Err(LineError::Io(std::io::Error::new(
                        ErrorKind::WriteZero,
                        "output stream closed",
                    )))
                }
                Ok(n) => offset += n,
                Err(err) if err.kind() == ErrorKind::Interrupted => continue,
                Err(err) => return Err(LineError::Io(err)),
            }
        }

        self.flush()?;
        self.lines_written = self.lines_written.saturating_add(1);
        Ok(())
    }

    /// Flush the underlying stream.
    pub fn flush(&mut self) -> Result<()> {
        loop {
            match self.inner.flush() {
                Ok(()) => return Ok(()),
                Err(err) if err.kind() == ErrorKind::Interrupted => continue,
                Err(err) => return Err(LineError::Io(err)),
            }
        }
    }

    /// Number of complete lines written so far.
    pub fn lines_written(&self) -> u64 {
        self.lines_written
    }

    /// Borrow the underlying stream.
    pub fn get_ref(&self) -> &T {
        &self.inner
    }

    /// Mutably borrow the underlying stream.
    pub fn get_mut(&mut self) -> &mut T {
        &mut self.inner
    }

    /// Consume the writer and return the inner stream.
    pub fn into_inner(self) -> T {
        self.inner
    }
}

#[cfg(test)]
mod tests {
    use std::io;

    use super::*;

    use Level::{High, Low};

    /// Accepts a few bytes per call and counts flushes.
    struct Trickle {
        data: Vec<u8>,
        chunk: usize,
        flushes: usize,
        interrupt_next: bool,
    }

    impl Write for Trickle {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            if self.interrupt_next {
                self.interrupt_next = false;
                return Err(io::Error::from(ErrorKind::Interrupted));
            }
            let n = buf.len().min(self.chunk);
            self.data.extend_from_slice(&buf[..n]);
            Ok(n)
        }

        fn flush(&mut self) -> io::Result<()> {
            self.flushes += 1;
            Ok(())
        }
    }

    struct Closed;

    impl Write for Closed {
        fn write(&mut self, _buf: &[u8]) -> io::Result<usize> {
            Err(io::Error::from(ErrorKind::BrokenPipe))
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    #[test]
    fn writes_each_sweep_as_one_line() {
        let mut writer = LineWriter::new(Vec::new());
        writer.write_sweep(&[High, Low, High]).unwrap();
        writer.write_sweep(&[Low, Low, Low]).unwrap();

        assert_eq!(writer.lines_written(), 2);
        assert_eq!(writer.into_inner(), b"1,0,1\n0,0,0\n");
    }

    #[test]
    fn partial_writes_and_interrupts_complete_the_line() {
        let sink = Trickle {
            data: Vec::new(),
            chunk: 2,
            flushes: 0,
            interrupt_next: true,
        };
        let mut writer = LineWriter::new(sink);
        writer.write_sweep(&[High; 5]).unwrap();

        let sink = writer.into_inner();
        assert_eq!(sink.data, b"1,1,1,1,1\n");
        assert_eq!(sink.flushes, 1);
    }

    #[test]
    fn flushes_once_per_line() {
        let sink = Trickle {
            data: Vec::new(),
            chunk: 64,
            flushes: 0,
            interrupt_next: false,
        };
        let mut writer = LineWriter::new(sink);
        for _ in 0..3 {
            writer.write_sweep(&[]).unwrap();
        }
        assert_eq!(writer.get_ref().flushes, 3);
        assert_eq!(writer.get_ref().data, b"\n\n\n");
    }

    #[test]
    fn broken_pipe_is_reported() {
        let mut writer = LineWriter::new(Closed);
        let err = writer.write_sweep(&[High]).unwrap_err();
        assert!(matches!(err, LineError::Io(ref io) if io.kind() == ErrorKind::BrokenPipe));
        assert_eq!(writer.lines_written(), 0);
    }
}
