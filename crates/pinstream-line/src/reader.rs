use std::io::{ErrorKind, Read};

use bytes::BytesMut;
use pinstream_access::Level;
use tracing::trace;

use crate::codec::{decode_line, LineConfig};
use crate::error::{LineError, Result};

const INITIAL_BUFFER_CAPACITY: usize = 1024;
const READ_CHUNK_SIZE: usize = 1024;

/// Reads complete sample lines from any `Read` stream.
///
/// This is the consumer side of the format. Handles partial reads
/// internally; callers always get whole sweeps.
pub struct LineReader<T> {
    inner: T,
    buf: BytesMut,
    config: LineConfig,
}

impl<T: Read> LineReader<T> {
    /// Create a new line reader accepting any column count.
    pub fn new(inner: T) -> Self {
        Self::with_config(inner, LineConfig::default())
    }

    /// Create a new line reader with explicit configuration.
    pub fn with_config(inner: T, config: LineConfig) -> Self {
        Self {
            inner,
            buf: BytesMut::with_capacity(INITIAL_BUFFER_CAPACITY),
            config,
        }
    }

    /// Read the next complete sweep (blocking).
    ///
    /// Returns `Ok(None)` at a clean end of stream and
    /// `Err(LineError::Truncated)` if the stream ends inside a line, which
    /// happens when the producer is killed mid-write.
    pub fn read_sweep(&mut self) -> Result<Option<Vec<Level>>> {
        loop {
            if let Some(sweep) = decode_line(&mut self.buf, &self.config)? {
                trace!(columns = sweep.len(), "sweep decoded");
                return Ok(Some(sweep));
            }

            let mut chunk = [0u8; READ_CHUNK_SIZE];
            let read = match self.inner.read(&mut chunk) {
                Ok(n) => n,
                Err(err) if err.kind() == ErrorKind::Interrupted => continue,
                Err(err) => return Err(LineError::Io(err)),
            };

            if read == 0 {
                if self.buf.is_empty() {
                    return Ok(None);
                }
                let pending = self.buf.len();
                self.buf.clear();
                return Err(LineError::Truncated(pending));
            }

            self.buf.extend_from_slice(&chunk[..read]);
        }
    }

    /// Borrow the underlying stream.
    pub fn get_ref(&self) -> &T {
        &self.inner
    }

    /// Consume the reader and return the inner stream.
    pub fn into_inner(self) -> T {
        self.inner
    }

    /// Current line reader configuration.
    pub fn config(&self) -> &LineConfig {
        &self.config
    }
}

impl<T: Read> Iterator for LineReader<T> {
    type Item = Result<Vec<Level>>;

    fn next(&mut self) -> Option<Self::Item> {
        self.read_sweep().transpose()
    }
}
