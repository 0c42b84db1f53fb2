use std::io::{ErrorKind, Read};

use bytes::{Buf, BytesMut};

use crate::codec::FrameConfig;
use crate::descriptor::DescriptorLookup;
use crate::error::{FrameError, Result};
use crate::raw::{scan_frame, RawFrame};

const INITIAL_BUFFER_CAPACITY: usize = 1024;
const READ_CHUNK_SIZE: usize = 512;

/// Reads verified frames from any `Read` stream.
///
/// Handles partial reads and line noise internally. Callers always get
/// complete frames whose checksum matched.
pub struct FrameReader<T, L> {
    inner: T,
    lookup: L,
    buf: BytesMut,
    config: FrameConfig,
}

impl<T: Read, L: DescriptorLookup> FrameReader<T, L> {
    /// Create a new frame reader with default configuration.
    pub fn new(inner: T, lookup: L) -> Self {
        Self::with_config(inner, lookup, FrameConfig::default())
    }

    /// Create a new frame reader with explicit configuration.
    pub fn with_config(inner: T, lookup: L, config: FrameConfig) -> Self {
        Self {
            inner,
            lookup,
            buf: BytesMut::with_capacity(INITIAL_BUFFER_CAPACITY),
            config,
        }
    }

    /// Read the next verified frame (blocking).
    ///
    /// Returns `Err(FrameError::ConnectionClosed)` when EOF is reached.
    pub fn read_frame(&mut self) -> Result<RawFrame> {
        loop {
            if let Some(frame) = scan_frame(&mut self.buf, &self.lookup, &self.config)? {
                return Ok(frame);
            }

            let mut chunk = [0u8; READ_CHUNK_SIZE];
            let read = match self.inner.read(&mut chunk) {
                Ok(n) => n,
                Err(err) if err.kind() == ErrorKind::Interrupted => continue,
                Err(err) => return Err(FrameError::Io(err)),
            };

            if read == 0 {
                if let Some(frame) = self.drain_at_eof()? {
                    return Ok(frame);
                }
                return Err(FrameError::ConnectionClosed);
            }

            self.buf.extend_from_slice(&chunk[..read]);
        }
    }

    /// At EOF a pending candidate can never complete. When resynchronizing,
    /// drop its flag byte and rescan so complete frames queued behind a
    /// spurious start flag are still delivered.
    fn drain_at_eof(&mut self) -> Result<Option<RawFrame>> {
        if !self.config.resync {
            return Ok(None);
        }
        while !self.buf.is_empty() {
            tracing::debug!(
                buffered = self.buf.len(),
                "dropping incomplete frame candidate at end of stream"
            );
            self.buf.advance(1);
            if let Some(frame) = scan_frame(&mut self.buf, &self.lookup, &self.config)? {
                return Ok(Some(frame));
            }
        }
        Ok(None)
    }

    /// Bytes received but not yet consumed as a frame.
    pub fn buffered(&self) -> usize {
        self.buf.len()
    }

    /// Borrow the underlying stream.
    pub fn get_ref(&self) -> &T {
        &self.inner
    }

    /// Mutably borrow the underlying stream.
    pub fn get_mut(&mut self) -> &mut T {
        &mut self.inner
    }

    /// Consume the reader and return the inner stream.
    pub fn into_inner(self) -> T {
        self.inner
    }

    /// Current frame reader configuration.
    pub fn config(&self) -> &FrameConfig {
        &self.config
    }

    /// The descriptor table used to resolve type tags.
    pub fn lookup(&self) -> &L {
        &self.lookup
    }
}

impl<T: Read, L: DescriptorLookup> Iterator for FrameReader<T, L> {
    type Item = Result<RawFrame>;

    /// Yields frames until the stream closes cleanly.
    fn next(&mut self) -> Option<Self::Item> {
        match self.read_frame() {
            Ok(frame) => Some(Ok(frame)),
            Err(FrameError::ConnectionClosed) => None,
            Err(err) => Some(Err(err)),
        }
    }
}
