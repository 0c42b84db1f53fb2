use std::io::{ErrorKind, Write};

use bytes::BytesMut;

use crate::codec::{encode, Message};
use crate::error::{FrameError, Result};
use crate::raw::RawFrame;

const INITIAL_BUFFER_CAPACITY: usize = 256;

/// Writes complete frames to any `Write` stream.
pub struct FrameWriter<T> {
    inner: T,
    buf: BytesMut,
}

impl<T: Write> FrameWriter<T> {
    /// Create a new frame writer.
    pub fn new(inner: T) -> Self {
        Self {
            inner,
            buf: BytesMut::with_capacity(INITIAL_BUFFER_CAPACITY),
        }
    }

    /// Encode and send a message (blocking). Returns the frame size.
    pub fn send<M: Message>(&mut self, message: &M) -> Result<usize> {
        self.buf.clear();
        self.buf.resize(M::WIRE_SIZE, 0);
        let size = encode(message, &mut self.buf)?;

        write_all(&mut self.inner, &self.buf[..size])?;
        self.flush()?;
        Ok(size)
    }

    /// Forward an already verified frame unchanged.
    pub fn write_raw(&mut self, frame: &RawFrame) -> Result<()> {
        write_all(&mut self.inner, frame.as_bytes())?;
        self.flush()
    }

    /// Flush the underlying stream.
    pub fn flush(&mut self) -> Result<()> {
        loop {
            match self.inner.flush() {
                Ok(()) => return Ok(()),
                Err(err) if err.kind() == ErrorKind::Interrupted => continue,
                Err(err) if err.kind() == ErrorKind::WouldBlock => continue,
                Err(err) => return Err(FrameError::Io(err)),
            }
        }
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

fn write_all<T: Write>(inner: &mut T, bytes: &[u8]) -> Result<()> {
    let mut offset = 0usize;
    while offset < bytes.len() {
        match inner.write(&bytes[offset..]) {
            Ok(0) => return Err(FrameError::ConnectionClosed),
            Ok(n) => offset += n,
            Err(err) if err.kind() == ErrorKind::Interrupted => continue,
            Err(err) if err.kind() == ErrorKind::WouldBlock => continue,
            Err(err) => return Err(FrameError::Io(err)),
        }
    }
    Ok(())
}
