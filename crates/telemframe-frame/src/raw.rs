use bytes::{Buf, Bytes, BytesMut};

use crate::codec::{decode, read_checksum, verify, FrameConfig, Message, Record};
use crate::descriptor::{Descriptor, DescriptorLookup};
use crate::error::{FrameError, Result};
use crate::header::{Header, HEADER_SIZE, START_FLAG, TYPE_TAG_OFFSET};

/// A complete, checksum-verified frame whose type is known only at runtime.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawFrame {
    descriptor: Descriptor,
    bytes: Bytes,
}

impl RawFrame {
    /// Verify `src` against `descriptor` and copy the frame bytes.
    pub fn from_slice(descriptor: Descriptor, src: &[u8]) -> Result<Self> {
        let frame = verify(&descriptor, src)?;
        Ok(Self {
            descriptor,
            bytes: Bytes::copy_from_slice(frame),
        })
    }

    pub fn descriptor(&self) -> &Descriptor {
        &self.descriptor
    }

    pub fn header(&self) -> Header {
        Header {
            flag: self.bytes[0],
            length: [self.bytes[1], self.bytes[2]],
            type_tag: self.bytes[TYPE_TAG_OFFSET],
        }
    }

    pub fn type_tag(&self) -> u8 {
        self.bytes[TYPE_TAG_OFFSET]
    }

    /// Payload bytes between header and checksum.
    pub fn payload(&self) -> &[u8] {
        &self.bytes[HEADER_SIZE..self.descriptor.checksum_offset()]
    }

    /// The transmitted (and verified) checksum.
    pub fn checksum(&self) -> u32 {
        read_checksum(&self.descriptor, &self.bytes)
    }

    /// The whole frame, header through checksum.
    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }

    pub fn wire_size(&self) -> usize {
        self.bytes.len()
    }

    /// Decode into a concrete message type.
    ///
    /// Fails with [`FrameError::TypeMismatch`] if the frame carries a
    /// different type tag.
    pub fn decode<M: Message>(&self) -> Result<Record<M>> {
        if self.type_tag() != M::TYPE_TAG {
            return Err(FrameError::TypeMismatch {
                expected: M::TYPE_TAG,
                found: self.type_tag(),
            });
        }
        decode(&self.bytes)
    }
}

/// Peek the type tag of a frame without verifying it.
pub fn peek_type(src: &[u8]) -> Option<u8> {
    src.get(TYPE_TAG_OFFSET).copied()
}

/// Extract the next verified frame from a byte stream buffer.
///
/// Returns `Ok(None)` if the buffer doesn't contain a complete frame yet.
/// On success, consumes the frame bytes from the buffer. Bytes before the
/// first start flag are discarded.
///
/// A candidate that fails validation (unknown type tag, oversized
/// descriptor, checksum mismatch) has its flag byte consumed. With
/// `config.resync` the scan continues at the next start flag; otherwise
/// the error is returned and the next call resumes after that byte.
pub fn scan_frame<L>(
    src: &mut BytesMut,
    lookup: &L,
    config: &FrameConfig,
) -> Result<Option<RawFrame>>
where
    L: DescriptorLookup + ?Sized,
{
    loop {
        match src.iter().position(|&b| b == START_FLAG) {
            Some(0) => {}
            Some(skip) => {
                if !config.resync {
                    let found = src[0];
                    src.advance(skip);
                    return Err(FrameError::InvalidStartFlag(found));
                }
                tracing::debug!(dropped = skip, "discarding bytes before start flag");
                src.advance(skip);
            }
            None => {
                if !src.is_empty() {
                    tracing::debug!(
                        dropped = src.len(),
                        "discarding bytes without start flag"
                    );
                    let found = src[0];
                    src.clear();
                    if !config.resync {
                        return Err(FrameError::InvalidStartFlag(found));
                    }
                }
                return Ok(None);
            }
        }

        if src.len() < HEADER_SIZE {
            return Ok(None); // Need more data
        }

        let type_tag = src[TYPE_TAG_OFFSET];
        let descriptor = match lookup.lookup(type_tag) {
            Some(descriptor) => descriptor,
            None => {
                reject(src, config, FrameError::UnknownType(type_tag))?;
                continue;
            }
        };

        if descriptor.wire_size > config.max_frame_size {
            let err = FrameError::FrameTooLarge {
                size: descriptor.wire_size,
                max: config.max_frame_size,
            };
            reject(src, config, err)?;
            continue;
        }

        let total = descriptor.wire_size;
        if src.len() < total {
            src.reserve(total - src.len());
            return Ok(None); // Need more data
        }

        match verify(&descriptor, &src[..total]) {
            Ok(_) => {
                let bytes = src.split_to(total).freeze();
                tracing::debug!(type_tag, size = total, "frame received");
                return Ok(Some(RawFrame { descriptor, bytes }));
            }
            Err(err) => {
                reject(src, config, err)?;
                continue;
            }
        }
    }
}

/// Drop the candidate's flag byte; surface `err` unless resynchronizing.
fn reject(src: &mut BytesMut, config: &FrameConfig, err: FrameError) -> Result<()> {
    src.advance(1);
    if config.resync {
        tracing::warn!(error = %err, "dropping corrupt frame candidate");
        return Ok(());
    }
    Err(err)
}
