//! Frame header.

use bytes::{Buf, BufMut};

use crate::layout::WireLayout;

/// Sentinel byte marking the start of every frame.
pub const START_FLAG: u8 = 0x7E;

/// Header size in bytes: flag (1) + length (2) + type (1).
pub const HEADER_SIZE: usize = 4;

/// Trailing checksum size in bytes.
pub const CHECKSUM_SIZE: usize = 4;

/// Bytes every frame carries in addition to its payload.
pub const FRAME_OVERHEAD: usize = HEADER_SIZE + CHECKSUM_SIZE;

/// Offset of the type tag within a frame.
pub const TYPE_TAG_OFFSET: usize = 3;

/// Leading four bytes of every frame.
///
/// Layout:
/// ```text
/// Offset  Size  Field
/// 0       1     flag (0x7E)
/// 1       2     length (high byte, low byte)
/// 3       1     type tag
/// ```
///
/// `length` is a per-type protocol constant. It is carried verbatim and is
/// not required to match the real payload size.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Header {
    pub flag: u8,
    pub length: [u8; 2],
    pub type_tag: u8,
}

impl Header {
    /// Canonical header for a type.
    #[inline]
    pub const fn new(length: [u8; 2], type_tag: u8) -> Self {
        Self {
            flag: START_FLAG,
            length,
            type_tag,
        }
    }

    /// The length field as a single big-endian value.
    #[inline]
    pub fn length_value(&self) -> u16 {
        u16::from_be_bytes(self.length)
    }

    /// True if the flag byte is the frame start sentinel.
    #[inline]
    pub fn has_start_flag(&self) -> bool {
        self.flag == START_FLAG
    }

    /// Serialize header to bytes.
    #[inline]
    pub fn to_bytes(&self) -> [u8; HEADER_SIZE] {
        [self.flag, self.length[0], self.length[1], self.type_tag]
    }

    /// Parse header from bytes.
    ///
    /// Returns `None` if buffer is too small.
    #[inline]
    pub fn from_bytes(buf: &[u8]) -> Option<Self> {
        if buf.len() < HEADER_SIZE {
            return None;
        }
        Some(Self {
            flag: buf[0],
            length: [buf[1], buf[2]],
            type_tag: buf[3],
        })
    }
}

impl WireLayout for Header {
    const SIZE: usize = HEADER_SIZE;

    fn put<B: BufMut>(&self, dst: &mut B) {
        dst.put_slice(&self.to_bytes());
    }

    fn get<B: Buf>(src: &mut B) -> Self {
        let flag = src.get_u8();
        let length = [src.get_u8(), src.get_u8()];
        let type_tag = src.get_u8();
        Self {
            flag,
            length,
            type_tag,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_header_roundtrip() {
        let header = Header::new([0x00, 0x69], 7);
        let bytes = header.to_bytes();
        assert_eq!(bytes, [0x7E, 0x00, 0x69, 0x07]);
        assert_eq!(Header::from_bytes(&bytes), Some(header));
    }

    #[test]
    fn test_from_bytes_too_short() {
        assert_eq!(Header::from_bytes(&[0x7E, 0x00, 0x01]), None);
    }

    #[test]
    fn test_length_value_is_big_endian() {
        let header = Header::new([0x01, 0x02], 0);
        assert_eq!(header.length_value(), 0x0102);
    }

    #[test]
    fn test_default_header_has_no_start_flag() {
        assert!(!Header::default().has_start_flag());
        assert!(Header::new([0, 1], 3).has_start_flag());
    }
}
