//! Per-type framing parameters.

use std::ops::Range;

use crate::error::{FrameError, Result};
use crate::header::{Header, CHECKSUM_SIZE, FRAME_OVERHEAD, TYPE_TAG_OFFSET};

/// Which bytes of a frame the checksum covers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ChecksumRange {
    /// Type tag through end of payload: `[3, N-4)`.
    FromTypeTag,
    /// Everything except the checksum itself: `[0, N-4)`.
    WholeFrame,
    /// `[start, N-trailer)`. `trailer` includes the checksum bytes.
    Span { start: usize, trailer: usize },
}

impl ChecksumRange {
    /// Resolve the covered byte range for a frame of `wire_size` bytes.
    pub fn bounds(&self, wire_size: usize) -> Option<Range<usize>> {
        let (start, trailer) = match *self {
            ChecksumRange::FromTypeTag => (TYPE_TAG_OFFSET, CHECKSUM_SIZE),
            ChecksumRange::WholeFrame => (0, CHECKSUM_SIZE),
            ChecksumRange::Span { start, trailer } => (start, trailer),
        };
        if trailer < CHECKSUM_SIZE {
            return None;
        }
        let end = wire_size.checked_sub(trailer)?;
        (start <= end).then_some(start..end)
    }
}

/// Byte order of the trailing checksum.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ChecksumOrder {
    /// Least significant byte first; `buf[N-1]` holds the MSB.
    LittleEndian,
    /// Most significant byte first.
    BigEndian,
}

impl ChecksumOrder {
    #[inline]
    pub fn to_bytes(self, value: u32) -> [u8; CHECKSUM_SIZE] {
        match self {
            ChecksumOrder::LittleEndian => value.to_le_bytes(),
            ChecksumOrder::BigEndian => value.to_be_bytes(),
        }
    }

    #[inline]
    pub fn from_bytes(self, bytes: [u8; CHECKSUM_SIZE]) -> u32 {
        match self {
            ChecksumOrder::LittleEndian => u32::from_le_bytes(bytes),
            ChecksumOrder::BigEndian => u32::from_be_bytes(bytes),
        }
    }
}

/// Framing parameters for one message type.
///
/// Descriptors are plain values so they can be declared as constants on
/// each message type and also loaded at runtime from a definition file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Descriptor {
    /// Type tag written to byte 3.
    pub type_tag: u8,
    /// Literal length bytes written to bytes 1-2.
    pub length: [u8; 2],
    /// Total frame size, header through checksum.
    pub wire_size: usize,
    pub checksum_range: ChecksumRange,
    pub checksum_order: ChecksumOrder,
}

impl Descriptor {
    /// Descriptor with the common checksum settings (type tag through
    /// payload, little-endian).
    pub const fn new(type_tag: u8, length: u16, payload_size: usize) -> Self {
        Self {
            type_tag,
            length: length.to_be_bytes(),
            wire_size: payload_size + FRAME_OVERHEAD,
            checksum_range: ChecksumRange::FromTypeTag,
            checksum_order: ChecksumOrder::LittleEndian,
        }
    }

    pub const fn with_checksum_range(mut self, range: ChecksumRange) -> Self {
        self.checksum_range = range;
        self
    }

    pub const fn with_checksum_order(mut self, order: ChecksumOrder) -> Self {
        self.checksum_order = order;
        self
    }

    /// The canonical header for this type.
    #[inline]
    pub fn header(&self) -> Header {
        Header::new(self.length, self.type_tag)
    }

    /// The length field as a single big-endian value.
    #[inline]
    pub fn length_value(&self) -> u16 {
        u16::from_be_bytes(self.length)
    }

    /// Payload size in bytes.
    #[inline]
    pub fn payload_size(&self) -> usize {
        self.wire_size.saturating_sub(FRAME_OVERHEAD)
    }

    /// Byte range covered by the checksum.
    pub fn checksum_bounds(&self) -> Result<Range<usize>> {
        if self.wire_size < FRAME_OVERHEAD {
            return Err(FrameError::InvalidDescriptor {
                type_tag: self.type_tag,
                reason: "wire size smaller than header and checksum",
            });
        }
        self.checksum_range
            .bounds(self.wire_size)
            .ok_or(FrameError::InvalidDescriptor {
                type_tag: self.type_tag,
                reason: "checksum range overlaps checksum or exceeds frame",
            })
    }

    /// Check that the descriptor describes a well-formed frame.
    pub fn validate(&self) -> Result<()> {
        self.checksum_bounds().map(|_| ())
    }

    /// Offset of the first checksum byte.
    #[inline]
    pub fn checksum_offset(&self) -> usize {
        self.wire_size - CHECKSUM_SIZE
    }
}

/// Resolves descriptors by type tag for dynamic dispatch.
pub trait DescriptorLookup {
    fn lookup(&self, type_tag: u8) -> Option<Descriptor>;
}

impl DescriptorLookup for [Descriptor] {
    fn lookup(&self, type_tag: u8) -> Option<Descriptor> {
        self.iter().find(|d| d.type_tag == type_tag).copied()
    }
}

impl<const N: usize> DescriptorLookup for [Descriptor; N] {
    fn lookup(&self, type_tag: u8) -> Option<Descriptor> {
        self.as_slice().lookup(type_tag)
    }
}

impl DescriptorLookup for Vec<Descriptor> {
    fn lookup(&self, type_tag: u8) -> Option<Descriptor> {
        self.as_slice().lookup(type_tag)
    }
}

impl<T: DescriptorLookup + ?Sized> DescriptorLookup for &T {
    fn lookup(&self, type_tag: u8) -> Option<Descriptor> {
        (**self).lookup(type_tag)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn from_type_tag_excludes_flag_length_and_checksum() {
        let d = Descriptor::new(7, 105, 105);
        assert_eq!(d.wire_size, 113);
        assert_eq!(d.checksum_bounds().unwrap(), 3..109);
        assert_eq!(d.checksum_bounds().unwrap().len(), d.wire_size - 7);
    }

    #[test]
    fn whole_frame_excludes_only_checksum() {
        let d = Descriptor::new(3, 1, 1).with_checksum_range(ChecksumRange::WholeFrame);
        assert_eq!(d.checksum_bounds().unwrap(), 0..5);
    }

    #[test]
    fn span_rejects_overlap_with_checksum() {
        let d = Descriptor::new(1, 4, 4).with_checksum_range(ChecksumRange::Span {
            start: 1,
            trailer: 2,
        });
        assert!(matches!(
            d.validate(),
            Err(FrameError::InvalidDescriptor { type_tag: 1, .. })
        ));
    }

    #[test]
    fn span_rejects_start_past_end() {
        let d = Descriptor::new(1, 0, 0).with_checksum_range(ChecksumRange::Span {
            start: 6,
            trailer: 4,
        });
        assert!(d.validate().is_err());
    }

    #[test]
    fn empty_payload_from_type_tag_covers_tag_only() {
        let d = Descriptor::new(9, 0, 0);
        assert_eq!(d.checksum_bounds().unwrap(), 3..4);
    }

    #[test]
    fn undersized_wire_size_is_invalid() {
        let d = Descriptor {
            wire_size: 6,
            ..Descriptor::new(2, 0, 0)
        };
        assert!(d.validate().is_err());
    }

    #[test]
    fn checksum_order_byte_placement() {
        let value = 0x1122_3344;
        assert_eq!(
            ChecksumOrder::LittleEndian.to_bytes(value),
            [0x44, 0x33, 0x22, 0x11]
        );
        assert_eq!(
            ChecksumOrder::BigEndian.to_bytes(value),
            [0x11, 0x22, 0x33, 0x44]
        );
        for order in [ChecksumOrder::LittleEndian, ChecksumOrder::BigEndian] {
            assert_eq!(order.from_bytes(order.to_bytes(value)), value);
        }
    }

    #[test]
    fn lookup_by_tag() {
        let table = [Descriptor::new(0, 64, 64), Descriptor::new(7, 105, 105)];
        assert_eq!(table.lookup(7).map(|d| d.wire_size), Some(113));
        assert!(table.lookup(4).is_none());
        let by_ref = &table;
        assert!(by_ref.lookup(0).is_some());
    }
}
