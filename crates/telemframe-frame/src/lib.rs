//! Fixed-layout telemetry framing with per-type CRC-32 validation.
//!
//! Every message travels as one fixed-size frame:
//! - A 1-byte start flag (`0x7E`)
//! - A 2-byte per-type length constant
//! - A 1-byte type tag
//! - The message fields, big-endian, in declaration order
//! - A 4-byte CRC-32 over a per-type byte range, in a per-type byte order
//!
//! One generic codec serves every message type: the type's [`Descriptor`]
//! carries all per-type framing constants. Encoding and decoding work on
//! caller-owned byte slices and never allocate.

pub mod checksum;
pub mod codec;
pub mod descriptor;
pub mod error;
pub mod header;
pub mod layout;
pub mod raw;
pub mod reader;
pub mod writer;

#[cfg(test)]
mod test_support;

#[doc(hidden)]
pub use bytes;

pub use checksum::{checksum, checksum_incremental};
pub use codec::{
    decode, encode, read_checksum, verify, FrameConfig, Message, Record, DEFAULT_MAX_FRAME_SIZE,
};
pub use descriptor::{ChecksumOrder, ChecksumRange, Descriptor, DescriptorLookup};
pub use error::{FrameError, Result};
pub use header::{
    Header, CHECKSUM_SIZE, FRAME_OVERHEAD, HEADER_SIZE, START_FLAG, TYPE_TAG_OFFSET,
};
pub use layout::WireLayout;
pub use raw::{peek_type, scan_frame, RawFrame};
pub use reader::FrameReader;
pub use writer::FrameWriter;
