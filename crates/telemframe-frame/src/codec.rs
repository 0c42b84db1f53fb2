use crate::checksum::checksum;
use crate::descriptor::{ChecksumOrder, ChecksumRange, Descriptor};
use crate::error::{FrameError, Result};
use crate::header::{Header, CHECKSUM_SIZE};
use crate::layout::WireLayout;

/// Default upper bound on the wire size of a frame accepted from a stream.
pub const DEFAULT_MAX_FRAME_SIZE: usize = 4096;

/// A message type with a fixed frame layout.
///
/// The payload layout comes from [`WireLayout`]; the framing constants
/// below become the type's [`Descriptor`].
pub trait Message: WireLayout {
    /// Human-readable type name.
    const NAME: &'static str;
    /// Type tag written to byte 3.
    const TYPE_TAG: u8;
    /// Literal value of the two length bytes.
    const LENGTH: u16;
    const CHECKSUM_RANGE: ChecksumRange = ChecksumRange::FromTypeTag;
    const CHECKSUM_ORDER: ChecksumOrder = ChecksumOrder::LittleEndian;

    const DESCRIPTOR: Descriptor = Descriptor::new(Self::TYPE_TAG, Self::LENGTH, Self::SIZE)
        .with_checksum_range(Self::CHECKSUM_RANGE)
        .with_checksum_order(Self::CHECKSUM_ORDER);

    /// Total frame size for this type.
    const WIRE_SIZE: usize = Self::DESCRIPTOR.wire_size;

    /// Encode into the front of `dst`. See [`encode`].
    fn encode(&self, dst: &mut [u8]) -> Result<usize> {
        encode(self, dst)
    }

    /// Decode and verify a frame. See [`decode`].
    fn decode(src: &[u8]) -> Result<Record<Self>> {
        decode(src)
    }
}

/// A decoded, checksum-verified frame.
#[derive(Debug, Clone, PartialEq)]
pub struct Record<M> {
    /// Header exactly as received.
    pub header: Header,
    pub message: M,
}

impl<M: Message> Record<M> {
    /// Record carrying the canonical header for `M`.
    pub fn new(message: M) -> Self {
        Self {
            header: M::DESCRIPTOR.header(),
            message,
        }
    }

    pub fn into_message(self) -> M {
        self.message
    }
}

/// Encode a message into the wire format.
///
/// Wire format:
/// ```text
/// ┌──────────┬──────────────┬──────────┬──────────────────┬──────────────┐
/// │ Flag     │ Length       │ Type     │ Payload          │ Checksum     │
/// │ 0x7E     │ (2B, const)  │ (1B)     │ (fields, BE)     │ (4B, LE|BE)  │
/// └──────────┴──────────────┴──────────┴──────────────────┴──────────────┘
/// ```
///
/// The header is always the canonical one for `M`. Returns the number of
/// bytes written (`M::WIRE_SIZE`); bytes past that are left untouched. If
/// `dst` is too small nothing is written.
pub fn encode<M: Message>(message: &M, dst: &mut [u8]) -> Result<usize> {
    let descriptor = M::DESCRIPTOR;
    let size = descriptor.wire_size;
    if dst.len() < size {
        return Err(FrameError::BufferTooSmall {
            needed: size,
            available: dst.len(),
        });
    }
    let covered = descriptor.checksum_bounds()?;

    let frame = &mut dst[..size];
    let checksum_offset = descriptor.checksum_offset();
    {
        let mut cursor: &mut [u8] = &mut frame[..checksum_offset];
        descriptor.header().put(&mut cursor);
        message.put(&mut cursor);
        debug_assert!(cursor.is_empty(), "{} payload layout is short", M::NAME);
    }

    let sum = checksum(&frame[covered]);
    frame[checksum_offset..].copy_from_slice(&descriptor.checksum_order.to_bytes(sum));

    tracing::trace!(
        message = M::NAME,
        type_tag = descriptor.type_tag,
        size,
        checksum = sum,
        "encoded frame"
    );
    Ok(size)
}

/// Decode a frame into a typed record.
///
/// The type tag is not checked: the caller has already dispatched on it.
/// Fails with [`FrameError::BufferTooSmall`] if `src` is shorter than
/// `M::WIRE_SIZE` and with [`FrameError::ChecksumMismatch`] if the frame
/// does not verify. Trailing bytes past the frame are ignored.
pub fn decode<M: Message>(src: &[u8]) -> Result<Record<M>> {
    let descriptor = M::DESCRIPTOR;
    let frame = verify(&descriptor, src)?;

    let mut cursor = &frame[..descriptor.checksum_offset()];
    let header = Header::get(&mut cursor);
    let message = M::get(&mut cursor);
    debug_assert!(cursor.is_empty(), "{} payload layout is short", M::NAME);

    Ok(Record { header, message })
}

/// Check size and checksum of a frame without decoding it.
///
/// Returns the `wire_size` bytes of the frame on success.
pub fn verify<'a>(descriptor: &Descriptor, src: &'a [u8]) -> Result<&'a [u8]> {
    let size = descriptor.wire_size;
    if src.len() < size {
        return Err(FrameError::BufferTooSmall {
            needed: size,
            available: src.len(),
        });
    }
    let covered = descriptor.checksum_bounds()?;
    let frame = &src[..size];

    let computed = checksum(&frame[covered]);
    let received = read_checksum(descriptor, frame);
    if computed != received {
        tracing::debug!(
            type_tag = descriptor.type_tag,
            computed,
            received,
            "checksum mismatch"
        );
        return Err(FrameError::ChecksumMismatch { computed, received });
    }
    Ok(frame)
}

/// The checksum transmitted in the last four bytes of `frame`.
///
/// `frame` must be at least `descriptor.wire_size` bytes.
pub fn read_checksum(descriptor: &Descriptor, frame: &[u8]) -> u32 {
    let offset = descriptor.checksum_offset();
    let mut bytes = [0u8; CHECKSUM_SIZE];
    bytes.copy_from_slice(&frame[offset..offset + CHECKSUM_SIZE]);
    descriptor.checksum_order.from_bytes(bytes)
}

/// Configuration for stream framing.
#[derive(Debug, Clone)]
pub struct FrameConfig {
    /// Largest descriptor wire size accepted from a stream. Default: 4 KiB.
    pub max_frame_size: usize,
    /// Skip past corrupt candidates instead of returning an error.
    pub resync: bool,
}

impl Default for FrameConfig {
    fn default() -> Self {
        Self {
            max_frame_size: DEFAULT_MAX_FRAME_SIZE,
            resync: true,
        }
    }
}

#[cfg(test)]
mod tests {
    use bytes::{Buf, BufMut};

    use super::*;
    use crate::header::START_FLAG;

    #[derive(Debug, Clone, PartialEq, Default)]
    struct Telemetry {
        motor_outputs: [u8; 12],
        altitude: f32,
        armed: bool,
    }

    impl WireLayout for Telemetry {
        const SIZE: usize = 12 + 4 + 1;

        fn put<B: BufMut>(&self, dst: &mut B) {
            self.motor_outputs.put(dst);
            self.altitude.put(dst);
            self.armed.put(dst);
        }

        fn get<B: Buf>(src: &mut B) -> Self {
            Self {
                motor_outputs: WireLayout::get(src),
                altitude: WireLayout::get(src),
                armed: WireLayout::get(src),
            }
        }
    }

    impl Message for Telemetry {
        const NAME: &'static str = "Telemetry";
        const TYPE_TAG: u8 = 7;
        const LENGTH: u16 = 0x0069;
    }

    #[derive(Debug, Clone, PartialEq, Default)]
    struct Command {
        code: u8,
    }

    impl WireLayout for Command {
        const SIZE: usize = 1;

        fn put<B: BufMut>(&self, dst: &mut B) {
            self.code.put(dst);
        }

        fn get<B: Buf>(src: &mut B) -> Self {
            Self {
                code: WireLayout::get(src),
            }
        }
    }

    impl Message for Command {
        const NAME: &'static str = "Command";
        const TYPE_TAG: u8 = 3;
        const LENGTH: u16 = 1;
        const CHECKSUM_RANGE: ChecksumRange = ChecksumRange::WholeFrame;
        const CHECKSUM_ORDER: ChecksumOrder = ChecksumOrder::BigEndian;
    }

    fn sample() -> Telemetry {
        Telemetry {
            motor_outputs: [1, 2, 3, 4, 5, 6, 7, 8, 9, 10, 11, 12],
            altitude: 42.5,
            armed: true,
        }
    }

    fn encoded<M: Message>(message: &M) -> Vec<u8> {
        let mut buf = vec![0u8; M::WIRE_SIZE];
        encode(message, &mut buf).unwrap();
        buf
    }

    #[test]
    fn test_encode_decode_roundtrip() {
        let buf = encoded(&sample());
        assert_eq!(buf.len(), Telemetry::WIRE_SIZE);

        let record = decode::<Telemetry>(&buf).unwrap();
        assert_eq!(record.message, sample());
        assert_eq!(record.header, Telemetry::DESCRIPTOR.header());
    }

    #[test]
    fn test_zero_record_wire_bytes() {
        let mut buf = vec![0u8; Telemetry::WIRE_SIZE];
        let written = encode(&Telemetry::default(), &mut buf).unwrap();
        let size = Telemetry::WIRE_SIZE;

        assert_eq!(written, size);
        assert_eq!(buf[0], START_FLAG);
        assert_eq!(&buf[1..3], &[0x00, 0x69]);
        assert_eq!(buf[3], 7);

        let expected = checksum(&buf[3..size - 4]);
        assert_eq!(buf[size - 1], (expected >> 24) as u8);
        assert_eq!(buf[size - 2], (expected >> 16) as u8);
        assert_eq!(buf[size - 3], (expected >> 8) as u8);
        assert_eq!(buf[size - 4], expected as u8);

        let record = decode::<Telemetry>(&buf).unwrap();
        assert_eq!(record.header.flag, START_FLAG);
    }

    #[test]
    fn test_whole_frame_big_endian_type() {
        let buf = encoded(&Command { code: 9 });
        let size = Command::WIRE_SIZE;
        assert_eq!(size, 9);

        let expected = checksum(&buf[..size - 4]);
        assert_eq!(&buf[size - 4..], &expected.to_be_bytes());
        assert_eq!(decode::<Command>(&buf).unwrap().message.code, 9);
    }

    #[test]
    fn test_encode_buffer_too_small_leaves_buffer_untouched() {
        for len in 0..Telemetry::WIRE_SIZE {
            let mut buf = vec![0xA5u8; len];
            let err = encode(&sample(), &mut buf).unwrap_err();
            assert!(matches!(
                err,
                FrameError::BufferTooSmall { needed, available }
                    if needed == Telemetry::WIRE_SIZE && available == len
            ));
            assert!(buf.iter().all(|&b| b == 0xA5));
        }
    }

    #[test]
    fn test_encode_leaves_trailing_bytes_untouched() {
        let mut buf = vec![0xA5u8; Telemetry::WIRE_SIZE + 8];
        let written = encode(&sample(), &mut buf).unwrap();
        assert!(buf[written..].iter().all(|&b| b == 0xA5));
        assert!(decode::<Telemetry>(&buf).is_ok());
    }

    #[test]
    fn test_decode_buffer_too_small() {
        let buf = encoded(&sample());
        for len in 0..buf.len() {
            assert!(matches!(
                decode::<Telemetry>(&buf[..len]),
                Err(FrameError::BufferTooSmall { .. })
            ));
        }
    }

    #[test]
    fn test_bit_flip_in_covered_range_rejected() {
        let buf = encoded(&sample());
        let covered = Telemetry::DESCRIPTOR.checksum_bounds().unwrap();
        for byte in covered {
            for bit in 0..8 {
                let mut corrupt = buf.clone();
                corrupt[byte] ^= 1 << bit;
                assert!(
                    matches!(
                        decode::<Telemetry>(&corrupt),
                        Err(FrameError::ChecksumMismatch { .. })
                    ),
                    "byte {byte} bit {bit}"
                );
            }
        }
    }

    #[test]
    fn test_bit_flip_in_checksum_rejected() {
        let buf = encoded(&sample());
        let mut corrupt = buf.clone();
        let last = corrupt.len() - 1;
        corrupt[last] ^= 0x80;
        assert!(matches!(
            decode::<Telemetry>(&corrupt),
            Err(FrameError::ChecksumMismatch { .. })
        ));
    }

    #[test]
    fn test_bit_flip_outside_covered_range_is_reflected() {
        let buf = encoded(&sample());
        for byte in 0..3 {
            let mut corrupt = buf.clone();
            corrupt[byte] ^= 0x01;
            let record = decode::<Telemetry>(&corrupt).unwrap();
            assert_eq!(record.header.to_bytes()[byte], buf[byte] ^ 0x01);
            assert_eq!(record.message, sample());
        }
    }

    #[test]
    fn test_whole_frame_type_covers_flag() {
        let mut buf = encoded(&Command { code: 1 });
        buf[0] ^= 0x01;
        assert!(matches!(
            decode::<Command>(&buf),
            Err(FrameError::ChecksumMismatch { .. })
        ));
    }

    #[test]
    fn test_encode_canonicalizes_header() {
        let record = Record {
            header: Header::default(),
            message: sample(),
        };
        let buf = encoded(&record.message);
        assert_eq!(record.header, Header::default());
        assert_eq!(&buf[..4], &Telemetry::DESCRIPTOR.header().to_bytes());
    }

    #[test]
    fn test_verify_returns_exact_frame() {
        let mut buf = encoded(&sample());
        buf.extend_from_slice(b"trailing");
        let frame = verify(&Telemetry::DESCRIPTOR, &buf).unwrap();
        assert_eq!(frame.len(), Telemetry::WIRE_SIZE);
    }

    #[test]
    fn test_trait_methods_delegate() {
        let mut buf = [0u8; 64];
        let n = sample().encode(&mut buf).unwrap();
        assert_eq!(Telemetry::decode(&buf[..n]).unwrap().into_message(), sample());
    }

    #[test]
    fn test_record_new_uses_canonical_header() {
        let record = Record::new(Command { code: 2 });
        assert_eq!(record.header.to_bytes(), [0x7E, 0x00, 0x01, 0x03]);
    }

    #[test]
    fn test_frame_config_defaults() {
        let cfg = FrameConfig::default();
        assert_eq!(cfg.max_frame_size, DEFAULT_MAX_FRAME_SIZE);
        assert!(cfg.resync);
    }
}
