/// Errors that can occur during frame encoding/decoding.
#[derive(Debug, thiserror::Error)]
pub enum FrameError {
    /// The caller's buffer cannot hold a complete frame of the target type.
    #[error("buffer too small ({available} bytes, need {needed})")]
    BufferTooSmall { needed: usize, available: usize },

    /// The transmitted checksum does not match the recomputed one.
    #[error("checksum mismatch (computed {computed:#010x}, received {received:#010x})")]
    ChecksumMismatch { computed: u32, received: u32 },

    /// No descriptor is known for the frame's type tag.
    #[error("unknown message type {0}")]
    UnknownType(u8),

    /// The frame carries a different type tag than the requested message.
    #[error("type mismatch (expected {expected}, found {found})")]
    TypeMismatch { expected: u8, found: u8 },

    /// The stream does not start with the frame start flag.
    #[error("invalid start flag {0:#04x} (expected 0x7e)")]
    InvalidStartFlag(u8),

    /// The descriptor's wire size exceeds the configured maximum.
    #[error("frame too large ({size} bytes, max {max})")]
    FrameTooLarge { size: usize, max: usize },

    /// The descriptor's checksum range does not fit inside its frame.
    #[error("invalid descriptor for type {type_tag}: {reason}")]
    InvalidDescriptor { type_tag: u8, reason: &'static str },

    /// An I/O error occurred while reading or writing frames.
    #[error("frame I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The stream ended before a complete frame was received.
    #[error("connection closed (incomplete frame)")]
    ConnectionClosed,
}

impl FrameError {
    /// True for errors caused by the bytes on the wire rather than by the
    /// caller or the link.
    pub fn is_corruption(&self) -> bool {
        matches!(
            self,
            FrameError::ChecksumMismatch { .. }
                | FrameError::UnknownType(_)
                | FrameError::TypeMismatch { .. }
                | FrameError::InvalidStartFlag(_)
        )
    }
}

pub type Result<T> = std::result::Result<T, FrameError>;
