//! Fixed-layout telemetry framing for ground-station and vehicle links.
//!
//! Every message is one fixed-size frame: start flag, per-type length
//! bytes, type tag, big-endian fields and a CRC-32 trailer whose coverage
//! and byte order are chosen per message type.
//!
//! # Crate Structure
//!
//! - [`frame`]: Generic codec, checksum, stream reader and writer
//! - [`messages`]: The built-in message set and runtime dispatch
//! - [`catalog`]: Runtime descriptor table and definition files (behind `catalog` feature)

/// Re-export frame types.
pub mod frame {
    pub use telemframe_frame::*;
}

/// Re-export message types.
pub mod messages {
    pub use telemframe_messages::*;
}

/// Re-export catalogue types (requires `catalog` feature).
#[cfg(feature = "catalog")]
pub mod catalog {
    pub use telemframe_catalog::*;
}
