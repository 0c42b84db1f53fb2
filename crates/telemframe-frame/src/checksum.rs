//! CRC-32 checksum engine.
//!
//! Standard IEEE 802.3 CRC-32 (reflected polynomial `0xEDB88320`, initial
//! value and final xor `0xFFFFFFFF`), the same algorithm the vehicle and
//! ground-station firmware compute.

pub use crc32fast::Hasher;

/// Calculate the CRC-32 checksum of `data`.
///
/// The empty range yields `0`.
#[inline]
pub fn checksum(data: &[u8]) -> u32 {
    crc32fast::hash(data)
}

/// Continue a CRC-32 computation from a previous checksum.
///
/// `checksum_incremental(checksum(a), b) == checksum(a ++ b)`.
#[inline]
pub fn checksum_incremental(initial: u32, data: &[u8]) -> u32 {
    let mut hasher = Hasher::new_with_initial(initial);
    hasher.update(data);
    hasher.finalize()
}
