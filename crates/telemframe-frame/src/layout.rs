//! Fixed-size field serialization.
//!
//! Every field of a message has a compile-time byte size and a fixed
//! big-endian encoding. Nested structs and arrays are laid out inline with
//! no padding, so a message's payload size is the sum of its fields.

use bytes::{Buf, BufMut};

/// A value with a fixed, padding-free wire layout.
///
/// `put` must write exactly `SIZE` bytes and `get` must consume exactly
/// `SIZE` bytes. Callers guarantee the buffers are large enough.
pub trait WireLayout: Sized {
    /// Encoded size in bytes.
    const SIZE: usize;

    /// Serialize into `dst`.
    fn put<B: BufMut>(&self, dst: &mut B);

    /// Deserialize from `src`.
    fn get<B: Buf>(src: &mut B) -> Self;
}

macro_rules! scalar_layout {
    ($($ty:ty => $put:ident, $get:ident;)*) => {
        $(
            impl WireLayout for $ty {
                const SIZE: usize = std::mem::size_of::<$ty>();

                #[inline]
                fn put<B: BufMut>(&self, dst: &mut B) {
                    dst.$put(*self);
                }

                #[inline]
                fn get<B: Buf>(src: &mut B) -> Self {
                    src.$get()
                }
            }
        )*
    };
}

scalar_layout! {
    u8 => put_u8, get_u8;
    i8 => put_i8, get_i8;
    u16 => put_u16, get_u16;
    i16 => put_i16, get_i16;
    u32 => put_u32, get_u32;
    i32 => put_i32, get_i32;
    u64 => put_u64, get_u64;
    i64 => put_i64, get_i64;
    f32 => put_f32, get_f32;
    f64 => put_f64, get_f64;
}

/// One byte. Any nonzero byte decodes as `true`; encoding always writes
/// `0x00` or `0x01`, so a re-encoded frame may differ from the one received.
impl WireLayout for bool {
    const SIZE: usize = 1;

    #[inline]
    fn put<B: BufMut>(&self, dst: &mut B) {
        dst.put_u8(u8::from(*self));
    }

    #[inline]
    fn get<B: Buf>(src: &mut B) -> Self {
        src.get_u8() != 0
    }
}

impl<T: WireLayout, const N: usize> WireLayout for [T; N] {
    const SIZE: usize = T::SIZE * N;

    fn put<B: BufMut>(&self, dst: &mut B) {
        for item in self {
            item.put(dst);
        }
    }

    fn get<B: Buf>(src: &mut B) -> Self {
        std::array::from_fn(|_| T::get(src))
    }
}

/// Implement [`WireLayout`] for a struct by listing its fields in wire
/// order. Field types must themselves implement [`WireLayout`].
///
/// ```
/// use telemframe_frame::{wire_layout, WireLayout};
///
/// struct Waypoint {
///     latitude: f64,
///     longitude: f64,
///     id: u8,
/// }
///
/// wire_layout!(Waypoint {
///     latitude: f64,
///     longitude: f64,
///     id: u8,
/// });
///
/// assert_eq!(Waypoint::SIZE, 17);
/// ```
#[macro_export]
macro_rules! wire_layout {
    ($ty:ident { $($field:ident : $fty:ty),* $(,)? }) => {
        impl $crate::WireLayout for $ty {
            const SIZE: usize = 0 $(+ <$fty as $crate::WireLayout>::SIZE)*;

            fn put<B: $crate::bytes::BufMut>(&self, dst: &mut B) {
                $($crate::WireLayout::put(&self.$field, dst);)*
            }

            fn get<B: $crate::bytes::Buf>(src: &mut B) -> Self {
                Self {
                    $($field: <$fty as $crate::WireLayout>::get(src),)*
                }
            }
        }
    };
}
