//! Small message types shared by the stream tests.

use bytes::{Buf, BufMut};

use crate::codec::Message;
use crate::descriptor::{ChecksumOrder, ChecksumRange};
use crate::layout::WireLayout;

#[derive(Debug, Clone, PartialEq)]
pub struct Beacon {
    pub sequence: u16,
    pub rssi: i8,
}

impl WireLayout for Beacon {
    const SIZE: usize = 3;

    fn put<B: BufMut>(&self, dst: &mut B) {
        self.sequence.put(dst);
        self.rssi.put(dst);
    }

    fn get<B: Buf>(src: &mut B) -> Self {
        Self {
            sequence: WireLayout::get(src),
            rssi: WireLayout::get(src),
        }
    }
}

impl Message for Beacon {
    const NAME: &'static str = "Beacon";
    const TYPE_TAG: u8 = 1;
    const LENGTH: u16 = 3;
}

#[derive(Debug, Clone, PartialEq)]
pub struct Disarm {
    pub arm: bool,
}

impl WireLayout for Disarm {
    const SIZE: usize = 1;

    fn put<B: BufMut>(&self, dst: &mut B) {
        self.arm.put(dst);
    }

    fn get<B: Buf>(src: &mut B) -> Self {
        Self {
            arm: WireLayout::get(src),
        }
    }
}

impl Message for Disarm {
    const NAME: &'static str = "Disarm";
    const TYPE_TAG: u8 = 5;
    const LENGTH: u16 = 1;
    const CHECKSUM_RANGE: ChecksumRange = ChecksumRange::WholeFrame;
    const CHECKSUM_ORDER: ChecksumOrder = ChecksumOrder::BigEndian;
}
