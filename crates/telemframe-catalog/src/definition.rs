//! Message definition file format.
//!
//! A definition file is a JSON array of objects:
//!
//! ```json
//! [
//!   { "name": "GroundStationData", "type": 7, "length": 105 },
//!   { "name": "JetsonLandingInitiationCommand", "type": 3, "length": 1,
//!     "checksum_range": "whole_frame", "checksum_order": "big_endian" }
//! ]
//! ```
//!
//! `length` is split big-endian into the two header length bytes. `size`
//! is the full wire size and defaults to `length + 8`.

use serde::{Deserialize, Serialize};
use telemframe_frame::{ChecksumOrder, ChecksumRange, Descriptor, FRAME_OVERHEAD};

use crate::error::{CatalogError, Result};

/// One message type as written in a definition file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Definition {
    pub name: String,
    #[serde(rename = "type")]
    pub type_tag: u8,
    pub length: u16,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub checksum_range: Option<RangeDef>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub checksum_order: Option<OrderDef>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub size: Option<usize>,
}

/// `"from_type_tag"`, `"whole_frame"` or `{ "start": .., "trailer": .. }`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RangeDef {
    Named(RangeName),
    Span { start: usize, trailer: usize },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RangeName {
    FromTypeTag,
    WholeFrame,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OrderDef {
    LittleEndian,
    BigEndian,
}

impl From<RangeDef> for ChecksumRange {
    fn from(def: RangeDef) -> Self {
        match def {
            RangeDef::Named(RangeName::FromTypeTag) => ChecksumRange::FromTypeTag,
            RangeDef::Named(RangeName::WholeFrame) => ChecksumRange::WholeFrame,
            RangeDef::Span { start, trailer } => ChecksumRange::Span { start, trailer },
        }
    }
}

impl From<ChecksumRange> for RangeDef {
    fn from(range: ChecksumRange) -> Self {
        match range {
            ChecksumRange::FromTypeTag => RangeDef::Named(RangeName::FromTypeTag),
            ChecksumRange::WholeFrame => RangeDef::Named(RangeName::WholeFrame),
            ChecksumRange::Span { start, trailer } => RangeDef::Span { start, trailer },
        }
    }
}

impl From<OrderDef> for ChecksumOrder {
    fn from(def: OrderDef) -> Self {
        match def {
            OrderDef::LittleEndian => ChecksumOrder::LittleEndian,
            OrderDef::BigEndian => ChecksumOrder::BigEndian,
        }
    }
}

impl From<ChecksumOrder> for OrderDef {
    fn from(order: ChecksumOrder) -> Self {
        match order {
            ChecksumOrder::LittleEndian => OrderDef::LittleEndian,
            ChecksumOrder::BigEndian => OrderDef::BigEndian,
        }
    }
}

impl Definition {
    /// Fully spelled-out definition of an existing descriptor.
    pub fn from_descriptor(name: impl Into<String>, descriptor: &Descriptor) -> Self {
        Self {
            name: name.into(),
            type_tag: descriptor.type_tag,
            length: descriptor.length_value(),
            checksum_range: Some(descriptor.checksum_range.into()),
            checksum_order: Some(descriptor.checksum_order.into()),
            size: Some(descriptor.wire_size),
        }
    }

    /// Build and validate the descriptor this definition describes.
    pub fn to_descriptor(&self) -> Result<Descriptor> {
        if self.name.trim().is_empty() {
            return Err(self.invalid("name must not be empty"));
        }

        let size = self
            .size
            .unwrap_or(usize::from(self.length) + FRAME_OVERHEAD);
        if size < FRAME_OVERHEAD {
            return Err(self.invalid(format!(
                "size {size} is smaller than the {FRAME_OVERHEAD}-byte frame overhead"
            )));
        }

        let descriptor = Descriptor::new(self.type_tag, self.length, size - FRAME_OVERHEAD)
            .with_checksum_range(
                self.checksum_range
                    .map_or(ChecksumRange::FromTypeTag, ChecksumRange::from),
            )
            .with_checksum_order(
                self.checksum_order
                    .map_or(ChecksumOrder::LittleEndian, ChecksumOrder::from),
            );
        descriptor.validate()?;
        Ok(descriptor)
    }

    fn invalid(&self, reason: impl Into<String>) -> CatalogError {
        CatalogError::InvalidDefinition {
            name: self.name.clone(),
            reason: reason.into(),
        }
    }
}
