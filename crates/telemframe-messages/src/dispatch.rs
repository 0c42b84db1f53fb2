//! Runtime dispatch over the built-in message set.

use serde::{Deserialize, Serialize};
use telemframe_frame::{
    decode, peek_type, Descriptor, DescriptorLookup, FrameError, Message, RawFrame, Record,
    Result,
};

use crate::ground::{GroundStationData, GroundStationDisarm};
use crate::jetson::{
    JetsonLandingInitiationCommand, JetsonOdometryData, JetsonRelativeMovementCommand,
};

/// Descriptors of every built-in message type, ordered by type tag.
pub const BUILTIN: [Descriptor; 5] = [
    JetsonOdometryData::DESCRIPTOR,
    JetsonRelativeMovementCommand::DESCRIPTOR,
    JetsonLandingInitiationCommand::DESCRIPTOR,
    GroundStationDisarm::DESCRIPTOR,
    GroundStationData::DESCRIPTOR,
];

/// Identifies a built-in message type without carrying a value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MessageKind {
    JetsonOdometryData,
    JetsonRelativeMovementCommand,
    JetsonLandingInitiationCommand,
    GroundStationDisarm,
    GroundStationData,
}

impl MessageKind {
    pub const ALL: [MessageKind; 5] = [
        MessageKind::JetsonOdometryData,
        MessageKind::JetsonRelativeMovementCommand,
        MessageKind::JetsonLandingInitiationCommand,
        MessageKind::GroundStationDisarm,
        MessageKind::GroundStationData,
    ];

    pub fn from_tag(type_tag: u8) -> Option<Self> {
        Self::ALL.into_iter().find(|kind| kind.type_tag() == type_tag)
    }

    /// Match a message name, ignoring ASCII case.
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|kind| kind.name().eq_ignore_ascii_case(name))
    }

    pub fn name(self) -> &'static str {
        match self {
            MessageKind::JetsonOdometryData => JetsonOdometryData::NAME,
            MessageKind::JetsonRelativeMovementCommand => JetsonRelativeMovementCommand::NAME,
            MessageKind::JetsonLandingInitiationCommand => JetsonLandingInitiationCommand::NAME,
            MessageKind::GroundStationDisarm => GroundStationDisarm::NAME,
            MessageKind::GroundStationData => GroundStationData::NAME,
        }
    }

    pub fn descriptor(self) -> Descriptor {
        match self {
            MessageKind::JetsonOdometryData => JetsonOdometryData::DESCRIPTOR,
            MessageKind::JetsonRelativeMovementCommand => JetsonRelativeMovementCommand::DESCRIPTOR,
            MessageKind::JetsonLandingInitiationCommand => {
                JetsonLandingInitiationCommand::DESCRIPTOR
            }
            MessageKind::GroundStationDisarm => GroundStationDisarm::DESCRIPTOR,
            MessageKind::GroundStationData => GroundStationData::DESCRIPTOR,
        }
    }

    pub fn type_tag(self) -> u8 {
        self.descriptor().type_tag
    }

    pub fn wire_size(self) -> usize {
        self.descriptor().wire_size
    }
}

/// Lookup over the built-in message set.
#[derive(Debug, Clone, Copy, Default)]
pub struct Builtin;

impl DescriptorLookup for Builtin {
    fn lookup(&self, type_tag: u8) -> Option<Descriptor> {
        MessageKind::from_tag(type_tag).map(MessageKind::descriptor)
    }
}

/// A value of any built-in message type.
///
/// Serializes as `{"type": "<name>", "fields": {...}}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "fields")]
pub enum AnyMessage {
    JetsonOdometryData(JetsonOdometryData),
    JetsonRelativeMovementCommand(JetsonRelativeMovementCommand),
    JetsonLandingInitiationCommand(JetsonLandingInitiationCommand),
    GroundStationDisarm(GroundStationDisarm),
    GroundStationData(GroundStationData),
}

impl AnyMessage {
    pub fn kind(&self) -> MessageKind {
        match self {
            AnyMessage::JetsonOdometryData(_) => MessageKind::JetsonOdometryData,
            AnyMessage::JetsonRelativeMovementCommand(_) => {
                MessageKind::JetsonRelativeMovementCommand
            }
            AnyMessage::JetsonLandingInitiationCommand(_) => {
                MessageKind::JetsonLandingInitiationCommand
            }
            AnyMessage::GroundStationDisarm(_) => MessageKind::GroundStationDisarm,
            AnyMessage::GroundStationData(_) => MessageKind::GroundStationData,
        }
    }

    pub fn name(&self) -> &'static str {
        self.kind().name()
    }

    pub fn type_tag(&self) -> u8 {
        self.kind().type_tag()
    }

    pub fn wire_size(&self) -> usize {
        self.kind().wire_size()
    }

    /// Encode into `dst`; returns the frame size.
    pub fn encode(&self, dst: &mut [u8]) -> Result<usize> {
        match self {
            AnyMessage::JetsonOdometryData(m) => m.encode(dst),
            AnyMessage::JetsonRelativeMovementCommand(m) => m.encode(dst),
            AnyMessage::JetsonLandingInitiationCommand(m) => m.encode(dst),
            AnyMessage::GroundStationDisarm(m) => m.encode(dst),
            AnyMessage::GroundStationData(m) => m.encode(dst),
        }
    }

    /// Encode into a freshly allocated buffer of exactly one frame.
    pub fn to_frame(&self) -> Result<Vec<u8>> {
        let mut buf = vec![0u8; self.wire_size()];
        self.encode(&mut buf)?;
        Ok(buf)
    }

    /// Decode a verified frame picked up by a stream reader.
    pub fn from_raw(frame: &RawFrame) -> Result<Record<AnyMessage>> {
        decode_any(frame.as_bytes())
    }
}

/// Decode a frame of any built-in type, choosing the type by its tag.
pub fn decode_any(src: &[u8]) -> Result<Record<AnyMessage>> {
    let type_tag = peek_type(src).ok_or(FrameError::BufferTooSmall {
        needed: telemframe_frame::HEADER_SIZE,
        available: src.len(),
    })?;
    let kind = MessageKind::from_tag(type_tag).ok_or(FrameError::UnknownType(type_tag))?;

    match kind {
        MessageKind::JetsonOdometryData => lift(src, AnyMessage::JetsonOdometryData),
        MessageKind::JetsonRelativeMovementCommand => {
            lift(src, AnyMessage::JetsonRelativeMovementCommand)
        }
        MessageKind::JetsonLandingInitiationCommand => {
            lift(src, AnyMessage::JetsonLandingInitiationCommand)
        }
        MessageKind::GroundStationDisarm => lift(src, AnyMessage::GroundStationDisarm),
        MessageKind::GroundStationData => lift(src, AnyMessage::GroundStationData),
    }
}

fn lift<M, F>(src: &[u8], wrap: F) -> Result<Record<AnyMessage>>
where
    M: Message,
    F: FnOnce(M) -> AnyMessage,
{
    let record = decode::<M>(src)?;
    Ok(Record {
        header: record.header,
        message: wrap(record.message),
    })
}
