//! Messages exchanged with the onboard companion computer.

use serde::{Deserialize, Serialize};
use telemframe_frame::{wire_layout, ChecksumOrder, ChecksumRange, Message};

use crate::sensor::SensorData;

/// Odometry published by the companion computer.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct JetsonOdometryData {
    pub sensor_data: SensorData,
}

wire_layout!(JetsonOdometryData {
    sensor_data: SensorData,
});

impl Message for JetsonOdometryData {
    const NAME: &'static str = "JetsonOdometryData";
    const TYPE_TAG: u8 = 0;
    const LENGTH: u16 = 0x0040;
}

/// Relative move request: offset in metres and target heading in degrees.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct JetsonRelativeMovementCommand {
    pub id: u8,
    pub x: f32,
    pub y: f32,
    pub z: f32,
    pub heading: f32,
}

wire_layout!(JetsonRelativeMovementCommand {
    id: u8,
    x: f32,
    y: f32,
    z: f32,
    heading: f32,
});

impl Message for JetsonRelativeMovementCommand {
    const NAME: &'static str = "JetsonRelativeMovementCommand";
    const TYPE_TAG: u8 = 2;
    const LENGTH: u16 = 0x0011;
}

/// Request to begin the landing sequence.
///
/// Unlike every other built-in type this one checksums the whole frame,
/// flag and length included, and stores the checksum big-endian.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct JetsonLandingInitiationCommand {
    pub land: bool,
}

wire_layout!(JetsonLandingInitiationCommand { land: bool });

impl Message for JetsonLandingInitiationCommand {
    const NAME: &'static str = "JetsonLandingInitiationCommand";
    const TYPE_TAG: u8 = 3;
    const LENGTH: u16 = 0x0001;
    const CHECKSUM_RANGE: ChecksumRange = ChecksumRange::WholeFrame;
    const CHECKSUM_ORDER: ChecksumOrder = ChecksumOrder::BigEndian;
}
