//! Messages exchanged with the ground station.

use serde::{Deserialize, Serialize};
use telemframe_frame::{wire_layout, Message};

use crate::sensor::SensorData;

/// Arm or disarm the vehicle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct GroundStationDisarm {
    pub arm: bool,
}

wire_layout!(GroundStationDisarm { arm: bool });

impl Message for GroundStationDisarm {
    const NAME: &'static str = "GroundStationDisarm";
    const TYPE_TAG: u8 = 5;
    const LENGTH: u16 = 0x0001;
}

/// Periodic vehicle status sent down to the ground station.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct GroundStationData {
    /// Per-motor throttle, 0-255.
    pub motor_outputs: [u8; 12],
    pub data: SensorData,
    /// Per-cell battery voltage in units of 20 mV.
    pub battery_voltages: [u8; 13],
    /// Raw RC controller channel values.
    pub controller_values: [u8; 16],
}

wire_layout!(GroundStationData {
    motor_outputs: [u8; 12],
    data: SensorData,
    battery_voltages: [u8; 13],
    controller_values: [u8; 16],
});

impl Message for GroundStationData {
    const NAME: &'static str = "GroundStationData";
    const TYPE_TAG: u8 = 7;
    const LENGTH: u16 = 0x0069;
}
