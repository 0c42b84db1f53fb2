use serde::{Deserialize, Serialize};
use telemframe_frame::wire_layout;

/// Vehicle state snapshot shared by odometry and ground-station frames.
///
/// 64 bytes on the wire.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct SensorData {
    /// Local position in metres (x, y, z).
    pub position: [f32; 3],
    /// Velocity in m/s (x, y, z).
    pub velocity: [f32; 3],
    /// Roll, pitch, yaw in radians.
    pub attitude: [f32; 3],
    /// Body angular rates in rad/s.
    pub angular_rate: [f32; 3],
    /// Barometric altitude in metres.
    pub altitude: f32,
    /// Milliseconds since vehicle boot.
    pub timestamp_ms: u32,
    /// Raw status bits reported by the flight controller.
    pub status: [u8; 8],
}

wire_layout!(SensorData {
    position: [f32; 3],
    velocity: [f32; 3],
    attitude: [f32; 3],
    angular_rate: [f32; 3],
    altitude: f32,
    timestamp_ms: u32,
    status: [u8; 8],
});
