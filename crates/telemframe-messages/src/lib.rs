//! Built-in telemetry message set.
//!
//! Each message type implements [`telemframe_frame::Message`] with its own
//! type tag, length constant and checksum convention. [`AnyMessage`] and
//! [`decode_any`] cover the set when the type is only known at runtime.

pub mod dispatch;
pub mod ground;
pub mod jetson;
pub mod sensor;

pub use dispatch::{decode_any, AnyMessage, Builtin, MessageKind, BUILTIN};
pub use ground::{GroundStationData, GroundStationDisarm};
pub use jetson::{
    JetsonLandingInitiationCommand, JetsonOdometryData, JetsonRelativeMovementCommand,
};
pub use sensor::SensorData;
