//! Simulated ground link: send telemetry frames over an in-memory link with
//! a little line noise, then reassemble and decode them on the other side.

use std::io::Cursor;

use telemframe::catalog::Catalog;
use telemframe::frame::{FrameReader, FrameWriter};
use telemframe::messages::{
    AnyMessage, GroundStationData, GroundStationDisarm, JetsonLandingInitiationCommand,
    SensorData,
};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let mut writer = FrameWriter::new(Cursor::new(Vec::<u8>::new()));

    for step in 0..3u32 {
        let telemetry = GroundStationData {
            motor_outputs: [128; 12],
            data: SensorData {
                altitude: 10.0 + step as f32,
                timestamp_ms: step * 100,
                ..SensorData::default()
            },
            ..GroundStationData::default()
        };
        writer.send(&telemetry)?;
    }
    writer.send(&GroundStationDisarm { arm: false })?;
    writer.send(&JetsonLandingInitiationCommand { land: true })?;

    let mut wire = vec![0x00, 0x55, 0xAA];
    wire.extend(writer.into_inner().into_inner());

    for frame in FrameReader::new(Cursor::new(wire), Catalog::builtin()) {
        let record = AnyMessage::from_raw(&frame?)?;
        println!("{}: {:?}", record.message.name(), record.message);
    }
    Ok(())
}
