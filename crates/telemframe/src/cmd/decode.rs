use telemframe_frame::{RawFrame, START_FLAG};
use telemframe_messages::decode_any;

use crate::cmd::DecodeArgs;
use crate::exit::{frame_error, CliError, CliResult, SUCCESS, USAGE};
use crate::output::{print_frame, FrameOutput, OutputFormat};

pub fn run(args: DecodeArgs, format: OutputFormat) -> CliResult<i32> {
    let bytes = parse_hex(&args.hex)?;

    let record = decode_any(&bytes).map_err(|err| frame_error("decode failed", err))?;
    let kind = record.message.kind();
    let frame = RawFrame::from_slice(kind.descriptor(), &bytes)
        .map_err(|err| frame_error("decode failed", err))?;

    if record.header.flag != START_FLAG {
        tracing::warn!(flag = record.header.flag, "frame does not start with 0x7e");
    }
    if record.header.length != kind.descriptor().length {
        tracing::warn!(
            length = record.header.length_value(),
            expected = kind.descriptor().length_value(),
            "length bytes differ from the type's constant"
        );
    }
    if bytes.len() > frame.wire_size() {
        tracing::warn!(
            ignored = bytes.len() - frame.wire_size(),
            "trailing bytes after frame"
        );
    }

    let out = FrameOutput::new(&frame, Some(kind.name()), Some(&record.message));
    print_frame(&out, format);
    Ok(SUCCESS)
}

/// Parse hex input, ignoring whitespace, ':' separators and a `0x` prefix.
pub fn parse_hex(input: &str) -> CliResult<Vec<u8>> {
    let trimmed = input.trim();
    let trimmed = trimmed
        .strip_prefix("0x")
        .or_else(|| trimmed.strip_prefix("0X"))
        .unwrap_or(trimmed);
    let digits: String = trimmed
        .chars()
        .filter(|c| !c.is_whitespace() && *c != ':')
        .collect();

    if digits.is_empty() {
        return Err(CliError::new(USAGE, "no frame bytes given"));
    }
    hex::decode(&digits).map_err(|err| CliError::new(USAGE, format!("invalid hex: {err}")))
}
