use std::fs::File;
use std::io::Read;

use telemframe_catalog::Catalog;
use telemframe_frame::{FrameConfig, FrameReader, RawFrame};
use telemframe_messages::{AnyMessage, MessageKind};

use crate::cmd::{load_catalog, InspectArgs};
use crate::exit::{frame_error, io_error, CliResult, SUCCESS};
use crate::output::{print_frame, print_frame_table, FrameOutput, OutputFormat};

pub fn run(args: InspectArgs, format: OutputFormat) -> CliResult<i32> {
    let catalog = load_catalog(args.catalog.as_deref())?;
    let input = open_input(&args.input)?;
    let config = FrameConfig {
        max_frame_size: args.max_frame_size,
        resync: !args.strict,
    };

    let mut reader = FrameReader::with_config(input, catalog, config);
    let mut table_rows = Vec::new();
    let mut printed = 0usize;
    let mut failure = None;

    while args.count.is_none_or(|count| printed < count) {
        let frame = match reader.next() {
            Some(Ok(frame)) => frame,
            Some(Err(err)) => {
                failure = Some(frame_error("inspect failed", err));
                break;
            }
            None => break,
        };

        let out = describe(&frame, reader.lookup());
        match format {
            OutputFormat::Table => table_rows.push(out),
            _ => print_frame(&out, format),
        }
        printed = printed.saturating_add(1);
    }

    if !table_rows.is_empty() {
        print_frame_table(&table_rows);
    }
    if reader.buffered() > 0 {
        tracing::debug!(bytes = reader.buffered(), "unconsumed bytes at end of input");
    }
    tracing::info!(frames = printed, "inspect finished");

    match failure {
        Some(err) => Err(err),
        None => Ok(SUCCESS),
    }
}

fn open_input(input: &str) -> CliResult<Box<dyn Read>> {
    if input == "-" {
        return Ok(Box::new(std::io::stdin().lock()));
    }
    let file =
        File::open(input).map_err(|err| io_error(&format!("failed opening {input}"), err))?;
    Ok(Box::new(file))
}

/// Decode fields when the frame is a built-in type with its built-in
/// framing; catalogue-only types are shown as payload hex.
fn describe(frame: &RawFrame, catalog: &Catalog) -> FrameOutput {
    let name = catalog
        .get(frame.type_tag())
        .map(|entry| entry.name.as_str());

    let message = MessageKind::from_tag(frame.type_tag())
        .filter(|kind| kind.descriptor() == *frame.descriptor())
        .and_then(|_| match AnyMessage::from_raw(frame) {
            Ok(record) => Some(record.message),
            Err(err) => {
                tracing::debug!(error = %err, "frame verified but did not decode");
                None
            }
        });

    FrameOutput::new(frame, name, message.as_ref())
}
