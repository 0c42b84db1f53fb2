use std::fs;

use serde::Serialize;
use serde_json::{json, Value};
use telemframe_messages::{AnyMessage, MessageKind};

use crate::cmd::EncodeArgs;
use crate::exit::{frame_error, io_error, CliError, CliResult, DATA_INVALID, SUCCESS, USAGE};
use crate::output::{new_table, print_json, print_raw, OutputFormat};

#[derive(Serialize)]
struct EncodeOutput {
    type_tag: u8,
    name: &'static str,
    size: usize,
    hex: String,
}

pub fn run(args: EncodeArgs, format: OutputFormat) -> CliResult<i32> {
    let kind = resolve_kind(&args.message_type)?;
    let fields = read_fields(&args)?;
    let message = build_message(kind, fields)?;

    let frame = message
        .to_frame()
        .map_err(|err| frame_error("encode failed", err))?;
    tracing::debug!(message = kind.name(), size = frame.len(), "encoded frame");

    let out = EncodeOutput {
        type_tag: kind.type_tag(),
        name: kind.name(),
        size: frame.len(),
        hex: hex::encode(&frame),
    };

    match format {
        OutputFormat::Json => print_json(&out),
        OutputFormat::Table => {
            let mut table = new_table(vec!["TYPE", "NAME", "SIZE", "FRAME"]);
            table.add_row(vec![
                out.type_tag.to_string(),
                out.name.to_string(),
                out.size.to_string(),
                out.hex.clone(),
            ]);
            println!("{table}");
        }
        OutputFormat::Pretty => println!("{}", out.hex),
        OutputFormat::Raw => print_raw(&frame),
    }

    Ok(SUCCESS)
}

/// Resolve a message type given by name (case-insensitive) or numeric tag.
pub fn resolve_kind(input: &str) -> CliResult<MessageKind> {
    let input = input.trim();
    let kind = match input.parse::<u8>() {
        Ok(tag) => MessageKind::from_tag(tag),
        Err(_) => MessageKind::from_name(input),
    };

    kind.ok_or_else(|| {
        let known = MessageKind::ALL
            .iter()
            .map(|kind| format!("{} ({})", kind.name(), kind.type_tag()))
            .collect::<Vec<_>>()
            .join(", ");
        CliError::new(
            USAGE,
            format!("unknown message type '{input}'; known types: {known}"),
        )
    })
}

fn read_fields(args: &EncodeArgs) -> CliResult<Value> {
    let text = match (&args.json, &args.file) {
        (Some(json), _) => json.clone(),
        (None, Some(path)) => fs::read_to_string(path).map_err(|err| {
            io_error(&format!("failed reading {}", path.display()), err)
        })?,
        (None, None) => "{}".to_string(),
    };

    let fields: Value = serde_json::from_str(&text)
        .map_err(|err| CliError::new(USAGE, format!("fields are not valid JSON: {err}")))?;
    if !fields.is_object() {
        return Err(CliError::new(USAGE, "fields must be a JSON object"));
    }
    Ok(fields)
}

fn build_message(kind: MessageKind, fields: Value) -> CliResult<AnyMessage> {
    serde_json::from_value(json!({ "type": kind.name(), "fields": fields })).map_err(|err| {
        CliError::new(
            DATA_INVALID,
            format!("fields do not match {}: {err}", kind.name()),
        )
    })
}
