use std::io::{IsTerminal, Write};

use clap::ValueEnum;
use comfy_table::{presets::UTF8_FULL, ContentArrangement, Table};
use serde::Serialize;
use serde_json::Value;
use telemframe_frame::{ChecksumOrder, ChecksumRange, RawFrame};
use telemframe_messages::AnyMessage;

#[derive(Clone, Debug, Copy, ValueEnum)]
pub enum OutputFormat {
    Json,
    Table,
    Pretty,
    Raw,
}

impl OutputFormat {
    pub fn default_for_stdout() -> Self {
        if std::io::stdout().is_terminal() {
            Self::Table
        } else {
            Self::Json
        }
    }
}

/// One verified frame as printed by `decode` and `inspect`.
#[derive(Debug, Serialize)]
pub struct FrameOutput {
    pub type_tag: u8,
    pub name: Option<String>,
    pub flag: String,
    pub length: String,
    pub size: usize,
    pub checksum: String,
    pub payload: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fields: Option<Value>,
    #[serde(skip)]
    pub bytes: Vec<u8>,
}

impl FrameOutput {
    pub fn new(frame: &RawFrame, name: Option<&str>, message: Option<&AnyMessage>) -> Self {
        let header = frame.header();
        Self {
            type_tag: frame.type_tag(),
            name: name.map(str::to_string),
            flag: format!("{:#04x}", header.flag),
            length: format!("{:#06x}", header.length_value()),
            size: frame.wire_size(),
            checksum: format!("{:#010x}", frame.checksum()),
            payload: hex::encode(frame.payload()),
            fields: message.and_then(message_fields),
            bytes: frame.as_bytes().to_vec(),
        }
    }

    fn summary(&self) -> String {
        match &self.fields {
            Some(fields) => fields.to_string(),
            None => self.payload.clone(),
        }
    }
}

/// The `fields` object of a tagged message.
pub fn message_fields(message: &AnyMessage) -> Option<Value> {
    match serde_json::to_value(message) {
        Ok(Value::Object(mut map)) => map.remove("fields"),
        _ => None,
    }
}

pub fn print_frame(frame: &FrameOutput, format: OutputFormat) {
    match format {
        OutputFormat::Json => print_json(frame),
        OutputFormat::Table => print_frame_table(std::slice::from_ref(frame)),
        OutputFormat::Pretty => {
            println!(
                "{} (type={} size={} length={} checksum={})",
                frame.name.as_deref().unwrap_or("<unnamed>"),
                frame.type_tag,
                frame.size,
                frame.length,
                frame.checksum
            );
            match &frame.fields {
                Some(fields) => println!(
                    "{}",
                    serde_json::to_string_pretty(fields).unwrap_or_else(|_| "{}".to_string())
                ),
                None => println!("payload={}", frame.payload),
            }
        }
        OutputFormat::Raw => print_raw(&frame.bytes),
    }
}

pub fn print_frame_table(frames: &[FrameOutput]) {
    let mut table = new_table(vec!["TYPE", "NAME", "SIZE", "CHECKSUM", "CONTENT"]);
    for frame in frames {
        table.add_row(vec![
            frame.type_tag.to_string(),
            frame.name.clone().unwrap_or_default(),
            frame.size.to_string(),
            frame.checksum.clone(),
            frame.summary(),
        ]);
    }
    println!("{table}");
}

pub fn print_json<T: Serialize>(value: &T) {
    println!(
        "{}",
        serde_json::to_string(value).unwrap_or_else(|_| "{}".to_string())
    );
}

pub fn print_raw(data: &[u8]) {
    let mut out = std::io::stdout();
    let _ = out.write_all(data);
    let _ = out.flush();
}

pub fn new_table(header: Vec<&str>) -> Table {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(header);
    table
}

pub fn range_label(range: ChecksumRange) -> String {
    match range {
        ChecksumRange::FromTypeTag => "from_type_tag".to_string(),
        ChecksumRange::WholeFrame => "whole_frame".to_string(),
        ChecksumRange::Span { start, trailer } => format!("span[{start}, N-{trailer})"),
    }
}

pub fn order_label(order: ChecksumOrder) -> &'static str {
    match order {
        ChecksumOrder::LittleEndian => "little_endian",
        ChecksumOrder::BigEndian => "big_endian",
    }
}
