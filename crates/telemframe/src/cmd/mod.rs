use clap::{Args, Subcommand};
use std::path::{Path, PathBuf};

use telemframe_catalog::{Catalog, CatalogConfig};

use crate::exit::{catalog_error, CliResult};
use crate::output::OutputFormat;

pub mod decode;
pub mod encode;
pub mod inspect;
pub mod types;
pub mod version;

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Build a message from JSON fields and print the encoded frame.
    Encode(EncodeArgs),
    /// Decode a single hex-encoded frame.
    Decode(DecodeArgs),
    /// Read a byte stream and print every verified frame.
    Inspect(InspectArgs),
    /// List known message types and their framing parameters.
    Types(TypesArgs),
    /// Show version information.
    Version(VersionArgs),
}

pub fn run(command: Command, format: OutputFormat) -> CliResult<i32> {
    match command {
        Command::Encode(args) => encode::run(args, format),
        Command::Decode(args) => decode::run(args, format),
        Command::Inspect(args) => inspect::run(args, format),
        Command::Types(args) => types::run(args, format),
        Command::Version(args) => version::run(args),
    }
}

#[derive(Args, Debug)]
pub struct EncodeArgs {
    /// Message type, by name or numeric tag.
    #[arg(long = "type", short = 't', value_name = "NAME|TAG")]
    pub message_type: String,
    /// Message fields as a JSON object. Missing fields are zero.
    #[arg(long, conflicts_with = "file")]
    pub json: Option<String>,
    /// Read the JSON fields from a file.
    #[arg(long, conflicts_with = "json")]
    pub file: Option<PathBuf>,
}

#[derive(Args, Debug)]
pub struct DecodeArgs {
    /// Frame bytes as hex. Whitespace, ':' and a leading 0x are ignored.
    pub hex: String,
}

#[derive(Args, Debug)]
pub struct InspectArgs {
    /// File to read, or '-' for stdin.
    #[arg(default_value = "-")]
    pub input: String,
    /// Exit after N frames.
    #[arg(long)]
    pub count: Option<usize>,
    /// Message definition file extending (or overriding) the built-in types.
    #[arg(long, value_name = "FILE", env = "TELEMFRAME_CATALOG")]
    pub catalog: Option<PathBuf>,
    /// Fail on the first corrupt frame instead of resynchronizing.
    #[arg(long)]
    pub strict: bool,
    /// Largest frame accepted from the stream, in bytes.
    #[arg(long, default_value_t = telemframe_frame::DEFAULT_MAX_FRAME_SIZE)]
    pub max_frame_size: usize,
}

#[derive(Args, Debug)]
pub struct TypesArgs {
    /// Message definition file extending (or overriding) the built-in types.
    #[arg(long, value_name = "FILE", env = "TELEMFRAME_CATALOG")]
    pub catalog: Option<PathBuf>,
}

#[derive(Args, Debug)]
pub struct VersionArgs {
    /// Show extended build provenance.
    #[arg(long)]
    pub extended: bool,
}

/// Built-in catalogue, optionally extended by a definition file whose
/// entries replace built-in types with the same tag.
pub fn load_catalog(path: Option<&Path>) -> CliResult<Catalog> {
    let Some(path) = path else {
        return Ok(Catalog::builtin());
    };

    let mut catalog = Catalog::builtin_with_config(CatalogConfig {
        allow_overrides: true,
        ..CatalogConfig::default()
    });
    catalog
        .load_file(path)
        .map_err(|err| catalog_error(&format!("failed loading {}", path.display()), err))?;
    Ok(catalog)
}
