//! wirepath - query serialized Protocol Buffers messages without a schema
//!
//! This tool reads a serialized message from a file or a hex string,
//! resolves a dotted path of field numbers against it, and prints the
//! match(es) decoded as a chosen scalar type.

use anyhow::{bail, Context, Result};
use clap::{Args, Parser, ValueEnum};
use std::fs;
use std::path::PathBuf;
use tracing::{debug, Level};
use tracing_subscriber::EnvFilter;
use wirepath_core::{get_all, get_one, Field, WireType};

/// Query serialized Protocol Buffers messages by field-number path
#[derive(Parser, Debug)]
#[command(name = "wirepath")]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(flatten)]
    input: InputMode,

    /// Dotted field-number path into the message, e.g. `4.1`
    path: String,

    /// Scalar type to decode matches as
    #[arg(short = 't', long = "type", value_enum, default_value = "raw")]
    scalar: ScalarType,

    /// Print every match instead of only the first
    #[arg(long)]
    all: bool,

    /// Split the match as a packed repeated field of the given item kind
    /// before decoding
    #[arg(long, value_enum)]
    packed: Option<PackedKind>,

    /// Verbosity level (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

#[derive(Args, Debug)]
#[group(required = true, multiple = false)]
struct InputMode {
    /// Path to a file holding one serialized message
    #[arg(short, long)]
    file: Option<PathBuf>,

    /// Message bytes as a hex string (whitespace ignored)
    #[arg(long)]
    hex: Option<String>,
}

/// Protobuf scalar type to decode a match as
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum ScalarType {
    Int32,
    Int64,
    Uint32,
    Uint64,
    Sint32,
    Sint64,
    Bool,
    Fixed32,
    Sfixed32,
    Float,
    Fixed64,
    Sfixed64,
    Double,
    String,
    Bytes,
    /// Hex dump of the raw payload
    Raw,
}

/// Item kind inside a packed repeated field
#[derive(Debug, Clone, Copy, ValueEnum)]
enum PackedKind {
    Varint,
    Fixed32,
    Fixed64,
}

impl PackedKind {
    fn wire_type(self) -> WireType {
        match self {
            PackedKind::Varint => WireType::Varint,
            PackedKind::Fixed32 => WireType::Fixed32,
            PackedKind::Fixed64 => WireType::Fixed64,
        }
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize tracing
    let level = match cli.verbose {
        0 => Level::WARN,
        1 => Level::INFO,
        2 => Level::DEBUG,
        _ => Level::TRACE,
    };

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive(level.into()))
        .with_target(false)
        .init();

    let data = read_input(&cli.input)?;
    debug!("Read {} message bytes", data.len());

    let path = parse_path(&cli.path)?;
    run_query(&cli, &data, &path)
}

/// Reads the message bytes from whichever input mode was selected
fn read_input(input: &InputMode) -> Result<Vec<u8>> {
    if let Some(ref file) = input.file {
        if !file.is_file() {
            bail!("Input path is not a file: {}", file.display());
        }
        fs::read(file).with_context(|| format!("Failed to read input file: {}", file.display()))
    } else if let Some(ref hex) = input.hex {
        parse_hex(hex)
    } else {
        bail!("Either --file or --hex must be specified")
    }
}

/// Parses a dotted path expression like `4.1` into field numbers
fn parse_path(expr: &str) -> Result<Vec<u32>> {
    let path: Vec<u32> = expr
        .split('.')
        .map(|part| {
            part.trim()
                .parse::<u32>()
                .with_context(|| format!("Invalid field number '{part}' in path '{expr}'"))
        })
        .collect::<Result<_>>()?;

    if path.is_empty() || path.contains(&0) {
        bail!("Path '{expr}' must list field numbers starting from 1");
    }
    Ok(path)
}

/// Parses a hex string, ignoring whitespace
fn parse_hex(hex: &str) -> Result<Vec<u8>> {
    let compact: String = hex.chars().filter(|c| !c.is_whitespace()).collect();
    if compact.len() % 2 != 0 {
        bail!("Hex input has an odd number of digits");
    }
    (0..compact.len())
        .step_by(2)
        .map(|i| {
            u8::from_str_radix(&compact[i..i + 2], 16)
                .with_context(|| format!("Invalid hex digits '{}'", &compact[i..i + 2]))
        })
        .collect()
}

/// Resolves the path and prints the match(es)
fn run_query(cli: &Cli, data: &[u8], path: &[u32]) -> Result<()> {
    if cli.all {
        let fields = get_all(data, path)
            .with_context(|| format!("Malformed message while resolving '{}'", cli.path))?;
        if fields.is_empty() {
            bail!("No field found at path '{}'", cli.path);
        }
        debug!("Found {} match(es)", fields.len());
        for field in &fields {
            print_field(cli, field);
        }
    } else {
        let field = get_one(data, path);
        if !field.exists() {
            bail!("No field found at path '{}'", cli.path);
        }
        print_field(cli, &field);
    }
    Ok(())
}

fn print_field(cli: &Cli, field: &Field<'_>) {
    match cli.packed {
        Some(kind) => {
            for item in field.unpack(kind.wire_type()) {
                println!("{}", format_field(&item, cli.scalar));
            }
        }
        None => println!("{}", format_field(field, cli.scalar)),
    }
}

/// Formats one field through the chosen scalar lens
fn format_field(field: &Field<'_>, scalar: ScalarType) -> String {
    match scalar {
        ScalarType::Int32 => field.as_int32().to_string(),
        ScalarType::Int64 => field.as_int64().to_string(),
        ScalarType::Uint32 => field.as_uint32().to_string(),
        ScalarType::Uint64 => field.as_uint64().to_string(),
        ScalarType::Sint32 => field.as_sint32().to_string(),
        ScalarType::Sint64 => field.as_sint64().to_string(),
        ScalarType::Bool => field.as_bool().to_string(),
        ScalarType::Fixed32 => field.as_fixed32().to_string(),
        ScalarType::Sfixed32 => field.as_sfixed32().to_string(),
        ScalarType::Float => field.as_float().to_string(),
        ScalarType::Fixed64 => field.as_fixed64().to_string(),
        ScalarType::Sfixed64 => field.as_sfixed64().to_string(),
        ScalarType::Double => field.as_double().to_string(),
        ScalarType::String => field.as_string().into_owned(),
        ScalarType::Bytes => hex_dump(field.as_bytes()),
        ScalarType::Raw => hex_dump(field.raw()),
    }
}

fn hex_dump(bytes: &[u8]) -> String {
    bytes.iter().map(|byte| format!("{byte:02x}")).collect()
}
