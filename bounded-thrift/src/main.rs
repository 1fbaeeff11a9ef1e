use std::{
    fs,
    io::{self, Write},
    ops::Range,
    path::PathBuf,
    process::ExitCode,
};

use bounded_thrift::{
    BinaryDeserializer, BinaryProtocolConfig, DecodeError, ReadLength, ReadLimit, StructOutline,
    Unlimited, protocol::DEFAULT_MAX_DEPTH,
};
use clap::{Args, Parser, Subcommand};
use tracing::{debug, error, info};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "bounded-thrift", version, about = "Inspect Thrift binary encoded structs")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Decodes back-to-back structs from a file and prints their field headers
    Inspect(InspectArgs),
}

#[derive(Args, Debug)]
struct InspectArgs {
    /// File holding the encoded structs
    file: PathBuf,

    /// Position of the first struct in the file
    #[arg(long, default_value_t = 0)]
    offset: usize,

    /// Number of bytes to scan; defaults to the rest of the file
    #[arg(long)]
    length: Option<usize>,

    /// Stop after this many structs
    #[arg(long)]
    count: Option<usize>,

    /// Maximum nesting of structs and containers
    #[arg(long, default_value_t = DEFAULT_MAX_DEPTH)]
    max_depth: usize,

    /// Decode without capping the read length to the scanned range
    #[arg(long)]
    no_read_limit: bool,
}

#[derive(Debug, thiserror::Error)]
enum InspectError {
    #[error("failed to read {}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("failed to decode struct at offset {offset}")]
    Decode {
        offset: usize,
        len: usize,
        #[source]
        source: DecodeError,
    },
    #[error("failed to write the report")]
    Output(#[source] io::Error),
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(io::stderr)
        .init();

    let cli = Cli::parse();
    let result = match &cli.command {
        Command::Inspect(args) => inspect(args),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            match &err {
                InspectError::Io { source, .. } => error!(error = %source, "{err}"),
                InspectError::Decode { offset, len, source } => {
                    error!(offset, len, error = %source, "{err}")
                },
                InspectError::Output(source) => error!(error = %source, "{err}"),
            }
            ExitCode::FAILURE
        },
    }
}

fn inspect(args: &InspectArgs) -> Result<(), InspectError> {
    let bytes = fs::read(&args.file)
        .map_err(|source| InspectError::Io { path: args.file.clone(), source })?;
    let mut out = io::stdout().lock();
    inspect_bytes(&bytes, args, &mut out)?;
    out.flush().map_err(InspectError::Output)
}

/// Scans `bytes` with the reader variant selected by `args`.
fn inspect_bytes(
    bytes: &[u8],
    args: &InspectArgs,
    out: &mut impl Write,
) -> Result<Vec<Range<usize>>, InspectError> {
    let config = BinaryProtocolConfig::new().with_max_depth(args.max_depth);
    if args.no_read_limit {
        scan(BinaryDeserializer::<Unlimited>::with_config(config), bytes, args, out)
    } else {
        scan(BinaryDeserializer::<ReadLength>::with_config(config), bytes, args, out)
    }
}

/// Decodes structs one after another until the scanned range or the requested count runs out,
/// reporting each one to `out`. Returns the byte range of every decoded struct.
fn scan<L: ReadLimit>(
    mut deserializer: BinaryDeserializer<L>,
    bytes: &[u8],
    args: &InspectArgs,
    out: &mut impl Write,
) -> Result<Vec<Range<usize>>, InspectError> {
    let end = scan_end(bytes.len(), args.offset, args.length).map_err(|source| {
        InspectError::Decode {
            offset: args.offset,
            len: args.length.unwrap_or(0),
            source,
        }
    })?;
    info!(
        file = %args.file.display(),
        start = args.offset,
        end,
        read_limit = L::SETTABLE,
        "scanning"
    );

    let mut outline = StructOutline::new();
    let mut ranges = Vec::new();
    let mut position = args.offset;
    while position < end && args.count.is_none_or(|count| ranges.len() < count) {
        let consumed = deserializer
            .deserialize_range(&mut outline, bytes, position, end - position)
            .map_err(|source| InspectError::Decode {
                offset: position,
                len: end - position,
                source,
            })?;
        let range = position..position + consumed;

        writeln!(out, "struct {} [{}..{})", ranges.len(), range.start, range.end)
            .map_err(InspectError::Output)?;
        for field in outline.fields() {
            writeln!(out, "  {:>6}: {:?}", field.id, field.field_type)
                .map_err(InspectError::Output)?;
        }
        debug!(index = ranges.len(), consumed, fields = outline.fields().len(), "decoded struct");

        position = range.end;
        ranges.push(range);
    }

    info!(structs = ranges.len(), bytes = position - args.offset, "done");
    Ok(ranges)
}

/// Returns the end of the scanned range, rejecting ranges that do not fit in the file.
fn scan_end(file_len: usize, offset: usize, length: Option<usize>) -> Result<usize, DecodeError> {
    let invalid = || DecodeError::InvalidRange {
        offset,
        len: length.unwrap_or(0),
        buffer_len: file_len,
    };
    match length {
        Some(len) => offset.checked_add(len).filter(|end| *end <= file_len).ok_or_else(invalid),
        None if offset <= file_len => Ok(file_len),
        None => Err(invalid()),
    }
}
