//! Simple command that prints one or '-n count' identifiers

use std::{io, io::Write, process::ExitCode};

use clap::{Parser, ValueEnum};
use tsuid::{Strategy, Uuid};

#[derive(Parser, Debug)]
#[command(name = "tsuid", about = "Prints time-sortable identifiers")]
struct Args {
    /// Number of identifiers to print
    #[arg(short = 'n', default_value_t = 1)]
    count: usize,

    /// Bit layout of the identifiers
    #[arg(long, value_enum, default_value_t = Layout::V7)]
    strategy: Layout,

    /// Text form of each identifier
    #[arg(long, value_enum, default_value_t = Format::Hex)]
    format: Format,
}

#[derive(Copy, Clone, Debug, ValueEnum)]
enum Layout {
    V4,
    V7,
    V8,
}

impl From<Layout> for Strategy {
    fn from(src: Layout) -> Self {
        match src {
            Layout::V4 => Strategy::Random,
            Layout::V7 => Strategy::TimestampFirst,
            Layout::V8 => Strategy::TimestampLast,
        }
    }
}

#[derive(Copy, Clone, Debug, ValueEnum)]
enum Format {
    Hex,
    Upper,
    Base32,
    Base64,
    Int64,
    Uuid,
}

fn write_one(buf: &mut impl Write, e: Uuid, format: Format) -> io::Result<()> {
    match format {
        Format::Hex => writeln!(buf, "{}", e),
        Format::Upper => writeln!(buf, "{:X}", e),
        Format::Base32 => writeln!(buf, "{}", e.to_base32()),
        Format::Base64 => writeln!(buf, "{}", e.to_base64()),
        Format::Int64 => writeln!(buf, "{}", e.to_int64()),
        Format::Uuid => writeln!(buf, "{}", e.to_standard_uuid()),
    }
}

fn main() -> io::Result<ExitCode> {
    env_logger::init();
    let args = Args::parse();
    log::debug!("{:?}", args);

    let mut ids = vec![Uuid::NIL; args.count];
    tsuid::fill(&mut ids, args.strategy.into());

    let mut buf = io::BufWriter::new(io::stdout());
    for e in ids {
        write_one(&mut buf, e, args.format)?;
    }
    buf.flush()?;

    Ok(ExitCode::SUCCESS)
}
