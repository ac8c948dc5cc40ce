//! Command-line front end: file in, file out, errors to stderr.

use clap::Parser;
use std::fs::File;
use std::path::PathBuf;
use std::process::ExitCode;

use zboot_unpack::{read_info, unpack, ReadConfig, UnpackConfig};

/// Unpack an EFI zboot kernel image.
#[derive(Debug, Parser)]
#[command(version)]
struct Args {
    /// Input zboot file.
    #[arg(long = "in")]
    input: PathBuf,

    /// Output file for the extracted payload.
    #[arg(long = "out", required_unless_present = "show_header")]
    output: Option<PathBuf>,

    /// Decompress the payload and verify its architecture.
    #[arg(long)]
    decompress: bool,

    /// Print the decoded header as JSON and exit without extracting.
    #[arg(long)]
    show_header: bool,

    /// Enable debug logging of the header and per-stage byte counts.
    #[arg(long)]
    debug: bool,
}

fn run(args: &Args) -> Result<(), Box<dyn std::error::Error>> {
    let data = std::fs::read(&args.input)?;

    if args.show_header {
        let info = read_info(&data, ReadConfig { parse_body: false, debug: args.debug })?;
        println!("{}", serde_json::to_string_pretty(info.header())?);
        return Ok(());
    }

    let info = read_info(&data, ReadConfig { parse_body: true, debug: args.debug })?;
    // required_unless_present guarantees the output path here
    let output = args.output.as_ref().ok_or("output file required")?;
    let mut dst = File::create(output)?;
    unpack(
        &info,
        &mut dst,
        UnpackConfig { decompress: args.decompress, debug: args.debug },
    )?;
    Ok(())
}

fn main() -> ExitCode {
    let args = Args::parse();
    env_logger::Builder::from_default_env()
        .filter_level(if args.debug {
            log::LevelFilter::Debug
        } else {
            log::LevelFilter::Info
        })
        .init();

    if let Err(err) = run(&args) {
        eprintln!("error: {err}");
        return ExitCode::FAILURE;
    }
    ExitCode::SUCCESS
}
