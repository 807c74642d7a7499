//! Feature extraction for a single kernel module.
//!
//! Reads LLVM bitcode (or textual IR), prints a labeled summary and writes a
//! one-row CSV feature record.

use clap::Parser;
use oclfeat::analyze::analyze_file;
use oclfeat::features::{write_csv, Summary};
use std::path::PathBuf;
use std::process::ExitCode;

#[derive(Parser, Debug)]
#[command(name = "oclfeat", version, about = "Extract static instruction features from a kernel module")]
struct Args {
    /// Kernel bitcode file
    #[arg(short = 'f', value_name = "FILE")]
    file: PathBuf,

    /// Output CSV file
    #[arg(short = 'o', value_name = "FILE")]
    output: PathBuf,

    /// Trace every visited instruction
    #[arg(short = 'v')]
    verbose: bool,
}

fn main() -> ExitCode {
    let args = Args::parse();
    oclfeat::logging::init(args.verbose);

    let snapshot = match analyze_file(&args.file) {
        Ok(snapshot) => snapshot,
        Err(e) => {
            log::error!("{}", e);
            return ExitCode::FAILURE;
        }
    };

    println!("{}\n", Summary(&snapshot));
    if snapshot.unrecognized_address_spaces > 0 {
        log::warn!(
            "{} memory accesses used an unrecognized address space",
            snapshot.unrecognized_address_spaces
        );
    }

    if let Err(e) = write_csv(&args.output, &snapshot) {
        log::error!("{}", e);
        return ExitCode::FAILURE;
    }
    ExitCode::SUCCESS
}
