//! Collect static kernel features for a directory of OpenCL kernels.

use clap::Parser;
use oclfeat::collect::{CompileConfig, Collector};
use std::path::PathBuf;
use std::process::ExitCode;

#[derive(Parser, Debug)]
#[command(
    name = "collect-features",
    version,
    about = "Collect static kernel features for cl kernel files."
)]
struct Args {
    /// Root folder with kernel files (.cl, .bc, .ll, .tir)
    #[arg(short = 'd', long = "dataPath", visible_alias = "data-path")]
    data_path: PathBuf,

    /// Output file name for collected features
    #[arg(short = 'o', long = "outputFile", visible_alias = "output-file")]
    output_file: PathBuf,

    /// Home directory of libclc, needed to compile .cl sources
    #[arg(short = 'l', long = "libclcHome", visible_alias = "libclc-home")]
    libclc_home: Option<PathBuf>,

    /// clang executable used to compile .cl sources
    #[arg(long, env = "OCLFEAT_CLANG", default_value = "clang")]
    clang: PathBuf,

    /// Trace every visited instruction
    #[arg(short = 'v', long)]
    verbose: bool,
}

fn main() -> ExitCode {
    let args = Args::parse();
    oclfeat::logging::init(args.verbose);

    let config = CompileConfig {
        clang: args.clang,
        libclc_home: args.libclc_home,
        ..CompileConfig::default()
    };

    let result = Collector::new(config).and_then(|mut collector| {
        let report = collector.collect(&args.data_path)?;
        report.write_csv(&args.output_file)?;
        Ok(report)
    });

    match result {
        Ok(report) if report.failures.is_empty() => ExitCode::SUCCESS,
        Ok(report) => {
            log::warn!("{} kernels could not be analyzed", report.failures.len());
            ExitCode::FAILURE
        }
        Err(e) => {
            log::error!("{}", e);
            ExitCode::FAILURE
        }
    }
}
