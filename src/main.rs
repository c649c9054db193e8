use std::process::ExitCode;
use bigdecimal::BigDecimal;
use clap::Parser;
use e2e_delay::cli::{Args, Precision};
use e2e_delay::{end_to_end_delay, simulate, Format, Report, Scalar};
use tracing::info;
use tracing_subscriber::EnvFilter;

fn main() -> ExitCode {
    let args = Args::parse();
    init_logging(args.verbose);

    let result = match args.precision {
        Precision::Decimal => run::<BigDecimal>(&args),
        Precision::Float => run::<f64>(&args),
    };
    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {}", e);
            ExitCode::FAILURE
        }
    }
}

/// Logs go to stderr so the report on stdout stays clean.
/// `RUST_LOG` takes precedence over `-v`.
fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn run<T: Scalar>(args: &Args) -> Result<(), Box<dyn std::error::Error>> {
    let config = args.chain_config::<T>()?;
    let records = simulate(&config)?;
    if let Some(b) = end_to_end_delay(&records) {
        info!(packets = records.len(), end_to_end = %b, precision = T::NAME, "simulation complete");
    }

    let report = Report::new(&records).with_places(args.places);
    match args.format {
        Format::Table => print!("{}", report.table()),
        Format::Json => println!("{}", report.json()?),
    }
    if args.summary {
        if let Some(line) = report.summary() {
            println!();
            println!("{}", line);
        }
    }
    Ok(())
}
