use clap::Parser;
use tracing::info;

use ftranspose::cli::Args;
use ftranspose::config::Config;
use ftranspose::error::Result;
use ftranspose::{input, logging, output};

/// Set up SIGPIPE handling for Unix systems
/// This prevents "broken pipe" errors when output is piped to commands like `head`
#[cfg(unix)]
fn setup_sigpipe() {
    unsafe {
        libc::signal(libc::SIGPIPE, libc::SIG_DFL);
    }
}

#[cfg(not(unix))]
fn setup_sigpipe() {
    // Windows doesn't have SIGPIPE
}

fn main() {
    setup_sigpipe();

    if let Err(e) = run() {
        eprintln!("ftranspose: {}", e);
        std::process::exit(1);
    }
}

fn run() -> Result<()> {
    let args = Args::parse();
    let config = Config::from_args(&args)?;

    if args.verbosity > 0 && config.verbosity == 0 {
        eprintln!("ftranspose: verbosity setting overridden to 0 to preserve stdout");
    }
    logging::init(config.verbosity);
    config.log_settings();

    // The whole table is loaded before the output is opened, so a failed
    // load leaves an existing output file untouched
    let reader = input::open_input(&config)?;
    let table = input::read_table(
        reader,
        config.in_delimiter,
        config.element_width,
        config.reserve_policy,
    )?;

    let out = output::open_output(&config)?;
    output::write_transposed(out, &table, config.out_delimiter)?;

    info!("Total RAM used: {} bytes.", table.bytes_allocated());
    Ok(())
}
