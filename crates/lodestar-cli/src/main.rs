//! lodestar CLI entry point.

use std::{process, str::FromStr};

use clap::Parser;
use log::{LevelFilter, debug, error, info};

use lodestar_cli::{Args, error_adapter::ErrorAdapter};

fn main() {
    // Panics are reported through miette as well
    miette::set_panic_hook();

    let args = Args::parse();

    // --log-level sets the global filter; module directives in RUST_LOG still apply
    let log_level = LevelFilter::from_str(&args.log_level).unwrap_or_else(|_| {
        eprintln!(
            "Invalid log level: {}. Using 'warn' instead.",
            args.log_level
        );
        LevelFilter::Warn
    });

    env_logger::Builder::from_env(env_logger::Env::default())
        .filter_level(log_level)
        .init();

    info!(log_level:?; "Starting lodestar");
    debug!(args:?; "Parsed arguments");

    // A failed run leaves any previous output untouched and exits non-zero
    if let Err(err) = lodestar_cli::run(&args) {
        let mut report = String::new();
        miette::GraphicalReportHandler::new()
            .render_report(&mut report, &ErrorAdapter(&err))
            .expect("Writing to String buffer is infallible");

        error!("{report}");
        process::exit(1);
    }

    info!("Completed successfully");
}
