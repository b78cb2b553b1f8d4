//! Sheetline - read, append to and update header-keyed grids.

use clap::Parser;
use sheetline::cli::{Cli, run};
use sheetline_core::ServiceError;

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    if let Err(err) = run(cli) {
        match err.downcast_ref::<ServiceError>() {
            Some(service_err) => eprintln!("Error ({}): {}", service_err.status(), service_err),
            None => eprintln!("Error: {:#}", err),
        }
        std::process::exit(1);
    }
}
