mod application;
mod domain;
mod infrastructure;
mod presentation;

use clap::Parser;
use colored::Colorize;
use crate::infrastructure::logger::init_logging;
use crate::presentation::cli::Cli;

/// hurl-probe: one HTTP request, fully reported
///
/// Sends a single request built from JSON-valued flags (headers, form data,
/// JSON body, file uploads), optionally downloads the response to a file, and
/// prints a JSON report with the raw request dump, the response and a timing
/// breakdown of DNS, connect, TLS and transfer.
#[tokio::main(flavor = "current_thread")]
async fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    if let Err(err) = cli.run().await {
        tracing::debug!(error = ?err, "request failed");
        eprintln!("{} {}", "error:".red().bold(), err);
        std::process::exit(1);
    }
}
