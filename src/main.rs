//! API documentation scanner - command-line tool for indexing file-based route handlers.
//!
//! # Usage
//!
//! ```bash
//! api-doc-scanner [OPTIONS] <ROUTES_ROOT>
//! ```
//!
//! # Examples
//!
//! Print the JSON index consumed by the documentation UI:
//! ```bash
//! api-doc-scanner ./app/api
//! ```
//!
//! Write YAML with extra description entries:
//! ```bash
//! api-doc-scanner ./app/api -f yaml -t tables.yaml -o api-docs.yaml
//! ```

use anyhow::Result;
use api_doc_scanner::cli;
use clap::Parser;
use log::info;

fn main() -> Result<()> {
    let args = cli::CliArgs::parse();

    let log_level = if args.verbose {
        log::LevelFilter::Debug
    } else {
        log::LevelFilter::Info
    };

    env_logger::Builder::from_default_env()
        .filter_level(log_level)
        .init();

    info!("API documentation scanner starting...");

    let args = cli::parse_args_from_parsed(args)?;
    cli::run(args)?;

    info!("API documentation index generated successfully");

    Ok(())
}
