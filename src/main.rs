//! Swagger documentation generator - command-line tool.
//!
//! Reads the annotated handlers of an API package and writes the Swagger 1.2 documentation,
//! by default as an embeddable Rust module serving it over `http` types.
//!
//! # Usage
//!
//! ```bash
//! swagger-from-source --api-package <PKG> --base-path <URL> [OPTIONS]
//! ```
//!
//! # Examples
//!
//! Generate the docs module for `$SWAGGER_SOURCE_ROOT/src/api`:
//! ```bash
//! swagger-from-source --api-package src/api --base-path https://shop.example.com -o src/api_docs.rs
//! ```
//!
//! Dump the documents as JSON instead:
//! ```bash
//! swagger-from-source --root . --api-package src/api --base-path http://localhost:8080 -f json -o swagger.json
//! ```

use anyhow::Result;
use clap::Parser;
use log::info;
use swagger_from_source::cli;

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

    info!("Swagger documentation generator starting...");

    let args = cli::parse_args_from_parsed(args)?;
    cli::run(args)?;

    info!("Swagger documentation generation completed successfully");

    Ok(())
}
