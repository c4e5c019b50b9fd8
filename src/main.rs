//! burnmap CLI entrypoint.
//!
//! Provides a thin wrapper over the `cli` module: parse args, run one
//! pre/post change map, print the JSON report and exit with an appropriate
//! status. For programmatic use, prefer the library API (`burnmap::api`).

use clap::Parser;

mod cli;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = cli::CliArgs::parse();
    cli::run(args)?;
    Ok(())
}
