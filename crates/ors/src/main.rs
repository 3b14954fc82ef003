//! Orders Lookup Service - Entry Point
//!
//! Binary entry point; lives in the `ors` facade crate next to the library
//! so both share one name.

use clap::Parser;
use ors::{Cli, run};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    run(Cli::parse()).await
}
