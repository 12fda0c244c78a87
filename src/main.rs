use anyhow::Result;
use clap::Parser;
use regsync::cli::Cli;
use std::process::ExitCode;

fn main() -> Result<ExitCode> {
    env_logger::init();

    let cli = Cli::parse();
    cli.run()
}
