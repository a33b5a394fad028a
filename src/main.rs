use clap::Parser;
use sortdir::cli::{self, Cli};
use std::process::ExitCode;

fn main() -> ExitCode {
    let cli = Cli::parse();
    ExitCode::from(cli::run(&cli))
}
