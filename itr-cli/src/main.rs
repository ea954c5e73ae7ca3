use std::process::ExitCode;

use clap::Parser;
use itr_cli::Cli;

fn main() -> ExitCode {
    let cli = Cli::parse();

    match itr_cli::run(cli) {
        Ok(output) => {
            println!("{output}");
            ExitCode::SUCCESS
        }
        Err(err) => {
            eprintln!("{err:#}");
            ExitCode::FAILURE
        }
    }
}
