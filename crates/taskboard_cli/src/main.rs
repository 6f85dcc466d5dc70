//! `taskboard` command-line entry point.

mod cli;
mod commands;
mod error;
mod output;

use clap::Parser;

fn main() {
    let cli = cli::Cli::parse();
    match commands::run(cli) {
        Ok(text) => print!("{text}"),
        Err(err) => {
            log::error!("event=cli_command module=cli status=error error={err}");
            eprintln!("error: {err}");
            std::process::exit(1);
        }
    }
}
