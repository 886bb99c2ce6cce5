mod cli;
mod colors;
mod diagnostics;
mod driver;
mod repl;
mod script;

use std::fs::File;
use std::io::BufReader;

use clap::Parser;

use cli::{Cli, Command};

fn main() {
    let cli = Cli::parse();

    match cli.command {
        None => run_repl(cli::ColorChoice::Auto),
        Some(Command::Repl { color }) => run_repl(color),
        Some(Command::Run { file, color }) => run_script(&file, color),
    }
}

fn run_repl(color: cli::ColorChoice) {
    let stdin = std::io::stdin();
    let stdout = std::io::stdout();
    let stderr = std::io::stderr();

    let result = repl::run(
        stdin.lock(),
        stdout.lock(),
        stderr.lock(),
        color.should_colorize(),
    );

    if let Err(e) = result {
        eprintln!("io error: {e}");
        std::process::exit(2);
    }
}

fn run_script(path: &std::path::Path, color: cli::ColorChoice) {
    let file = match File::open(path) {
        Ok(f) => f,
        Err(e) => {
            eprintln!("failed to open {}: {e}", path.display());
            std::process::exit(2);
        }
    };

    let stdout = std::io::stdout();
    let stderr = std::io::stderr();

    let result = script::run(
        BufReader::new(file),
        stdout.lock(),
        stderr.lock(),
        color.should_colorize(),
    );

    match result {
        Ok(true) => {}
        Ok(false) => std::process::exit(1),
        Err(e) => {
            eprintln!("io error: {e}");
            std::process::exit(2);
        }
    }
}
