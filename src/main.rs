//! Tollgate - toll transaction processing for RFID and ANPR lanes

use clap::Parser;
use tollgate::cli::Cli;
use tollgate::commands;

fn main() {
    let cli = Cli::parse();

    if let Err(e) = commands::execute(cli) {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}
