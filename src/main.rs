//! This is the main entry point for cmdshell.

use cmdshell::cli;

fn main() {
    if let Err(e) = cli::parse(None) {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}
