//! slate - a lightweight terminal text editor.
//!
//! This is the main entry point. It parses CLI arguments, loads the
//! configuration, and hands control to the terminal run loop.

use std::path::PathBuf;

use slate::cli::Cli;
use slate::config::Config;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse()?;

    let config_path = cli
        .config_path
        .unwrap_or_else(|| PathBuf::from("config.txt"));
    let config = Config::load(&config_path)?;

    slate::run::run(cli.file, config)
}
