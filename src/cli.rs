//! Command-line argument parsing for slate.
//!
//! This module provides the `Cli` struct which encapsulates all command-line
//! options and methods for parsing them.

use std::path::PathBuf;

/// Command-line interface configuration.
#[derive(Debug, Default)]
pub struct Cli {
    /// File to open
    pub file: Option<PathBuf>,

    /// Configuration file path override
    pub config_path: Option<PathBuf>,
}

impl Cli {
    /// Parse command-line arguments.
    ///
    /// Returns a `Cli` struct populated with parsed arguments.
    /// Returns an error if required values are missing.
    pub fn parse() -> Result<Self, Box<dyn std::error::Error>> {
        Self::parse_from(std::env::args().skip(1))
    }

    fn parse_from(args: impl IntoIterator<Item = String>) -> Result<Self, Box<dyn std::error::Error>> {
        let mut cli = Self::default();
        let mut args = args.into_iter();

        while let Some(arg) = args.next() {
            match arg.as_str() {
                "-c" | "--config" => {
                    if let Some(path) = args.next() {
                        cli.config_path = Some(PathBuf::from(path));
                    } else {
                        return Err("--config requires a value".into());
                    }
                }
                "-h" | "--help" => {
                    println!("slate - a lightweight terminal text editor");
                    println!();
                    println!("Usage: slate [OPTIONS] [FILE]");
                    println!();
                    println!("Options:");
                    println!("  -h, --help         Show this help message");
                    println!("  -V, --version      Print version information");
                    println!("  -c, --config PATH  Use an alternate config file");
                    std::process::exit(0);
                }
                "-V" | "--version" => {
                    println!("slate {}", env!("CARGO_PKG_VERSION"));
                    std::process::exit(0);
                }
                arg if arg.starts_with('-') => {
                    return Err(format!("Unknown flag: {}. Use --help for usage.", arg).into());
                }
                _ => {
                    if cli.file.is_some() {
                        return Err("only one file may be opened at a time".into());
                    }
                    cli.file = Some(PathBuf::from(arg));
                }
            }
        }

        Ok(cli)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> Result<Cli, Box<dyn std::error::Error>> {
        Cli::parse_from(args.iter().map(|s| s.to_string()))
    }

    #[test]
    fn test_parse_file_argument() {
        let cli = parse(&["notes.txt"]).unwrap();
        assert_eq!(cli.file, Some(PathBuf::from("notes.txt")));
    }

    #[test]
    fn test_parse_config_override() {
        let cli = parse(&["--config", "mine.txt", "a.c"]).unwrap();
        assert_eq!(cli.config_path, Some(PathBuf::from("mine.txt")));
        assert_eq!(cli.file, Some(PathBuf::from("a.c")));
    }

    #[test]
    fn test_config_requires_value() {
        assert!(parse(&["--config"]).is_err());
    }

    #[test]
    fn test_unknown_flag_rejected() {
        assert!(parse(&["--frobnicate"]).is_err());
    }

    #[test]
    fn test_second_file_rejected() {
        assert!(parse(&["a.c", "b.c"]).is_err());
    }
}
