//! Editor configuration.
//!
//! Tunables come from a plain `key=value` file; a missing file means
//! defaults. The palette holds one ANSI-256 color per syntax classification;
//! the core never interprets these values, it only hands them to the
//! terminal layer.

use std::fs;
use std::path::Path;

use crate::core::highlight::Highlight;

/// One ANSI-256 color per classification value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Palette {
    pub keyword: u8,
    pub type_name: u8,
    pub comment: u8,
    pub block_comment: u8,
    pub string: u8,
    pub number: u8,
    pub search_match: u8,
    pub normal: u8,
}

impl Default for Palette {
    fn default() -> Self {
        Self {
            keyword: 128,
            type_name: 33,
            comment: 84,
            block_comment: 84,
            string: 172,
            number: 148,
            search_match: 21,
            normal: 250,
        }
    }
}

impl Palette {
    /// Foreground color for a classification. `Match` is painted as a
    /// background color by the terminal layer.
    pub fn color(&self, hl: Highlight) -> u8 {
        match hl {
            Highlight::Keyword => self.keyword,
            Highlight::Identifier => self.type_name,
            Highlight::Comment => self.comment,
            Highlight::BlockComment => self.block_comment,
            Highlight::String => self.string,
            Highlight::Number => self.number,
            Highlight::Match => self.search_match,
            Highlight::Normal => self.normal,
        }
    }
}

#[derive(Debug, Clone)]
pub struct Config {
    /// Width of the left line-number margin
    pub margin: usize,
    /// Tab stop for expansion and coordinate mapping
    pub tab_stop: usize,
    /// Extra Ctrl-Q presses required to quit with unsaved changes
    pub quit_times: u32,
    pub palette: Palette,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            margin: 5,
            tab_stop: 8,
            quit_times: 2,
            palette: Palette::default(),
        }
    }
}

impl Config {
    /// Parse `key=value` lines on top of the defaults.
    ///
    /// Lines without `=` are skipped, unknown keys ignored; malformed values
    /// are a startup error.
    pub fn parse(text: &str) -> Result<Self, String> {
        let mut config = Self::default();

        for (lineno, line) in text.lines().enumerate() {
            let Some((key, value)) = line.split_once('=') else {
                continue;
            };
            let key = key.trim().to_ascii_lowercase();
            let value = value.trim();

            let parsed: u64 = value
                .parse()
                .map_err(|_| format!("line {}: invalid value {:?} for {}", lineno + 1, value, key))?;

            match key.as_str() {
                "margin" => config.margin = parsed as usize,
                "tabstop" => {
                    if parsed == 0 {
                        return Err(format!("line {}: tabstop must be at least 1", lineno + 1));
                    }
                    config.tab_stop = parsed as usize;
                }
                "quittimes" => config.quit_times = parsed as u32,
                "keywordcolor" => config.palette.keyword = parsed as u8,
                "typecolor" => config.palette.type_name = parsed as u8,
                "commentcolor" => config.palette.comment = parsed as u8,
                "blockcommentcolor" => config.palette.block_comment = parsed as u8,
                "stringcolor" => config.palette.string = parsed as u8,
                "numbercolor" => config.palette.number = parsed as u8,
                "matchcolor" => config.palette.search_match = parsed as u8,
                "defaultcolor" => config.palette.normal = parsed as u8,
                _ => {}
            }
        }

        Ok(config)
    }

    /// Load from a file; an absent file yields the defaults.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, Box<dyn std::error::Error>> {
        let path = path.as_ref();
        if !path.exists() {
            return Ok(Self::default());
        }
        let text = fs::read_to_string(path)
            .map_err(|e| format!("failed to read {}: {}", path.display(), e))?;
        Ok(Self::parse(&text)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.margin, 5);
        assert_eq!(config.tab_stop, 8);
        assert_eq!(config.quit_times, 2);
        assert_eq!(config.palette.comment, 84);
    }

    #[test]
    fn test_parse_overrides() {
        let config = Config::parse("tabstop=4\nmatchcolor=99\n").unwrap();
        assert_eq!(config.tab_stop, 4);
        assert_eq!(config.palette.search_match, 99);
        // Untouched keys keep their defaults
        assert_eq!(config.margin, 5);
    }

    #[test]
    fn test_parse_skips_lines_without_separator() {
        let config = Config::parse("just a note\nmargin=7\n").unwrap();
        assert_eq!(config.margin, 7);
    }

    #[test]
    fn test_parse_ignores_unknown_keys() {
        let config = Config::parse("somefuturekey=1\n").unwrap();
        assert_eq!(config.margin, 5);
    }

    #[test]
    fn test_parse_rejects_malformed_value() {
        assert!(Config::parse("tabstop=wide\n").is_err());
    }

    #[test]
    fn test_parse_rejects_zero_tab_stop() {
        assert!(Config::parse("tabstop=0\n").is_err());
    }

    #[test]
    fn test_palette_lookup() {
        let palette = Palette::default();
        assert_eq!(palette.color(Highlight::Keyword), 128);
        assert_eq!(palette.color(Highlight::Normal), 250);
    }

    #[test]
    fn test_load_missing_file_is_default() {
        let config = Config::load("/nonexistent/slate-config.txt").unwrap();
        assert_eq!(config.tab_stop, 8);
    }
}
