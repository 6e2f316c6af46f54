//! CLI argument parsing with clap

use crate::config::Config;
use clap::Parser;
use std::path::PathBuf;

/// Media Dater - canonical capture dates for media files
///
/// Assigns a single authoritative capture date to each photo and video
/// in a source directory (from the filename when possible, otherwise
/// from embedded metadata), rewrites the file's timestamp metadata via
/// ExifTool and files the result under output/photos, output/videos or
/// output/failed.
#[derive(Parser, Debug)]
#[command(name = "media-dater")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Path to configuration file (TOML format)
    ///
    /// When specified, settings from the config file are used as defaults.
    /// CLI arguments will override config file settings.
    #[arg(short = 'C', long)]
    pub config: Option<PathBuf>,

    /// Source directory to scan for media files (non-recursive)
    #[arg(short, long)]
    pub source: Option<PathBuf>,

    /// Output directory for filed media and the summary report
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Path to the exiftool binary (default: resolved via PATH)
    #[arg(long, env = "MEDIA_DATER_EXIFTOOL")]
    pub exiftool: Option<PathBuf>,

    /// Directory for log files (default: Log next to the executable)
    #[arg(long)]
    pub log_dir: Option<PathBuf>,

    /// Verbose output
    #[arg(short, long)]
    pub verbose: bool,

    /// Output log format as JSON
    #[arg(long)]
    pub json_log: bool,
}

impl Cli {
    /// Get config file name (without extension) for log naming
    pub fn config_name(&self) -> Option<String> {
        self.config.as_ref().and_then(|p| {
            p.file_stem()
                .and_then(|s| s.to_str())
                .map(|s| s.to_string())
        })
    }

    /// Merge CLI arguments with config from file
    /// CLI arguments take precedence over config file settings
    pub fn merge_with_config(&self, mut config: Config) -> Config {
        if let Some(ref source) = self.source {
            config.source_dir = source.clone();
        }
        if let Some(ref output) = self.output {
            config.output_dir = output.clone();
        }
        if let Some(ref exiftool) = self.exiftool {
            config.exiftool = Some(exiftool.clone());
        }
        if self.verbose {
            config.verbose = true;
        }

        config
    }

    /// Convert CLI arguments to Config (when no config file is used)
    pub fn to_config(&self) -> Config {
        let mut config = Config::default();

        if let Some(ref source) = self.source {
            config.source_dir = source.clone();
        }
        config.output_dir = match self.output {
            Some(ref output) => output.clone(),
            // The report and the filed media live next to the source files
            None => config.source_dir.join("output"),
        };
        config.exiftool = self.exiftool.clone();
        config.verbose = self.verbose;

        config
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_output_defaults_under_source() {
        let cli = Cli::parse_from(["media-dater", "--source", "/media/incoming"]);
        let config = cli.to_config();
        assert_eq!(config.source_dir, PathBuf::from("/media/incoming"));
        assert_eq!(config.output_dir, PathBuf::from("/media/incoming/output"));
    }

    #[test]
    fn test_cli_overrides_config_file() {
        let cli = Cli::parse_from(["media-dater", "--output", "/elsewhere", "--verbose"]);
        let file_config = Config {
            output_dir: PathBuf::from("from-file"),
            ..Config::default()
        };
        let merged = cli.merge_with_config(file_config);
        assert_eq!(merged.output_dir, PathBuf::from("/elsewhere"));
        assert!(merged.verbose);
        // Untouched settings survive the merge
        assert_eq!(merged.source_dir, PathBuf::from("."));
    }
}
