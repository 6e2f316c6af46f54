//! Configuration types for the media dater

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Media class, determined solely by file extension
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MediaClass {
    /// Photo files (jpg)
    Photo,
    /// Video files (mp4)
    Video,
}

impl MediaClass {
    /// Get the success folder name for this media class
    pub fn folder_name(&self) -> &'static str {
        match self {
            MediaClass::Photo => "photos",
            MediaClass::Video => "videos",
        }
    }

    /// Human-readable plural label, used in progress and summary output
    pub fn label(&self) -> &'static str {
        match self {
            MediaClass::Photo => "photos",
            MediaClass::Video => "videos",
        }
    }
}

/// Configuration for the media dater
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Source directory containing unprocessed media files (flat, not recursive)
    pub source_dir: PathBuf,

    /// Output directory holding the photos/videos/failed subdirectories
    pub output_dir: PathBuf,

    /// Path to the exiftool binary (searched in PATH when not set)
    #[serde(default)]
    pub exiftool: Option<PathBuf>,

    /// Supported photo extensions
    pub photo_extensions: Vec<String>,

    /// Supported video extensions
    pub video_extensions: Vec<String>,

    /// Verbose output
    pub verbose: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            source_dir: PathBuf::from("."),
            output_dir: PathBuf::from("output"),
            exiftool: None,
            photo_extensions: vec!["jpg".into()],
            video_extensions: vec!["mp4".into()],
            verbose: false,
        }
    }
}

impl Config {
    /// Check if a file extension is a supported photo format
    pub fn is_photo(&self, ext: &str) -> bool {
        let ext_lower = ext.to_lowercase();
        self.photo_extensions.iter().any(|e| e == &ext_lower)
    }

    /// Check if a file extension is a supported video format
    pub fn is_video(&self, ext: &str) -> bool {
        let ext_lower = ext.to_lowercase();
        self.video_extensions.iter().any(|e| e == &ext_lower)
    }

    /// Get the media class for a given extension
    pub fn media_class(&self, ext: &str) -> Option<MediaClass> {
        if self.is_photo(ext) {
            Some(MediaClass::Photo)
        } else if self.is_video(ext) {
            Some(MediaClass::Video)
        } else {
            None
        }
    }

    /// Success directory for a media class
    pub fn class_dir(&self, class: MediaClass) -> PathBuf {
        self.output_dir.join(class.folder_name())
    }

    /// Directory holding files that could not be processed
    pub fn failed_dir(&self) -> PathBuf {
        self.output_dir.join("failed")
    }

    /// Path of the run summary report
    pub fn summary_path(&self) -> PathBuf {
        self.output_dir.join("summary.txt")
    }

    /// Load configuration from a TOML file
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|e| ConfigError::ReadError {
            path: path.to_path_buf(),
            source: e,
        })?;

        let config: Config = toml::from_str(&content).map_err(|e| ConfigError::ParseError {
            path: path.to_path_buf(),
            source: e,
        })?;

        Ok(config)
    }

    /// Generate a sample configuration file content
    pub fn sample_config() -> String {
        r#"# Media Dater Configuration File
# This file uses TOML format (https://toml.io)

# Source directory containing the media files to process.
# Only the directory itself is scanned, not subdirectories.
source_dir = "."

# Output directory. The photos/, videos/ and failed/ subdirectories
# and the summary.txt report are created here.
output_dir = "output"

# Path to the exiftool binary. When omitted, "exiftool" is resolved
# through PATH.
# exiftool = "C:/Tools/exiftool.exe"

# Supported file extensions (matched case-insensitively)
photo_extensions = ["jpg"]
video_extensions = ["mp4"]

# Verbose output - show detailed processing information
verbose = false
"#
        .to_string()
    }
}

/// Errors that can occur when loading configuration
#[derive(Debug)]
pub enum ConfigError {
    /// Failed to read configuration file
    ReadError {
        path: PathBuf,
        source: std::io::Error,
    },
    /// Failed to parse configuration file
    ParseError {
        path: PathBuf,
        source: toml::de::Error,
    },
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::ReadError { path, source } => {
                write!(f, "Failed to read config file '{}': {}", path.display(), source)
            }
            ConfigError::ParseError { path, source } => {
                write!(f, "Failed to parse config file '{}': {}", path.display(), source)
            }
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ConfigError::ReadError { source, .. } => Some(source),
            ConfigError::ParseError { source, .. } => Some(source),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_media_class_from_extension() {
        let config = Config::default();
        assert_eq!(config.media_class("jpg"), Some(MediaClass::Photo));
        assert_eq!(config.media_class("JPG"), Some(MediaClass::Photo));
        assert_eq!(config.media_class("mp4"), Some(MediaClass::Video));
        assert_eq!(config.media_class("MP4"), Some(MediaClass::Video));
        assert_eq!(config.media_class("png"), None);
        assert_eq!(config.media_class("mov"), None);
    }

    #[test]
    fn test_output_layout() {
        let config = Config {
            output_dir: PathBuf::from("out"),
            ..Config::default()
        };
        assert_eq!(config.class_dir(MediaClass::Photo), PathBuf::from("out/photos"));
        assert_eq!(config.class_dir(MediaClass::Video), PathBuf::from("out/videos"));
        assert_eq!(config.failed_dir(), PathBuf::from("out/failed"));
        assert_eq!(config.summary_path(), PathBuf::from("out/summary.txt"));
    }

    #[test]
    fn test_sample_config_parses() {
        let config: Config = toml::from_str(&Config::sample_config()).unwrap();
        assert_eq!(config.photo_extensions, vec!["jpg".to_string()]);
        assert_eq!(config.video_extensions, vec!["mp4".to_string()]);
    }
}
