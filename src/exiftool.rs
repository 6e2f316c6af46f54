//! ExifTool adapter
//!
//! Narrow boundary around the external `exiftool` binary: one call to
//! read a file's metadata as a string-keyed record, one call to rewrite
//! its timestamp tags in place. The pipeline only sees the
//! [`MetadataTool`] trait, so tests drive it with canned fakes.

use crate::config::MediaClass;
use crate::error::{Error, Result};
use chrono::NaiveDateTime;
use serde_json::Value;
use std::path::{Path, PathBuf};
use std::process::Command;
use tracing::{debug, trace};

/// Timestamp format understood by ExifTool tag assignments
pub const EXIFTOOL_DATE_FORMAT: &str = "%Y:%m:%d %H:%M:%S";

/// Video timestamp tags rewritten on a successful date resolution.
/// Covers container, track and filesystem metadata.
const VIDEO_WRITE_TAGS: &[&str] = &[
    "CreateDate",
    "ModifyDate",
    "MediaCreateDate",
    "MediaModifyDate",
    "TrackCreateDate",
    "TrackModifyDate",
    "FileCreateDate",
    "FileModifyDate",
];

/// One file's metadata as returned by `exiftool -json`
///
/// Lookup is by explicit field name; the record's own ordering is
/// never relied upon. Values may arrive as JSON strings or numbers.
#[derive(Debug, Clone, Default)]
pub struct MetadataRecord(serde_json::Map<String, Value>);

impl MetadataRecord {
    /// Create an empty record
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a raw string value (used when building canned records)
    pub fn insert(&mut self, field: &str, value: &str) {
        self.0.insert(field.to_string(), Value::String(value.to_string()));
    }

    /// Get a field's raw value as a string
    ///
    /// ExifTool emits some tags as bare numbers; those are rendered
    /// with their JSON representation.
    pub fn get(&self, field: &str) -> Option<String> {
        match self.0.get(field)? {
            Value::String(s) => Some(s.clone()),
            Value::Number(n) => Some(n.to_string()),
            _ => None,
        }
    }

    /// True when the record holds no fields at all
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// Boundary for reading and rewriting embedded timestamp metadata
pub trait MetadataTool {
    /// Read the metadata record for one file
    fn read_metadata(&self, path: &Path) -> Result<MetadataRecord>;

    /// Rewrite the file's timestamp tags in place (destructive, no backup)
    fn write_dates(
        &self,
        path: &Path,
        timestamp: &NaiveDateTime,
        class: MediaClass,
    ) -> Result<()>;
}

/// Production adapter shelling out to the `exiftool` binary
pub struct ExifTool {
    program: PathBuf,
}

impl ExifTool {
    /// Locate ExifTool and verify it runs
    ///
    /// Probes `exiftool -ver`; a missing or non-runnable binary is
    /// fatal to the whole run.
    pub fn locate(program: Option<PathBuf>) -> Result<Self> {
        let program = program.unwrap_or_else(|| PathBuf::from("exiftool"));

        let output = Command::new(&program)
            .arg("-ver")
            .output()
            .map_err(|_| Error::ExifToolNotFound)?;
        if !output.status.success() {
            return Err(Error::ExifToolNotFound);
        }

        let version = String::from_utf8_lossy(&output.stdout).trim().to_string();
        debug!(program = %program.display(), version, "Located ExifTool");

        Ok(Self { program })
    }

    /// Build the tag-assignment arguments for a write, without the file path
    fn write_args(timestamp: &NaiveDateTime, class: MediaClass) -> Vec<String> {
        let date_str = timestamp.format(EXIFTOOL_DATE_FORMAT).to_string();
        let mut args = vec!["-overwrite_original".to_string()];

        match class {
            MediaClass::Photo => {
                // AllDates covers DateTimeOriginal/CreateDate/ModifyDate
                args.push(format!("-AllDates={}", date_str));
                args.push(format!("-FileModifyDate={}", date_str));
            }
            MediaClass::Video => {
                for tag in VIDEO_WRITE_TAGS {
                    args.push(format!("-{}={}", tag, date_str));
                }
            }
        }

        args
    }
}

impl MetadataTool for ExifTool {
    fn read_metadata(&self, path: &Path) -> Result<MetadataRecord> {
        let output = Command::new(&self.program)
            .arg("-json")
            .arg(path)
            .output()
            .map_err(|e| Error::MetadataRead {
                path: path.to_path_buf(),
                message: format!("Failed to execute exiftool: {}", e),
            })?;

        if !output.status.success() {
            return Err(Error::MetadataRead {
                path: path.to_path_buf(),
                message: format!(
                    "exiftool failed: {}",
                    String::from_utf8_lossy(&output.stderr).trim()
                ),
            });
        }

        let json_str = String::from_utf8_lossy(&output.stdout);
        trace!(?path, "exiftool output: {}", json_str);

        // exiftool -json emits an array with one object per input file
        let mut records: Vec<serde_json::Map<String, Value>> =
            serde_json::from_str(&json_str).map_err(|e| Error::MetadataRead {
                path: path.to_path_buf(),
                message: format!("Failed to parse exiftool JSON: {}", e),
            })?;

        if records.is_empty() {
            return Err(Error::MetadataRead {
                path: path.to_path_buf(),
                message: "exiftool returned no records".to_string(),
            });
        }

        Ok(MetadataRecord(records.swap_remove(0)))
    }

    fn write_dates(
        &self,
        path: &Path,
        timestamp: &NaiveDateTime,
        class: MediaClass,
    ) -> Result<()> {
        let args = Self::write_args(timestamp, class);

        let output = Command::new(&self.program)
            .args(&args)
            .arg(path)
            .output()
            .map_err(|e| Error::MetadataWrite {
                path: path.to_path_buf(),
                message: format!("Failed to execute exiftool: {}", e),
            })?;

        if !output.status.success() {
            return Err(Error::MetadataWrite {
                path: path.to_path_buf(),
                message: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            });
        }

        debug!(?path, timestamp = %timestamp, ?class, "Rewrote metadata dates");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn ts() -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2023, 1, 15)
            .unwrap()
            .and_hms_opt(15, 0, 0)
            .unwrap()
    }

    #[test]
    fn test_photo_write_args() {
        let args = ExifTool::write_args(&ts(), MediaClass::Photo);
        assert_eq!(
            args,
            vec![
                "-overwrite_original",
                "-AllDates=2023:01:15 15:00:00",
                "-FileModifyDate=2023:01:15 15:00:00",
            ]
        );
    }

    #[test]
    fn test_video_write_args() {
        let args = ExifTool::write_args(&ts(), MediaClass::Video);
        assert_eq!(args.len(), 1 + VIDEO_WRITE_TAGS.len());
        assert_eq!(args[0], "-overwrite_original");
        assert!(args.contains(&"-TrackCreateDate=2023:01:15 15:00:00".to_string()));
        assert!(args.contains(&"-FileModifyDate=2023:01:15 15:00:00".to_string()));
    }

    #[test]
    fn test_record_get_converts_numbers() {
        let mut map = serde_json::Map::new();
        map.insert("ImageWidth".into(), Value::Number(4000.into()));
        map.insert("Artist".into(), Value::String("someone".into()));
        map.insert("Tags".into(), Value::Array(vec![]));
        let record = MetadataRecord(map);

        assert_eq!(record.get("ImageWidth").as_deref(), Some("4000"));
        assert_eq!(record.get("Artist").as_deref(), Some("someone"));
        assert_eq!(record.get("Tags"), None);
        assert_eq!(record.get("Missing"), None);
        assert!(!record.is_empty());
    }
}
