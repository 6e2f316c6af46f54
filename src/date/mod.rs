//! Date resolution module
//!
//! Derives one canonical capture date per file from two strategies:
//! - Filename parsing (WhatsApp-style stems), which is authoritative
//! - Metadata field resolution via the external metadata tool
//!
//! Whatever the source, the resulting timestamp always carries the
//! fixed 15:00:00 time-of-day; the capture time is never trusted.

pub mod filename;
pub mod metadata;

use crate::config::MediaClass;
use crate::exiftool::MetadataTool;
use chrono::{NaiveDate, NaiveDateTime};
use std::path::Path;
use tracing::debug;

/// Fixed time-of-day carried by every canonical date
const CANONICAL_HOUR: u32 = 15;

/// Build the canonical timestamp for a calendar date (15:00:00)
pub fn canonical(date: NaiveDate) -> NaiveDateTime {
    date.and_hms_opt(CANONICAL_HOUR, 0, 0)
        .expect("fixed canonical time-of-day is always valid")
}

/// Source of a resolved date
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DateSource {
    /// Parsed from the filename stem
    Filename,
    /// Resolved from a metadata field
    Metadata,
}

/// Why no date could be resolved for a file
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NoDateReason {
    /// The metadata tool failed or returned nothing
    MetadataUnreadable(String),
    /// Metadata was readable but no priority field held a parseable value
    NoUsableField,
}

impl std::fmt::Display for NoDateReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            NoDateReason::MetadataUnreadable(message) => {
                write!(f, "Failed to read metadata (exiftool): {}", message)
            }
            NoDateReason::NoUsableField => {
                write!(f, "Could not determine date (no usable date field)")
            }
        }
    }
}

/// Outcome of date resolution for one file
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DateResolution {
    /// A canonical date was derived
    Resolved {
        timestamp: NaiveDateTime,
        source: DateSource,
    },
    /// Neither strategy produced a date
    NoDate(NoDateReason),
}

/// Resolve the canonical date for a media file
///
/// The filename strategy runs first and short-circuits: when the stem
/// matches, the metadata tool is never invoked. Otherwise the record
/// is fetched and walked with the class-appropriate priority list.
pub fn resolve_date(path: &Path, class: MediaClass, tool: &dyn MetadataTool) -> DateResolution {
    if let Some(stem) = path.file_stem().and_then(|s| s.to_str())
        && let Some(timestamp) = filename::parse_filename_date(stem)
    {
        debug!(?path, %timestamp, "Resolved date from filename");
        return DateResolution::Resolved {
            timestamp,
            source: DateSource::Filename,
        };
    }

    let record = match tool.read_metadata(path) {
        Ok(record) => record,
        Err(e) => {
            debug!(?path, error = %e, "Metadata fetch failed");
            return DateResolution::NoDate(NoDateReason::MetadataUnreadable(e.to_string()));
        }
    };

    if record.is_empty() {
        return DateResolution::NoDate(NoDateReason::MetadataUnreadable(
            "empty metadata record".to_string(),
        ));
    }

    match metadata::resolve_metadata_date(&record, class) {
        Some(timestamp) => {
            debug!(?path, %timestamp, "Resolved date from metadata");
            DateResolution::Resolved {
                timestamp,
                source: DateSource::Metadata,
            }
        }
        None => DateResolution::NoDate(NoDateReason::NoUsableField),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{Error, Result};
    use crate::exiftool::MetadataRecord;
    use chrono::{Datelike, Timelike};
    use std::cell::Cell;

    /// Canned metadata tool that counts reads
    struct FakeTool {
        record: Option<MetadataRecord>,
        reads: Cell<usize>,
    }

    impl FakeTool {
        fn with_record(record: MetadataRecord) -> Self {
            Self {
                record: Some(record),
                reads: Cell::new(0),
            }
        }

        fn failing() -> Self {
            Self {
                record: None,
                reads: Cell::new(0),
            }
        }
    }

    impl MetadataTool for FakeTool {
        fn read_metadata(&self, path: &Path) -> Result<MetadataRecord> {
            self.reads.set(self.reads.get() + 1);
            self.record.clone().ok_or_else(|| Error::MetadataRead {
                path: path.to_path_buf(),
                message: "exiftool exited with status 1".into(),
            })
        }

        fn write_dates(
            &self,
            _path: &Path,
            _timestamp: &NaiveDateTime,
            _class: MediaClass,
        ) -> Result<()> {
            Ok(())
        }
    }

    #[test]
    fn test_filename_wins_without_metadata_lookup() {
        let tool = FakeTool::failing();
        let resolution = resolve_date(
            Path::new("IMG-20230115-WA0042.jpg"),
            MediaClass::Photo,
            &tool,
        );

        match resolution {
            DateResolution::Resolved { timestamp, source } => {
                assert_eq!(source, DateSource::Filename);
                assert_eq!(timestamp.year(), 2023);
                assert_eq!(timestamp.month(), 1);
                assert_eq!(timestamp.day(), 15);
                assert_eq!(timestamp.hour(), 15);
            }
            other => panic!("expected resolved date, got {:?}", other),
        }
        assert_eq!(tool.reads.get(), 0, "metadata must not be consulted");
    }

    #[test]
    fn test_metadata_fallback() {
        let mut record = MetadataRecord::new();
        record.insert("DateTimeOriginal", "2022:06:01 10:23:45+02:00");
        let tool = FakeTool::with_record(record);

        let resolution = resolve_date(Path::new("random_photo.jpg"), MediaClass::Photo, &tool);
        match resolution {
            DateResolution::Resolved { timestamp, source } => {
                assert_eq!(source, DateSource::Metadata);
                assert_eq!(timestamp.year(), 2022);
                assert_eq!(timestamp.month(), 6);
                assert_eq!(timestamp.day(), 1);
                assert_eq!(timestamp.hour(), 15);
            }
            other => panic!("expected resolved date, got {:?}", other),
        }
        assert_eq!(tool.reads.get(), 1);
    }

    #[test]
    fn test_metadata_fetch_failure() {
        let tool = FakeTool::failing();
        let resolution = resolve_date(Path::new("clip.mp4"), MediaClass::Video, &tool);
        match resolution {
            DateResolution::NoDate(NoDateReason::MetadataUnreadable(message)) => {
                assert!(message.contains("exiftool"));
            }
            other => panic!("expected metadata-unreadable, got {:?}", other),
        }
    }

    #[test]
    fn test_empty_record_counts_as_unreadable() {
        let tool = FakeTool::with_record(MetadataRecord::new());
        let resolution = resolve_date(Path::new("clip.mp4"), MediaClass::Video, &tool);
        assert!(matches!(
            resolution,
            DateResolution::NoDate(NoDateReason::MetadataUnreadable(_))
        ));
    }

    #[test]
    fn test_no_usable_field() {
        let mut record = MetadataRecord::new();
        record.insert("Artist", "nobody");
        let tool = FakeTool::with_record(record);

        let resolution = resolve_date(Path::new("clip.mp4"), MediaClass::Video, &tool);
        assert_eq!(
            resolution,
            DateResolution::NoDate(NoDateReason::NoUsableField)
        );
    }
}
