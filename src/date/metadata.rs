//! Metadata date resolution
//!
//! Walks an ordered list of metadata fields per media class and
//! returns the first one holding a parseable timestamp. The priority
//! order is fixed; a later field never wins over an earlier one.

use crate::config::MediaClass;
use crate::date::canonical;
use crate::exiftool::MetadataRecord;
use chrono::NaiveDateTime;
use tracing::trace;

/// Photo metadata fields to try, in priority order
const PHOTO_DATE_FIELDS: &[&str] = &[
    "DateTimeOriginal",
    "CreateDate",
    "SubSecDateTimeOriginal",
    "SubSecCreateDate",
    "SubSecModifyDate",
    "ModifyDate",
    "FileModifyDate",
];

/// Video metadata fields to try, in priority order
const VIDEO_DATE_FIELDS: &[&str] = &[
    "CreationDate",
    "DateTimeOriginal",
    "CreateDate",
    "MediaCreateDate",
    "TrackCreateDate",
    "ModifyDate",
    "MediaModifyDate",
    "TrackModifyDate",
    "FileModifyDate",
];

/// Accepted datetime patterns, tried in order after normalization
const DATETIME_FORMATS: &[&str] = &["%Y:%m:%d %H:%M:%S", "%Y-%m-%d %H:%M:%S"];

/// Metadata field priority list for a media class
pub fn date_fields(class: MediaClass) -> &'static [&'static str] {
    match class {
        MediaClass::Photo => PHOTO_DATE_FIELDS,
        MediaClass::Video => VIDEO_DATE_FIELDS,
    }
}

/// Find the first field in the class's priority list with a parseable
/// timestamp and return it as a canonical date
pub fn resolve_metadata_date(record: &MetadataRecord, class: MediaClass) -> Option<NaiveDateTime> {
    for field in date_fields(class) {
        let Some(raw) = record.get(field) else {
            continue;
        };
        if raw.trim().is_empty() {
            continue;
        }
        if let Some(dt) = parse_metadata_datetime(&raw) {
            trace!(field, raw = %raw, "Found usable metadata date field");
            return Some(dt);
        }
    }

    None
}

/// Parse a raw metadata value into a canonical date
///
/// The value is normalized first (fractional seconds and timezone
/// suffixes stripped), then matched against the accepted patterns.
/// The source time-of-day is discarded.
pub fn parse_metadata_datetime(raw: &str) -> Option<NaiveDateTime> {
    let normalized = normalize_datetime(raw);

    for format in DATETIME_FORMATS {
        if let Ok(dt) = NaiveDateTime::parse_from_str(normalized, format) {
            return Some(canonical(dt.date()));
        }
    }

    None
}

/// Strip fractional-seconds and timezone suffixes from a raw value
///
/// ExifTool emits values like `2022:06:01 10:23:45.123+02:00`,
/// `2022:06:01 10:23:45Z` or `2022:06:01 10:23:45 UTC`. Only the
/// date and whole-second time component is kept. A `-` counts as a
/// timezone marker only after the time separator, so hyphen-delimited
/// dates survive.
fn normalize_datetime(raw: &str) -> &str {
    let mut s = raw.trim();

    if let Some(i) = s.find('.') {
        s = &s[..i];
    }
    if let Some(i) = s.find('+') {
        s = &s[..i];
    }
    if let Some(sep) = s.find([' ', 'T'])
        && let Some(i) = s[sep..].find('-')
    {
        s = &s[..sep + i];
    }

    s = s.trim_end_matches("UTC").trim_end_matches('Z').trim();
    s
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::MediaClass;
    use chrono::{Datelike, Timelike};

    fn record(pairs: &[(&str, &str)]) -> MetadataRecord {
        let mut rec = MetadataRecord::new();
        for (field, value) in pairs {
            rec.insert(field, value);
        }
        rec
    }

    #[test]
    fn test_normalize_datetime() {
        assert_eq!(normalize_datetime("2022:06:01 10:23:45"), "2022:06:01 10:23:45");
        assert_eq!(normalize_datetime("2022:06:01 10:23:45+02:00"), "2022:06:01 10:23:45");
        assert_eq!(normalize_datetime("2022:06:01 10:23:45.123"), "2022:06:01 10:23:45");
        assert_eq!(normalize_datetime("2022:06:01 10:23:45.123+02:00"), "2022:06:01 10:23:45");
        assert_eq!(normalize_datetime("2022:06:01 10:23:45Z"), "2022:06:01 10:23:45");
        assert_eq!(normalize_datetime("2022:06:01 10:23:45 UTC"), "2022:06:01 10:23:45");
        // Negative offset after a hyphen-delimited date
        assert_eq!(normalize_datetime("2022-06-01 10:23:45-05:00"), "2022-06-01 10:23:45");
        assert_eq!(normalize_datetime("  2022:06:01 10:23:45 "), "2022:06:01 10:23:45");
    }

    #[test]
    fn test_parse_discards_time_of_day() {
        let dt = parse_metadata_datetime("2022:06:01 10:23:45+02:00").unwrap();
        assert_eq!(dt.year(), 2022);
        assert_eq!(dt.month(), 6);
        assert_eq!(dt.day(), 1);
        assert_eq!(dt.hour(), 15);
        assert_eq!(dt.minute(), 0);
        assert_eq!(dt.second(), 0);
    }

    #[test]
    fn test_parse_hyphen_format() {
        let dt = parse_metadata_datetime("2022-06-01 10:23:45").unwrap();
        assert_eq!(dt.month(), 6);
    }

    #[test]
    fn test_parse_rejects_garbage() {
        assert!(parse_metadata_datetime("not a date").is_none());
        assert!(parse_metadata_datetime("2022:13:01 10:23:45").is_none());
        assert!(parse_metadata_datetime("").is_none());
    }

    #[test]
    fn test_first_field_wins() {
        let rec = record(&[
            ("CreateDate", "2020:02:02 02:02:02"),
            ("DateTimeOriginal", "2019:01:01 01:01:01"),
        ]);
        // DateTimeOriginal outranks CreateDate for photos regardless of
        // the order the record was built in
        let dt = resolve_metadata_date(&rec, MediaClass::Photo).unwrap();
        assert_eq!(dt.year(), 2019);
    }

    #[test]
    fn test_unparseable_field_falls_through() {
        let rec = record(&[
            ("DateTimeOriginal", "0000:00:00 00:00:00"),
            ("CreateDate", "2021:05:06 07:08:09"),
        ]);
        let dt = resolve_metadata_date(&rec, MediaClass::Photo).unwrap();
        assert_eq!(dt.year(), 2021);
    }

    #[test]
    fn test_empty_field_falls_through() {
        let rec = record(&[
            ("DateTimeOriginal", ""),
            ("CreateDate", "2021:05:06 07:08:09"),
        ]);
        let dt = resolve_metadata_date(&rec, MediaClass::Photo).unwrap();
        assert_eq!(dt.year(), 2021);
    }

    #[test]
    fn test_video_priority_list() {
        let rec = record(&[
            ("CreateDate", "2020:02:02 02:02:02"),
            ("CreationDate", "2018:03:04 05:06:07"),
        ]);
        let dt = resolve_metadata_date(&rec, MediaClass::Video).unwrap();
        assert_eq!(dt.year(), 2018);
    }

    #[test]
    fn test_no_usable_field() {
        let rec = record(&[("Artist", "someone"), ("ImageWidth", "4000")]);
        assert!(resolve_metadata_date(&rec, MediaClass::Photo).is_none());
        assert!(resolve_metadata_date(&MetadataRecord::new(), MediaClass::Video).is_none());
    }
}
