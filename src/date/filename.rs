//! Filename date parsing
//!
//! WhatsApp-style exports carry their capture date in the filename
//! (`IMG-20230115-WA0042`). When the stem matches, the filename is
//! authoritative and no metadata lookup happens.

use crate::date::canonical;
use chrono::{NaiveDate, NaiveDateTime};
use regex::Regex;
use std::sync::OnceLock;

/// Pattern: IMG/VID/PTV-YYYYMMDD-WA<digits>, anchored at the stem start
static PATTERN: OnceLock<Regex> = OnceLock::new();

fn pattern() -> &'static Regex {
    PATTERN.get_or_init(|| Regex::new(r"^(?:IMG|VID|PTV)-(\d{4})(\d{2})(\d{2})-WA\d+").unwrap())
}

/// Parse a date from a filename stem
///
/// Returns `None` when the stem does not match the pattern or the
/// digits do not form a valid calendar date. Both are normal outcomes,
/// not errors; the caller falls back to metadata resolution.
pub fn parse_filename_date(stem: &str) -> Option<NaiveDateTime> {
    let caps = pattern().captures(stem)?;

    let year: i32 = caps.get(1)?.as_str().parse().ok()?;
    let month: u32 = caps.get(2)?.as_str().parse().ok()?;
    let day: u32 = caps.get(3)?.as_str().parse().ok()?;

    NaiveDate::from_ymd_opt(year, month, day).map(canonical)
}
