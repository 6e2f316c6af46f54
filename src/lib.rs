//! Media Dater - canonical capture dates for media files
//!
//! This library assigns a single authoritative capture date to photos
//! and videos with unknown or unreliable timestamps:
//! - Filename date parsing for WhatsApp-style export names
//! - Metadata field resolution via an external ExifTool adapter
//! - An idempotent move-based pipeline that files each result under
//!   photos/, videos/ or failed/ and never reprocesses filed names
//! - A plain-text summary report per run

pub mod cli;
pub mod config;
pub mod date;
pub mod error;
pub mod exiftool;
pub mod pipeline;
pub mod report;

pub use cli::Cli;
pub use config::{Config, ConfigError, MediaClass};
pub use date::{DateResolution, DateSource, NoDateReason, resolve_date};
pub use error::{Error, Result};
pub use exiftool::{ExifTool, MetadataRecord, MetadataTool};
pub use pipeline::{ClassCounts, FileState, Pipeline, ProcessingOutcome, RunResult};
pub use report::{render_summary, write_summary};
