//! File classification pipeline
//!
//! Handles the core logic of:
//! - Snapshotting the source directory per media class
//! - Skipping files already filed by an earlier run
//! - Resolving a canonical date per file
//! - Rewriting metadata dates and relocating the file
//!
//! Per-file state is tracked purely through filesystem location: a
//! filename present in photos/, videos/ or failed/ is terminal and is
//! never reprocessed. No ledger of processed files exists; reruns
//! reconstruct state from the directory contents alone.

use crate::config::{Config, MediaClass};
use crate::date::{self, DateResolution};
use crate::error::{Error, Result};
use crate::exiftool::MetadataTool;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};
use walkdir::WalkDir;

/// Processing state of a single file
///
/// `Unfiled` through `Writing` are transient; `Skipped`,
/// `MovedSuccess` and `MovedFailed` are terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileState {
    /// Still sitting in the source directory, untouched this run
    Unfiled,
    /// Date resolution in progress
    Resolving,
    /// Metadata rewrite in progress
    Writing,
    /// Filed into the class success directory
    MovedSuccess,
    /// Filed into the failed directory (move is best-effort)
    MovedFailed,
    /// Already present in an output directory, nothing done
    Skipped,
}

/// A media file discovered in the source directory
#[derive(Debug, Clone)]
pub struct MediaFile {
    /// Filename including extension
    pub name: String,
    /// Media class derived from the extension
    pub class: MediaClass,
    /// Full path in the source directory
    pub path: PathBuf,
}

/// Terminal result of processing a single file
#[derive(Debug, Clone)]
pub struct ProcessingOutcome {
    pub filename: String,
    pub state: FileState,
    /// Present iff the state is MovedFailed
    pub error: Option<String>,
}

/// Per-class counters
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ClassCounts {
    /// Every file of this class seen in the snapshot
    pub considered: usize,
    pub succeeded: usize,
    pub failed: usize,
    pub skipped: usize,
}

impl ClassCounts {
    /// Files actually worked on (considered minus skipped)
    pub fn attempted(&self) -> usize {
        self.considered - self.skipped
    }
}

/// Aggregated result of one run, consumed once by the report writer
#[derive(Debug, Default)]
pub struct RunResult {
    pub photos: ClassCounts,
    pub videos: ClassCounts,
    /// Filenames filed successfully, in processing order
    pub successful: Vec<String>,
    /// (filename, error) pairs for failed files, in processing order
    pub failed: Vec<(String, String)>,
}

impl RunResult {
    /// Counters for a media class
    pub fn counts(&self, class: MediaClass) -> &ClassCounts {
        match class {
            MediaClass::Photo => &self.photos,
            MediaClass::Video => &self.videos,
        }
    }

    fn counts_mut(&mut self, class: MediaClass) -> &mut ClassCounts {
        match class {
            MediaClass::Photo => &mut self.photos,
            MediaClass::Video => &mut self.videos,
        }
    }

    pub fn total_considered(&self) -> usize {
        self.photos.considered + self.videos.considered
    }

    pub fn total_skipped(&self) -> usize {
        self.photos.skipped + self.videos.skipped
    }

    pub fn total_attempted(&self) -> usize {
        self.photos.attempted() + self.videos.attempted()
    }

    pub fn total_succeeded(&self) -> usize {
        self.photos.succeeded + self.videos.succeeded
    }

    pub fn total_failed(&self) -> usize {
        self.photos.failed + self.videos.failed
    }

    /// Record one terminal outcome
    fn record(&mut self, class: MediaClass, outcome: ProcessingOutcome) {
        let counts = self.counts_mut(class);
        counts.considered += 1;

        match outcome.state {
            FileState::Skipped => counts.skipped += 1,
            FileState::MovedSuccess => {
                counts.succeeded += 1;
                self.successful.push(outcome.filename);
            }
            FileState::MovedFailed => {
                counts.failed += 1;
                let error = outcome.error.unwrap_or_else(|| "Unknown error".to_string());
                self.failed.push((outcome.filename, error));
            }
            // Transient states are never recorded
            FileState::Unfiled | FileState::Resolving | FileState::Writing => {}
        }
    }
}

/// Classification pipeline over one source directory
pub struct Pipeline<'a> {
    config: &'a Config,
    tool: &'a dyn MetadataTool,
}

impl<'a> Pipeline<'a> {
    pub fn new(config: &'a Config, tool: &'a dyn MetadataTool) -> Self {
        Self { config, tool }
    }

    /// Run the pipeline: all photos first, then all videos
    ///
    /// Returns the aggregated counts and lists; a zero-file run is not
    /// an error here, the driver decides how to report it.
    pub fn run(&self) -> Result<RunResult> {
        self.create_output_dirs()?;

        let mut result = RunResult::default();

        for class in [MediaClass::Photo, MediaClass::Video] {
            let files = self.collect_class_files(class)?;
            let total = files.len();
            info!(class = class.label(), count = total, "Found media files");

            for (index, file) in files.iter().enumerate() {
                let outcome = self.process_file(file);
                result.record(class, outcome);

                info!(
                    class = class.label(),
                    processed = index + 1,
                    total,
                    failed = result.counts(class).failed,
                    "Progress"
                );
            }
        }

        Ok(result)
    }

    /// Create the three output directories if absent
    fn create_output_dirs(&self) -> Result<()> {
        fs::create_dir_all(self.config.class_dir(MediaClass::Photo))?;
        fs::create_dir_all(self.config.class_dir(MediaClass::Video))?;
        fs::create_dir_all(self.config.failed_dir())?;
        Ok(())
    }

    /// Snapshot the source directory for one media class
    ///
    /// Flat listing, name-sorted for a stable enumeration order. The
    /// snapshot is taken before any move, so relocations during the
    /// pass do not perturb the iteration set.
    fn collect_class_files(&self, class: MediaClass) -> Result<Vec<MediaFile>> {
        let mut files = Vec::new();

        if !self.config.source_dir.exists() {
            warn!(source_dir = %self.config.source_dir.display(), "Source directory does not exist");
            return Ok(files);
        }

        for entry in WalkDir::new(&self.config.source_dir)
            .max_depth(1)
            .into_iter()
            .filter_map(|e| e.ok())
        {
            let path = entry.path();
            if path.is_file()
                && let Some(ext) = path.extension().and_then(|e| e.to_str())
                && self.config.media_class(ext) == Some(class)
                && let Some(name) = path.file_name().and_then(|n| n.to_str())
            {
                files.push(MediaFile {
                    name: name.to_string(),
                    class,
                    path: path.to_path_buf(),
                });
            }
        }

        files.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(files)
    }

    /// Walk one file through the state machine to a terminal state
    fn process_file(&self, file: &MediaFile) -> ProcessingOutcome {
        debug!(name = %file.name, state = ?FileState::Unfiled, "Processing file");

        let success_dest = self.config.class_dir(file.class).join(&file.name);
        let failed_dest = self.config.failed_dir().join(&file.name);

        // Skip check: a filename present in any output directory was
        // filed by an earlier run (or pass) and is terminal
        if success_dest.exists() || failed_dest.exists() {
            debug!(name = %file.name, state = ?FileState::Skipped, "Already filed, skipping");
            return ProcessingOutcome {
                filename: file.name.clone(),
                state: FileState::Skipped,
                error: None,
            };
        }

        debug!(name = %file.name, state = ?FileState::Resolving, "Resolving date");
        let timestamp = match date::resolve_date(&file.path, file.class, self.tool) {
            DateResolution::Resolved { timestamp, source } => {
                debug!(name = %file.name, %timestamp, ?source, "Date resolved");
                timestamp
            }
            DateResolution::NoDate(reason) => {
                return self.fail_file(file, reason.to_string());
            }
        };

        debug!(name = %file.name, state = ?FileState::Writing, "Rewriting metadata dates");
        if let Err(e) = self.tool.write_dates(&file.path, &timestamp, file.class) {
            return self.fail_file(file, e.to_string());
        }

        // The metadata write already happened; a failed move is still
        // recorded as a failure so recorded state matches disk state
        if let Err(e) = move_file(&file.path, &success_dest) {
            return self.fail_file(file, e.to_string());
        }

        info!(name = %file.name, %timestamp, state = ?FileState::MovedSuccess, "Filed");
        ProcessingOutcome {
            filename: file.name.clone(),
            state: FileState::MovedSuccess,
            error: None,
        }
    }

    /// Record a failure and best-effort move the file into failed/
    ///
    /// The source may already be gone (moved by a partial prior step
    /// or removed by an external actor); in that case only the record
    /// is kept.
    fn fail_file(&self, file: &MediaFile, error: String) -> ProcessingOutcome {
        warn!(name = %file.name, error = %error, state = ?FileState::MovedFailed, "Classification failed");

        if file.path.exists() {
            let dest = self.config.failed_dir().join(&file.name);
            if let Err(e) = move_file(&file.path, &dest) {
                warn!(name = %file.name, error = %e, "Could not move file into failed directory");
            }
        }

        ProcessingOutcome {
            filename: file.name.clone(),
            state: FileState::MovedFailed,
            error: Some(error),
        }
    }
}

/// Move a file, falling back to copy + delete for cross-filesystem moves
fn move_file(source: &Path, dest: &Path) -> Result<()> {
    let relocate_err = |e: std::io::Error| Error::Relocate {
        path: source.to_path_buf(),
        dest: dest.to_path_buf(),
        message: e.to_string(),
    };

    if let Some(parent) = dest.parent() {
        fs::create_dir_all(parent).map_err(relocate_err)?;
    }

    if fs::rename(source, dest).is_ok() {
        return Ok(());
    }

    fs::copy(source, dest).map_err(relocate_err)?;
    fs::remove_file(source).map_err(relocate_err)?;
    Ok(())
}
