//! Types for container introspection.

use std::path::PathBuf;

use thiserror::Error;

use crate::models::TrackType;

/// Error type for probe operations.
#[derive(Error, Debug)]
pub enum ProbeError {
    /// mkvmerge is absent or did not answer its version check.
    #[error("mkvmerge not usable at '{tool}': {reason}")]
    ToolMissing { tool: String, reason: String },

    /// The candidate path does not resolve to a regular file.
    #[error("file not found: {}", .0.display())]
    NotFound(PathBuf),

    /// mkvmerge rejected the file, produced unparsable identification
    /// output, or reported the container as unsupported.
    #[error("unsupported container: {}", .0.display())]
    Unsupported(PathBuf),
}

impl ProbeError {
    /// True for conditions a directory scan skips over instead of aborting:
    /// a missing or unsupported candidate file. A missing tool is never
    /// recoverable.
    pub fn is_recoverable(&self) -> bool {
        matches!(self, ProbeError::NotFound(_) | ProbeError::Unsupported(_))
    }
}

/// Parsed mkvmerge identification output for one file.
#[derive(Debug, Clone)]
pub struct ProbeResult {
    /// Resolved path the identification ran on.
    pub file_path: PathBuf,
    /// Container type string as reported ("Matroska", "SRT subtitles", ...).
    pub container_type: String,
    /// Whether mkvmerge can read this container.
    pub supported: bool,
    /// Tracks in identification order.
    pub tracks: Vec<ProbeTrack>,
}

impl ProbeResult {
    pub fn track_count(&self) -> usize {
        self.tracks.len()
    }
}

/// One track entry from identification output.
#[derive(Debug, Clone)]
pub struct ProbeTrack {
    /// Track id within the file; doubles as the index into the track list.
    pub id: usize,
    pub track_type: TrackType,
    /// Human-readable codec name ("SubRip/SRT", "AAC", ...).
    pub codec: String,
    pub name: Option<String>,
    pub language: Option<String>,
    pub default_track: bool,
    pub forced_track: bool,
}
