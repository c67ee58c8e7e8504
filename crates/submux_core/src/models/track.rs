//! A single stream within a container, plus its authoring overrides.

use std::path::{Path, PathBuf};

use thiserror::Error;

use super::enums::TrackType;
use super::lang;
use crate::probe::{ProbeError, ProbeResult, Prober};

/// Error type for model construction and mutation.
#[derive(Error, Debug)]
pub enum ModelError {
    /// A language override that is not an ISO 639-2 code.
    #[error("invalid ISO 639-2 language code: '{0}'")]
    InvalidLanguageCode(String),

    /// A tags override pointing at a file that does not exist.
    #[error("tag file does not exist: {}", .0.display())]
    MissingTagFile(PathBuf),

    /// A track id outside the source file's own track list.
    #[error("track id {track_id} out of range for '{}' with {track_count} tracks", .file.display())]
    TrackIndexOutOfRange {
        file: PathBuf,
        track_id: usize,
        track_count: usize,
    },

    #[error(transparent)]
    Probe(#[from] ProbeError),
}

/// One stream of a container file.
///
/// Identity (source file, id, type, codec) is fixed at construction from
/// identification output. Overrides that need validation go through setters;
/// the rest are plain fields.
#[derive(Debug, Clone)]
pub struct Track {
    source_file: PathBuf,
    id: usize,
    track_type: TrackType,
    codec: String,

    /// Track name override, written as `--track-name`.
    pub name: Option<String>,
    language: Option<String>,
    /// Written as `--default-track`, always, whether set or not.
    pub default_track: bool,
    /// Written as `--forced-track`, always, whether set or not.
    pub forced_track: bool,
    tags: Option<PathBuf>,

    /// Drop chapters from this track's source file.
    pub no_chapters: bool,
    /// Drop global tags from this track's source file.
    pub no_global_tags: bool,
    /// Drop track tags from this track's source file.
    pub no_track_tags: bool,
    /// Drop attachments from this track's source file.
    pub no_attachments: bool,
}

impl Track {
    /// Build a track from one entry of an identification result.
    ///
    /// `track_id` must index into the probe's track list. Name, language,
    /// and the default/forced flags are copied from the probe when present;
    /// a probe-reported language that does not validate is left unset rather
    /// than failing the whole construction.
    pub fn from_probe(probe: &ProbeResult, track_id: usize) -> Result<Track, ModelError> {
        let entry = probe
            .tracks
            .get(track_id)
            .ok_or_else(|| ModelError::TrackIndexOutOfRange {
                file: probe.file_path.clone(),
                track_id,
                track_count: probe.track_count(),
            })?;

        let mut track = Track {
            source_file: probe.file_path.clone(),
            id: track_id,
            track_type: entry.track_type,
            codec: entry.codec.clone(),
            name: entry.name.clone(),
            language: None,
            default_track: entry.default_track,
            forced_track: entry.forced_track,
            tags: None,
            no_chapters: false,
            no_global_tags: false,
            no_track_tags: false,
            no_attachments: false,
        };

        if let Some(code) = &entry.language {
            if track.set_language(code).is_err() {
                tracing::debug!(
                    "ignoring unrecognized language '{}' reported for {}:{}",
                    code,
                    probe.file_path.display(),
                    track_id
                );
            }
        }

        Ok(track)
    }

    /// Probe `path` and build the track with the given id from it.
    pub fn from_file(path: &Path, prober: &mut Prober, track_id: usize) -> Result<Track, ModelError> {
        let probe = prober.probe(path)?;
        Track::from_probe(&probe, track_id)
    }

    /// The container file this stream physically lives in.
    pub fn source_file(&self) -> &Path {
        &self.source_file
    }

    /// Track id within the source file.
    pub fn id(&self) -> usize {
        self.id
    }

    pub fn track_type(&self) -> TrackType {
        self.track_type
    }

    pub fn codec(&self) -> &str {
        &self.codec
    }

    pub fn language(&self) -> Option<&str> {
        self.language.as_deref()
    }

    /// Set the language override. Rejects anything that is not an ISO 639-2
    /// code and leaves the stored value untouched in that case.
    pub fn set_language(&mut self, code: &str) -> Result<(), ModelError> {
        if !lang::is_valid(code) {
            return Err(ModelError::InvalidLanguageCode(code.to_string()));
        }
        self.language = Some(code.to_string());
        Ok(())
    }

    pub fn clear_language(&mut self) {
        self.language = None;
    }

    pub fn tags(&self) -> Option<&Path> {
        self.tags.as_deref()
    }

    /// Point this track at a tag file to merge in. The file must exist.
    pub fn set_tags(&mut self, path: impl Into<PathBuf>) -> Result<(), ModelError> {
        let path = path.into();
        if !path.is_file() {
            return Err(ModelError::MissingTagFile(path));
        }
        self.tags = Some(path);
        Ok(())
    }

    pub fn clear_tags(&mut self) {
        self.tags = None;
    }
}
