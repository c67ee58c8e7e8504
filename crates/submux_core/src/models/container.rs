//! In-memory model of one media container and its tracks.

use std::path::{Path, PathBuf};

use super::enums::TrackType;
use super::track::{ModelError, Track};
use crate::probe::Prober;

/// A container file under edit: its own probed tracks plus any tracks merged
/// in from other containers.
///
/// Values only exist for files mkvmerge reports as supported; construction
/// goes through [`MediaFile::open`], and the probe layer already rejects
/// unsupported containers.
#[derive(Debug, Clone)]
pub struct MediaFile {
    file_path: PathBuf,
    /// Title override written into the output container.
    pub title: Option<String>,
    tracks: Vec<Track>,
}

impl MediaFile {
    /// Probe `path` and build a model mirroring its track list.
    pub fn open(path: &Path, prober: &mut Prober) -> Result<MediaFile, ModelError> {
        let probe = prober.probe(path)?;

        let mut tracks = Vec::with_capacity(probe.track_count());
        for entry in &probe.tracks {
            tracks.push(Track::from_probe(&probe, entry.id)?);
        }

        Ok(MediaFile {
            file_path: probe.file_path,
            title: None,
            tracks,
        })
    }

    /// Resolved path of the backing file.
    pub fn file_path(&self) -> &Path {
        &self.file_path
    }

    /// Tracks in append order: the file's own tracks first, then anything
    /// merged in.
    pub fn tracks(&self) -> &[Track] {
        &self.tracks
    }

    /// Mutable view for per-track overrides. Appending goes through
    /// [`MediaFile::add_track`] and friends instead.
    pub fn tracks_mut(&mut self) -> &mut [Track] {
        &mut self.tracks
    }

    pub fn contains_video(&self) -> bool {
        self.has_track_type(TrackType::Video)
    }

    pub fn contains_subtitles(&self) -> bool {
        self.has_track_type(TrackType::Subtitles)
    }

    fn has_track_type(&self, track_type: TrackType) -> bool {
        self.tracks.iter().any(|t| t.track_type() == track_type)
    }

    /// Append a single foreign track.
    pub fn add_track(&mut self, track: Track) {
        self.tracks.push(track);
    }

    /// Append every track of `other`. The tracks keep their own source
    /// files; `other`'s backing file is not touched.
    pub fn merge_from(&mut self, other: MediaFile) {
        self.tracks.extend(other.tracks);
    }

    /// Append tracks from a path or an already-built model.
    ///
    /// A raw path is probed and opened once, here at the boundary.
    pub fn add_file(
        &mut self,
        input: impl Into<MediaInput>,
        prober: &mut Prober,
    ) -> Result<(), ModelError> {
        let file = match input.into() {
            MediaInput::Path(path) => MediaFile::open(&path, prober)?,
            MediaInput::File(file) => file,
        };
        self.merge_from(file);
        Ok(())
    }
}

/// Accepted input at merge boundaries: a path still to be opened, or a model
/// that already went through probing.
#[derive(Debug, Clone)]
pub enum MediaInput {
    Path(PathBuf),
    File(MediaFile),
}

impl From<PathBuf> for MediaInput {
    fn from(path: PathBuf) -> Self {
        MediaInput::Path(path)
    }
}

impl From<&Path> for MediaInput {
    fn from(path: &Path) -> Self {
        MediaInput::Path(path.to_path_buf())
    }
}

impl From<MediaFile> for MediaInput {
    fn from(file: MediaFile) -> Self {
        MediaInput::File(file)
    }
}
