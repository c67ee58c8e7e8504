//! Pairing subtitle directories with the video files they belong to.
//!
//! Two layouts are supported. A flat layout keeps subtitle files directly in
//! the directory and matches them against the single video in the parent:
//!
//! ```text
//! Movie (2023)/
//!   Movie (2023).mkv
//!   Subs/
//!     2_English.srt
//! ```
//!
//! A per-episode layout keeps one subdirectory per episode, matched against
//! the grandparent video whose name starts with the subdirectory's stem:
//!
//! ```text
//! Season 01/
//!   S01E01.mkv
//!   S01E02.mkv
//!   Subs/
//!     S01E01/2_English.srt
//!     S01E02/2_English.srt
//! ```
//!
//! A directory mixing loose files and subdirectories fits neither layout and
//! is rejected outright.

use std::io;
use std::path::{Path, PathBuf};

use thiserror::Error;

use crate::models::{MediaFile, ModelError};
use crate::probe::{ProbeError, Prober};

/// One video paired with the subtitle files to merge into it.
#[derive(Debug)]
pub struct MatchResult {
    pub video: MediaFile,
    /// Never empty; each entry is a supported single-track subtitle file.
    pub subtitles: Vec<MediaFile>,
}

/// Error type for directory matching.
#[derive(Error, Debug)]
pub enum MatchError {
    #[error("subtitle directory is empty: {}", .0.display())]
    EmptyDirectory(PathBuf),

    #[error("no usable subtitle files in {}", .0.display())]
    NoSubtitles(PathBuf),

    #[error("no video file found for {}", .0.display())]
    NoVideo(PathBuf),

    /// More than one video candidate. Always a hard failure; the matcher
    /// never guesses between candidates.
    #[error("{} video candidates for {}", .candidates.len(), .dir.display())]
    AmbiguousVideo {
        dir: PathBuf,
        candidates: Vec<PathBuf>,
    },

    /// The directory mixes loose files and subdirectories.
    #[error("unsupported directory layout: {}", .0.display())]
    UnsupportedLayout(PathBuf),

    #[error(transparent)]
    Probe(#[from] ProbeError),

    #[error(transparent)]
    Model(#[from] ModelError),

    #[error("failed to read {}: {source}", .dir.display())]
    ReadDir {
        dir: PathBuf,
        #[source]
        source: io::Error,
    },
}

impl MatchError {
    /// True when the error must abort the whole run rather than this one
    /// directory: the external tool is gone.
    pub fn is_fatal(&self) -> bool {
        matches!(
            self,
            MatchError::Probe(ProbeError::ToolMissing { .. })
                | MatchError::Model(ModelError::Probe(ProbeError::ToolMissing { .. }))
        )
    }
}

/// Pair every subtitle set under `dir` with its video file.
///
/// Flat layouts yield exactly one pair, per-episode layouts one pair per
/// subdirectory. Candidate files that fail probing recoverably (missing,
/// unsupported) are skipped; every other error aborts this directory.
pub fn match_subtitle_dir(
    dir: &Path,
    prober: &mut Prober,
) -> Result<Vec<MatchResult>, MatchError> {
    let entries = list_entries(dir)?;
    if entries.is_empty() {
        return Err(MatchError::EmptyDirectory(dir.to_path_buf()));
    }

    if entries.iter().all(|p| p.is_file()) {
        tracing::debug!("flat subtitle layout: {}", dir.display());
        Ok(vec![match_flat(dir, prober)?])
    } else if entries.iter().all(|p| p.is_dir()) {
        tracing::debug!(
            "per-episode subtitle layout: {} ({} episodes)",
            dir.display(),
            entries.len()
        );
        entries
            .iter()
            .map(|subdir| match_episode(dir, subdir, prober))
            .collect()
    } else {
        Err(MatchError::UnsupportedLayout(dir.to_path_buf()))
    }
}

/// Flat layout: all of `dir`'s subtitle files against the single video in
/// the parent directory.
fn match_flat(dir: &Path, prober: &mut Prober) -> Result<MatchResult, MatchError> {
    let subtitles = subtitle_files(dir, prober)?;
    if subtitles.is_empty() {
        return Err(MatchError::NoSubtitles(dir.to_path_buf()));
    }

    let parent = parent_of(dir)?;
    let video = single_video(parent, None, dir, prober)?;
    Ok(MatchResult { video, subtitles })
}

/// Per-episode layout: `subdir`'s subtitle files against the grandparent
/// video whose name starts with the subdirectory's stem.
fn match_episode(
    dir: &Path,
    subdir: &Path,
    prober: &mut Prober,
) -> Result<MatchResult, MatchError> {
    let subtitles = subtitle_files(subdir, prober)?;
    if subtitles.is_empty() {
        return Err(MatchError::NoSubtitles(subdir.to_path_buf()));
    }

    let stem = subdir
        .file_stem()
        .map(|s| s.to_string_lossy().to_string())
        .ok_or_else(|| MatchError::NoVideo(subdir.to_path_buf()))?;

    let parent = parent_of(dir)?;
    let video = single_video(parent, Some(&stem), subdir, prober)?;
    Ok(MatchResult { video, subtitles })
}

/// Supported single-track subtitle files among `dir`'s immediate entries.
fn subtitle_files(dir: &Path, prober: &mut Prober) -> Result<Vec<MediaFile>, MatchError> {
    let mut subtitles = Vec::new();
    for path in list_entries(dir)? {
        if !path.is_file() {
            continue;
        }
        let Some(file) = open_candidate(&path, prober)? else {
            continue;
        };
        if file.tracks().len() == 1 && file.contains_subtitles() {
            subtitles.push(file);
        } else {
            tracing::trace!("not a single-track subtitle file: {}", path.display());
        }
    }
    Ok(subtitles)
}

/// The one video in `search_dir`, optionally restricted to names starting
/// with `stem` plus a dot. Zero or multiple candidates are errors reported
/// against `context`.
fn single_video(
    search_dir: &Path,
    stem: Option<&str>,
    context: &Path,
    prober: &mut Prober,
) -> Result<MediaFile, MatchError> {
    let prefix = stem.map(|s| format!("{}.", s));

    let mut videos = Vec::new();
    for path in list_entries(search_dir)? {
        if !path.is_file() {
            continue;
        }
        if let Some(prefix) = &prefix {
            let name = path
                .file_name()
                .map(|n| n.to_string_lossy().to_string())
                .unwrap_or_default();
            if !name.starts_with(prefix.as_str()) {
                continue;
            }
        }
        let Some(file) = open_candidate(&path, prober)? else {
            continue;
        };
        if file.contains_video() {
            videos.push(file);
        }
    }

    match videos.len() {
        0 => Err(MatchError::NoVideo(context.to_path_buf())),
        1 => Ok(videos.remove(0)),
        _ => Err(MatchError::AmbiguousVideo {
            dir: context.to_path_buf(),
            candidates: videos
                .into_iter()
                .map(|f| f.file_path().to_path_buf())
                .collect(),
        }),
    }
}

/// Open a candidate file, skipping it on recoverable probe failures.
fn open_candidate(path: &Path, prober: &mut Prober) -> Result<Option<MediaFile>, MatchError> {
    match MediaFile::open(path, prober) {
        Ok(file) => Ok(Some(file)),
        Err(ModelError::Probe(err)) if err.is_recoverable() => {
            tracing::trace!("skipping {}: {}", path.display(), err);
            Ok(None)
        }
        Err(ModelError::Probe(err)) => Err(MatchError::Probe(err)),
        Err(err) => Err(MatchError::Model(err)),
    }
}

/// Immediate entries of `dir`, sorted for deterministic pairing order.
fn list_entries(dir: &Path) -> Result<Vec<PathBuf>, MatchError> {
    let read = std::fs::read_dir(dir).map_err(|source| MatchError::ReadDir {
        dir: dir.to_path_buf(),
        source,
    })?;

    let mut entries = Vec::new();
    for entry in read {
        let entry = entry.map_err(|source| MatchError::ReadDir {
            dir: dir.to_path_buf(),
            source,
        })?;
        entries.push(entry.path());
    }
    entries.sort();
    Ok(entries)
}

fn parent_of(dir: &Path) -> Result<&Path, MatchError> {
    dir.parent()
        .ok_or_else(|| MatchError::NoVideo(dir.to_path_buf()))
}
