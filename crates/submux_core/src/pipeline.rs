//! End-to-end merge runs.
//!
//! A run walks the input roots for subtitle directories, pairs each one with
//! its video files, attaches a language to every subtitle track, and hands
//! the assembled model to mkvmerge. Failures are scoped: one bad pair or
//! directory is logged and counted, and the run moves on. Only a missing
//! tool aborts everything.
//!
//! Source disposal mirrors the merge outcome per directory. The original
//! video goes right after its own successful merge; the subtitle directory
//! goes only once every pair in it merged, so a partial failure leaves
//! everything the retry will need.

use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

use thiserror::Error;
use tracing::{debug, error, info, warn};

use crate::config::{MatchSettings, Settings};
use crate::discovery::{find_subtitle_dirs, match_subtitle_dir, MatchError, MatchResult};
use crate::models::{MediaFile, ModelError};
use crate::mux::{
    format_tokens_pretty, run_mux, CommandError, MkvmergeOptionsBuilder, MuxError,
    OUTPUT_EXTENSION,
};
use crate::probe::{ProbeError, Prober};

/// Switches that alter a run without changing what gets matched.
#[derive(Debug, Clone, Copy, Default)]
pub struct RunOptions {
    /// Build and log commands, execute nothing, delete nothing.
    pub dry_run: bool,
    /// Keep original videos and subtitle directories after merging.
    pub keep_sources: bool,
    /// Do not relay mkvmerge output to the log.
    pub silent: bool,
}

/// Counters for one completed run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RunSummary {
    /// Subtitle directories the run looked at.
    pub subtitle_dirs: usize,
    /// Pairs merged (or, under dry run, that would have merged).
    pub merged: usize,
    /// Pairs skipped because no subtitle could be assigned a language.
    pub skipped: usize,
    /// Pairs or directories that errored.
    pub failed: usize,
}

impl fmt::Display for RunSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} subtitle dir(s): {} merged, {} skipped, {} failed",
            self.subtitle_dirs, self.merged, self.skipped, self.failed
        )
    }
}

/// Errors that abort a whole run.
#[derive(Error, Debug)]
pub enum RunError {
    #[error(transparent)]
    Tool(#[from] ProbeError),

    #[error(transparent)]
    Match(#[from] MatchError),
}

/// Errors scoped to a single video/subtitles pair.
#[derive(Error, Debug)]
enum PairError {
    #[error(transparent)]
    Model(#[from] ModelError),

    #[error(transparent)]
    Command(#[from] CommandError),

    #[error(transparent)]
    Mux(#[from] MuxError),
}

enum PairOutcome {
    Merged,
    Skipped,
}

/// Merge every subtitle directory found under `inputs`.
pub fn run(
    inputs: &[PathBuf],
    settings: &Settings,
    options: &RunOptions,
) -> Result<RunSummary, RunError> {
    let mkvmerge = settings.tools.mkvmerge_binary();
    let mut prober = Prober::new(&mkvmerge);
    prober.verify_install()?;

    let mut summary = RunSummary::default();

    for root in inputs {
        let dirs = find_subtitle_dirs(root, &settings.matching.subs_dir_name);
        if dirs.is_empty() {
            info!(
                "no '{}' directories under {}",
                settings.matching.subs_dir_name,
                root.display()
            );
            continue;
        }

        for dir in dirs {
            summary.subtitle_dirs += 1;
            info!("processing {}", dir.display());

            let pairs = match match_subtitle_dir(&dir, &mut prober) {
                Ok(pairs) => pairs,
                Err(err) if err.is_fatal() => return Err(err.into()),
                Err(err) => {
                    error!("skipping {}: {}", dir.display(), err);
                    summary.failed += 1;
                    continue;
                }
            };

            let mut all_merged = true;
            for pair in pairs {
                match merge_pair(pair, &mkvmerge, &settings.matching, options) {
                    Ok(PairOutcome::Merged) => summary.merged += 1,
                    Ok(PairOutcome::Skipped) => {
                        summary.skipped += 1;
                        all_merged = false;
                    }
                    Err(err) => {
                        error!("{}", err);
                        summary.failed += 1;
                        all_merged = false;
                    }
                }
            }

            if all_merged && !options.dry_run && !options.keep_sources {
                remove_subtitle_dir(&dir);
            }
        }
    }

    info!("{}", summary);
    Ok(summary)
}

/// Merge one pair: attach languages, build the command, run it, dispose of
/// the source video.
fn merge_pair(
    pair: MatchResult,
    mkvmerge: &Path,
    matching: &MatchSettings,
    options: &RunOptions,
) -> Result<PairOutcome, PairError> {
    let MatchResult { mut video, subtitles } = pair;

    info!(
        "merging {} subtitle file(s) into {}",
        subtitles.len(),
        video.file_path().display()
    );

    let mut attached = 0;
    for subtitle in subtitles {
        if let Some(subtitle) = resolve_language(subtitle, matching)? {
            video.merge_from(subtitle);
            attached += 1;
        }
    }

    if attached == 0 {
        warn!(
            "no subtitle language could be determined for {}, leaving it alone",
            video.file_path().display()
        );
        return Ok(PairOutcome::Skipped);
    }

    let output_path = video.file_path().with_extension(OUTPUT_EXTENSION);
    let command = MkvmergeOptionsBuilder::new(&video, &output_path, mkvmerge).build()?;

    if options.dry_run {
        info!("would run: {}", command.join(" "));
        debug!("options:\n{}", format_tokens_pretty(&command));
        return Ok(PairOutcome::Merged);
    }

    run_mux(&command, options.silent)?;
    info!("wrote {}", output_path.display());

    if !options.keep_sources {
        dispose_video(&video, &output_path);
    }

    Ok(PairOutcome::Merged)
}

/// Attach a language to the subtitle's single track.
///
/// A language the probe already reported wins; otherwise the filename stem
/// is scanned for a configured marker. `None` means no language could be
/// determined and the file stays out of the merge.
fn resolve_language(
    mut subtitle: MediaFile,
    matching: &MatchSettings,
) -> Result<Option<MediaFile>, ModelError> {
    let has_language = subtitle
        .tracks()
        .first()
        .and_then(|t| t.language())
        .is_some();
    if has_language {
        return Ok(Some(subtitle));
    }

    let stem = subtitle
        .file_path()
        .file_stem()
        .map(|s| s.to_string_lossy().to_string())
        .unwrap_or_default();

    let code = match matching.language_for_stem(&stem) {
        Some(code) => code.to_string(),
        None => {
            debug!(
                "no language marker in '{}', dropping {}",
                stem,
                subtitle.file_path().display()
            );
            return Ok(None);
        }
    };

    if let Some(track) = subtitle.tracks_mut().first_mut() {
        track.set_language(&code)?;
    }
    Ok(Some(subtitle))
}

/// Remove the original video once its merge succeeded. Removal failures are
/// logged, not propagated; the merged output already exists.
fn dispose_video(video: &MediaFile, output_path: &Path) {
    if video.file_path() == output_path {
        debug!("output replaced {} in place", output_path.display());
        return;
    }
    match fs::remove_file(video.file_path()) {
        Ok(()) => debug!("removed {}", video.file_path().display()),
        Err(err) => error!(
            "failed to remove {}: {}",
            video.file_path().display(),
            err
        ),
    }
}

fn remove_subtitle_dir(dir: &Path) {
    match fs::remove_dir_all(dir) {
        Ok(()) => debug!("removed {}", dir.display()),
        Err(err) => error!("failed to remove {}: {}", dir.display(), err),
    }
}
