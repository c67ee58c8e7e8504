//! mkvmerge merge command builder.
//!
//! Serializes a [`MediaFile`] and its appended tracks into the token list a
//! merge invocation needs. mkvmerge binds options to the most recently named
//! track or file, so token order is part of the contract with the tool: per
//! track, overrides come first, then the always-present flag options, then
//! the stream-category scoping, and the source file path closes the group.
//! Reordering anything here changes what mkvmerge does.

use std::path::{Path, PathBuf};

use thiserror::Error;

use crate::models::{MediaFile, Track, TrackType};

/// Extension mkvmerge expects on the output container.
pub const OUTPUT_EXTENSION: &str = "mkv";

/// Error type for command generation.
#[derive(Error, Debug)]
pub enum CommandError {
    #[error("output file must use the .mkv extension: {}", .0.display())]
    InvalidOutputSuffix(PathBuf),
}

/// Builder for one merge invocation.
///
/// Generates a list of string tokens, binary included as the first token.
pub struct MkvmergeOptionsBuilder<'a> {
    file: &'a MediaFile,
    output_path: &'a Path,
    mkvmerge: &'a Path,
}

impl<'a> MkvmergeOptionsBuilder<'a> {
    /// Create a new options builder.
    pub fn new(file: &'a MediaFile, output_path: &'a Path, mkvmerge: &'a Path) -> Self {
        Self {
            file,
            output_path,
            mkvmerge,
        }
    }

    /// Build the complete command tokens.
    pub fn build(&self) -> Result<Vec<String>, CommandError> {
        if self.output_path.extension().and_then(|e| e.to_str()) != Some(OUTPUT_EXTENSION) {
            return Err(CommandError::InvalidOutputSuffix(
                self.output_path.to_path_buf(),
            ));
        }

        let mut tokens = Vec::new();

        tokens.push(self.mkvmerge.to_string_lossy().to_string());
        tokens.push("-o".to_string());
        tokens.push(self.output_path.to_string_lossy().to_string());

        if let Some(title) = &self.file.title {
            tokens.push("--title".to_string());
            tokens.push(title.clone());
        }

        for track in self.file.tracks() {
            add_track_options(&mut tokens, track);
        }

        Ok(tokens)
    }
}

/// Emit one track's option group, closed by its source file path.
fn add_track_options(tokens: &mut Vec<String>, track: &Track) {
    let id = track.id();

    if let Some(name) = &track.name {
        tokens.push("--track-name".to_string());
        tokens.push(format!("{}:{}", id, name));
    }

    if let Some(language) = track.language() {
        tokens.push("--language".to_string());
        tokens.push(format!("{}:{}", id, language));
    }

    if let Some(tags) = track.tags() {
        tokens.push("--tags".to_string());
        tokens.push(format!("{}:{}", id, tags.display()));
    }

    // Both flags are always written; left out, mkvmerge would keep whatever
    // the source container says.
    tokens.push("--default-track".to_string());
    tokens.push(format!("{}:{}", id, flag(track.default_track)));
    tokens.push("--forced-track".to_string());
    tokens.push(format!("{}:{}", id, flag(track.forced_track)));

    // Scope the source file to exactly this track: select the id in its own
    // category and drop the other categories wholesale.
    match track.track_type() {
        TrackType::Video => {
            tokens.push("-d".to_string());
            tokens.push(id.to_string());
        }
        _ => tokens.push("-D".to_string()),
    }
    match track.track_type() {
        TrackType::Audio => {
            tokens.push("-a".to_string());
            tokens.push(id.to_string());
        }
        _ => tokens.push("-A".to_string()),
    }
    match track.track_type() {
        TrackType::Subtitles => {
            tokens.push("-s".to_string());
            tokens.push(id.to_string());
        }
        _ => tokens.push("-S".to_string()),
    }

    if track.no_chapters {
        tokens.push("--no-chapters".to_string());
    }
    if track.no_global_tags {
        tokens.push("--no-global-tags".to_string());
    }
    if track.no_track_tags {
        tokens.push("--no-track-tags".to_string());
    }
    if track.no_attachments {
        tokens.push("--no-attachments".to_string());
    }

    tokens.push(track.source_file().to_string_lossy().to_string());
}

fn flag(value: bool) -> &'static str {
    if value {
        "1"
    } else {
        "0"
    }
}

/// Format tokens for display, one option per line.
pub fn format_tokens_pretty(tokens: &[String]) -> String {
    let mut result = String::new();
    let mut i = 0;

    while i < tokens.len() {
        let token = &tokens[i];

        if token.starts_with('-') && i + 1 < tokens.len() && !tokens[i + 1].starts_with('-') {
            // Option with value
            result.push_str(&format!("{} {} \\\n", token, tokens[i + 1]));
            i += 2;
        } else {
            result.push_str(&format!("{} \\\n", token));
            i += 1;
        }
    }

    result
}
