//! File probing using mkvmerge -J.
//!
//! A [`Prober`] wraps one mkvmerge binary: it verifies the install once per
//! instance via `-V` and identifies container files via `-J`, keeping the
//! most recent identification in a single-slot cache. The design is
//! sequential by construction; processing touches files one at a time, so
//! one slot is all the reuse there is.

use std::path::{Path, PathBuf};
use std::process::Command;

use serde_json::Value;

use super::types::{ProbeError, ProbeResult, ProbeTrack};
use crate::models::TrackType;

/// Output prefix expected from `mkvmerge -V`.
const VERSION_PREFIX: &str = "mkvmerge";

struct CacheSlot {
    path: PathBuf,
    result: ProbeResult,
}

/// Probing front end for one mkvmerge binary.
pub struct Prober {
    binary: PathBuf,
    verified: bool,
    cache: Option<CacheSlot>,
}

impl Prober {
    /// Create a prober for `binary`, either a full path or a name resolved
    /// via PATH. Nothing is executed until the first probe or an explicit
    /// [`Prober::verify_install`].
    pub fn new(binary: impl Into<PathBuf>) -> Self {
        Self {
            binary: binary.into(),
            verified: false,
            cache: None,
        }
    }

    /// The binary this prober invokes.
    pub fn binary(&self) -> &Path {
        &self.binary
    }

    /// Check that the binary exists and answers `-V` with the expected
    /// signature. Runs at most once per prober; later calls are free.
    pub fn verify_install(&mut self) -> Result<(), ProbeError> {
        if self.verified {
            return Ok(());
        }

        let output = Command::new(&self.binary)
            .arg("-V")
            .output()
            .map_err(|e| self.tool_missing(format!("failed to run version check: {}", e)))?;

        let stdout = String::from_utf8_lossy(&output.stdout);
        let first_line = stdout.lines().next().unwrap_or("").trim();

        if !output.status.success() || !first_line.starts_with(VERSION_PREFIX) {
            return Err(self.tool_missing(format!(
                "unexpected version output: '{}'",
                first_line
            )));
        }

        tracing::debug!("verified mkvmerge install: {}", first_line);
        self.verified = true;
        Ok(())
    }

    /// Identify a container file.
    ///
    /// The path is canonicalized first; a repeat probe of the most recently
    /// probed path is answered from the cache without spawning a subprocess,
    /// while any other path replaces the slot. Files whose container is not
    /// supported fail with [`ProbeError::Unsupported`] (the identification
    /// itself stays cached, so re-probing them stays cheap too).
    pub fn probe(&mut self, path: &Path) -> Result<ProbeResult, ProbeError> {
        let resolved = resolve_media_path(path)?;

        if let Some(slot) = &self.cache {
            if slot.path == resolved {
                tracing::trace!("probe cache hit: {}", resolved.display());
                return ensure_supported(slot.result.clone());
            }
        }

        self.verify_install()?;
        let result = self.identify(&resolved)?;
        self.cache = Some(CacheSlot {
            path: resolved,
            result: result.clone(),
        });
        ensure_supported(result)
    }

    /// Run `mkvmerge -J` and parse the JSON document it prints.
    fn identify(&self, path: &Path) -> Result<ProbeResult, ProbeError> {
        tracing::debug!("probing {}", path.display());

        let output = Command::new(&self.binary)
            .arg("-J")
            .arg(path)
            .output()
            .map_err(|e| self.tool_missing(format!("failed to run identification: {}", e)))?;

        if !output.status.success() {
            tracing::trace!(
                "mkvmerge -J exited with {:?} for {}",
                output.status.code(),
                path.display()
            );
            return Err(ProbeError::Unsupported(path.to_path_buf()));
        }

        let json: Value = serde_json::from_slice(&output.stdout)
            .map_err(|_| ProbeError::Unsupported(path.to_path_buf()))?;

        parse_identification(&json, path).ok_or_else(|| ProbeError::Unsupported(path.to_path_buf()))
    }

    fn tool_missing(&self, reason: String) -> ProbeError {
        ProbeError::ToolMissing {
            tool: self.binary.display().to_string(),
            reason,
        }
    }
}

/// Canonicalize a candidate path and require a regular file.
fn resolve_media_path(path: &Path) -> Result<PathBuf, ProbeError> {
    let resolved = path
        .canonicalize()
        .map_err(|_| ProbeError::NotFound(path.to_path_buf()))?;
    if !resolved.is_file() {
        return Err(ProbeError::NotFound(resolved));
    }
    Ok(resolved)
}

fn ensure_supported(result: ProbeResult) -> Result<ProbeResult, ProbeError> {
    if result.supported {
        Ok(result)
    } else {
        Err(ProbeError::Unsupported(result.file_path))
    }
}

/// Parse the JSON output from mkvmerge -J.
///
/// Returns `None` when the document is structurally off, which callers
/// surface as an unsupported file.
fn parse_identification(json: &Value, path: &Path) -> Option<ProbeResult> {
    let container = json.get("container")?;

    let supported = container
        .get("supported")
        .and_then(|s| s.as_bool())
        .unwrap_or(false);

    let container_type = container
        .get("type")
        .and_then(|t| t.as_str())
        .unwrap_or("unknown")
        .to_string();

    let mut tracks = Vec::new();
    if let Some(entries) = json.get("tracks").and_then(|t| t.as_array()) {
        for entry in entries {
            tracks.push(parse_track(entry)?);
        }
    }

    Some(ProbeResult {
        file_path: path.to_path_buf(),
        container_type,
        supported,
        tracks,
    })
}

/// Parse a single track entry. A track without an id or type makes the
/// whole document unusable.
fn parse_track(track: &Value) -> Option<ProbeTrack> {
    let id = track.get("id")?.as_u64()? as usize;
    let track_type = TrackType::from_mkvmerge(track.get("type")?.as_str()?);

    let codec = track
        .get("codec")
        .and_then(|c| c.as_str())
        .unwrap_or("")
        .to_string();

    let properties = track.get("properties");

    let name = properties
        .and_then(|p| p.get("track_name"))
        .and_then(|n| n.as_str())
        .map(|s| s.to_string());

    let language = properties
        .and_then(|p| p.get("language"))
        .and_then(|l| l.as_str())
        .map(|s| s.to_string());

    let default_track = properties
        .and_then(|p| p.get("default_track"))
        .and_then(|d| d.as_bool())
        .unwrap_or(false);

    let forced_track = properties
        .and_then(|p| p.get("forced_track"))
        .and_then(|f| f.as_bool())
        .unwrap_or(false);

    Some(ProbeTrack {
        id,
        track_type,
        codec,
        name,
        language,
        default_track,
        forced_track,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support;

    use tempfile::tempdir;

    #[test]
    fn binary_reports_the_configured_tool() {
        let prober = Prober::new("/opt/mkvtoolnix/bin/mkvmerge");
        assert_eq!(prober.binary(), Path::new("/opt/mkvtoolnix/bin/mkvmerge"));
    }

    #[test]
    fn probe_nonexistent_file() {
        let dir = tempdir().unwrap();
        let tool = test_support::fake_mkvmerge(dir.path());
        let mut prober = Prober::new(&tool);

        let result = prober.probe(&dir.path().join("missing.srt"));
        assert!(matches!(result, Err(ProbeError::NotFound(_))));
    }

    #[test]
    fn probe_directory_is_not_found() {
        let dir = tempdir().unwrap();
        let tool = test_support::fake_mkvmerge(dir.path());
        let mut prober = Prober::new(&tool);

        let result = prober.probe(dir.path());
        assert!(matches!(result, Err(ProbeError::NotFound(_))));
    }

    #[test]
    fn missing_binary_is_tool_missing() {
        let dir = tempdir().unwrap();
        let media = test_support::touch(dir.path(), "movie.mp4");
        let mut prober = Prober::new(dir.path().join("no-such-mkvmerge"));

        let result = prober.probe(&media);
        assert!(matches!(result, Err(ProbeError::ToolMissing { .. })));
    }

    #[test]
    fn wrong_version_signature_is_tool_missing() {
        let dir = tempdir().unwrap();
        let tool =
            test_support::write_script(dir.path(), "impostor", "#!/bin/sh\necho not the real thing\n");
        let mut prober = Prober::new(&tool);

        let result = prober.verify_install();
        assert!(matches!(result, Err(ProbeError::ToolMissing { .. })));
    }

    #[test]
    fn probes_supported_media() {
        let dir = tempdir().unwrap();
        let tool = test_support::fake_mkvmerge(dir.path());
        let media = test_support::touch(dir.path(), "movie.mp4");
        let mut prober = Prober::new(&tool);

        let probe = prober.probe(&media).unwrap();
        assert!(probe.supported);
        assert_eq!(probe.track_count(), 2);
        assert_eq!(probe.tracks[0].track_type, TrackType::Video);
        assert_eq!(probe.tracks[1].track_type, TrackType::Audio);
        assert_eq!(probe.tracks[1].language.as_deref(), Some("eng"));
        assert!(probe.tracks[0].default_track);
    }

    #[test]
    fn unsupported_container_is_rejected() {
        let dir = tempdir().unwrap();
        let tool = test_support::fake_mkvmerge(dir.path());
        let media = test_support::touch(dir.path(), "notes.txt");
        let mut prober = Prober::new(&tool);

        let result = prober.probe(&media);
        assert!(matches!(result, Err(ProbeError::Unsupported(_))));
    }

    #[test]
    fn second_probe_hits_cache() {
        let dir = tempdir().unwrap();
        let tool = test_support::fake_mkvmerge(dir.path());
        let media = test_support::touch(dir.path(), "movie.mp4");
        let mut prober = Prober::new(&tool);

        let first = prober.probe(&media).unwrap();
        let second = prober.probe(&media).unwrap();

        assert_eq!(first.track_count(), second.track_count());
        assert_eq!(test_support::probe_invocations(&tool), 1);
    }

    #[test]
    fn probing_another_path_replaces_the_slot() {
        let dir = tempdir().unwrap();
        let tool = test_support::fake_mkvmerge(dir.path());
        let first = test_support::touch(dir.path(), "one.mp4");
        let second = test_support::touch(dir.path(), "two.mp4");
        let mut prober = Prober::new(&tool);

        prober.probe(&first).unwrap();
        prober.probe(&second).unwrap();
        // the slot now holds `second`, so `first` costs a subprocess again
        prober.probe(&first).unwrap();

        assert_eq!(test_support::probe_invocations(&tool), 3);
    }

    #[test]
    fn parses_minimal_document() {
        let json: Value = serde_json::from_str(
            r#"{"container": {"supported": true, "type": "Matroska"},
                "tracks": [{"id": 0, "type": "video", "codec": "AVC"}]}"#,
        )
        .unwrap();

        let probe = parse_identification(&json, Path::new("/m.mkv")).unwrap();
        assert!(probe.supported);
        assert_eq!(probe.tracks.len(), 1);
        assert_eq!(probe.tracks[0].codec, "AVC");
        assert!(probe.tracks[0].language.is_none());
        assert!(!probe.tracks[0].default_track);
    }

    #[test]
    fn track_without_id_fails_parsing() {
        let json: Value = serde_json::from_str(
            r#"{"container": {"supported": true, "type": "Matroska"},
                "tracks": [{"type": "video", "codec": "AVC"}]}"#,
        )
        .unwrap();

        assert!(parse_identification(&json, Path::new("/m.mkv")).is_none());
    }
}
