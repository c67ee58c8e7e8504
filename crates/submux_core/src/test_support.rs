//! Shared fixtures for exercising the probe and merge layers without a real
//! mkvtoolnix install.
//!
//! The fake mkvmerge is a small shell script that answers `-V` with a
//! plausible banner, `-J` with canned identification JSON picked by file
//! extension, and `-o` by creating the output file. Every `-J` call is
//! appended to a sidecar log so tests can count probe subprocesses.

use std::fs;
use std::os::unix::fs::PermissionsExt;
use std::path::{Path, PathBuf};

const FAKE_TOOL_PREFIX: &str = r#"#!/bin/sh
case "$1" in
-V)
    echo "mkvmerge v65.0.0 ('Test Double') 64-bit"
    ;;
-J)
    echo "$2" >> "$0.probes"
    case "$2" in
    *.srt)
        echo '{"container":{"supported":true,"type":"SSA/ASS/SRT"},"tracks":[{"id":0,"type":"subtitles","codec":"SubRip/SRT","properties":{}}]}'
        ;;
    *.ass)
        echo '{"container":{"supported":true,"type":"SSA/ASS/SRT"},"tracks":[{"id":0,"type":"subtitles","codec":"SubStationAlpha","properties":{"language":"eng"}}]}'
        ;;
    *.mkv)
        echo '{"container":{"supported":true,"type":"Matroska"},"tracks":[{"id":0,"type":"video","codec":"AVC/H.264/MPEG-4p10","properties":{"language":"und","default_track":true,"forced_track":false}},{"id":1,"type":"audio","codec":"AAC","properties":{"language":"eng","default_track":true,"forced_track":false}}]}'
        ;;
    *.mp4|*.avi)
        echo '{"container":{"supported":true,"type":"QuickTime/MP4"},"tracks":[{"id":0,"type":"video","codec":"AVC/H.264/MPEG-4p10","properties":{"language":"und","default_track":true,"forced_track":false}},{"id":1,"type":"audio","codec":"AAC","properties":{"language":"eng","default_track":true,"forced_track":false}}]}'
        ;;
    *)
        echo '{"container":{"recognized":false,"supported":false},"tracks":[]}'
        ;;
    esac
    ;;
-o)
"#;

const FAKE_TOOL_SUFFIX: &str = r#"    ;;
*)
    exit 2
    ;;
esac
exit 0
"#;

/// Write an executable shell script into `dir`. A shebang is prepended when
/// the body does not bring its own.
pub fn write_script(dir: &Path, name: &str, body: &str) -> PathBuf {
    let path = dir.join(name);
    let script = if body.starts_with("#!") {
        body.to_string()
    } else {
        format!("#!/bin/sh\n{}", body)
    };
    fs::write(&path, script).expect("write fixture script");

    let mut perms = fs::metadata(&path).expect("fixture metadata").permissions();
    perms.set_mode(0o755);
    fs::set_permissions(&path, perms).expect("mark fixture executable");
    path
}

/// A fake mkvmerge whose merges succeed by creating the output file.
pub fn fake_mkvmerge(dir: &Path) -> PathBuf {
    let script = format!(
        "{}    shift\n    : > \"$1\"\n{}",
        FAKE_TOOL_PREFIX, FAKE_TOOL_SUFFIX
    );
    write_script(dir, "mkvmerge", &script)
}

/// A fake mkvmerge that probes normally but fails every merge with exit
/// code 2.
pub fn fake_mkvmerge_failing_mux(dir: &Path) -> PathBuf {
    let script = format!(
        "{}    echo 'Error: the destination could not be opened for writing' >&2\n    exit 2\n{}",
        FAKE_TOOL_PREFIX, FAKE_TOOL_SUFFIX
    );
    write_script(dir, "mkvmerge", &script)
}

/// Number of `-J` subprocesses the fake tool has answered so far.
pub fn probe_invocations(tool: &Path) -> usize {
    let log = PathBuf::from(format!("{}.probes", tool.display()));
    fs::read_to_string(log)
        .map(|content| content.lines().count())
        .unwrap_or(0)
}

/// Create an empty file named `name` inside `dir`.
pub fn touch(dir: &Path, name: &str) -> PathBuf {
    let path = dir.join(name);
    fs::write(&path, b"").expect("create fixture file");
    path
}
