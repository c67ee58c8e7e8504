//! Core enums shared across the crate.

/// Type of media track.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TrackType {
    Video,
    Audio,
    Subtitles,
    /// Anything mkvmerge reports that is not video, audio, or subtitles
    /// (button tracks and the like).
    Other,
}

impl TrackType {
    /// Map the `type` string from mkvmerge identification output.
    ///
    /// Unknown strings fold into [`TrackType::Other`] rather than failing,
    /// since such tracks are still carried through a merge untouched.
    pub fn from_mkvmerge(s: &str) -> TrackType {
        match s {
            "video" => TrackType::Video,
            "audio" => TrackType::Audio,
            "subtitles" => TrackType::Subtitles,
            _ => TrackType::Other,
        }
    }
}

impl std::fmt::Display for TrackType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TrackType::Video => write!(f, "video"),
            TrackType::Audio => write!(f, "audio"),
            TrackType::Subtitles => write!(f, "subtitles"),
            TrackType::Other => write!(f, "other"),
        }
    }
}
