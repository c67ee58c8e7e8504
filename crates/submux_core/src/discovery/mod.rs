//! Locating subtitle directories and pairing them with their videos.

mod matcher;
mod scan;

pub use matcher::{match_subtitle_dir, MatchError, MatchResult};
pub use scan::find_subtitle_dirs;
