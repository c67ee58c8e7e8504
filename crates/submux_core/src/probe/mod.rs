//! Container introspection via mkvmerge identification output.

mod prober;
mod types;

pub use prober::Prober;
pub use types::{ProbeError, ProbeResult, ProbeTrack};
