//! Data models for containers and tracks.

mod container;
mod enums;
pub mod lang;
mod track;

pub use container::{MediaFile, MediaInput};
pub use enums::TrackType;
pub use track::{ModelError, Track};
