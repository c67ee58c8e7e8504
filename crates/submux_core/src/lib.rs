//! submux core - mkvmerge-backed subtitle merging
//!
//! This crate contains all probing, matching, and merging logic with no CLI
//! dependencies. The `submux` binary is a thin front end over
//! [`pipeline::run`].

pub mod config;
pub mod discovery;
pub mod models;
pub mod mux;
pub mod pipeline;
pub mod probe;

#[cfg(test)]
pub(crate) mod test_support;

/// Returns the crate version.
pub fn version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
