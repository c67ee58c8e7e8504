//! Merge command generation and execution.

mod executor;
mod options_builder;

pub use executor::{run_mux, MuxError, MuxOutcome};
pub use options_builder::{
    format_tokens_pretty, CommandError, MkvmergeOptionsBuilder, OUTPUT_EXTENSION,
};
