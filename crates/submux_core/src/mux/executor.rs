//! mkvmerge process execution.
//!
//! Runs a token list produced by the options builder and maps mkvmerge's
//! exit codes: 0 is success, 1 is success with warnings, anything else is
//! a failure.

use std::io;
use std::process::Command;

use thiserror::Error;
use tracing::{trace, warn};

/// How a merge invocation ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MuxOutcome {
    /// Exit code 0.
    Success,
    /// Exit code 1. The output file was written.
    Warnings,
}

/// Error type for merge execution.
#[derive(Error, Debug)]
pub enum MuxError {
    #[error("empty merge command")]
    EmptyCommand,

    #[error("failed to launch {tool}: {source}")]
    Launch {
        tool: String,
        #[source]
        source: io::Error,
    },

    #[error("mkvmerge failed with exit code {exit_code}: {stderr}")]
    Failed { exit_code: i32, stderr: String },
}

/// Run a merge command to completion.
///
/// The first token is the program, the rest are its arguments. Tool output
/// is captured either way; `silent` controls whether it is relayed to the
/// log. Stderr is kept for the error message on failure.
pub fn run_mux(command: &[String], silent: bool) -> Result<MuxOutcome, MuxError> {
    let (program, args) = command.split_first().ok_or(MuxError::EmptyCommand)?;

    let output = Command::new(program)
        .args(args)
        .output()
        .map_err(|source| MuxError::Launch {
            tool: program.clone(),
            source,
        })?;

    if !silent {
        for line in String::from_utf8_lossy(&output.stdout).lines() {
            trace!(target: "mkvmerge", "{line}");
        }
        for line in String::from_utf8_lossy(&output.stderr).lines() {
            trace!(target: "mkvmerge", "{line}");
        }
    }

    match output.status.code() {
        Some(0) => Ok(MuxOutcome::Success),
        Some(1) => {
            warn!("mkvmerge completed with warnings");
            Ok(MuxOutcome::Warnings)
        }
        code => Err(MuxError::Failed {
            exit_code: code.unwrap_or(-1),
            stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
        }),
    }
}
