mod cli;

use std::process::ExitCode;

use anyhow::{bail, Result};
use clap::Parser;
use tracing_subscriber::EnvFilter;

use submux_core::config::load_settings;
use submux_core::pipeline::{self, RunOptions};

use cli::Cli;

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match run(&cli) {
        Ok(failed) if failed > 0 => ExitCode::from(1),
        Ok(_) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("error: {:#}", err);
            ExitCode::from(2)
        }
    }
}

fn run(cli: &Cli) -> Result<usize> {
    for input in &cli.input {
        if !input.exists() {
            bail!("input path does not exist: {}", input.display());
        }
    }

    let settings = load_settings(cli.config.as_deref())?;
    tracing::debug!("using mkvmerge at {}", settings.tools.mkvmerge);

    let options = RunOptions {
        dry_run: cli.dry_run,
        keep_sources: cli.keep,
        silent: cli.verbose < 2,
    };

    let summary = pipeline::run(&cli.input, &settings, &options)?;
    println!("{}", summary);
    Ok(summary.failed)
}

/// Respect RUST_LOG if set, otherwise derive the filter from -v flags.
fn init_logging(verbose: u8) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        let level = match verbose {
            0 => "info",
            1 => "debug",
            _ => "trace",
        };
        // run_mux relays tool output under the "mkvmerge" target.
        EnvFilter::new(format!("submux_cli={level},submux_core={level},mkvmerge={level}"))
    });

    tracing_subscriber::fmt().with_env_filter(filter).init();
}
