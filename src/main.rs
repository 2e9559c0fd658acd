//! Run a skip list trace file and print each command's output.
//!
//! Usage: rungs [--verbose] <tracefile>

use std::path::Path;
use std::process::ExitCode;

use anyhow::Context;
use tracing_subscriber::EnvFilter;

use rungs::Config;
use rungs::script::run_file;

fn main() -> anyhow::Result<ExitCode> {
    let mut verbose = false;
    let mut path = None;
    for arg in std::env::args().skip(1) {
        match arg.as_str() {
            "-v" | "--verbose" => verbose = true,
            _ if path.is_none() => path = Some(arg),
            _ => {
                eprintln!("Usage: rungs [--verbose] <tracefile>");
                return Ok(ExitCode::FAILURE);
            }
        }
    }
    let Some(path) = path else {
        eprintln!("Usage: rungs [--verbose] <tracefile>");
        return Ok(ExitCode::FAILURE);
    };

    let default_level = if verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .with_writer(std::io::stderr)
        .init();

    let outputs = run_file(Path::new(&path), Config::default().verbose(verbose))
        .with_context(|| format!("trace file {} failed", path))?;

    for output in outputs {
        println!("{}", output);
    }
    return Ok(ExitCode::SUCCESS);
}
