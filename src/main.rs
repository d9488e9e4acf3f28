use std::io::Write;
use std::process::ExitCode;

use clap::Parser;
use tracing::debug;
use tracing_subscriber::EnvFilter;

use go_ctor::args::Args;
use go_ctor::{generate_constructor, GenerateError};

fn main() -> ExitCode {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();

    match run(Args::parse()) {
        Ok(()) => ExitCode::SUCCESS,
        Err(msg) => {
            eprintln!("{msg}");
            ExitCode::FAILURE
        }
    }
}

fn run(args: Args) -> Result<(), String> {
    let req = args.validate()?;
    let content = std::fs::read(&req.file)
        .map_err(|e| format!("Error: failed to read file '{}': {e}", req.file.display()))?;
    debug!(path = %req.file.display(), bytes = content.len(), line = req.line, "read source");

    let constructor = usize::try_from(req.line)
        .map_err(|_| GenerateError::NotFound)
        .and_then(|line| generate_constructor(&content, line))
        .map_err(|e| format!("Error: {e}"))?;
    let mut stdout = std::io::stdout().lock();
    stdout
        .write_all(constructor.as_bytes())
        .and_then(|()| stdout.flush())
        .map_err(|e| format!("Error: {e}"))
}
