use std::path::PathBuf;

use clap::Parser;

/// Generate a constructor for the Go type declared at a line
#[derive(Parser, Debug)]
#[command(version, about)]
pub struct Args {
    /// Path to the Go source file
    #[arg(long)]
    pub file: Option<PathBuf>,

    /// Line number of the type definition (1-based)
    #[arg(long, default_value = "0", allow_negative_numbers = true)]
    pub line: String,
}

/// Validated command line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Request {
    pub file: PathBuf,
    /// May be negative; such lines never hold a declaration.
    pub line: i64,
}

impl Args {
    /// Checks the arguments in the order the messages are reported.
    pub fn validate(self) -> Result<Request, String> {
        let Some(file) = self.file.filter(|f| !f.as_os_str().is_empty()) else {
            return Err("Error: --file argument is required.".to_owned());
        };
        if self.line == "0" {
            return Err("Error: --line argument is required.".to_owned());
        }
        let line = self
            .line
            .parse::<i64>()
            .map_err(|e| format!("Error: invalid line number provided: {e}"))?;
        Ok(Request { file, line })
    }
}
