use std::path::PathBuf;

use clap::Parser;

use crate::error::{Result, TransposeError};

/// Default element width in bytes
pub const DEFAULT_FIELD_WIDTH: usize = 20;

#[derive(Parser, Debug, Clone)]
#[command(name = "ftranspose", version, about = "Transpose a text file of rows/columns")]
pub struct Args {
    /// Verbosity level (0-3); forced to 0 when writing to stdout
    #[arg(short = 'v', long = "verbose", value_name = "N", default_value_t = 0)]
    pub verbosity: u8,

    /// Input field delimiter: a single byte, or \t for tab
    #[arg(short = 'd', long = "delimiter", value_name = "DELIM")]
    pub in_delimiter: Option<String>,

    /// Output field delimiter [default: input delimiter]
    #[arg(short = 'D', long = "output-delimiter", value_name = "DELIM")]
    pub out_delimiter: Option<String>,

    /// Field width in bytes; longer fields are truncated
    #[arg(short = 'f', long = "field-width", value_name = "N", default_value_t = DEFAULT_FIELD_WIDTH)]
    pub field_width: usize,

    /// Read from FILE instead of stdin
    #[arg(short = 'i', long, value_name = "FILE")]
    pub input: Option<PathBuf>,

    /// Write result to FILE instead of stdout
    #[arg(short = 'o', long, value_name = "FILE")]
    pub output: Option<PathBuf>,

    /// Give up when the element store would exceed BYTES
    #[arg(long = "max-memory", value_name = "BYTES")]
    pub max_memory: Option<usize>,
}

/// Parse a delimiter argument, handling the \t escape for tab
pub fn parse_delimiter(s: &str) -> Result<u8> {
    let delimiter = match s.as_bytes() {
        [b] => *b,
        [b'\\', b't'] => b'\t',
        [b'\\', b'\\'] => b'\\',
        _ => return Err(TransposeError::InvalidDelimiter(s.to_string())),
    };
    if delimiter == b'\n' {
        return Err(TransposeError::InvalidDelimiter(s.to_string()));
    }
    Ok(delimiter)
}

/// Treat a path of "-" as the standard stream
fn non_dash(path: &Option<PathBuf>) -> Option<PathBuf> {
    path.clone().filter(|p| p.as_os_str() != "-")
}

impl Args {
    /// Input path, `None` meaning stdin
    pub fn input_file(&self) -> Option<PathBuf> {
        non_dash(&self.input)
    }

    /// Output path, `None` meaning stdout
    pub fn output_file(&self) -> Option<PathBuf> {
        non_dash(&self.output)
    }
}
