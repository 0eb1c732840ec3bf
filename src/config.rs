use std::path::PathBuf;

use tracing::debug;

use crate::arena::ReservePolicy;
use crate::cli::{Args, parse_delimiter};
use crate::error::{Result, TransposeError};

/// Runtime configuration derived from CLI arguments
#[derive(Clone, Debug)]
pub struct Config {
    /// Effective verbosity, 0 whenever output goes to stdout
    pub verbosity: u8,
    pub in_delimiter: u8,
    pub out_delimiter: u8,
    pub element_width: usize,
    pub input_file: Option<PathBuf>,
    pub output_file: Option<PathBuf>,
    pub reserve_policy: ReservePolicy,
}

impl Config {
    /// Build configuration from parsed CLI arguments
    pub fn from_args(args: &Args) -> Result<Self> {
        if args.field_width == 0 {
            return Err(TransposeError::InvalidWidth);
        }

        let in_delimiter = match &args.in_delimiter {
            Some(s) => parse_delimiter(s)?,
            None => b'\t',
        };
        let out_delimiter = match &args.out_delimiter {
            Some(s) => parse_delimiter(s)?,
            None => in_delimiter,
        };

        let output_file = args.output_file();
        let verbosity = if output_file.is_some() { args.verbosity } else { 0 };

        Ok(Config {
            verbosity,
            in_delimiter,
            out_delimiter,
            element_width: args.field_width,
            input_file: args.input_file(),
            output_file,
            reserve_policy: args
                .max_memory
                .map_or(ReservePolicy::System, ReservePolicy::Capped),
        })
    }

    /// Echo the settings at debug level
    pub fn log_settings(&self) {
        let name = |path: &Option<PathBuf>| {
            path.as_ref()
                .map_or_else(String::new, |p| p.display().to_string())
        };
        debug!("field width  = [{} chars]", self.element_width);
        debug!("in_delim     = [{}]", self.in_delimiter.escape_ascii());
        debug!("out_delim    = [{}]", self.out_delimiter.escape_ascii());
        debug!("in_filename  = [{}]", name(&self.input_file));
        debug!("out_filename = [{}]", name(&self.output_file));
        if let ReservePolicy::Capped(limit) = self.reserve_policy {
            debug!("max_memory   = [{} bytes]", limit);
        }
    }
}
