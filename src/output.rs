use std::fs::File;
use std::io::{self, BufWriter, Write};

use tracing::{info, trace};

use crate::config::Config;
use crate::error::{Result, TransposeError};
use crate::table::Table;

/// Lines between progress reports while writing
const PROGRESS_INTERVAL: usize = 10_000;

/// Write the table transposed: one output line per original column
pub fn write_transposed<W: Write>(writer: W, table: &Table, delimiter: u8) -> io::Result<()> {
    let mut writer = BufWriter::new(writer);
    info!("writing array transposed ...");

    for col in 0..table.cols() {
        for row in 0..table.rows() {
            if row > 0 {
                writer.write_all(&[delimiter])?;
            }
            writer.write_all(table.text(row, col))?;
        }
        writer.write_all(b"\n")?;

        if col > 1 && col % PROGRESS_INTERVAL == 0 {
            trace!("line={}", col);
        }
    }

    writer.flush()?;
    info!("DONE");
    Ok(())
}

/// Open output file or return stdout
pub fn open_output(config: &Config) -> Result<Box<dyn Write>> {
    match &config.output_file {
        Some(path) => {
            let file = File::create(path).map_err(|source| TransposeError::Open {
                path: path.clone(),
                source,
            })?;
            Ok(Box::new(file))
        }
        None => Ok(Box::new(io::stdout())),
    }
}
