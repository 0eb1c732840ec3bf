use std::fs::File;
use std::io::{self, BufRead, BufReader, Bytes};

use bstr::ByteSlice;
use tracing::{debug, info, warn};

use crate::arena::{Arena, ReservePolicy};
use crate::config::Config;
use crate::error::{Result, TransposeError};
use crate::table::Table;

/// Accumulates fields into fixed-width elements and tracks row geometry
struct Loader {
    delimiter: u8,
    width: usize,
    /// Bytes of the field being read, never longer than `width`
    element: Vec<u8>,
    arena: Arena,
    row_lengths: Vec<usize>,
    /// Elements stored for the current row
    col: usize,
    overruns: usize,
}

impl Loader {
    fn new(delimiter: u8, width: usize, policy: ReservePolicy) -> Self {
        Self {
            delimiter,
            width,
            element: Vec::with_capacity(width),
            arena: Arena::new(width, policy),
            row_lengths: Vec::new(),
            col: 0,
            overruns: 0,
        }
    }

    fn is_separator(&self, c: u8) -> bool {
        c == self.delimiter || c == b'\n'
    }

    fn is_full(&self) -> bool {
        self.element.len() >= self.width
    }

    fn accept(&mut self, c: u8) {
        self.element.push(c);
    }

    fn overrun(&mut self) {
        self.overruns += 1;
        warn!(
            "element @[{},{}] size exceeded, truncated to {:?}",
            self.row_lengths.len(),
            self.col,
            self.element.as_bstr()
        );
    }

    /// Close the current field on a delimiter or newline
    fn end_field(&mut self, separator: u8) -> Result<()> {
        self.flush_element()?;
        if separator == b'\n' {
            self.end_row();
        }
        Ok(())
    }

    fn flush_element(&mut self) -> Result<()> {
        if !self.element.is_empty() {
            self.arena.push(&self.element)?;
            self.element.clear();
            self.col += 1;
        }
        Ok(())
    }

    fn end_row(&mut self) {
        self.row_lengths.push(self.col);
        debug!("row={}", self.row_lengths.len());
        self.col = 0;
    }

    /// Finalize a pending unterminated line and build the table
    fn finish(mut self) -> Result<Table> {
        self.flush_element()?;
        if self.col > 0 {
            self.end_row();
        }
        Table::from_rows(self.arena, &self.row_lengths, self.overruns)
    }
}

/// Discard the rest of an oversized field, returning the byte that ended it
fn skip_field<R: BufRead>(bytes: &mut Bytes<R>, delimiter: u8) -> io::Result<Option<u8>> {
    for c in bytes {
        let c = c?;
        if c == delimiter || c == b'\n' {
            return Ok(Some(c));
        }
    }
    Ok(None)
}

/// Read a delimited table into fixed-width elements
///
/// Fields longer than `width` bytes keep their first `width` bytes; the
/// rest is skipped with a warning. Empty fields are not stored. A final
/// line without a trailing newline counts as a row only if it has content.
/// Short rows are padded so the result is always rectangular.
pub fn read_table<R: BufRead>(
    reader: R,
    delimiter: u8,
    width: usize,
    policy: ReservePolicy,
) -> Result<Table> {
    info!("reading array ...");
    let mut loader = Loader::new(delimiter, width, policy);
    let mut bytes = reader.bytes();

    while let Some(c) = bytes.next() {
        let c = c?;
        if loader.is_separator(c) {
            loader.end_field(c)?;
        } else if loader.is_full() {
            loader.overrun();
            match skip_field(&mut bytes, delimiter)? {
                Some(separator) => loader.end_field(separator)?,
                None => break,
            }
        } else {
            loader.accept(c);
        }
    }

    let table = loader.finish()?;
    info!(
        "DONE, read in {} elements (r={}, c={}), {} truncated",
        table.element_count(),
        table.rows(),
        table.cols(),
        table.overruns()
    );
    Ok(table)
}

/// Open input file or return stdin
pub fn open_input(config: &Config) -> Result<Box<dyn BufRead>> {
    match &config.input_file {
        Some(path) => {
            let file = File::open(path).map_err(|source| TransposeError::Open {
                path: path.clone(),
                source,
            })?;
            Ok(Box::new(BufReader::new(file)))
        }
        None => Ok(Box::new(io::stdin().lock())),
    }
}
