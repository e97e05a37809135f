//! Materialise raw input lines before the pipeline runs.

use std::fs::File;
use std::io::{BufRead, BufReader, Read};
use std::path::Path;

use log::{debug, info};

use crate::errors::PhiError;

/// Read every line of `reader`, dropping line terminators (`\n` or `\r\n`).
pub fn lines_from_reader<R: Read>(reader: R) -> Result<Vec<String>, PhiError> {
    let mut lines = Vec::new();
    for line in BufReader::new(reader).lines() {
        lines.push(line?);
    }
    debug!("Read {} raw lines", lines.len());
    Ok(lines)
}

pub fn read_lines<P: AsRef<Path>>(path: P) -> Result<Vec<String>, PhiError> {
    let path = path.as_ref();
    info!("Reading interactions from {}", path.display());
    lines_from_reader(File::open(path)?)
}
