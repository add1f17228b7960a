// Tue Jan 15 2026 - Alex

use crate::symbol::{ExportTable, SymbolError};
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

/// Writes every identifier, sorted, one per line. Truncates an existing file.
pub fn write_sorted<P: AsRef<Path>>(table: &ExportTable, path: P) -> Result<usize, SymbolError> {
    let file = File::create(path.as_ref())?;
    write_sorted_to(table, BufWriter::new(file))
}

pub fn write_sorted_to<W: Write>(table: &ExportTable, mut writer: W) -> Result<usize, SymbolError> {
    let identifiers = table.sorted_identifiers();
    for identifier in &identifiers {
        writeln!(writer, "{}", identifier)?;
    }
    writer.flush()?;
    Ok(identifiers.len())
}
