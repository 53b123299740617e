//! In-memory view of one source CSV file.

use std::{
  fs::File,
  io,
  path::{Path, PathBuf},
};

use csv::StringRecord;

use crate::{Error, Result};

/// A whole CSV file: its header row plus every well-formed data row.
pub struct SourceTable {
  path:    PathBuf,
  headers: StringRecord,
  rows:    Vec<StringRecord>,
  skipped: usize,
}

impl SourceTable {
  /// Read `path` fully into memory.
  ///
  /// Rows whose field count differs from the header's are dropped and only
  /// counted in [`SourceTable::skipped`].
  pub fn read(path: &Path) -> Result<Self> {
    let file = File::open(path).map_err(|e| match e.kind() {
      io::ErrorKind::NotFound => Error::SourceFileMissing(path.to_path_buf()),
      _ => unreadable(path, e),
    })?;

    let mut reader = csv::ReaderBuilder::new()
      .has_headers(true)
      .flexible(true)
      .from_reader(file);

    let headers = reader.headers().map_err(|e| unreadable(path, e))?.clone();
    if headers.is_empty() {
      return Err(unreadable(path, "missing header row"));
    }

    let mut rows = Vec::new();
    let mut skipped = 0;
    for record in reader.records() {
      let record = record.map_err(|e| unreadable(path, e))?;
      if record.len() == headers.len() {
        rows.push(record);
      } else {
        skipped += 1;
        tracing::debug!(
          path = %path.display(),
          line = record.position().map(|p| p.line()),
          "skipping row with {} fields, expected {}",
          record.len(),
          headers.len(),
        );
      }
    }

    Ok(Self { path: path.to_path_buf(), headers, rows, skipped })
  }

  pub fn rows(&self) -> &[StringRecord] { &self.rows }

  pub fn skipped(&self) -> usize { self.skipped }

  /// Index of an optional column.
  pub fn column(&self, name: &str) -> Option<usize> {
    self.headers.iter().position(|h| h == name)
  }

  /// Index of a column every row must carry.
  pub fn require(&self, name: &str) -> Result<usize> {
    self
      .column(name)
      .ok_or_else(|| unreadable(&self.path, format!("missing column {name:?}")))
  }
}

/// Field `index` of `row`, if the column exists.
pub fn field(row: &StringRecord, index: Option<usize>) -> Option<&str> {
  index.and_then(|i| row.get(i))
}

fn unreadable(path: &Path, reason: impl ToString) -> Error {
  Error::SourceUnreadable { path: path.to_path_buf(), reason: reason.to_string() }
}
