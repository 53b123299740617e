//! Types shared by the bulk importer and its callers.

use std::path::{Path, PathBuf};

use serde::Serialize;

/// The fixed source filenames, in import order.
pub const SOURCE_FILES: [&str; 5] = [
  "provinces.csv",
  "regencies.csv",
  "districts.csv",
  "villages.csv",
  "islands.csv",
];

/// A directory holding the five source CSV files.
#[derive(Debug, Clone)]
pub struct SeedSource {
  dir: PathBuf,
}

impl SeedSource {
  pub fn new(dir: impl Into<PathBuf>) -> Self { Self { dir: dir.into() } }

  pub fn dir(&self) -> &Path { &self.dir }

  pub fn provinces(&self) -> PathBuf { self.dir.join(SOURCE_FILES[0]) }

  pub fn regencies(&self) -> PathBuf { self.dir.join(SOURCE_FILES[1]) }

  pub fn districts(&self) -> PathBuf { self.dir.join(SOURCE_FILES[2]) }

  pub fn villages(&self) -> PathBuf { self.dir.join(SOURCE_FILES[3]) }

  pub fn islands(&self) -> PathBuf { self.dir.join(SOURCE_FILES[4]) }
}

/// Receives human-readable status lines while a seed runs.
///
/// Purely advisory: a seed with no sink behaves identically.
pub trait ProgressSink: Send + Sync {
  fn report(&self, message: &str);
}

impl<F> ProgressSink for F
where
  F: Fn(&str) + Send + Sync,
{
  fn report(&self, message: &str) { self(message) }
}

/// Rows written per table by a successful seed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct SeedReport {
  pub provinces: usize,
  pub regencies: usize,
  pub districts: usize,
  pub villages:  usize,
  pub islands:   usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SeedOutcome {
  Seeded(SeedReport),
  /// At least one table already held rows and `force` was not set.
  AlreadySeeded,
}
