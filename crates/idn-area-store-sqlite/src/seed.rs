//! Bulk import of the five area tables from CSV.
//!
//! The whole seed (optional clear plus every table) runs inside one SQLite
//! transaction on the connection thread. Any error drops the transaction,
//! which rolls it back, so the store is left exactly as it was.

use std::sync::Arc;

use chrono::Utc;
use idn_area_core::seed::{ProgressSink, SeedOutcome, SeedReport, SeedSource};
use rusqlite::{OptionalExtension as _, Transaction, types::Value};

use crate::{
  Error, Result, SqliteStore,
  encode::{encode_dt, nullable, parse_flag},
  schema::Tables,
  source::{SourceTable, field},
};

/// Rows per `INSERT` for every table but villages.
const BATCH_SIZE: usize = 100;
/// Villages are by far the largest table; keep their statements smaller.
const VILLAGE_BATCH_SIZE: usize = 50;
/// Village progress is reported every this many rows.
const VILLAGE_PROGRESS_EVERY: usize = 1000;

impl SqliteStore {
  /// Populate all five tables from the CSV files in `source`.
  ///
  /// Without `force`, a store holding any rows is left untouched and
  /// [`SeedOutcome::AlreadySeeded`] is returned. With `force`, every table
  /// is emptied first. Either everything is imported or nothing changes.
  pub async fn seed(
    &self,
    source:   &SeedSource,
    force:    bool,
    progress: Option<Arc<dyn ProgressSink>>,
  ) -> Result<SeedOutcome> {
    let tables = Arc::clone(&self.tables);
    let files = source.clone();

    let outcome = self
      .conn
      .call(move |conn| {
        let progress = Progress(progress.as_deref());
        Ok(seed_blocking(conn, &tables, &files, force, &progress))
      })
      .await??;

    if let SeedOutcome::Seeded(report) = outcome {
      tracing::info!(?report, dir = %source.dir().display(), "seed committed");
    }
    Ok(outcome)
  }
}

// ─── Progress ────────────────────────────────────────────────────────────────

/// Sends status lines to the caller's sink, or to `tracing` when there is
/// none.
struct Progress<'a>(Option<&'a dyn ProgressSink>);

impl Progress<'_> {
  fn report(&self, message: &str) {
    match self.0 {
      Some(sink) => sink.report(message),
      None => tracing::info!("{message}"),
    }
  }
}

// ─── Pipeline ────────────────────────────────────────────────────────────────

fn seed_blocking(
  conn:     &mut rusqlite::Connection,
  tables:   &Tables,
  source:   &SeedSource,
  force:    bool,
  progress: &Progress<'_>,
) -> Result<SeedOutcome> {
  check_tables(conn, tables)?;

  if !force && has_data(conn, tables)? {
    tracing::warn!("area tables already populated; skipping seed");
    progress.report("Data already exists. Use --force to reseed.");
    return Ok(SeedOutcome::AlreadySeeded);
  }

  let tx = conn.transaction()?;

  if force {
    clear(&tx, tables, progress)?;
  }

  let now = encode_dt(Utc::now());
  let importer = Importer { tx: &tx, now: &now, progress };

  // Strict order: each table's foreign keys point at the one before it.
  let report = SeedReport {
    provinces: importer.provinces(&tables.provinces, source)?,
    regencies: importer.regencies(&tables.regencies, source)?,
    districts: importer.districts(&tables.districts, source)?,
    villages:  importer.villages(&tables.villages, source)?,
    islands:   importer.islands(&tables.islands, source)?,
  };

  tx.commit().map_err(Error::from_write)?;
  Ok(SeedOutcome::Seeded(report))
}

/// Fail with the first table, in import order, that does not exist.
fn check_tables(conn: &rusqlite::Connection, tables: &Tables) -> Result<()> {
  for table in tables.import_order() {
    let exists = conn
      .query_row(
        "SELECT 1 FROM sqlite_master WHERE type = 'table' AND name = ?1",
        rusqlite::params![table],
        |_| Ok(true),
      )
      .optional()?
      .unwrap_or(false);

    if !exists {
      return Err(Error::SchemaMissing(table.to_owned()));
    }
  }
  Ok(())
}

fn has_data(conn: &rusqlite::Connection, tables: &Tables) -> Result<bool> {
  for table in tables.import_order() {
    let any: bool = conn.query_row(
      &format!("SELECT EXISTS (SELECT 1 FROM {table})"),
      [],
      |row| row.get(0),
    )?;
    if any {
      return Ok(true);
    }
  }
  Ok(false)
}

/// Empty every table, children first. The delete order alone keeps every
/// foreign key satisfied; deferring checks only guards the clear should a
/// table ever be added out of order.
fn clear(tx: &Transaction<'_>, tables: &Tables, progress: &Progress<'_>) -> Result<()> {
  progress.report("Clearing existing data...");
  tx.execute_batch("PRAGMA defer_foreign_keys = ON;")?;
  for table in tables.clear_order() {
    tx.execute(&format!("DELETE FROM {table}"), [])?;
  }
  tx.execute_batch("PRAGMA defer_foreign_keys = OFF;")?;
  Ok(())
}

// ─── Per-table import ────────────────────────────────────────────────────────

struct Importer<'a> {
  tx:       &'a Transaction<'a>,
  /// `created_at` / `updated_at` for every row of this seed.
  now:      &'a str,
  progress: &'a Progress<'a>,
}

impl Importer<'_> {
  fn provinces(&self, table: &str, source: &SeedSource) -> Result<usize> {
    self.progress.report("Seeding provinces...");
    let src = SourceTable::read(&source.provinces())?;
    let (code, name) = (src.require("code")?, src.require("name")?);

    let rows = src
      .rows()
      .iter()
      .map(|r| vec![text(&r[code]), text(&r[name]), self.stamp(), self.stamp()])
      .collect::<Vec<_>>();

    let n = self.insert(table, &["code", "name"], &rows, BATCH_SIZE, |_| {})?;
    self.finish(n, "provinces", &src);
    Ok(n)
  }

  fn regencies(&self, table: &str, source: &SeedSource) -> Result<usize> {
    self.progress.report("Seeding regencies...");
    let src = SourceTable::read(&source.regencies())?;
    let code = src.require("code")?;
    let parent = src.require("province_code")?;
    let name = src.require("name")?;

    let rows = src
      .rows()
      .iter()
      .map(|r| {
        vec![
          text(&r[code]),
          text(&r[parent]),
          text(&r[name]),
          self.stamp(),
          self.stamp(),
        ]
      })
      .collect::<Vec<_>>();

    let n = self.insert(
      table,
      &["code", "province_code", "name"],
      &rows,
      BATCH_SIZE,
      |_| {},
    )?;
    self.finish(n, "regencies", &src);
    Ok(n)
  }

  fn districts(&self, table: &str, source: &SeedSource) -> Result<usize> {
    self.progress.report("Seeding districts...");
    let src = SourceTable::read(&source.districts())?;
    let code = src.require("code")?;
    let parent = src.require("regency_code")?;
    let name = src.require("name")?;

    let rows = src
      .rows()
      .iter()
      .map(|r| {
        vec![
          text(&r[code]),
          text(&r[parent]),
          text(&r[name]),
          self.stamp(),
          self.stamp(),
        ]
      })
      .collect::<Vec<_>>();

    let n = self.insert(
      table,
      &["code", "regency_code", "name"],
      &rows,
      BATCH_SIZE,
      |_| {},
    )?;
    self.finish(n, "districts", &src);
    Ok(n)
  }

  fn villages(&self, table: &str, source: &SeedSource) -> Result<usize> {
    self.progress.report("Seeding villages...");
    let src = SourceTable::read(&source.villages())?;
    let code = src.require("code")?;
    let parent = src.require("district_code")?;
    let name = src.require("name")?;

    let rows = src
      .rows()
      .iter()
      .map(|r| {
        vec![
          text(&r[code]),
          text(&r[parent]),
          text(&r[name]),
          self.stamp(),
          self.stamp(),
        ]
      })
      .collect::<Vec<_>>();

    let n = self.insert(
      table,
      &["code", "district_code", "name"],
      &rows,
      VILLAGE_BATCH_SIZE,
      |done| {
        if done % VILLAGE_PROGRESS_EVERY == 0 {
          self.progress.report(&format!("Seeded {done} villages..."));
        }
      },
    )?;
    self.finish(n, "villages", &src);
    Ok(n)
  }

  fn islands(&self, table: &str, source: &SeedSource) -> Result<usize> {
    self.progress.report("Seeding islands...");
    let src = SourceTable::read(&source.islands())?;
    let name = src.require("name")?;
    // Everything else is optional on islands.
    let code = src.column("code");
    let coordinate = src.column("coordinate");
    let outermost = src.column("is_outermost_small");
    let populated = src.column("is_populated");
    let regency = src.column("regency_code");

    let rows = src
      .rows()
      .iter()
      .map(|r| {
        vec![
          opt_text(nullable(field(r, code))),
          opt_text(nullable(field(r, coordinate))),
          text(&r[name]),
          Value::Integer(parse_flag(field(r, outermost)).into()),
          Value::Integer(parse_flag(field(r, populated)).into()),
          opt_text(nullable(field(r, regency))),
          self.stamp(),
          self.stamp(),
        ]
      })
      .collect::<Vec<_>>();

    let n = self.insert(
      table,
      &[
        "code",
        "coordinate",
        "name",
        "is_outermost_small",
        "is_populated",
        "regency_code",
      ],
      &rows,
      BATCH_SIZE,
      |_| {},
    )?;
    self.finish(n, "islands", &src);
    Ok(n)
  }

  // ── Helpers ───────────────────────────────────────────────────────────────

  fn stamp(&self) -> Value { text(self.now) }

  fn finish(&self, n: usize, what: &str, src: &SourceTable) {
    if src.skipped() > 0 {
      tracing::debug!(skipped = src.skipped(), "{what}: malformed rows skipped");
    }
    self.progress.report(&format!("Seeded {n} {what}"));
  }

  /// Insert `rows` into `table` as multi-row `INSERT`s of at most `batch`
  /// rows. Each row holds `columns` followed by `created_at, updated_at`.
  /// `on_batch` receives the running total after every statement.
  fn insert(
    &self,
    table:        &str,
    columns:      &[&str],
    rows:         &[Vec<Value>],
    batch:        usize,
    mut on_batch: impl FnMut(usize),
  ) -> Result<usize> {
    let width = columns.len() + 2;
    let tuple = format!("({})", vec!["?"; width].join(", "));
    let mut done = 0;

    for chunk in rows.chunks(batch) {
      let values = vec![tuple.as_str(); chunk.len()].join(", ");
      let sql = format!(
        "INSERT INTO {table} ({}, created_at, updated_at) VALUES {values}",
        columns.join(", ")
      );
      self
        .tx
        .execute(&sql, rusqlite::params_from_iter(chunk.iter().flatten()))
        .map_err(Error::from_write)?;
      done += chunk.len();
      on_batch(done);
    }

    Ok(done)
  }
}

fn text(s: &str) -> Value { Value::Text(s.to_owned()) }

fn opt_text(s: Option<String>) -> Value { s.map_or(Value::Null, Value::Text) }
