//! [`SqliteStore`], the SQLite implementation of [`AreaStore`].

use std::{path::Path, sync::Arc};

use idn_area_core::{
  area::{Area, AreaCode, AreaKind, District, Island, Province, Regency, Village},
  config::AreaConfig,
  hierarchy::{Lineage, ProvinceNode, Statistics, assemble},
  store::{AreaStore, IslandQuery, SearchKind, SearchResults},
};
use rusqlite::{OptionalExtension as _, Row, functions::FunctionFlags, types::Value};

use crate::{
  Result,
  encode::{
    DISTRICT_COLUMNS, ISLAND_COLUMNS, PROVINCE_COLUMNS, REGENCY_COLUMNS,
    VILLAGE_COLUMNS, district_at, optional_at, province_at, qualified, read_district,
    read_island, read_province, read_regency, read_village, regency_at,
    village_at,
  },
  schema::{self, Tables},
};

type RowReader<T> = fn(&Row<'_>) -> rusqlite::Result<T>;

// ─── Store ───────────────────────────────────────────────────────────────────

/// An area store backed by a single SQLite file.
///
/// Cloning is cheap; the inner connection is reference-counted.
#[derive(Clone)]
pub struct SqliteStore {
  pub(crate) conn:   tokio_rusqlite::Connection,
  pub(crate) config: Arc<AreaConfig>,
  pub(crate) tables: Arc<Tables>,
}

impl SqliteStore {
  /// Open (or create) a store at `path` and provision the schema.
  pub async fn open(path: impl AsRef<Path>, config: AreaConfig) -> Result<Self> {
    let store = Self::connect(path, config).await?;
    store.migrate().await?;
    Ok(store)
  }

  /// Open a provisioned in-memory store, mostly for tests.
  pub async fn open_in_memory(config: AreaConfig) -> Result<Self> {
    let store = Self::connect_in_memory(config).await?;
    store.migrate().await?;
    Ok(store)
  }

  /// Open a store at `path` without touching the schema.
  pub async fn connect(path: impl AsRef<Path>, config: AreaConfig) -> Result<Self> {
    let tables = Tables::new(&config)?;
    let conn = tokio_rusqlite::Connection::open(path).await?;
    Self::init(conn, config, tables).await
  }

  /// Open an in-memory store without touching the schema.
  pub async fn connect_in_memory(config: AreaConfig) -> Result<Self> {
    let tables = Tables::new(&config)?;
    let conn = tokio_rusqlite::Connection::open_in_memory().await?;
    Self::init(conn, config, tables).await
  }

  async fn init(
    conn:   tokio_rusqlite::Connection,
    config: AreaConfig,
    tables: Tables,
  ) -> Result<Self> {
    let pragmas = schema::pragmas(&config);
    conn
      .call(move |conn| {
        conn.execute_batch(&pragmas)?;
        register_unicode_lower(conn)?;
        Ok(())
      })
      .await?;
    Ok(Self { conn, config: Arc::new(config), tables: Arc::new(tables) })
  }

  /// Create any missing tables and indexes.
  pub async fn migrate(&self) -> Result<()> {
    let ddl = schema::ddl(&self.tables);
    self
      .conn
      .call(move |conn| {
        conn.execute_batch(&ddl)?;
        Ok(())
      })
      .await?;
    tracing::debug!(version = schema::SCHEMA_VERSION, "schema provisioned");
    Ok(())
  }

  pub fn tables(&self) -> &Tables { &self.tables }

  // ── Query helpers ─────────────────────────────────────────────────────────

  async fn fetch_all<T: Send + 'static>(
    &self,
    sql:    String,
    params: Vec<Value>,
    read:   RowReader<T>,
  ) -> Result<Vec<T>> {
    let rows = self
      .conn
      .call(move |conn| {
        let mut stmt = conn.prepare(&sql)?;
        let rows = stmt
          .query_map(rusqlite::params_from_iter(params), read)?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;
    Ok(rows)
  }

  async fn fetch_one<T: Send + 'static>(
    &self,
    sql:    String,
    params: Vec<Value>,
    read:   RowReader<T>,
  ) -> Result<Option<T>> {
    let row = self
      .conn
      .call(move |conn| {
        Ok(
          conn
            .query_row(&sql, rusqlite::params_from_iter(params), read)
            .optional()?,
        )
      })
      .await?;
    Ok(row)
  }

  /// Children of `parent_code` in `table`, name-ordered.
  async fn children<T: Send + 'static>(
    &self,
    table:        &str,
    columns:      &str,
    parent_col:   &str,
    parent_code:  &str,
    read:         RowReader<T>,
  ) -> Result<Vec<T>> {
    let sql = format!(
      "SELECT {columns} FROM {table}
       WHERE {parent_col} = ?1
       ORDER BY name, code"
    );
    self.fetch_all(sql, vec![text(parent_code)], read).await
  }

  async fn by_code<T: Send + 'static>(
    &self,
    table:   &str,
    columns: &str,
    code:    &str,
    read:    RowReader<T>,
  ) -> Result<Option<T>> {
    let sql = format!("SELECT {columns} FROM {table} WHERE code = ?1");
    self.fetch_one(sql, vec![text(code)], read).await
  }

  /// Name-substring matches in `table`, honouring the case-sensitivity
  /// setting. The needle is matched literally via `instr`, so `%` and `_`
  /// carry no special meaning.
  async fn name_matches<T: Send + 'static>(
    &self,
    table:    &str,
    columns:  &str,
    order_by: &str,
    needle:   &str,
    limit:    Option<usize>,
    read:     RowReader<T>,
  ) -> Result<Vec<T>> {
    let predicate = if self.config.search.case_sensitive {
      "instr(name, ?1) > 0"
    } else {
      "instr(unicode_lower(name), unicode_lower(?1)) > 0"
    };
    let limit_clause = if limit.is_some() { "LIMIT ?2" } else { "" };
    let sql = format!(
      "SELECT {columns} FROM {table}
       WHERE {predicate}
       ORDER BY {order_by}
       {limit_clause}"
    );

    let mut params = vec![text(needle)];
    if let Some(n) = limit {
      params.push(Value::Integer(clamp_i64(n)));
    }
    self.fetch_all(sql, params, read).await
  }
}

/// SQLite's built-in `lower()` folds ASCII only; names such as `ÉCOLE`
/// need full Unicode case folding to match `école`.
fn register_unicode_lower(conn: &rusqlite::Connection) -> rusqlite::Result<()> {
  conn.create_scalar_function(
    "unicode_lower",
    1,
    FunctionFlags::SQLITE_UTF8 | FunctionFlags::SQLITE_DETERMINISTIC,
    |ctx| Ok(ctx.get::<Option<String>>(0)?.map(|s| s.to_lowercase())),
  )
}

fn text(s: &str) -> Value { Value::Text(s.to_owned()) }

fn clamp_i64(n: usize) -> i64 { i64::try_from(n).unwrap_or(i64::MAX) }

// ─── AreaStore impl ──────────────────────────────────────────────────────────

impl AreaStore for SqliteStore {
  type Error = crate::Error;

  // ── Provinces ─────────────────────────────────────────────────────────────

  async fn list_provinces(&self) -> Result<Vec<Province>> {
    let sql = format!(
      "SELECT {PROVINCE_COLUMNS} FROM {} ORDER BY name, code",
      self.tables.provinces
    );
    self.fetch_all(sql, vec![], read_province).await
  }

  async fn get_province(&self, code: &str) -> Result<Option<Province>> {
    self
      .by_code(&self.tables.provinces, PROVINCE_COLUMNS, code, read_province)
      .await
  }

  // ── Regencies ─────────────────────────────────────────────────────────────

  async fn get_regency(&self, code: &str) -> Result<Option<Regency>> {
    self
      .by_code(&self.tables.regencies, REGENCY_COLUMNS, code, read_regency)
      .await
  }

  async fn list_regencies_by_province(
    &self,
    province_code: &str,
  ) -> Result<Vec<Regency>> {
    self
      .children(
        &self.tables.regencies,
        REGENCY_COLUMNS,
        "province_code",
        province_code,
        read_regency,
      )
      .await
  }

  // ── Districts ─────────────────────────────────────────────────────────────

  async fn get_district(&self, code: &str) -> Result<Option<District>> {
    self
      .by_code(&self.tables.districts, DISTRICT_COLUMNS, code, read_district)
      .await
  }

  async fn list_districts_by_regency(
    &self,
    regency_code: &str,
  ) -> Result<Vec<District>> {
    self
      .children(
        &self.tables.districts,
        DISTRICT_COLUMNS,
        "regency_code",
        regency_code,
        read_district,
      )
      .await
  }

  // ── Villages ──────────────────────────────────────────────────────────────

  async fn get_village(&self, code: &str) -> Result<Option<Village>> {
    self
      .by_code(&self.tables.villages, VILLAGE_COLUMNS, code, read_village)
      .await
  }

  async fn list_villages_by_district(
    &self,
    district_code: &str,
  ) -> Result<Vec<Village>> {
    self
      .children(
        &self.tables.villages,
        VILLAGE_COLUMNS,
        "district_code",
        district_code,
        read_village,
      )
      .await
  }

  // ── Islands ───────────────────────────────────────────────────────────────

  async fn list_islands(&self, query: &IslandQuery) -> Result<Vec<Island>> {
    let mut conds: Vec<String> = vec![];
    let mut params: Vec<Value> = vec![];

    if let Some(code) = &query.regency_code {
      params.push(text(code));
      conds.push(format!("regency_code = ?{}", params.len()));
    }
    if let Some(populated) = query.populated {
      params.push(Value::Integer(populated.into()));
      conds.push(format!("is_populated = ?{}", params.len()));
    }
    if let Some(outermost) = query.outermost_small {
      params.push(Value::Integer(outermost.into()));
      conds.push(format!("is_outermost_small = ?{}", params.len()));
    }

    let where_clause = if conds.is_empty() {
      String::new()
    } else {
      format!("WHERE {}", conds.join(" AND "))
    };
    let limit_clause = match query.limit {
      Some(n) => {
        params.push(Value::Integer(clamp_i64(n)));
        format!("LIMIT ?{}", params.len())
      }
      None => String::new(),
    };

    let sql = format!(
      "SELECT {ISLAND_COLUMNS} FROM {}
       {where_clause}
       ORDER BY name, id
       {limit_clause}",
      self.tables.islands
    );
    self.fetch_all(sql, params, read_island).await
  }

  async fn list_islands_by_regency(&self, regency_code: &str) -> Result<Vec<Island>> {
    self
      .list_islands(&IslandQuery {
        regency_code: Some(regency_code.to_owned()),
        ..Default::default()
      })
      .await
  }

  async fn list_outermost_small_islands(&self) -> Result<Vec<Island>> {
    self
      .list_islands(&IslandQuery {
        outermost_small: Some(true),
        ..Default::default()
      })
      .await
  }

  async fn list_populated_islands(&self) -> Result<Vec<Island>> {
    self
      .list_islands(&IslandQuery { populated: Some(true), ..Default::default() })
      .await
  }

  async fn list_unpopulated_islands(&self) -> Result<Vec<Island>> {
    self
      .list_islands(&IslandQuery { populated: Some(false), ..Default::default() })
      .await
  }

  // ── Cross-cutting reads ───────────────────────────────────────────────────

  async fn search(&self, query: &str, kind: SearchKind) -> Result<SearchResults> {
    let t = &self.tables;
    let mut results = SearchResults::default();

    if kind.includes(SearchKind::Province) {
      results.provinces = Some(
        self
          .name_matches(&t.provinces, PROVINCE_COLUMNS, "name, code", query, None, read_province)
          .await?,
      );
    }
    if kind.includes(SearchKind::Regency) {
      results.regencies = Some(
        self
          .name_matches(&t.regencies, REGENCY_COLUMNS, "name, code", query, None, read_regency)
          .await?,
      );
    }
    if kind.includes(SearchKind::District) {
      results.districts = Some(
        self
          .name_matches(&t.districts, DISTRICT_COLUMNS, "name, code", query, None, read_district)
          .await?,
      );
    }
    if kind.includes(SearchKind::Village) {
      let cap = Some(self.config.search.village_limit);
      results.villages = Some(
        self
          .name_matches(&t.villages, VILLAGE_COLUMNS, "name, code", query, cap, read_village)
          .await?,
      );
    }
    if kind.includes(SearchKind::Island) {
      results.islands = Some(
        self
          .name_matches(&t.islands, ISLAND_COLUMNS, "name, id", query, None, read_island)
          .await?,
      );
    }

    Ok(results)
  }

  async fn build_hierarchy(
    &self,
    province_code:    &str,
    include_villages: bool,
  ) -> Result<Option<ProvinceNode>> {
    let Some(province) = self.get_province(province_code).await? else {
      return Ok(None);
    };

    let Tables { regencies: r, districts: d, villages: v, .. } = &*self.tables;
    let regencies = self.list_regencies_by_province(province_code).await?;

    let sql = format!(
      "SELECT {} FROM {d} d
       JOIN {r} r ON r.code = d.regency_code
       WHERE r.province_code = ?1
       ORDER BY d.name, d.code",
      qualified("d", DISTRICT_COLUMNS)
    );
    let districts = self
      .fetch_all(sql, vec![text(province_code)], read_district)
      .await?;

    let villages = if include_villages {
      let sql = format!(
        "SELECT {} FROM {v} v
         JOIN {d} d ON d.code = v.district_code
         JOIN {r} r ON r.code = d.regency_code
         WHERE r.province_code = ?1
         ORDER BY v.name, v.code",
        qualified("v", VILLAGE_COLUMNS)
      );
      Some(self.fetch_all(sql, vec![text(province_code)], read_village).await?)
    } else {
      None
    };

    Ok(Some(assemble(province, regencies, districts, villages)))
  }

  async fn statistics(&self) -> Result<Statistics> {
    let t = Arc::clone(&self.tables);
    let stats = self
      .conn
      .call(move |conn| {
        let count = |sql: String| -> rusqlite::Result<u64> {
          conn.query_row(&sql, [], |row| row.get::<_, i64>(0)).map(|n| n as u64)
        };
        Ok(Statistics {
          provinces: count(format!("SELECT COUNT(*) FROM {}", t.provinces))?,
          regencies: count(format!("SELECT COUNT(*) FROM {}", t.regencies))?,
          districts: count(format!("SELECT COUNT(*) FROM {}", t.districts))?,
          villages:  count(format!("SELECT COUNT(*) FROM {}", t.villages))?,
          islands:   count(format!("SELECT COUNT(*) FROM {}", t.islands))?,
          outermost_small_islands: count(format!(
            "SELECT COUNT(*) FROM {} WHERE is_outermost_small = 1",
            t.islands
          ))?,
          populated_islands: count(format!(
            "SELECT COUNT(*) FROM {} WHERE is_populated = 1",
            t.islands
          ))?,
        })
      })
      .await?;
    Ok(stats)
  }

  async fn resolve_by_code(&self, code: &AreaCode) -> Result<Option<Area>> {
    let code_str = code.as_str();
    let area = match code.kind() {
      AreaKind::Province => self.get_province(code_str).await?.map(Area::Province),
      AreaKind::Regency => self.get_regency(code_str).await?.map(Area::Regency),
      AreaKind::District => self.get_district(code_str).await?.map(Area::District),
      AreaKind::Village => self.get_village(code_str).await?.map(Area::Village),
    };
    Ok(area)
  }

  async fn lineage(&self, code: &AreaCode) -> Result<Option<Lineage>> {
    let Tables { provinces: p, regencies: r, districts: d, villages: v, .. } =
      &*self.tables;
    let pc = qualified("p", PROVINCE_COLUMNS);
    let rc = qualified("r", REGENCY_COLUMNS);
    let dc = qualified("d", DISTRICT_COLUMNS);
    let vc = qualified("v", VILLAGE_COLUMNS);

    // Every query selects province, regency, district, village columns in
    // that order, as far down as the requested level. Ancestors are LEFT
    // JOINed so a missing parent row never hides the area itself.
    let (sql, read): (String, RowReader<Lineage>) = match code.kind() {
      AreaKind::Province => (
        format!("SELECT {pc} FROM {p} p WHERE p.code = ?1"),
        lineage_of_province as RowReader<Lineage>,
      ),
      AreaKind::Regency => (
        format!(
          "SELECT {pc}, {rc} FROM {r} r
           LEFT JOIN {p} p ON p.code = r.province_code
           WHERE r.code = ?1"
        ),
        lineage_of_regency as RowReader<Lineage>,
      ),
      AreaKind::District => (
        format!(
          "SELECT {pc}, {rc}, {dc} FROM {d} d
           LEFT JOIN {r} r ON r.code = d.regency_code
           LEFT JOIN {p} p ON p.code = r.province_code
           WHERE d.code = ?1"
        ),
        lineage_of_district as RowReader<Lineage>,
      ),
      AreaKind::Village => (
        format!(
          "SELECT {pc}, {rc}, {dc}, {vc} FROM {v} v
           LEFT JOIN {d} d ON d.code = v.district_code
           LEFT JOIN {r} r ON r.code = d.regency_code
           LEFT JOIN {p} p ON p.code = r.province_code
           WHERE v.code = ?1"
        ),
        lineage_of_village as RowReader<Lineage>,
      ),
    };

    self.fetch_one(sql, vec![text(code.as_str())], read).await
  }
}

// ─── Lineage rows ────────────────────────────────────────────────────────────
//
// Only the looked-up area is guaranteed; every ancestor column may be NULL.

fn lineage_of_province(row: &Row<'_>) -> rusqlite::Result<Lineage> {
  Ok(Lineage {
    province: Some(province_at(row, 0)?),
    regency:  None,
    district: None,
    village:  None,
  })
}

fn lineage_of_regency(row: &Row<'_>) -> rusqlite::Result<Lineage> {
  Ok(Lineage {
    province: optional_at(row, 0, province_at)?,
    regency:  Some(regency_at(row, 2)?),
    district: None,
    village:  None,
  })
}

fn lineage_of_district(row: &Row<'_>) -> rusqlite::Result<Lineage> {
  Ok(Lineage {
    province: optional_at(row, 0, province_at)?,
    regency:  optional_at(row, 2, regency_at)?,
    district: Some(district_at(row, 5)?),
    village:  None,
  })
}

fn lineage_of_village(row: &Row<'_>) -> rusqlite::Result<Lineage> {
  Ok(Lineage {
    province: optional_at(row, 0, province_at)?,
    regency:  optional_at(row, 2, regency_at)?,
    district: optional_at(row, 5, district_at)?,
    village:  Some(village_at(row, 8)?),
  })
}
