//! `idn-area`: seed and serve Indonesian administrative area data.
//!
//! # Usage
//!
//! ```
//! idn-area migrate
//! idn-area seed --data-dir database/data
//! idn-area serve
//! idn-area resolve 32.04.01
//! idn-area search bandung --type regencies
//! ```

mod settings;

use std::{path::PathBuf, sync::Arc};

use anyhow::Context as _;
use clap::{Parser, Subcommand};
use idn_area_api::details::Details;
use idn_area_core::{
  area::AreaCode,
  seed::{ProgressSink, SeedOutcome, SeedSource},
  store::{AreaStore, SearchKind},
};
use idn_area_store_sqlite::SqliteStore;
use serde::Serialize;
use tokio::net::TcpListener;
use tower_http::trace::TraceLayer;
use tracing::level_filters::LevelFilter;
use tracing_subscriber::EnvFilter;

use crate::settings::AppConfig;

/// Where `serve` mounts the JSON API.
const API_PREFIX: &str = "/api/idn-area";

// ─── CLI args ─────────────────────────────────────────────────────────────────

#[derive(Parser)]
#[command(name = "idn-area", version, about = "Indonesian administrative area data")]
struct Cli {
  /// Path to the TOML configuration file.
  #[arg(short, long, global = true, default_value = "idn-area.toml")]
  config: PathBuf,

  #[command(subcommand)]
  command: Command,
}

#[derive(Subcommand)]
enum Command {
  /// Create the area tables if they do not exist.
  Migrate,

  /// Import the five CSV files into the store.
  Seed {
    /// Clear every table and import again.
    #[arg(long)]
    force: bool,

    /// Directory holding the CSV files; overrides `data_dir`.
    #[arg(long, value_name = "DIR")]
    data_dir: Option<PathBuf>,
  },

  /// Serve the JSON API.
  Serve,

  /// Print record counts.
  Stats,

  /// Look up any province, regency, district or village code.
  Resolve { code: String },

  /// Search names by substring.
  Search {
    query: String,

    /// all, provinces, regencies, districts, villages or islands.
    #[arg(long = "type", default_value = "all")]
    kind: SearchKind,
  },
}

// ─── Entry point ──────────────────────────────────────────────────────────────

#[tokio::main]
async fn main() -> anyhow::Result<()> {
  tracing_subscriber::fmt()
    .with_env_filter(
      EnvFilter::builder()
        .with_default_directive(LevelFilter::INFO.into())
        .from_env_lossy(),
    )
    .init();

  let cli = Cli::parse();
  let cfg = AppConfig::load(&cli.config)?;

  match cli.command {
    Command::Migrate => migrate(&cfg).await,
    Command::Seed { force, data_dir } => {
      let dir = data_dir.unwrap_or_else(|| cfg.data_dir.clone());
      seed(&cfg, dir, force).await
    }
    Command::Serve => serve(&cfg).await,
    Command::Stats => {
      let store = connect(&cfg).await?;
      print_json(&store.statistics().await?)
    }
    Command::Resolve { code } => resolve(&cfg, &code).await,
    Command::Search { query, kind } => {
      let store = connect(&cfg).await?;
      print_json(&store.search(&query, kind).await?)
    }
  }
}

// ─── Commands ─────────────────────────────────────────────────────────────────

/// Open an existing store without touching its schema.
async fn connect(cfg: &AppConfig) -> anyhow::Result<SqliteStore> {
  SqliteStore::connect(&cfg.store_path, cfg.area.clone())
    .await
    .with_context(|| format!("failed to open store at {:?}", cfg.store_path))
}

async fn migrate(cfg: &AppConfig) -> anyhow::Result<()> {
  SqliteStore::open(&cfg.store_path, cfg.area.clone())
    .await
    .with_context(|| format!("failed to migrate store at {:?}", cfg.store_path))?;
  tracing::info!(path = ?cfg.store_path, "schema ready");
  Ok(())
}

async fn seed(cfg: &AppConfig, dir: PathBuf, force: bool) -> anyhow::Result<()> {
  let store = connect(cfg).await?;
  let progress: Arc<dyn ProgressSink> = Arc::new(|line: &str| println!("{line}"));

  let outcome = store
    .seed(&SeedSource::new(&dir), force, Some(progress))
    .await
    .with_context(|| format!("seeding from {} failed", dir.display()))?;

  if let SeedOutcome::Seeded(report) = outcome {
    println!(
      "Done: {} provinces, {} regencies, {} districts, {} villages, {} islands.",
      report.provinces, report.regencies, report.districts, report.villages, report.islands,
    );
  }
  Ok(())
}

async fn serve(cfg: &AppConfig) -> anyhow::Result<()> {
  let store = Arc::new(connect(cfg).await?);
  let app = axum::Router::new()
    .nest(API_PREFIX, idn_area_api::api_router(store))
    .layer(TraceLayer::new_for_http());

  let address = cfg.address();
  tracing::info!("Listening on http://{address}{API_PREFIX}");
  let listener = TcpListener::bind(&address)
    .await
    .with_context(|| format!("failed to bind {address}"))?;

  axum::serve(listener, app).await.context("server error")?;
  Ok(())
}

async fn resolve(cfg: &AppConfig, code: &str) -> anyhow::Result<()> {
  let code = AreaCode::parse(code)?;
  let store = connect(cfg).await?;

  let Some(area) = store.resolve_by_code(&code).await? else {
    anyhow::bail!("no {} with code {code}", code.kind());
  };
  let lineage = store.lineage(&code).await?;
  print_json(&Details { area, lineage })
}

fn print_json<T: Serialize>(value: &T) -> anyhow::Result<()> {
  println!("{}", serde_json::to_string_pretty(value)?);
  Ok(())
}
