use std::path::PathBuf;

use anyhow::Context;
use chrono::Local;
use clap::Parser;
use shinkoku_core::{FieldId, FilingMode, TaxYear};
use shinkoku_term::app::{self, Request};
use shinkoku_term::config::AppConfig;
use shinkoku_term::logging;
use tracing::{debug, info};

// ─── CLI definition ──────────────────────────────────────────────────────────

/// しんこくん: income tax worksheet for Japanese e-Tax filers.
///
/// Loads the saved worksheet, applies any edits given on the command line,
/// saves it again and prints the transcription memo.
#[derive(Debug, Parser)]
#[command(name = "shinkoku", version)]
struct Cli {
    /// TOML config file (defaults to ./shinkoku.toml when present).
    #[arg(long)]
    config: Option<PathBuf>,

    /// Store backend, overriding the config file.
    #[arg(long)]
    backend: Option<String>,

    /// Store connection string, e.g. `shinkoku.db` or `:memory:`.
    #[arg(long)]
    db: Option<String>,

    /// Log level or filter directive, overriding the config file.
    #[arg(long)]
    log_level: Option<String>,

    /// Append log records to this file.
    #[arg(long)]
    log_file: Option<PathBuf>,

    /// Filing mode: `employee` or `business`.
    #[arg(long, value_parser = app::parse_mode)]
    mode: Option<FilingMode>,

    /// Tax year: `2024` or `2025`.
    #[arg(long, value_parser = app::parse_year)]
    year: Option<TaxYear>,

    /// Set a field, e.g. `--set inc-sales=3000000`. Repeatable.
    #[arg(long = "set", value_name = "FIELD=VALUE", value_parser = app::parse_assignment)]
    assignments: Vec<(FieldId, String)>,

    /// Comma-separated monthly sales (up to twelve); their sum replaces inc-sales.
    #[arg(long, value_delimiter = ',', num_args = 1..)]
    monthly_sales: Option<Vec<String>>,

    /// Erase the saved worksheet before applying other edits.
    #[arg(long)]
    reset: bool,
}

impl Cli {
    fn request(&self) -> Request {
        Request {
            reset: self.reset,
            mode: self.mode,
            year: self.year,
            monthly_sales: self.monthly_sales.clone(),
            assignments: self.assignments.clone(),
        }
    }
}

// ─── entry point ─────────────────────────────────────────────────────────────

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    logging::init_logging("info");

    let cli = Cli::parse();
    let config = AppConfig::load_or_default(cli.config.as_deref())?;

    let level = cli.log_level.as_deref().unwrap_or(&config.logging.level);
    if std::env::var_os("RUST_LOG").is_none() {
        logging::set_log_level(level)?;
    }
    if let Some(path) = cli.log_file.as_ref().or(config.logging.file.as_ref()) {
        logging::enable_file_logging(path)?;
    }

    let mut db_config = config.db_config();
    if let Some(backend) = cli.backend.clone() {
        db_config.backend = backend;
    }
    if let Some(db) = cli.db.clone() {
        db_config.connection_string = db;
    }

    let request = cli.request();
    request.validate()?;

    debug!("connecting to {} backend", db_config.backend);
    let registry = app::build_registry();
    let store = registry
        .create(&db_config)
        .await
        .with_context(|| format!("cannot open store '{}'", db_config.connection_string))?;

    let session = app::apply_request(&request, store.as_ref())
        .await
        .context("failed to update the worksheet")?;
    info!(
        mode = session.context().mode.as_str(),
        year = session.context().year.as_str(),
        "worksheet ready"
    );

    println!("{}", app::render(&session, Local::now().date_naive()));
    Ok(())
}
