use anyhow::Result;
use clap::Parser;
use tabload::{config::Config, db, import};
use tracing::{error, info};
use tracing_subscriber::{fmt, EnvFilter};

/// Clean a tabular data file and load it into a database table.
#[derive(Parser)]
#[command(name = "tabload")]
struct Cli {
    /// File to import, resolved against the data directory
    file: String,

    /// Input format: delimited-text, structured-record, or spreadsheet
    #[arg(short = 't', long, default_value = "delimited-text")]
    file_type: String,

    /// Rows inserted per database transaction
    #[arg(short, long, default_value_t = import::DEFAULT_BATCH_SIZE)]
    batch_size: usize,
}

fn main() -> Result<()> {
    // ─── 1) env + logging ────────────────────────────────────────────
    dotenv::dotenv().ok();
    let env = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    fmt::Subscriber::builder()
        .with_env_filter(env)
        .with_span_events(fmt::format::FmtSpan::CLOSE)
        .init();

    let cli = Cli::parse();
    let cfg = Config::from_env();

    // ─── 2) best-effort database creation ────────────────────────────
    db::ensure_database(&cfg.db);

    // ─── 3) connect + import ─────────────────────────────────────────
    let mut conn = db::connect(&cfg.db)?;
    match import::import_file(&cfg, &mut conn, &cli.file, &cli.file_type, cli.batch_size) {
        Ok(report) => {
            info!(
                table = %report.table,
                rows = report.rows_loaded,
                batches = report.batches,
                elapsed = ?report.elapsed,
                "import complete"
            );
            Ok(())
        }
        Err(e) => {
            error!(error = %e, "import failed");
            Err(e.into())
        }
    }
}
