use std::env;
use std::path::PathBuf;

/// Database coordinates, read from the environment.
#[derive(Debug, Clone)]
pub struct DbConfig {
    pub host: String,
    pub user: String,
    pub password: String,
    pub database: String,
}

/// Runtime configuration. Populated once at startup from the environment
/// (a `.env` file is honored by the binary) and passed explicitly to the
/// loader and importer.
#[derive(Debug, Clone)]
pub struct Config {
    pub db: DbConfig,
    /// Directory input files are resolved against.
    pub data_dir: PathBuf,
    /// When set, every table gets a leading `row_index` column carrying the
    /// 0-based dataset row number.
    pub use_index_label: bool,
}

impl Config {
    pub fn from_env() -> Self {
        let db = DbConfig {
            host: env::var("DB_HOST").unwrap_or_else(|_| "localhost".into()),
            user: env::var("DB_USER").unwrap_or_else(|_| "root".into()),
            password: env::var("DB_PASSWORD").unwrap_or_default(),
            database: env::var("DB_NAME").unwrap_or_else(|_| "jeopardy_2".into()),
        };
        Config {
            db,
            data_dir: env::var("TABLOAD_DATA_DIR")
                .map(PathBuf::from)
                .unwrap_or_else(|_| PathBuf::from("data_files")),
            use_index_label: env::var("USE_INDEX_LABEL")
                .map(|v| v.eq_ignore_ascii_case("true"))
                .unwrap_or(false),
        }
    }
}
