use std::env;
use std::path::PathBuf;

const DB_PATH_VAR: &str = "FORMS_DB";
const DEFAULT_DB_PATH: &str = "formflow.sqlite";

/// Runtime configuration shared with every handler via `web::Data`.
#[derive(Clone)]
pub struct AppConfig {
    pub db_path: PathBuf,
}

impl AppConfig {
    pub fn from_env() -> AppConfig {
        let db_path = env::var(DB_PATH_VAR)
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from(DEFAULT_DB_PATH));
        AppConfig { db_path }
    }
}
